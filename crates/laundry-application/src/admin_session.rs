//! Signed-in operator and workspace state.
//!
//! `AdminSession` is the single context object the screens share. It owns
//! the persisted [`Session`] and the in-memory [`TabWorkspace`]; nothing
//! else holds copies of either.

use std::sync::Arc;

use laundry_core::auth::{AccessDecision, AuthApi, AuthGate, Credentials};
use laundry_core::config::SessionSettings;
use laundry_core::error::Result;
use laundry_core::session::{Session, SessionRepository, UserProfile};
use laundry_core::workspace::{Section, Tab, TabWorkspace};
use tokio::sync::RwLock;

pub struct AdminSession {
    repository: Arc<dyn SessionRepository>,
    auth: Arc<dyn AuthApi>,
    settings: SessionSettings,
    session: RwLock<Session>,
    workspace: RwLock<TabWorkspace>,
}

impl AdminSession {
    /// Creates a signed-out context. Call [`AdminSession::restore`] to pick
    /// up a persisted session.
    pub fn new(
        repository: Arc<dyn SessionRepository>,
        auth: Arc<dyn AuthApi>,
        settings: SessionSettings,
    ) -> Self {
        Self {
            repository,
            auth,
            settings,
            session: RwLock::new(Session::default()),
            workspace: RwLock::new(TabWorkspace::default()),
        }
    }

    /// Loads the persisted session and attaches its token to the API client.
    pub async fn restore(&self) -> Result<Session> {
        let restored = self.repository.load().await?;
        if let Some(token) = restored.token() {
            self.auth.attach_token(Some(token.to_string()));
        }
        tracing::info!(
            "[Session] Restored (authenticated: {})",
            restored.is_authenticated()
        );
        *self.session.write().await = restored.clone();
        Ok(restored)
    }

    pub async fn session(&self) -> Session {
        self.session.read().await.clone()
    }

    pub async fn current_user(&self) -> Option<UserProfile> {
        self.session.read().await.user.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.session.read().await.is_authenticated()
    }

    /// Replaces the operator profile. The token is left as is.
    pub async fn set_user(&self, user: Option<UserProfile>) -> Result<()> {
        let mut session = self.session.write().await;
        let mut next = session.clone();
        next.user = user;
        self.repository.save(next.clone()).await?;
        *session = next;
        Ok(())
    }

    /// Exchanges credentials for a token and signs the operator in.
    ///
    /// The login endpoint returns only a token, so the profile is the
    /// locally built admin profile for the submitted email. Token and
    /// profile are persisted in one write.
    pub async fn login(&self, credentials: &Credentials) -> Result<UserProfile> {
        let token = self.auth.login(credentials).await.inspect_err(|e| {
            tracing::warn!("[Session] Login failed for {}: {}", credentials.email, e);
        })?;

        let profile =
            UserProfile::local_admin(&self.settings.admin_display_name, &credentials.email);
        let signed_in = Session::signed_in(token.clone(), profile.clone());

        let mut session = self.session.write().await;
        self.repository.save(signed_in.clone()).await?;
        self.auth.attach_token(Some(token));
        *session = signed_in;

        tracing::info!("[Session] Signed in as {}", profile.email);
        Ok(profile)
    }

    /// Signs out: forgets the session, detaches the token and closes every
    /// tab but the dashboard.
    ///
    /// In-memory state is reset even when clearing the stored record fails;
    /// that failure is still returned.
    pub async fn logout(&self) -> Result<()> {
        let cleared = self.repository.clear().await;

        self.session.write().await.clear();
        self.auth.attach_token(None);
        self.workspace.write().await.reset();

        match &cleared {
            Ok(()) => tracing::info!("[Session] Signed out"),
            Err(e) => tracing::error!("[Session] Failed to clear stored session: {}", e),
        }
        cleared
    }

    /// Evaluates the auth gate. A denied half-session (token without a
    /// profile, or the reverse) is wiped.
    pub async fn guard(&self) -> Result<AccessDecision> {
        let mut session = self.session.write().await;
        let decision = AuthGate::check(&session);

        if !decision.is_granted() && (session.token.is_some() || session.user.is_some()) {
            tracing::warn!("[Session] Dropping incomplete session");
            self.repository.clear().await?;
            self.auth.attach_token(None);
            session.clear();
        }
        Ok(decision)
    }

    // ------------------------------------------------------------------
    // Workspace
    // ------------------------------------------------------------------

    /// Snapshot of the tab strip.
    pub async fn workspace(&self) -> TabWorkspace {
        self.workspace.read().await.clone()
    }

    pub async fn add_tab(&self, tab: Tab) {
        self.workspace.write().await.add_tab(tab);
    }

    pub async fn open_section(&self, section: Section) {
        self.workspace.write().await.open_section(section);
    }

    pub async fn remove_tab(&self, id: &str) -> bool {
        self.workspace.write().await.remove_tab(id)
    }

    pub async fn set_active_tab(&self, id: &str) -> Result<()> {
        self.workspace.write().await.set_active_tab(id)
    }

    pub async fn set_sidebar_open(&self, open: bool) {
        self.workspace.write().await.set_sidebar_open(open);
    }

    pub async fn toggle_sidebar(&self) -> bool {
        self.workspace.write().await.toggle_sidebar()
    }
}
