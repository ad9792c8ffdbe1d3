//! Wiring of the application objects for one process.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Result, bail};
use laundry_application::{AdminSession, ConfirmPrompt, CrudController};
use laundry_core::auth::LOGIN_ROUTE;
use laundry_core::catalog::{Service, User};
use laundry_core::config::AdminConfig;
use laundry_infrastructure::{
    AdminPaths, ApiClient, FileSessionRepository, HttpAuthApi, HttpCatalogApi,
};

pub struct AppContext {
    pub config: AdminConfig,
    pub session: AdminSession,
    pub users: CrudController<User>,
    pub services: CrudController<Service>,
}

impl AppContext {
    /// Builds the HTTP client, restores the stored session and creates one
    /// controller per catalog screen.
    pub async fn bootstrap(
        paths: &AdminPaths,
        config: AdminConfig,
        confirm: Arc<dyn ConfirmPrompt>,
    ) -> Result<Self> {
        let client = ApiClient::new(&config.api)?;
        tracing::info!("[Bootstrap] API base URL: {}", client.base_url());

        let repository = Arc::new(FileSessionRepository::new(paths)?);
        let auth = Arc::new(HttpAuthApi::new(client.clone()));
        let session = AdminSession::new(repository, auth, config.session.clone());
        session.restore().await?;

        let users = CrudController::new(
            Arc::new(HttpCatalogApi::<User>::new(client.clone())),
            confirm.clone(),
        )
        .with_page_limit(config.api.page_limit);
        let services = CrudController::new(
            Arc::new(HttpCatalogApi::<Service>::new(client)),
            confirm,
        )
        .with_page_limit(config.api.page_limit);

        Ok(Self {
            config,
            session,
            users,
            services,
        })
    }

    /// Runs the auth gate; fails with a hint to sign in when access is denied.
    pub async fn require_login(&self) -> Result<()> {
        if self.session.guard().await?.is_granted() {
            return Ok(());
        }
        bail!(
            "Not signed in ({}). Run `laundry-admin login --email <email>` first.",
            LOGIN_ROUTE
        )
    }

    /// Where export files go: explicit flag, then config, then the
    /// download dir, then the working directory.
    pub fn export_dir(&self, explicit: Option<PathBuf>) -> PathBuf {
        explicit
            .or_else(|| self.config.export.output_dir.clone())
            .or_else(dirs::download_dir)
            .unwrap_or_else(|| PathBuf::from("."))
    }
}
