//! File-backed session repository.
//!
//! The session lives in `session.json` under the config directory as one
//! versioned record, so the token and the profile are always written
//! together.

use crate::dto::create_session_migrator;
use crate::paths::{AdminPaths, ServiceType};
use laundry_core::error::{AdminError, Result};
use laundry_core::session::{Session, SessionRepository};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;
use version_migrate::{FileStorage, FileStorageStrategy, FormatStrategy, LoadBehavior};

const SESSION_ENTITY: &str = "admin_session";

/// Session repository backed by FileStorage.
///
/// The last loaded or saved session is cached in memory; reads never touch
/// the disk after construction.
#[derive(Clone)]
pub struct FileSessionRepository {
    session: Arc<Mutex<Session>>,
    storage: Arc<Mutex<FileStorage>>,
}

impl FileSessionRepository {
    /// Opens the session file under `paths`, creating it signed out when
    /// missing.
    pub fn new(paths: &AdminPaths) -> Result<Self> {
        let file_path = paths.get_path(ServiceType::Session)?.into_path_buf();
        Self::with_path(file_path)
    }

    pub fn with_path(file_path: PathBuf) -> Result<Self> {
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let migrator = create_session_migrator();

        let default_session = serde_json::to_value(Session::default()).map_err(|e| {
            AdminError::Config(format!("Failed to serialize default Session: {}", e))
        })?;

        let strategy = FileStorageStrategy::new()
            .with_format(FormatStrategy::Json)
            .with_load_behavior(LoadBehavior::SaveIfMissing)
            .with_default_value(default_session);

        let storage = FileStorage::new(file_path, migrator, strategy)?;

        let initial: Vec<Session> = storage.query(SESSION_ENTITY)?;
        let initial = initial.into_iter().next().unwrap_or_default();
        tracing::debug!(
            "[Session] Loaded session (authenticated: {})",
            initial.is_authenticated()
        );

        Ok(Self {
            session: Arc::new(Mutex::new(initial)),
            storage: Arc::new(Mutex::new(storage)),
        })
    }

    async fn persist(&self, session: Session) -> Result<()> {
        {
            let mut cached = self.session.lock().await;
            *cached = session.clone();
        }

        let storage = self.storage.clone();
        tokio::task::spawn_blocking(move || {
            let mut storage = storage.blocking_lock();
            storage
                .update_and_save(SESSION_ENTITY, vec![session])
                .map_err(|e| AdminError::io(format!("Failed to save session: {}", e)))
        })
        .await
        .map_err(|e| AdminError::internal(format!("Failed to join task: {}", e)))??;

        Ok(())
    }
}

#[async_trait::async_trait]
impl SessionRepository for FileSessionRepository {
    async fn load(&self) -> Result<Session> {
        Ok(self.session.lock().await.clone())
    }

    async fn save(&self, session: Session) -> Result<()> {
        self.persist(session).await
    }

    async fn clear(&self) -> Result<()> {
        self.persist(Session::default()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use laundry_core::session::UserProfile;
    use tempfile::TempDir;

    fn signed_in() -> Session {
        Session::signed_in(
            "tok-123",
            UserProfile::local_admin("Admin Maulana", "admin@laundry.com"),
        )
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_missing_file_starts_signed_out() {
        let temp_dir = TempDir::new().unwrap();
        let repo = FileSessionRepository::new(&AdminPaths::new(Some(temp_dir.path()))).unwrap();

        let session = repo.load().await.unwrap();
        assert!(!session.is_authenticated());
        assert!(temp_dir.path().join("session.json").exists());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_session_survives_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("session.json");

        let repo = FileSessionRepository::with_path(path.clone()).unwrap();
        repo.save(signed_in()).await.unwrap();

        let reopened = FileSessionRepository::with_path(path).unwrap();
        let session = reopened.load().await.unwrap();
        assert!(session.is_authenticated());
        assert_eq!(session.token(), Some("tok-123"));
        assert_eq!(session.user().unwrap().name, "Admin Maulana");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_clear_removes_both_halves() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("session.json");

        let repo = FileSessionRepository::with_path(path.clone()).unwrap();
        repo.save(signed_in()).await.unwrap();
        repo.clear().await.unwrap();

        let reopened = FileSessionRepository::with_path(path).unwrap();
        let session = reopened.load().await.unwrap();
        assert!(session.token().is_none());
        assert!(session.user().is_none());
    }
}
