//! Session repository trait.

use async_trait::async_trait;

use crate::error::Result;
use crate::session::model::Session;

/// Repository for the persisted session record.
///
/// Implementations must write the whole record at once so a reader never
/// observes a token without its profile (or the reverse).
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Loads the persisted session, or an empty session if none exists.
    async fn load(&self) -> Result<Session>;

    /// Replaces the persisted session.
    async fn save(&self, session: Session) -> Result<()>;

    /// Removes the persisted session.
    async fn clear(&self) -> Result<()>;
}
