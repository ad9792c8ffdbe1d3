//! Versioned persistence DTOs.

pub mod session;

pub use session::create_session_migrator;
