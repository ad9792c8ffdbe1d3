pub mod auth;
pub mod catalog;
pub mod config;
pub mod error;
pub mod export;
pub mod session;
pub mod workspace;

// Re-export common error type
pub use error::{AdminError, Result};
