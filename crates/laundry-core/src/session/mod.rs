//! Session domain module.
//!
//! This module contains the signed-in operator's session record and the
//! repository interface used to persist it across restarts.
//!
//! # Module Structure
//!
//! - `model`: Session record (`Session`) and operator profile (`UserProfile`)
//! - `repository`: Repository trait for session persistence
//!
//! # Usage
//!
//! ```ignore
//! use laundry_core::session::{Session, SessionRepository, UserProfile};
//! ```

mod model;
mod repository;

// Re-export public API
pub use model::{Session, UserProfile};
pub use repository::SessionRepository;
