//! Application layer of the laundry admin client.
//!
//! Coordinates the domain types in `laundry-core` with the adapters in
//! `laundry-infrastructure`:
//!
//! - `AdminSession`: signed-in operator plus the open workspace tabs
//! - `CrudController`: list/edit/archive/export flow of one catalog screen
//! - `ConfirmPrompt`: the yes/no question asked before destructive actions

pub mod admin_session;
pub mod confirm;
pub mod crud_controller;

#[cfg(test)]
mod test_support;

pub use admin_session::AdminSession;
pub use confirm::{AlwaysConfirm, ConfirmPrompt};
pub use crud_controller::{CrudController, Dialog, LoadPhase, Outcome};
