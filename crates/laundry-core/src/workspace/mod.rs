//! Admin workspace: the tab strip shown once an operator is signed in.

pub mod manager;
pub mod tab;

pub use manager::TabWorkspace;
pub use tab::{DASHBOARD_TAB_ID, Section, Tab};
