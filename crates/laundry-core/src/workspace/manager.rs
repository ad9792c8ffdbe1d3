//! Tab state machine for the admin workspace.

use serde::{Deserialize, Serialize};

use crate::error::{AdminError, Result};
use crate::workspace::tab::{DASHBOARD_TAB_ID, Section, Tab};

/// Ordered tab strip plus the id of the focused tab.
///
/// Invariants held after every transition:
/// - the dashboard tab is present,
/// - tab ids are unique,
/// - `active_tab_id` names a tab in `tabs`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", try_from = "WorkspaceRecord")]
pub struct TabWorkspace {
    tabs: Vec<Tab>,
    active_tab_id: String,
    sidebar_open: bool,
}

impl Default for TabWorkspace {
    fn default() -> Self {
        Self {
            tabs: vec![Tab::dashboard()],
            active_tab_id: DASHBOARD_TAB_ID.to_string(),
            sidebar_open: true,
        }
    }
}

/// Unchecked wire shape of a [`TabWorkspace`].
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WorkspaceRecord {
    tabs: Vec<Tab>,
    active_tab_id: String,
    #[serde(default = "default_sidebar_open")]
    sidebar_open: bool,
}

fn default_sidebar_open() -> bool {
    true
}

impl TryFrom<WorkspaceRecord> for TabWorkspace {
    type Error = AdminError;

    fn try_from(record: WorkspaceRecord) -> Result<Self> {
        if !record.tabs.iter().any(|tab| tab.id == DASHBOARD_TAB_ID) {
            return Err(AdminError::not_found("tab", DASHBOARD_TAB_ID));
        }
        for (index, tab) in record.tabs.iter().enumerate() {
            if record.tabs[..index].iter().any(|other| other.id == tab.id) {
                return Err(AdminError::serialization(
                    "workspace",
                    format!("duplicate tab id '{}'", tab.id),
                ));
            }
        }
        if !record.tabs.iter().any(|tab| tab.id == record.active_tab_id) {
            return Err(AdminError::not_found("tab", record.active_tab_id));
        }
        Ok(Self {
            tabs: record.tabs,
            active_tab_id: record.active_tab_id,
            sidebar_open: record.sidebar_open,
        })
    }
}

impl TabWorkspace {
    /// Creates a workspace with only the dashboard open.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tabs(&self) -> &[Tab] {
        &self.tabs
    }

    pub fn active_tab_id(&self) -> &str {
        &self.active_tab_id
    }

    /// Returns the focused tab.
    pub fn active_tab(&self) -> &Tab {
        self.find(&self.active_tab_id)
            .or_else(|| self.find(DASHBOARD_TAB_ID))
            .unwrap_or(&self.tabs[0])
    }

    /// Returns the section rendered by the focused tab, if it is a known one.
    pub fn active_section(&self) -> Option<Section> {
        Section::from_component(&self.active_tab().component)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.find(id).is_some()
    }

    fn find(&self, id: &str) -> Option<&Tab> {
        self.tabs.iter().find(|tab| tab.id == id)
    }

    /// Opens a tab and focuses it.
    ///
    /// If a tab with the same id is already open only the focus changes; the
    /// stored title and component are kept as first written.
    pub fn add_tab(&mut self, tab: Tab) {
        if !self.contains(&tab.id) {
            tracing::debug!("[Workspace] Opening tab '{}'", tab.id);
            self.active_tab_id = tab.id.clone();
            self.tabs.push(tab);
        } else {
            self.active_tab_id = tab.id;
        }
    }

    /// Opens (or focuses) the tab of a sidebar section.
    pub fn open_section(&mut self, section: Section) {
        self.add_tab(section.tab());
    }

    /// Closes a tab.
    ///
    /// The dashboard cannot be closed. When the focused tab is closed, focus
    /// moves to the tab right before it, or to the dashboard when it was the
    /// first one. Returns whether a tab was removed.
    pub fn remove_tab(&mut self, id: &str) -> bool {
        if id == DASHBOARD_TAB_ID {
            return false;
        }

        let Some(index) = self.tabs.iter().position(|tab| tab.id == id) else {
            return false;
        };

        if self.active_tab_id == id {
            self.active_tab_id = index
                .checked_sub(1)
                .map(|prev| self.tabs[prev].id.clone())
                .unwrap_or_else(|| DASHBOARD_TAB_ID.to_string());
        }

        self.tabs.remove(index);
        tracing::debug!(
            "[Workspace] Closed tab '{}', active is now '{}'",
            id,
            self.active_tab_id
        );
        true
    }

    /// Focuses an open tab.
    ///
    /// Unknown ids are rejected and leave the focus unchanged.
    pub fn set_active_tab(&mut self, id: &str) -> Result<()> {
        if !self.contains(id) {
            return Err(AdminError::not_found("tab", id));
        }
        self.active_tab_id = id.to_string();
        Ok(())
    }

    pub fn sidebar_open(&self) -> bool {
        self.sidebar_open
    }

    pub fn set_sidebar_open(&mut self, open: bool) {
        self.sidebar_open = open;
    }

    pub fn toggle_sidebar(&mut self) -> bool {
        self.sidebar_open = !self.sidebar_open;
        self.sidebar_open
    }

    /// Closes everything except the dashboard and focuses it.
    ///
    /// The sidebar flag is layout state and survives the reset.
    pub fn reset(&mut self) {
        self.tabs = vec![Tab::dashboard()];
        self.active_tab_id = DASHBOARD_TAB_ID.to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(workspace: &TabWorkspace) -> Vec<&str> {
        workspace.tabs().iter().map(|t| t.id.as_str()).collect()
    }

    #[test]
    fn test_deserialize_keeps_valid_workspace() {
        let mut workspace = TabWorkspace::new();
        workspace.open_section(Section::Services);
        workspace.set_sidebar_open(false);

        let json = serde_json::to_string(&workspace).unwrap();
        let restored: TabWorkspace = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, workspace);
    }

    #[test]
    fn test_deserialize_rejects_broken_invariants() {
        let empty = r#"{"tabs":[],"activeTabId":"x","sidebarOpen":true}"#;
        assert!(serde_json::from_str::<TabWorkspace>(empty).is_err());

        let dangling = r#"{"tabs":[{"id":"dashboard","title":"Dashboard","component":"Dashboard"}],"activeTabId":"users"}"#;
        assert!(serde_json::from_str::<TabWorkspace>(dangling).is_err());

        let duplicate = r#"{"tabs":[
            {"id":"dashboard","title":"Dashboard","component":"Dashboard"},
            {"id":"dashboard","title":"Again","component":"Dashboard"}
        ],"activeTabId":"dashboard"}"#;
        assert!(serde_json::from_str::<TabWorkspace>(duplicate).is_err());

        let minimal = r#"{"tabs":[{"id":"dashboard","title":"Dashboard","component":"Dashboard"}],"activeTabId":"dashboard"}"#;
        let workspace: TabWorkspace = serde_json::from_str(minimal).unwrap();
        assert_eq!(workspace.active_tab().id, "dashboard");
        assert!(workspace.sidebar_open());
    }

    #[test]
    fn test_new_has_only_dashboard() {
        let workspace = TabWorkspace::new();
        assert_eq!(ids(&workspace), vec!["dashboard"]);
        assert_eq!(workspace.active_tab_id(), "dashboard");
        assert!(workspace.sidebar_open());
    }

    #[test]
    fn test_add_tab_appends_and_focuses() {
        let mut workspace = TabWorkspace::new();
        workspace.add_tab(Tab::new("users", "Users", "UserManagement"));

        assert_eq!(ids(&workspace), vec!["dashboard", "users"]);
        assert_eq!(workspace.active_tab_id(), "users");
        assert_eq!(workspace.active_section(), Some(Section::Users));
    }

    #[test]
    fn test_add_existing_tab_keeps_first_title() {
        let mut workspace = TabWorkspace::new();
        workspace.add_tab(Tab::new("users", "Users", "UserManagement"));
        workspace.add_tab(Tab::new("services", "Services", "ServicesList"));
        workspace.add_tab(Tab::new("users", "People", "Other"));

        assert_eq!(ids(&workspace), vec!["dashboard", "users", "services"]);
        assert_eq!(workspace.active_tab_id(), "users");
        assert_eq!(workspace.active_tab().title, "Users");
        assert_eq!(workspace.active_tab().component, "UserManagement");
    }

    #[test]
    fn test_remove_dashboard_is_noop() {
        let mut workspace = TabWorkspace::new();
        workspace.open_section(Section::Users);
        let before = workspace.clone();

        assert!(!workspace.remove_tab("dashboard"));
        assert_eq!(workspace, before);
    }

    #[test]
    fn test_remove_active_focuses_previous() {
        let mut workspace = TabWorkspace::new();
        workspace.open_section(Section::Users);
        workspace.open_section(Section::Services);
        assert_eq!(workspace.active_tab_id(), "services");

        assert!(workspace.remove_tab("services"));
        assert_eq!(ids(&workspace), vec!["dashboard", "users"]);
        assert_eq!(workspace.active_tab_id(), "users");
    }

    #[test]
    fn test_remove_active_after_dashboard_focuses_dashboard() {
        let mut workspace = TabWorkspace::new();
        workspace.open_section(Section::Users);

        workspace.remove_tab("users");
        assert_eq!(workspace.active_tab_id(), "dashboard");
    }

    #[test]
    fn test_remove_inactive_keeps_focus() {
        let mut workspace = TabWorkspace::new();
        workspace.open_section(Section::Users);
        workspace.open_section(Section::Services);
        workspace.open_section(Section::Settings);

        workspace.remove_tab("users");
        assert_eq!(ids(&workspace), vec!["dashboard", "services", "settings"]);
        assert_eq!(workspace.active_tab_id(), "settings");
    }

    #[test]
    fn test_remove_unknown_is_noop() {
        let mut workspace = TabWorkspace::new();
        workspace.open_section(Section::Users);
        let before = workspace.clone();

        assert!(!workspace.remove_tab("billing"));
        assert_eq!(workspace, before);
    }

    #[test]
    fn test_set_active_tab() {
        let mut workspace = TabWorkspace::new();
        workspace.open_section(Section::Users);

        workspace.set_active_tab("dashboard").unwrap();
        assert_eq!(workspace.active_tab_id(), "dashboard");

        let err = workspace.set_active_tab("billing").unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(workspace.active_tab_id(), "dashboard");
    }

    #[test]
    fn test_reset_keeps_sidebar_flag() {
        let mut workspace = TabWorkspace::new();
        workspace.open_section(Section::Users);
        workspace.open_section(Section::Services);
        workspace.set_sidebar_open(false);

        workspace.reset();
        assert_eq!(ids(&workspace), vec!["dashboard"]);
        assert_eq!(workspace.active_tab_id(), "dashboard");
        assert!(!workspace.sidebar_open());
    }

    #[test]
    fn test_toggle_sidebar() {
        let mut workspace = TabWorkspace::new();
        assert!(!workspace.toggle_sidebar());
        assert!(workspace.toggle_sidebar());
    }
}
