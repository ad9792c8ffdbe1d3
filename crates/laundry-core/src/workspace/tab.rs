//! Tab and section models.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// Id of the tab that is always open and cannot be closed.
pub const DASHBOARD_TAB_ID: &str = "dashboard";

/// An open tab in the admin workspace.
///
/// `component` names the view rendered for the tab; it is only a label here
/// and is never resolved by the workspace itself.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Tab {
    /// Unique tab identifier
    pub id: String,
    /// Display label
    pub title: String,
    /// Name of the view rendered for this tab
    pub component: String,
}

impl Tab {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        component: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            component: component.into(),
        }
    }

    /// The permanent dashboard tab.
    pub fn dashboard() -> Self {
        Section::Dashboard.tab()
    }

    pub fn is_dashboard(&self) -> bool {
        self.id == DASHBOARD_TAB_ID
    }
}

/// Sidebar destinations of the admin workspace.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Section {
    Dashboard,
    Users,
    Transactions,
    Services,
    Settings,
}

impl Section {
    /// Tab id used for this section.
    pub fn id(&self) -> &'static str {
        match self {
            Section::Dashboard => DASHBOARD_TAB_ID,
            Section::Users => "users",
            Section::Transactions => "transactions",
            Section::Services => "services",
            Section::Settings => "settings",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Section::Dashboard => "Dashboard",
            Section::Users => "Users",
            Section::Transactions => "Transactions",
            Section::Services => "Services",
            Section::Settings => "Settings",
        }
    }

    pub fn component(&self) -> &'static str {
        match self {
            Section::Dashboard => "DashboardContent",
            Section::Users => "UserManagement",
            Section::Transactions => "Transactions",
            Section::Services => "ServicesList",
            Section::Settings => "SettingsContent",
        }
    }

    /// Builds the tab opened by this section's sidebar entry.
    pub fn tab(&self) -> Tab {
        Tab::new(self.id(), self.title(), self.component())
    }

    /// Resolves a tab back to its section by component name.
    pub fn from_component(component: &str) -> Option<Self> {
        use strum::IntoEnumIterator;
        Section::iter().find(|section| section.component() == component)
    }
}
