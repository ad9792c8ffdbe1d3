//! Configuration model (`config.toml`).

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Default API base URL when nothing is configured.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080/api";

/// Environment variable overriding `api.base_url`.
pub const API_URL_ENV: &str = "LAUNDRY_API_URL";

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct ApiConfig {
    pub base_url: String,
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Page size requested while following pagination
    #[serde(default = "default_page_limit")]
    pub page_limit: u32,
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_page_limit() -> u32 {
    100
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout_secs: default_timeout_secs(),
            page_limit: default_page_limit(),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct SessionSettings {
    /// Name shown for the locally synthesized admin profile.
    #[serde(default = "default_admin_display_name")]
    pub admin_display_name: String,
}

fn default_admin_display_name() -> String {
    "Admin Maulana".to_string()
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            admin_display_name: default_admin_display_name(),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct ExportSettings {
    /// Directory export files are written to. Falls back to the download dir.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct LogSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Also write a daily rolling log file under the config dir.
    #[serde(default = "default_true")]
    pub file: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: true,
        }
    }
}

/// Root of `config.toml`.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct AdminConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub session: SessionSettings,
    #[serde(default)]
    pub export: ExportSettings,
    #[serde(default)]
    pub log: LogSettings,
}
