//! Unified path management for laundry-admin files.
//!
//! All configuration, session and log files live under one config directory
//! resolved via `AppPaths` from the version-migrate crate, so every platform
//! gets its native location.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/laundry-admin/     # Config directory (AppPaths default)
//! ├── config.toml              # Application configuration
//! ├── session.json             # Persisted session (token + profile)
//! └── logs/                    # Application logs
//!     └── laundry-admin.log.YYYY-MM-DD
//! ```

use std::path::{Path, PathBuf};
use version_migrate::AppPaths;

const APP_NAME: &str = "laundry-admin";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Home directory could not be determined.
    HomeDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::HomeDirNotFound => write!(f, "Cannot find home directory"),
        }
    }
}

impl std::error::Error for PathError {}

impl From<PathError> for laundry_core::AdminError {
    fn from(err: PathError) -> Self {
        laundry_core::AdminError::config(err.to_string())
    }
}

/// Kinds of files managed under the config directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceType {
    Config,
    Session,
    Logs,
}

/// A resolved path and whether it names a file or a directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathType {
    File(PathBuf),
    Dir(PathBuf),
}

impl PathType {
    pub fn into_path_buf(self) -> PathBuf {
        match self {
            PathType::File(path) | PathType::Dir(path) => path,
        }
    }
}

/// Path resolver with an optional base directory override.
///
/// With `base = None` the platform config dir is used; tests and the
/// `--config-dir` flag pass an explicit base instead.
#[derive(Debug, Clone, Default)]
pub struct AdminPaths {
    base: Option<PathBuf>,
}

impl AdminPaths {
    pub fn new(base: Option<&Path>) -> Self {
        Self {
            base: base.map(Path::to_path_buf),
        }
    }

    /// Returns the laundry-admin configuration directory.
    pub fn config_dir(&self) -> Result<PathBuf, PathError> {
        match &self.base {
            Some(base) => Ok(base.clone()),
            None => AppPaths::new(APP_NAME)
                .config_dir()
                .map_err(|_| PathError::HomeDirNotFound),
        }
    }

    pub fn get_path(&self, service: ServiceType) -> Result<PathType, PathError> {
        let dir = self.config_dir()?;
        Ok(match service {
            ServiceType::Config => PathType::File(dir.join("config.toml")),
            ServiceType::Session => PathType::File(dir.join("session.json")),
            ServiceType::Logs => PathType::Dir(dir.join("logs")),
        })
    }
}
