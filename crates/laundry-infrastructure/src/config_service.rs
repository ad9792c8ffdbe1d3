//! Configuration service implementation.
//!
//! This module provides a ConfigService that loads the admin configuration
//! from `config.toml` in the laundry-admin config directory.

use crate::paths::{AdminPaths, ServiceType};
use laundry_core::config::{API_URL_ENV, AdminConfig};
use laundry_core::error::{AdminError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

/// Configuration service that loads and caches the admin configuration.
///
/// A missing file is created from defaults on first access. The
/// `LAUNDRY_API_URL` environment variable overrides `api.base_url`.
#[derive(Debug, Clone)]
pub struct ConfigService {
    path: PathBuf,
    /// Cached configuration loaded from file.
    config: Arc<RwLock<Option<AdminConfig>>>,
}

impl ConfigService {
    /// Creates a ConfigService for the config file under `paths`.
    ///
    /// The configuration is loaded lazily on first access.
    pub fn new(paths: &AdminPaths) -> Result<Self> {
        let path = paths.get_path(ServiceType::Config)?.into_path_buf();
        Ok(Self::with_path(path))
    }

    pub fn with_path(path: PathBuf) -> Self {
        Self {
            path,
            config: Arc::new(RwLock::new(None)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Gets the configuration, loading from file if not cached.
    ///
    /// Unreadable files fall back to defaults with a warning.
    pub fn get_config(&self) -> AdminConfig {
        if let Ok(read_lock) = self.config.read() {
            if let Some(cached) = read_lock.as_ref() {
                return cached.clone();
            }
        }

        let loaded = self.load().unwrap_or_else(|e| {
            tracing::warn!("[Config] Using defaults, failed to load {:?}: {}", self.path, e);
            AdminConfig::default()
        });
        let loaded = apply_overrides(loaded, std::env::var(API_URL_ENV).ok());

        if let Ok(mut write_lock) = self.config.write() {
            *write_lock = Some(loaded.clone());
        }
        loaded
    }

    /// Invalidates the cache, forcing a reload on next access.
    pub fn invalidate_cache(&self) {
        if let Ok(mut write_lock) = self.config.write() {
            *write_lock = None;
        }
    }

    /// Reads and parses the config file, writing defaults when it is missing.
    pub fn load(&self) -> Result<AdminConfig> {
        if !self.path.exists() {
            let default_config = AdminConfig::default();
            self.save(&default_config)?;
            tracing::info!("[Config] Created default config at {:?}", self.path);
            return Ok(default_config);
        }

        let content = fs::read_to_string(&self.path)?;
        let config: AdminConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Writes the configuration and refreshes the cache.
    pub fn save(&self, config: &AdminConfig) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(config)?;
        fs::write(&self.path, content)
            .map_err(|e| AdminError::io(format!("Failed to write {:?}: {}", self.path, e)))?;
        self.invalidate_cache();
        Ok(())
    }
}

/// Applies environment overrides on top of the file configuration.
fn apply_overrides(mut config: AdminConfig, api_url: Option<String>) -> AdminConfig {
    if let Some(url) = api_url.filter(|url| !url.trim().is_empty()) {
        config.api.base_url = url;
    }
    config
}
