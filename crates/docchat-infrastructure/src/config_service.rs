//! Configuration service implementation.
//!
//! Loads the client configuration from `config.toml` and applies environment
//! overrides on top.

use crate::paths::DocchatPaths;
use docchat_core::config::ClientConfig;
use docchat_core::error::{ChatError, Result};
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

/// Environment variable overriding `api.base_url`.
pub const API_URL_ENV: &str = "DOCCHAT_API_URL";

/// Environment variable overriding `retrieval.base_url`.
pub const RETRIEVAL_URL_ENV: &str = "DOCCHAT_RETRIEVAL_URL";

/// Configuration service that loads and caches the client configuration.
///
/// A missing file yields the defaults; a file that does not parse is an error.
#[derive(Debug, Clone)]
pub struct ConfigService {
    path: PathBuf,
    /// Cached configuration loaded from file.
    config: Arc<RwLock<Option<ClientConfig>>>,
}

impl ConfigService {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            config: Arc::new(RwLock::new(None)),
        }
    }

    /// Creates a service for the default `config.toml` location.
    pub fn from_paths(paths: &DocchatPaths) -> Result<Self> {
        let path = paths
            .config_file()
            .map_err(|e| ChatError::config(e.to_string()))?;
        Ok(Self::new(path))
    }

    /// Gets the configuration, loading from file if not cached.
    pub fn get_config(&self) -> Result<ClientConfig> {
        {
            let read_lock = self
                .config
                .read()
                .map_err(|e| ChatError::internal(e.to_string()))?;
            if let Some(ref cached) = *read_lock {
                return Ok(cached.clone());
            }
        }

        let mut loaded = self.load_file()?;
        apply_env_overrides(&mut loaded, |key| std::env::var(key).ok());

        let mut write_lock = self
            .config
            .write()
            .map_err(|e| ChatError::internal(e.to_string()))?;
        *write_lock = Some(loaded.clone());
        Ok(loaded)
    }

    /// Invalidates the cache, forcing a reload on next access.
    pub fn invalidate_cache(&self) {
        if let Ok(mut write_lock) = self.config.write() {
            *write_lock = None;
        }
    }

    fn load_file(&self) -> Result<ClientConfig> {
        if !self.path.exists() {
            tracing::debug!("[ConfigService] {} not found, using defaults", self.path.display());
            return Ok(ClientConfig::default());
        }
        let content = std::fs::read_to_string(&self.path)?;
        toml::from_str(&content).map_err(|e| {
            ChatError::config(format!("invalid {}: {}", self.path.display(), e))
        })
    }
}

/// Applies environment overrides. `lookup` is injected for tests.
pub fn apply_env_overrides(config: &mut ClientConfig, lookup: impl Fn(&str) -> Option<String>) {
    let url = |key: &str| {
        lookup(key)
            .filter(|v| !v.trim().is_empty())
            .map(|v| v.trim().trim_end_matches('/').to_string())
    };
    if let Some(base_url) = url(API_URL_ENV) {
        config.api.base_url = base_url;
    }
    if let Some(base_url) = url(RETRIEVAL_URL_ENV) {
        config.retrieval.base_url = base_url;
    }
}
