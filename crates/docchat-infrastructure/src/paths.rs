//! Unified path management for docchat configuration files.
//!
//! ```text
//! ~/.config/docchat/           # Config directory (platform specific)
//! ├── config.toml              # Client configuration
//! └── credential.json          # Bearer credential (mode 600)
//! ```
//!
//! `DOCCHAT_HOME` replaces the whole directory, which keeps tests and
//! parallel profiles away from the real one.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable overriding the config directory.
pub const HOME_ENV: &str = "DOCCHAT_HOME";

const APP_DIR: &str = "docchat";
const CONFIG_FILE: &str = "config.toml";
const CREDENTIAL_FILE: &str = "credential.json";

/// Errors that can occur during path resolution.
#[derive(Debug, Error)]
pub enum PathError {
    #[error("Cannot find config directory")]
    ConfigDirNotFound,
}

/// Resolves docchat file locations, optionally below an explicit base.
#[derive(Debug, Clone, Default)]
pub struct DocchatPaths {
    base: Option<PathBuf>,
}

impl DocchatPaths {
    /// Creates a resolver. `None` uses the platform config directory.
    pub fn new(base: Option<&Path>) -> Self {
        Self {
            base: base.map(Path::to_path_buf),
        }
    }

    /// Creates a resolver honoring `DOCCHAT_HOME`.
    pub fn from_env() -> Self {
        let base = std::env::var_os(HOME_ENV)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);
        Self { base }
    }

    /// Returns the docchat configuration directory.
    pub fn config_dir(&self) -> Result<PathBuf, PathError> {
        match &self.base {
            Some(base) => Ok(base.clone()),
            None => dirs::config_dir()
                .map(|dir| dir.join(APP_DIR))
                .ok_or(PathError::ConfigDirNotFound),
        }
    }

    pub fn config_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join(CONFIG_FILE))
    }

    /// Returns the path of the persisted credential.
    ///
    /// # Security Note
    ///
    /// The file is written with permissions 600 on Unix.
    pub fn credential_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join(CREDENTIAL_FILE))
    }
}
