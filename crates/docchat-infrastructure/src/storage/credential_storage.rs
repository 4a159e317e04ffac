//! File-backed credential storage.
//!
//! Persists the bearer credential to `credential.json` so a login survives
//! process restarts.

use docchat_core::credential::{Credential, CredentialStore};
use docchat_core::error::{ChatError, Result};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

/// Credential store persisted as JSON next to the config file.
///
/// Responsibilities:
/// - Load `credential.json` once and cache it in memory
/// - Write the file with user-only permissions on `set`
/// - Remove the file on `clear`
///
/// A file that cannot be read or parsed is treated as "no credential", so the
/// client fails closed and asks the user to log in again.
///
/// # Security Note
///
/// The token is stored in plaintext. On Unix the file is created with mode 600.
#[derive(Debug)]
pub struct FileCredentialStore {
    path: PathBuf,
    cached: RwLock<Option<Credential>>,
}

impl FileCredentialStore {
    /// Opens the store at `path`, loading an existing credential if present.
    pub fn open(path: PathBuf) -> Self {
        let cached = Self::load(&path);
        Self {
            path,
            cached: RwLock::new(cached),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(path: &Path) -> Option<Credential> {
        if !path.exists() {
            return None;
        }
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!("[CredentialStorage] Cannot read {}: {}", path.display(), e);
                return None;
            }
        };
        match serde_json::from_str::<Credential>(&content) {
            Ok(credential) if !credential.access_token().is_empty() => Some(credential),
            Ok(_) => None,
            Err(e) => {
                tracing::warn!("[CredentialStorage] Ignoring invalid {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Writes through a temp file that is created user-only, then renames it
    /// over the credential file. The token is never readable by others, even
    /// when an older file had wider permissions.
    fn persist(&self, credential: &Credential) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(credential)?;

        let tmp_path = self.path.with_extension("json.tmp");
        if let Err(e) = fs::remove_file(&tmp_path)
            && e.kind() != std::io::ErrorKind::NotFound
        {
            return Err(e.into());
        }

        let mut options = OpenOptions::new();
        options.write(true).create_new(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let mut tmp_file = options.open(&tmp_path)?;
        tmp_file.write_all(json.as_bytes())?;
        tmp_file.sync_all()?;
        drop(tmp_file);

        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }

    fn lock_error<E: std::fmt::Display>(e: E) -> ChatError {
        ChatError::internal(format!("credential lock poisoned: {e}"))
    }
}

impl CredentialStore for FileCredentialStore {
    fn get(&self) -> Option<Credential> {
        self.cached.read().ok().and_then(|guard| guard.clone())
    }

    fn set(&self, credential: Credential) -> Result<()> {
        self.persist(&credential)?;
        *self.cached.write().map_err(Self::lock_error)? = Some(credential);
        tracing::debug!("[CredentialStorage] Credential saved to {}", self.path.display());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.cached.write().map_err(Self::lock_error)? = None;
        match fs::remove_file(&self.path) {
            Ok(()) => {
                tracing::debug!("[CredentialStorage] Credential removed");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_open_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileCredentialStore::open(temp_dir.path().join("credential.json"));
        assert!(store.get().is_none());
        assert!(!store.is_authenticated());
    }

    #[test]
    fn test_set_persists_across_instances() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("credential.json");

        let store = FileCredentialStore::open(path.clone());
        store.set(Credential::bearer("token-123")).unwrap();

        let reopened = FileCredentialStore::open(path);
        assert_eq!(reopened.get().unwrap().access_token(), "token-123");
    }

    #[cfg(unix)]
    #[test]
    fn test_file_permissions_are_user_only() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("credential.json");
        FileCredentialStore::open(path.clone())
            .set(Credential::bearer("t"))
            .unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[cfg(unix)]
    #[test]
    fn test_set_narrows_existing_world_readable_file() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("credential.json");
        fs::write(&path, r#"{"access_token": "old", "token_type": "bearer"}"#).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();

        let store = FileCredentialStore::open(path.clone());
        store.set(Credential::bearer("new")).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        assert!(!path.with_extension("json.tmp").exists());
        assert_eq!(FileCredentialStore::open(path).get().unwrap().access_token(), "new");
    }

    #[test]
    fn test_clear_removes_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("credential.json");
        let store = FileCredentialStore::open(path.clone());
        store.set(Credential::bearer("t")).unwrap();

        store.clear().unwrap();

        assert!(store.get().is_none());
        assert!(!path.exists());
        // Clearing twice is fine
        store.clear().unwrap();
    }

    #[test]
    fn test_invalid_json_is_treated_as_logged_out() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("credential.json");
        fs::write(&path, "{ invalid json").unwrap();

        let store = FileCredentialStore::open(path);
        assert!(store.get().is_none());
    }
}
