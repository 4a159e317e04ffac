//! Credential accessor.
//!
//! Defines the interface for reading and writing the bearer credential that
//! every outgoing request carries.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::RwLock;

/// A bearer token proving the user's identity to the remote store.
///
/// `Debug` is redacted so the token never ends up in logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    access_token: String,
    #[serde(default = "default_token_type")]
    token_type: String,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

impl Credential {
    pub fn bearer(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            token_type: default_token_type(),
        }
    }

    pub fn new(access_token: impl Into<String>, token_type: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            token_type: token_type.into(),
        }
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    pub fn token_type(&self) -> &str {
        &self.token_type
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("access_token", &"<redacted>")
            .field("token_type", &self.token_type)
            .finish()
    }
}

/// Process-wide store for the current credential.
///
/// Set on successful login, cleared on logout or when any request observes
/// an authorization failure. Implementations must be cheap to read because
/// every request consults them.
///
/// # Security Note
///
/// Implementations should ensure that:
/// - Persisted credentials are readable only by the current user
/// - The token is never logged or included in error messages
pub trait CredentialStore: Send + Sync {
    /// Returns the current credential, if any.
    fn get(&self) -> Option<Credential>;

    /// Replaces the current credential.
    fn set(&self, credential: Credential) -> Result<()>;

    /// Removes the current credential. Clearing an empty store is not an error.
    fn clear(&self) -> Result<()>;

    /// Returns `true` if a credential is present.
    fn is_authenticated(&self) -> bool {
        self.get().is_some()
    }
}

/// Credential store that lives only as long as the process.
#[derive(Debug, Default)]
pub struct InMemoryCredentialStore {
    credential: RwLock<Option<Credential>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_credential(credential: Credential) -> Self {
        Self {
            credential: RwLock::new(Some(credential)),
        }
    }
}

impl CredentialStore for InMemoryCredentialStore {
    fn get(&self) -> Option<Credential> {
        self.credential
            .read()
            .map(|guard| guard.clone())
            .unwrap_or(None)
    }

    fn set(&self, credential: Credential) -> Result<()> {
        let mut guard = self
            .credential
            .write()
            .map_err(|e| crate::error::ChatError::internal(format!("credential lock poisoned: {e}")))?;
        *guard = Some(credential);
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let mut guard = self
            .credential
            .write()
            .map_err(|e| crate::error::ChatError::internal(format!("credential lock poisoned: {e}")))?;
        *guard = None;
        Ok(())
    }
}
