//! Authentication collaborator.
//!
//! Exchanges user credentials for a bearer token. Storing the token is the
//! caller's business (see [`CredentialStore`](crate::credential::CredentialStore)).

use crate::credential::Credential;
use crate::error::Result;
use crate::user::UserProfile;
use async_trait::async_trait;

/// Input of a registration request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[async_trait]
pub trait AuthService: Send + Sync {
    /// Exchanges username and password for a credential.
    ///
    /// # Errors
    ///
    /// - `Unauthorized` on wrong username or password
    /// - `RemoteFailure` with status 403 while the account awaits approval
    async fn login(&self, username: &str, password: &str) -> Result<Credential>;

    /// Creates an account. New accounts are unapproved.
    async fn register(&self, registration: &Registration) -> Result<UserProfile>;
}
