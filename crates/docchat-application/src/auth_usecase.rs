//! Login, logout and registration.

use docchat_core::auth::{AuthService, Registration};
use docchat_core::credential::CredentialStore;
use docchat_core::error::{ChatError, Result};
use docchat_core::user::{UserDirectory, UserProfile};
use std::sync::Arc;

/// Coordinates the auth service with the credential store.
pub struct AuthUseCase {
    auth: Arc<dyn AuthService>,
    users: Arc<dyn UserDirectory>,
    credentials: Arc<dyn CredentialStore>,
}

impl AuthUseCase {
    pub fn new(
        auth: Arc<dyn AuthService>,
        users: Arc<dyn UserDirectory>,
        credentials: Arc<dyn CredentialStore>,
    ) -> Self {
        Self {
            auth,
            users,
            credentials,
        }
    }

    /// Logs in and stores the returned credential.
    ///
    /// # Errors
    ///
    /// - `ValidationRejected` for a blank username or password
    /// - `Unauthorized` on wrong credentials
    /// - `RemoteFailure` (403) while the account awaits approval
    pub async fn login(&self, username: &str, password: &str) -> Result<()> {
        let username = username.trim();
        if username.is_empty() {
            return Err(ChatError::validation("username", "username is required"));
        }
        if password.is_empty() {
            return Err(ChatError::validation("password", "password is required"));
        }

        let credential = self.auth.login(username, password).await?;
        self.credentials.set(credential)?;
        tracing::info!("[AuthUseCase] Logged in as {}", username);
        Ok(())
    }

    /// Forgets the stored credential. No network call.
    pub fn logout(&self) -> Result<()> {
        self.credentials.clear()?;
        tracing::info!("[AuthUseCase] Logged out");
        Ok(())
    }

    /// Registers a new account. The account cannot log in until approved.
    pub async fn register(&self, username: &str, email: &str, password: &str) -> Result<UserProfile> {
        let username = username.trim();
        let email = email.trim();
        if username.is_empty() {
            return Err(ChatError::validation("username", "username is required"));
        }
        if !email.contains('@') {
            return Err(ChatError::validation("email", "email address is invalid"));
        }
        if password.is_empty() {
            return Err(ChatError::validation("password", "password is required"));
        }

        let registration = Registration {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        };
        let profile = self.auth.register(&registration).await?;
        tracing::info!("[AuthUseCase] Registered {} (pending approval)", profile.username);
        Ok(profile)
    }

    pub async fn current_user(&self) -> Result<UserProfile> {
        self.users.current_user().await
    }

    pub fn is_authenticated(&self) -> bool {
        self.credentials.is_authenticated()
    }
}
