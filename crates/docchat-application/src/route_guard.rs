//! Access control for the application's routes.

use docchat_core::credential::CredentialStore;
use docchat_core::user::UserDirectory;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Register,
    Chat,
    Documents,
    Admin,
}

impl Route {
    /// Public routes are reachable without a credential.
    pub fn is_public(self) -> bool {
        matches!(self, Route::Login | Route::Register)
    }
}

/// Outcome of a route check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Allowed,
    RedirectToLogin,
    Forbidden,
}

/// Decides whether the current user may enter a route.
///
/// Fails closed: if the credential or profile cannot be established, the
/// user is sent back to login.
pub struct RouteGuard {
    credentials: Arc<dyn CredentialStore>,
    users: Arc<dyn UserDirectory>,
}

impl RouteGuard {
    pub fn new(credentials: Arc<dyn CredentialStore>, users: Arc<dyn UserDirectory>) -> Self {
        Self { credentials, users }
    }

    pub async fn check(&self, route: Route) -> Access {
        if route.is_public() {
            return Access::Allowed;
        }
        if !self.credentials.is_authenticated() {
            return Access::RedirectToLogin;
        }
        if route != Route::Admin {
            return Access::Allowed;
        }

        match self.users.current_user().await {
            Ok(profile) if profile.is_admin => Access::Allowed,
            Ok(_) => Access::Forbidden,
            Err(e) => {
                tracing::warn!("[RouteGuard] Cannot resolve profile for {:?}: {}", route, e);
                Access::RedirectToLogin
            }
        }
    }
}
