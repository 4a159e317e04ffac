//! User directory trait.

use super::model::UserProfile;
use crate::error::Result;
use crate::identifiers::UserId;
use async_trait::async_trait;

/// Remote access to user accounts.
///
/// `list_users`, `approve_user` and `disapprove_user` are admin-only on the
/// server; non-admin callers receive a 403 `RemoteFailure`.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Returns the profile of the authenticated user.
    async fn current_user(&self) -> Result<UserProfile>;

    async fn list_users(&self) -> Result<Vec<UserProfile>>;

    /// Marks an account as approved and returns the updated profile.
    async fn approve_user(&self, user_id: &UserId) -> Result<UserProfile>;

    /// Revokes approval of an account and returns the updated profile.
    async fn disapprove_user(&self, user_id: &UserId) -> Result<UserProfile>;
}
