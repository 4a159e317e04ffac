//! Admin approval of registered accounts.

use docchat_core::error::{ChatError, Result};
use docchat_core::identifiers::UserId;
use docchat_core::user::{UserDirectory, UserProfile};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Lists accounts and toggles their approval.
///
/// Every operation first checks that the caller is an admin. The last listed
/// users are cached so that no-op transitions can be rejected without a round
/// trip.
pub struct UserApprovalUseCase {
    users: Arc<dyn UserDirectory>,
    cached: RwLock<Vec<UserProfile>>,
}

impl UserApprovalUseCase {
    pub fn new(users: Arc<dyn UserDirectory>) -> Self {
        Self {
            users,
            cached: RwLock::new(Vec::new()),
        }
    }

    async fn require_admin(&self) -> Result<UserProfile> {
        let me = self.users.current_user().await?;
        if !me.is_admin {
            tracing::warn!("[UserApprovalUseCase] {} is not an admin", me.username);
            return Err(ChatError::remote(Some(403), "Admin privileges required"));
        }
        Ok(me)
    }

    pub async fn list_users(&self) -> Result<Vec<UserProfile>> {
        self.require_admin().await?;
        let users = self.users.list_users().await?;
        *self.cached.write().await = users.clone();
        Ok(users)
    }

    /// Approves an account.
    ///
    /// # Errors
    ///
    /// `ValidationRejected` if the cached list shows the user already approved.
    pub async fn approve(&self, user_id: &UserId) -> Result<UserProfile> {
        self.require_admin().await?;
        if self.cached_user(user_id).await.is_some_and(|u| u.is_approved) {
            return Err(ChatError::validation("user", "User already approved"));
        }

        let updated = self.users.approve_user(user_id).await?;
        self.remember(&updated).await;
        tracing::info!("[UserApprovalUseCase] Approved {}", updated.username);
        Ok(updated)
    }

    /// Revokes approval of an account.
    ///
    /// # Errors
    ///
    /// `ValidationRejected` if the cached list shows an admin or a user who
    /// is not approved.
    pub async fn disapprove(&self, user_id: &UserId) -> Result<UserProfile> {
        self.require_admin().await?;
        if let Some(user) = self.cached_user(user_id).await {
            if user.is_admin {
                return Err(ChatError::validation("user", "Cannot disapprove admin users"));
            }
            if !user.is_approved {
                return Err(ChatError::validation("user", "User already not approved"));
            }
        }

        let updated = self.users.disapprove_user(user_id).await?;
        self.remember(&updated).await;
        tracing::info!("[UserApprovalUseCase] Disapproved {}", updated.username);
        Ok(updated)
    }

    async fn cached_user(&self, user_id: &UserId) -> Option<UserProfile> {
        self.cached
            .read()
            .await
            .iter()
            .find(|u| &u.id == user_id)
            .cloned()
    }

    async fn remember(&self, updated: &UserProfile) {
        let mut cached = self.cached.write().await;
        if let Some(entry) = cached.iter_mut().find(|u| u.id == updated.id) {
            *entry = updated.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docchat_core::testing::{MockUserDirectory, profile};

    fn directory(current: &str) -> Arc<MockUserDirectory> {
        Arc::new(MockUserDirectory::new(
            vec![
                profile("1", "root", true, true),
                profile("2", "ann", false, false),
                profile("3", "bob", true, false),
            ],
            Some(current),
        ))
    }

    #[tokio::test]
    async fn test_non_admin_is_refused_without_mutation() {
        let users = directory("3");
        let usecase = UserApprovalUseCase::new(users.clone());

        let err = usecase.approve(&"2".into()).await.unwrap_err();

        assert_eq!(err.status(), Some(403));
        assert_eq!(users.mutation_count(), 0);
    }

    #[tokio::test]
    async fn test_approve_pending_user() {
        let users = directory("1");
        let usecase = UserApprovalUseCase::new(users.clone());
        usecase.list_users().await.unwrap();

        let updated = usecase.approve(&"2".into()).await.unwrap();

        assert!(updated.is_approved);
        // Second approval is rejected from the cache
        let err = usecase.approve(&"2".into()).await.unwrap_err();
        assert!(err.is_validation());
        assert_eq!(users.mutation_count(), 1);
    }

    #[tokio::test]
    async fn test_disapprove_admin_is_rejected_locally() {
        let users = directory("1");
        let usecase = UserApprovalUseCase::new(users.clone());
        usecase.list_users().await.unwrap();

        let err = usecase.disapprove(&"1".into()).await.unwrap_err();

        assert!(err.is_validation());
        assert_eq!(users.mutation_count(), 0);
    }

    #[tokio::test]
    async fn test_disapprove_approved_user() {
        let usecase = UserApprovalUseCase::new(directory("1"));
        usecase.list_users().await.unwrap();

        let updated = usecase.disapprove(&"3".into()).await.unwrap();
        assert!(!updated.is_approved);
    }
}
