//! User account model.

use crate::identifiers::UserId;
use serde::{Deserialize, Serialize};

/// Profile of a registered account as reported by the remote store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub is_active: bool,
    /// Accounts must be approved by an admin before they can log in.
    pub is_approved: bool,
    pub is_admin: bool,
}

impl UserProfile {
    /// Returns `true` if the account may log in.
    pub fn can_log_in(&self) -> bool {
        self.is_active && self.is_approved
    }
}
