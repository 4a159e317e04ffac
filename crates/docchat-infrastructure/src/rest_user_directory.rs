//! REST implementation of [`UserDirectory`].

use crate::client::ApiClient;
use crate::dto::UserDto;
use async_trait::async_trait;
use docchat_core::error::Result;
use docchat_core::identifiers::UserId;
use docchat_core::user::{UserDirectory, UserProfile};
use std::sync::Arc;

#[derive(Clone)]
pub struct RestUserDirectory {
    client: Arc<ApiClient>,
}

impl RestUserDirectory {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl UserDirectory for RestUserDirectory {
    async fn current_user(&self) -> Result<UserProfile> {
        let dto: UserDto = self.client.get("users/me").await?;
        Ok(dto.into())
    }

    async fn list_users(&self) -> Result<Vec<UserProfile>> {
        let dtos: Vec<UserDto> = self.client.get("users").await?;
        Ok(dtos.into_iter().map(UserProfile::from).collect())
    }

    async fn approve_user(&self, user_id: &UserId) -> Result<UserProfile> {
        let dto: UserDto = self
            .client
            .post_empty(&format!("approve_user/{user_id}"))
            .await?;
        Ok(dto.into())
    }

    async fn disapprove_user(&self, user_id: &UserId) -> Result<UserProfile> {
        let dto: UserDto = self
            .client
            .post_empty(&format!("disapprove_user/{user_id}"))
            .await?;
        Ok(dto.into())
    }
}
