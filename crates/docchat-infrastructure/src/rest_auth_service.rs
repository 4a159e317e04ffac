//! REST implementation of [`AuthService`].

use crate::client::ApiClient;
use crate::dto::{RegisterRequest, TokenDto, UserDto};
use async_trait::async_trait;
use docchat_core::auth::{AuthService, Registration};
use docchat_core::credential::Credential;
use docchat_core::error::Result;
use docchat_core::user::UserProfile;
use std::sync::Arc;

/// Login and registration against the remote store.
///
/// Both endpoints are anonymous; the returned credential is not stored here.
#[derive(Clone)]
pub struct RestAuthService {
    client: Arc<ApiClient>,
}

impl RestAuthService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AuthService for RestAuthService {
    async fn login(&self, username: &str, password: &str) -> Result<Credential> {
        let dto: TokenDto = self
            .client
            .post_form("login", &[("username", username), ("password", password)])
            .await?;
        Credential::try_from(dto)
    }

    async fn register(&self, registration: &Registration) -> Result<UserProfile> {
        let request = RegisterRequest {
            username: &registration.username,
            email: &registration.email,
            password: &registration.password,
        };
        let dto: UserDto = self.client.post_anonymous("register", &request).await?;
        Ok(dto.into())
    }
}
