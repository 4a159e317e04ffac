//! REST implementation of [`SessionStore`].

use crate::client::ApiClient;
use crate::dto::{CreateMessageRequest, MessageDto, SessionDto, SessionNameRequest, convert_all};
use async_trait::async_trait;
use docchat_core::error::Result;
use docchat_core::identifiers::SessionId;
use docchat_core::session::{Message, MessageOrigin, Session, SessionStore};
use std::sync::Arc;

/// Session store talking to `/sessions` on the remote store.
#[derive(Clone)]
pub struct RestSessionStore {
    client: Arc<ApiClient>,
}

impl RestSessionStore {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SessionStore for RestSessionStore {
    async fn list_sessions(&self) -> Result<Vec<Session>> {
        let dtos: Vec<SessionDto> = self.client.get("sessions").await?;
        convert_all(dtos)
    }

    async fn create_session(&self, name: &str) -> Result<Session> {
        let dto: SessionDto = self
            .client
            .post("sessions", &SessionNameRequest { name })
            .await?;
        Session::try_from(dto)
    }

    async fn rename_session(&self, session_id: &SessionId, name: &str) -> Result<Session> {
        let dto: SessionDto = self
            .client
            .patch(&format!("sessions/{session_id}"), &SessionNameRequest { name })
            .await?;
        Session::try_from(dto)
    }

    async fn delete_session(&self, session_id: &SessionId) -> Result<()> {
        self.client
            .delete_unit(&format!("sessions/{session_id}"))
            .await
    }

    async fn list_messages(&self, session_id: &SessionId) -> Result<Vec<Message>> {
        let dtos: Vec<MessageDto> = self
            .client
            .get(&format!("sessions/{session_id}/messages"))
            .await?;
        convert_all(dtos)
    }

    async fn create_message(
        &self,
        session_id: &SessionId,
        text: &str,
        origin: MessageOrigin,
    ) -> Result<Message> {
        let dto: MessageDto = self
            .client
            .post(
                &format!("sessions/{session_id}/messages"),
                &CreateMessageRequest { text, origin },
            )
            .await?;
        Message::try_from(dto)
    }
}
