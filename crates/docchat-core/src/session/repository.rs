//! Remote session store trait.
//!
//! Defines the interface the session engine uses to talk to the remote
//! message store.

use super::message::{Message, MessageOrigin};
use super::model::Session;
use crate::error::Result;
use crate::identifiers::SessionId;
use async_trait::async_trait;

/// An abstract remote store for sessions and their messages.
///
/// This trait decouples the engine from the transport (REST, in-memory mock).
///
/// # Implementation Notes
///
/// Implementations should:
/// - Attach the current credential to every request
/// - Report a missing or rejected credential as `ChatError::Unauthorized`
///   (and clear the stored credential in the latter case)
/// - Report non-2xx responses and transport errors as `ChatError::RemoteFailure`
/// - Reject response bodies that do not match the contract with
///   `ChatError::MalformedResponse`
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Lists the session summaries of the current user, in display order.
    async fn list_sessions(&self) -> Result<Vec<Session>>;

    /// Creates a session with the given name and an empty log.
    async fn create_session(&self, name: &str) -> Result<Session>;

    /// Renames a session and returns the updated summary.
    async fn rename_session(&self, session_id: &SessionId, name: &str) -> Result<Session>;

    /// Deletes a session.
    async fn delete_session(&self, session_id: &SessionId) -> Result<()>;

    /// Lists the messages of a session in arrival order.
    async fn list_messages(&self, session_id: &SessionId) -> Result<Vec<Message>>;

    /// Creates a message and returns the server-confirmed record.
    async fn create_message(
        &self,
        session_id: &SessionId,
        text: &str,
        origin: MessageOrigin,
    ) -> Result<Message>;
}
