//! Conversation message types.

use crate::identifiers::MessageId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Who produced a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MessageOrigin {
    /// Message typed by the user.
    #[default]
    User,
    /// Message produced by the assistant.
    Assistant,
}

impl fmt::Display for MessageOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageOrigin::User => write!(f, "user"),
            MessageOrigin::Assistant => write!(f, "assistant"),
        }
    }
}

/// A single server-confirmed message in a session log.
///
/// Every field is assigned by the remote store; the text is immutable once
/// created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub text: String,
    pub timestamp: DateTime<Utc>,
    pub origin: MessageOrigin,
}

impl Message {
    pub fn is_user(&self) -> bool {
        self.origin == MessageOrigin::User
    }
}
