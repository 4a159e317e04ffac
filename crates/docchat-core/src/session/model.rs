//! Session domain model.
//!
//! A session is split in two views of the same entity: the summary kept in the
//! directory, and the detail (summary plus message log) kept in the cache.

use super::message::Message;
use crate::identifiers::SessionId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Placeholder name given to sessions created without an explicit name.
pub const DEFAULT_SESSION_NAME: &str = "New Chat";

/// Number of characters taken from the first message when deriving a title.
pub const AUTO_TITLE_MAX_CHARS: usize = 30;

/// Summary of a session as listed by the remote store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Server-assigned, stable identifier
    pub id: SessionId,
    /// Display name, trimmed by the server
    pub name: String,
    /// Creation time reported by the server
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// Returns `true` while the session still carries the placeholder name.
    pub fn has_default_name(&self) -> bool {
        self.name == DEFAULT_SESSION_NAME
    }
}

/// A session together with its loaded message log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionDetail {
    pub session: Session,
    /// Ordered by arrival; never reordered or deduplicated.
    pub messages: Vec<Message>,
}

impl SessionDetail {
    pub fn with_messages(session: Session, messages: Vec<Message>) -> Self {
        Self { session, messages }
    }
}

/// Derives a session title from the first message of a conversation.
///
/// Takes the first [`AUTO_TITLE_MAX_CHARS`] characters and appends `...` when
/// the text was longer.
pub fn derive_title(text: &str) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(AUTO_TITLE_MAX_CHARS).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_title_truncates_long_text() {
        let title = derive_title("Hello there, this is a longer than thirty character message");
        assert_eq!(title, "Hello there, this is a longer ...");
    }

    #[test]
    fn test_derive_title_keeps_short_text() {
        assert_eq!(derive_title("Budget"), "Budget");
    }

    #[test]
    fn test_derive_title_exactly_thirty_chars() {
        let text = "a".repeat(30);
        assert_eq!(derive_title(&text), text);
    }

    #[test]
    fn test_derive_title_counts_characters_not_bytes() {
        let text = "é".repeat(31);
        let title = derive_title(&text);
        assert_eq!(title.chars().count(), 33);
        assert!(title.ends_with("..."));
    }
}
