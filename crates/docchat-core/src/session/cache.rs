//! Per-session message log cache.

use super::message::Message;
use super::model::{Session, SessionDetail};
use crate::identifiers::SessionId;
use std::collections::HashMap;

/// In-memory cache of loaded session details.
///
/// Keyed by session id rather than by "currently displayed", so a late
/// response for a session that is no longer selected still lands in the
/// right log.
#[derive(Debug, Clone, Default)]
pub struct DetailCache {
    details: HashMap<SessionId, SessionDetail>,
}

impl DetailCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &SessionId) -> Option<&SessionDetail> {
        self.details.get(id)
    }

    pub fn is_loaded(&self, id: &SessionId) -> bool {
        self.details.contains_key(id)
    }

    /// Stores a freshly loaded log, replacing any previous one.
    pub fn load(&mut self, session: Session, messages: Vec<Message>) {
        let id = session.id.clone();
        self.details
            .insert(id, SessionDetail::with_messages(session, messages));
    }

    /// Appends a message to a cached log. Returns `false` if the log is not loaded.
    pub fn append(&mut self, id: &SessionId, message: Message) -> bool {
        match self.details.get_mut(id) {
            Some(detail) => {
                detail.messages.push(message);
                true
            }
            None => false,
        }
    }

    /// Overwrites the name of a cached detail. Returns `false` if not cached.
    pub fn rename(&mut self, id: &SessionId, name: &str) -> bool {
        match self.details.get_mut(id) {
            Some(detail) => {
                detail.session.name = name.to_string();
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: &SessionId) -> Option<SessionDetail> {
        self.details.remove(id)
    }

    /// Keeps only the details whose id satisfies the predicate.
    pub fn retain(&mut self, mut keep: impl FnMut(&SessionId) -> bool) {
        self.details.retain(|id, _| keep(id));
    }

    /// Number of messages in a cached log.
    pub fn message_count(&self, id: &SessionId) -> Option<usize> {
        self.details.get(id).map(|d| d.messages.len())
    }

    pub fn clear(&mut self) {
        self.details.clear();
    }
}
