//! Ordered collection of session summaries.

use super::model::Session;
use crate::identifiers::SessionId;

/// The set of sessions visible to the authenticated user.
///
/// Keyed by id, with insertion order significant for display. Newly created
/// sessions go to the front.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionDirectory {
    entries: Vec<Session>,
}

impl SessionDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces every entry (full refresh).
    pub fn replace_all(&mut self, sessions: Vec<Session>) {
        self.entries = sessions;
    }

    /// Inserts a session at the front, replacing any entry with the same id.
    pub fn insert_front(&mut self, session: Session) {
        self.entries.retain(|s| s.id != session.id);
        self.entries.insert(0, session);
    }

    /// Overwrites the name of an entry. Returns `false` if the id is unknown.
    pub fn rename(&mut self, id: &SessionId, name: &str) -> bool {
        match self.entries.iter_mut().find(|s| &s.id == id) {
            Some(entry) => {
                entry.name = name.to_string();
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: &SessionId) -> Option<Session> {
        let index = self.entries.iter().position(|s| &s.id == id)?;
        Some(self.entries.remove(index))
    }

    pub fn get(&self, id: &SessionId) -> Option<&Session> {
        self.entries.iter().find(|s| &s.id == id)
    }

    pub fn contains(&self, id: &SessionId) -> bool {
        self.get(id).is_some()
    }

    pub fn first(&self) -> Option<&Session> {
        self.entries.first()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Session> {
        self.entries.iter()
    }

    pub fn to_vec(&self) -> Vec<Session> {
        self.entries.clone()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn session(id: &str, name: &str) -> Session {
        Session {
            id: SessionId::from(id),
            name: name.to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_insert_front_orders_newest_first() {
        let mut dir = SessionDirectory::new();
        dir.insert_front(session("1", "a"));
        dir.insert_front(session("2", "b"));
        let ids: Vec<_> = dir.iter().map(|s| s.id.as_str().to_string()).collect();
        assert_eq!(ids, vec!["2", "1"]);
    }

    #[test]
    fn test_insert_front_replaces_duplicate_id() {
        let mut dir = SessionDirectory::new();
        dir.insert_front(session("1", "a"));
        dir.insert_front(session("1", "b"));
        assert_eq!(dir.len(), 1);
        assert_eq!(dir.first().unwrap().name, "b");
    }

    #[test]
    fn test_rename_and_remove() {
        let mut dir = SessionDirectory::new();
        dir.replace_all(vec![session("1", "a"), session("2", "b")]);

        assert!(dir.rename(&"2".into(), "renamed"));
        assert!(!dir.rename(&"9".into(), "nope"));
        assert_eq!(dir.get(&"2".into()).unwrap().name, "renamed");

        assert!(dir.remove(&"1".into()).is_some());
        assert!(!dir.contains(&"1".into()));
        assert!(dir.remove(&"1".into()).is_none());
    }
}
