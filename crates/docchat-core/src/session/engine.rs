use super::cache::DetailCache;
use super::directory::SessionDirectory;
use super::event::SessionEvent;
use super::message::{Message, MessageOrigin};
use super::model::{DEFAULT_SESSION_NAME, Session, SessionDetail, derive_title};
use super::repository::SessionStore;
use super::selection::{PendingDeletion, Selection};
use crate::error::{ChatError, Result};
use crate::identifiers::SessionId;
use std::sync::Arc;
use tokio::sync::{RwLock, broadcast};

/// Capacity of the event channel. Slow subscribers lose the oldest events.
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Everything the engine owns for one authenticated view session.
#[derive(Debug, Default)]
struct EngineState {
    directory: SessionDirectory,
    cache: DetailCache,
    selection: Selection,
    pending_deletion: PendingDeletion,
    /// Session whose name is currently being edited
    editing: Option<SessionId>,
}

impl EngineState {
    /// Clears a selection (and other per-session markers) that no longer
    /// points into the directory. Returns `true` if the selection changed.
    fn enforce_invariants(&mut self) -> bool {
        if let Some(id) = self.editing.as_ref()
            && !self.directory.contains(id)
        {
            self.editing = None;
        }
        if let Some(id) = self.pending_deletion.candidate()
            && !self.directory.contains(id)
        {
            self.pending_deletion.clear();
        }
        match self.selection.id() {
            Some(id) if !self.directory.contains(id) => {
                self.selection = Selection::NoSelection;
                true
            }
            _ => false,
        }
    }
}

/// Chat-session state and synchronization engine.
///
/// `SessionEngine` is responsible for:
/// - Holding the session directory and the per-session message logs
/// - Tracking the active selection
/// - Appending messages and auto-titling fresh sessions
/// - The two-step deletion flow
/// - Folding remote responses back into local state
///
/// State is only mutated after the remote store confirmed an operation; a
/// failed call leaves everything as it was. The state lock is never held
/// across a network call, so several operations may be in flight at once.
pub struct SessionEngine {
    state: Arc<RwLock<EngineState>>,
    store: Arc<dyn SessionStore>,
    events: broadcast::Sender<SessionEvent>,
}

impl SessionEngine {
    /// Creates an engine with an empty directory backed by `store`.
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            state: Arc::new(RwLock::new(EngineState::default())),
            store,
            events,
        }
    }

    /// Subscribes to state transitions.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    fn emit(&self, event: SessionEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }

    /// Logs a remote error and publishes the matching event.
    fn report(&self, operation: &str, err: ChatError) -> ChatError {
        if err.is_unauthorized() {
            tracing::warn!("[SessionEngine] {} rejected: credential missing or expired", operation);
            self.emit(SessionEvent::AuthenticationRequired);
        } else {
            tracing::warn!("[SessionEngine] {} failed: {}", operation, err);
            self.emit(SessionEvent::OperationFailed {
                operation: operation.to_string(),
                message: err.to_string(),
            });
        }
        err
    }

    // ============================================================================
    // Session directory
    // ============================================================================

    /// Refreshes the directory from the remote store.
    ///
    /// On success the whole directory is replaced. If nothing is selected, the
    /// first listed session becomes the selection and its log is loaded.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` or `RemoteFailure` from the store; the directory
    /// is left untouched in that case.
    pub async fn list(&self) -> Result<Vec<Session>> {
        self.sync_directory(true).await
    }

    /// Like [`list`](Self::list), but never picks a selection or loads a log.
    ///
    /// A selection that left the directory is still cleared.
    pub async fn refresh(&self) -> Result<Vec<Session>> {
        self.sync_directory(false).await
    }

    async fn sync_directory(&self, auto_select: bool) -> Result<Vec<Session>> {
        let sessions = self
            .store
            .list_sessions()
            .await
            .map_err(|e| self.report("list", e))?;

        let (selection_changed, selection, to_load) = {
            let mut guard = self.state.write().await;
            let state = &mut *guard;

            state.directory.replace_all(sessions.clone());
            let directory = &state.directory;
            state.cache.retain(|id| directory.contains(id));
            for session in directory.iter() {
                state.cache.rename(&session.id, &session.name);
            }

            let mut changed = state.enforce_invariants();
            if auto_select
                && state.selection.is_none()
                && let Some(first) = state.directory.first()
            {
                state.selection = Selection::Selected(first.id.clone());
                changed = true;
            }

            let to_load = state
                .selection
                .id()
                .filter(|id| auto_select && !state.cache.is_loaded(id))
                .cloned();
            (changed, state.selection.clone(), to_load)
        };

        tracing::debug!("[SessionEngine] Directory refreshed with {} sessions", sessions.len());
        self.emit(SessionEvent::DirectoryRefreshed {
            count: sessions.len(),
        });
        if selection_changed {
            self.emit(SessionEvent::SelectionChanged { selection });
        }

        if let Some(id) = to_load
            && let Err(e) = self.load_messages(&id).await
        {
            tracing::warn!("[SessionEngine] Could not load messages of {}: {}", id, e);
        }

        Ok(sessions)
    }

    /// Creates a session and makes it the selection.
    ///
    /// # Arguments
    ///
    /// * `name` - Display name; `None` uses the "New Chat" placeholder
    ///
    /// # Errors
    ///
    /// Returns `ValidationRejected` if the name trims to empty, or the store's
    /// error if creation fails.
    pub async fn create(&self, name: Option<&str>) -> Result<Session> {
        let name = name.map(str::trim).unwrap_or(DEFAULT_SESSION_NAME);
        if name.is_empty() {
            return Err(ChatError::validation("name", "session name must not be empty"));
        }

        let session = self
            .store
            .create_session(name)
            .await
            .map_err(|e| self.report("create", e))?;

        let selection = {
            let mut state = self.state.write().await;
            state.directory.insert_front(session.clone());
            state.cache.load(session.clone(), Vec::new());
            state.selection = Selection::Selected(session.id.clone());
            state.selection.clone()
        };

        tracing::info!("[SessionEngine] Created session {}", session.id);
        self.emit(SessionEvent::SessionCreated {
            session: session.clone(),
        });
        self.emit(SessionEvent::SelectionChanged { selection });
        Ok(session)
    }

    /// Marks a session as having its name edited.
    pub async fn begin_edit(&self, id: &SessionId) -> Result<()> {
        let mut state = self.state.write().await;
        if !state.directory.contains(id) {
            return Err(ChatError::not_found("session", id.as_str()));
        }
        state.editing = Some(id.clone());
        Ok(())
    }

    /// Drops the edit-in-progress marker without renaming.
    pub async fn cancel_edit(&self) {
        let cleared = self.state.write().await.editing.take();
        if let Some(id) = cleared {
            self.emit(SessionEvent::EditFinished { id, succeeded: false });
        }
    }

    /// Clears the edit marker if it belongs to `id`. An edit of another
    /// session stays in progress.
    async fn finish_edit(&self, id: &SessionId, succeeded: bool) {
        let cleared = {
            let mut state = self.state.write().await;
            if state.editing.as_ref() == Some(id) {
                state.editing.take()
            } else {
                None
            }
        };
        if let Some(id) = cleared {
            self.emit(SessionEvent::EditFinished { id, succeeded });
        }
    }

    /// Renames a session.
    ///
    /// Both the directory entry and the cached detail are updated so the two
    /// views never diverge. If this session's name was being edited, the
    /// edit-in-progress marker is cleared whatever the outcome.
    ///
    /// # Errors
    ///
    /// - `ValidationRejected` if `new_name` trims to empty (no network call)
    /// - `NotFound` if the session is not in the directory
    /// - The store's error if the rename fails (state unchanged)
    pub async fn rename(&self, id: &SessionId, new_name: &str) -> Result<()> {
        let result = self.rename_inner(id, new_name).await;
        self.finish_edit(id, result.is_ok()).await;
        result
    }

    async fn rename_inner(&self, id: &SessionId, new_name: &str) -> Result<()> {
        let name = new_name.trim();
        if name.is_empty() {
            return Err(ChatError::validation("name", "session name must not be empty"));
        }
        if !self.state.read().await.directory.contains(id) {
            return Err(ChatError::not_found("session", id.as_str()));
        }

        let updated = self
            .store
            .rename_session(id, name)
            .await
            .map_err(|e| self.report("rename", e))?;
        if updated.name.trim().is_empty() {
            return Err(self.report(
                "rename",
                ChatError::MalformedResponse(format!("empty name returned for session {id}")),
            ));
        }

        {
            let mut state = self.state.write().await;
            state.directory.rename(id, &updated.name);
            state.cache.rename(id, &updated.name);
        }

        tracing::info!("[SessionEngine] Renamed session {} to '{}'", id, updated.name);
        self.emit(SessionEvent::SessionRenamed {
            id: id.clone(),
            name: updated.name,
        });
        Ok(())
    }

    // ============================================================================
    // Active selection
    // ============================================================================

    /// Opens a session, loading its log if it has not been loaded yet.
    ///
    /// Re-selecting the current session is allowed and changes nothing.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the session is not in the directory, or the
    /// store's error if the log cannot be loaded (the selection still moves).
    pub async fn select(&self, id: &SessionId) -> Result<()> {
        let (changed, loaded) = {
            let mut state = self.state.write().await;
            if !state.directory.contains(id) {
                return Err(ChatError::not_found("session", id.as_str()));
            }
            let changed = !state.selection.is_selected(id);
            state.selection = Selection::Selected(id.clone());
            (changed, state.cache.is_loaded(id))
        };

        if changed {
            self.emit(SessionEvent::SelectionChanged {
                selection: Selection::Selected(id.clone()),
            });
        }

        if !loaded {
            self.load_messages(id).await?;
        }
        Ok(())
    }

    /// Loads (or reloads) the message log of a session.
    ///
    /// A response for a session that was deleted in the meantime is dropped.
    pub async fn load_messages(&self, id: &SessionId) -> Result<Vec<Message>> {
        let messages = self
            .store
            .list_messages(id)
            .await
            .map_err(|e| self.report("load_messages", e))?;

        let stored = {
            let mut state = self.state.write().await;
            match state.directory.get(id).cloned() {
                Some(summary) => {
                    state.cache.load(summary, messages.clone());
                    true
                }
                None => false,
            }
        };

        if stored {
            self.emit(SessionEvent::MessagesLoaded {
                id: id.clone(),
                count: messages.len(),
            });
        } else {
            tracing::debug!("[SessionEngine] Dropping messages of removed session {}", id);
        }
        Ok(messages)
    }

    // ============================================================================
    // Message append
    // ============================================================================

    /// Posts a message to a session and merges the confirmed result.
    ///
    /// After the first append to a session still called "New Chat" whose log
    /// was empty, the session is renamed after the message text. A failed
    /// auto-rename does not fail the append.
    ///
    /// # Errors
    ///
    /// - `ValidationRejected` if `text` trims to empty or nothing is selected
    ///   (no network call)
    /// - `NotFound` if the session is not in the directory
    /// - The store's error if the message cannot be created (log unchanged)
    pub async fn append(
        &self,
        session_id: &SessionId,
        text: &str,
        origin: MessageOrigin,
    ) -> Result<Message> {
        if text.trim().is_empty() {
            return Err(ChatError::validation("text", "message must not be empty"));
        }

        let loaded = {
            let state = self.state.read().await;
            if state.selection.is_none() {
                return Err(ChatError::validation("selection", "no active session"));
            }
            if !state.directory.contains(session_id) {
                return Err(ChatError::not_found("session", session_id.as_str()));
            }
            state.cache.is_loaded(session_id)
        };

        if !loaded {
            self.load_messages(session_id).await?;
        }

        let message = self
            .store
            .create_message(session_id, text, origin)
            .await
            .map_err(|e| self.report("append", e))?;

        let (merged, auto_title) = {
            let mut state = self.state.write().await;
            let was_empty = state.cache.message_count(session_id) == Some(0);
            let has_default_name = state
                .directory
                .get(session_id)
                .is_some_and(Session::has_default_name);
            let merged = state.cache.append(session_id, message.clone());
            let auto_title = (merged && was_empty && has_default_name).then(|| derive_title(text));
            (merged, auto_title)
        };

        if merged {
            self.emit(SessionEvent::MessageAppended {
                id: session_id.clone(),
                message: message.clone(),
            });
        } else {
            tracing::debug!(
                "[SessionEngine] Session {} vanished before message {} was merged",
                session_id,
                message.id
            );
        }

        if let Some(title) = auto_title {
            tracing::debug!("[SessionEngine] Auto-titling session {} as '{}'", session_id, title);
            if let Err(e) = self.rename(session_id, &title).await {
                tracing::warn!("[SessionEngine] Auto-title of {} failed: {}", session_id, e);
            }
        }

        Ok(message)
    }

    // ============================================================================
    // Deletion flow
    // ============================================================================

    /// Records a deletion candidate without touching the remote store.
    ///
    /// Replaces any candidate that was already pending.
    pub async fn request_delete(&self, id: &SessionId) -> Result<()> {
        {
            let mut state = self.state.write().await;
            if !state.directory.contains(id) {
                return Err(ChatError::not_found("session", id.as_str()));
            }
            state.pending_deletion.request(id.clone());
        }
        self.emit(SessionEvent::DeletionPending {
            id: Some(id.clone()),
        });
        Ok(())
    }

    /// Drops the deletion candidate. No network call.
    pub async fn cancel_delete(&self) {
        let cleared = self.state.write().await.pending_deletion.take();
        if cleared.is_some() {
            self.emit(SessionEvent::DeletionPending { id: None });
        }
    }

    /// Deletes the pending candidate on the remote store.
    ///
    /// On success the session leaves the directory and the cache; if it was
    /// selected, the selection is cleared in the same critical section.
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` if nothing is pending, or the store's error
    /// (the candidate is cleared and the directory is unchanged).
    pub async fn confirm_delete(&self) -> Result<SessionId> {
        let id = self
            .state
            .write()
            .await
            .pending_deletion
            .take()
            .ok_or_else(|| ChatError::InvalidState("no deletion pending".to_string()))?;
        self.emit(SessionEvent::DeletionPending { id: None });

        self.store
            .delete_session(&id)
            .await
            .map_err(|e| self.report("delete", e))?;

        let selection_cleared = {
            let mut state = self.state.write().await;
            state.directory.remove(&id);
            state.cache.remove(&id);
            state.enforce_invariants()
        };

        tracing::info!("[SessionEngine] Deleted session {}", id);
        self.emit(SessionEvent::SessionDeleted { id: id.clone() });
        if selection_cleared {
            self.emit(SessionEvent::SelectionChanged {
                selection: Selection::NoSelection,
            });
        }
        Ok(id)
    }

    // ============================================================================
    // Snapshots
    // ============================================================================

    /// Returns the directory in display order.
    pub async fn directory(&self) -> Vec<Session> {
        self.state.read().await.directory.to_vec()
    }

    pub async fn selection(&self) -> Selection {
        self.state.read().await.selection.clone()
    }

    /// Returns the summary of the selected session.
    pub async fn selected_session(&self) -> Option<Session> {
        let state = self.state.read().await;
        state
            .selection
            .id()
            .and_then(|id| state.directory.get(id))
            .cloned()
    }

    /// Returns the cached detail of a session, if loaded.
    pub async fn detail(&self, id: &SessionId) -> Option<SessionDetail> {
        self.state.read().await.cache.get(id).cloned()
    }

    /// Returns the cached log of a session, if loaded.
    pub async fn messages(&self, id: &SessionId) -> Option<Vec<Message>> {
        self.state
            .read()
            .await
            .cache
            .get(id)
            .map(|d| d.messages.clone())
    }

    pub async fn pending_deletion(&self) -> Option<SessionId> {
        self.state.read().await.pending_deletion.candidate().cloned()
    }

    pub async fn editing(&self) -> Option<SessionId> {
        self.state.read().await.editing.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockSessionStore;

    const LONG_TEXT: &str = "Hello there, this is a longer than thirty character message";

    async fn engine_with(sessions: &[(&str, &str)]) -> (SessionEngine, Arc<MockSessionStore>) {
        let store = Arc::new(MockSessionStore::with_sessions(sessions));
        let engine = SessionEngine::new(store.clone());
        (engine, store)
    }

    async fn assert_selection_invariant(engine: &SessionEngine) {
        if let Selection::Selected(id) = engine.selection().await {
            assert!(
                engine.directory().await.iter().any(|s| s.id == id),
                "selection {id} must be in the directory"
            );
        }
    }

    #[tokio::test]
    async fn test_list_selects_first_session() {
        let (engine, _) = engine_with(&[("a", "New Chat"), ("b", "Budget")]).await;
        assert_eq!(engine.selection().await, Selection::NoSelection);

        let sessions = engine.list().await.unwrap();

        assert_eq!(sessions.len(), 2);
        assert_eq!(engine.selection().await, Selection::Selected("a".into()));
        // Selected session log is loaded lazily
        assert!(engine.detail(&"a".into()).await.is_some());
        assert!(engine.detail(&"b".into()).await.is_none());
    }

    #[tokio::test]
    async fn test_list_does_not_override_explicit_selection() {
        let (engine, _) = engine_with(&[("a", "A"), ("b", "B")]).await;
        engine.list().await.unwrap();
        engine.select(&"b".into()).await.unwrap();

        engine.list().await.unwrap();

        assert_eq!(engine.selection().await, Selection::Selected("b".into()));
    }

    #[tokio::test]
    async fn test_list_twice_is_idempotent() {
        let (engine, _) = engine_with(&[("a", "A"), ("b", "B")]).await;
        engine.list().await.unwrap();
        let first = engine.directory().await;
        engine.list().await.unwrap();
        assert_eq!(first, engine.directory().await);
    }

    #[tokio::test]
    async fn test_list_unauthorized_leaves_directory_untouched() {
        let (engine, store) = engine_with(&[("a", "A")]).await;
        engine.list().await.unwrap();
        let before = engine.directory().await;
        let mut events = engine.subscribe();

        store.set_authorized(false);
        let err = engine.list().await.unwrap_err();

        assert!(err.is_unauthorized());
        assert_eq!(before, engine.directory().await);
        assert_eq!(events.recv().await.unwrap(), SessionEvent::AuthenticationRequired);
    }

    #[tokio::test]
    async fn test_list_clears_selection_of_vanished_session() {
        let (engine, store) = engine_with(&[("a", "A"), ("b", "B")]).await;
        engine.list().await.unwrap();
        engine.select(&"b".into()).await.unwrap();

        store.remove_remote(&"b".into());
        engine.list().await.unwrap();

        // Literal behaviour: the cleared selection falls back to the first entry
        assert_eq!(engine.selection().await, Selection::Selected("a".into()));
        assert!(engine.detail(&"b".into()).await.is_none());
        assert_selection_invariant(&engine).await;
    }

    #[tokio::test]
    async fn test_refresh_skips_selection_and_log_load() {
        let (engine, store) = engine_with(&[("a", "A"), ("b", "B")]).await;

        let sessions = engine.refresh().await.unwrap();

        assert_eq!(sessions.len(), 2);
        assert_eq!(engine.selection().await, Selection::NoSelection);
        assert!(engine.detail(&"a".into()).await.is_none());
        assert_eq!(store.call_count(), 1);
    }

    #[tokio::test]
    async fn test_refresh_clears_selection_of_vanished_session() {
        let (engine, store) = engine_with(&[("a", "A"), ("b", "B")]).await;
        engine.list().await.unwrap();
        store.remove_remote(&"a".into());

        engine.refresh().await.unwrap();

        assert_eq!(engine.selection().await, Selection::NoSelection);
        assert_eq!(engine.directory().await.len(), 1);
    }

    #[tokio::test]
    async fn test_list_empty_directory_keeps_no_selection() {
        let (engine, _) = engine_with(&[]).await;
        engine.list().await.unwrap();
        assert_eq!(engine.selection().await, Selection::NoSelection);
    }

    #[tokio::test]
    async fn test_create_inserts_front_and_selects() {
        let (engine, _) = engine_with(&[("a", "A")]).await;
        engine.list().await.unwrap();
        let mut events = engine.subscribe();

        let created = engine.create(None).await.unwrap();

        assert_eq!(created.name, DEFAULT_SESSION_NAME);
        assert_eq!(engine.directory().await[0].id, created.id);
        assert_eq!(engine.selection().await, Selection::Selected(created.id.clone()));
        assert_eq!(engine.messages(&created.id).await, Some(Vec::new()));
        assert!(matches!(
            events.recv().await.unwrap(),
            SessionEvent::SessionCreated { .. }
        ));
    }

    #[tokio::test]
    async fn test_create_rejects_blank_name() {
        let (engine, store) = engine_with(&[]).await;
        let err = engine.create(Some("   ")).await.unwrap_err();
        assert!(err.is_validation());
        assert_eq!(store.call_count(), 0);
    }

    #[tokio::test]
    async fn test_rename_updates_directory_and_detail() {
        let (engine, _) = engine_with(&[("a", "A")]).await;
        engine.list().await.unwrap();

        engine.rename(&"a".into(), "  Trip plans  ").await.unwrap();

        assert_eq!(engine.directory().await[0].name, "Trip plans");
        assert_eq!(engine.detail(&"a".into()).await.unwrap().session.name, "Trip plans");
    }

    #[tokio::test]
    async fn test_rename_blank_is_noop_without_network() {
        let (engine, store) = engine_with(&[("a", "A")]).await;
        engine.list().await.unwrap();
        engine.begin_edit(&"a".into()).await.unwrap();
        let calls = store.call_count();

        let err = engine.rename(&"a".into(), " \t ").await.unwrap_err();

        assert!(err.is_validation());
        assert_eq!(store.call_count(), calls);
        assert_eq!(engine.directory().await[0].name, "A");
        assert_eq!(engine.editing().await, None);
    }

    #[tokio::test]
    async fn test_rename_failure_keeps_state_and_clears_edit_marker() {
        let (engine, store) = engine_with(&[("a", "A")]).await;
        engine.list().await.unwrap();
        engine.begin_edit(&"a".into()).await.unwrap();

        store.fail_next(ChatError::remote(Some(500), "boom"));
        let err = engine.rename(&"a".into(), "B").await.unwrap_err();

        assert!(err.is_remote());
        assert_eq!(engine.directory().await[0].name, "A");
        assert_eq!(engine.detail(&"a".into()).await.unwrap().session.name, "A");
        assert_eq!(engine.editing().await, None);
    }

    #[tokio::test]
    async fn test_select_unknown_session_fails() {
        let (engine, _) = engine_with(&[("a", "A")]).await;
        engine.list().await.unwrap();
        let err = engine.select(&"zzz".into()).await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(engine.selection().await, Selection::Selected("a".into()));
    }

    #[tokio::test]
    async fn test_reselect_is_idempotent() {
        let (engine, store) = engine_with(&[("a", "A")]).await;
        engine.list().await.unwrap();
        let calls = store.call_count();
        let mut events = engine.subscribe();

        engine.select(&"a".into()).await.unwrap();
        engine.select(&"a".into()).await.unwrap();

        assert_eq!(engine.selection().await, Selection::Selected("a".into()));
        // Log already cached, no further loads
        assert_eq!(store.call_count(), calls);
        assert!(events.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_append_auto_renames_once() {
        let (engine, _) = engine_with(&[]).await;
        let session = engine.create(None).await.unwrap();

        engine
            .append(&session.id, LONG_TEXT, MessageOrigin::User)
            .await
            .unwrap();

        let expected = format!("{}...", &LONG_TEXT[..30]);
        assert_eq!(engine.directory().await[0].name, expected);
        assert_eq!(engine.detail(&session.id).await.unwrap().session.name, expected);

        engine
            .append(&session.id, "A completely different second message here", MessageOrigin::User)
            .await
            .unwrap();

        assert_eq!(engine.directory().await[0].name, expected);
        assert_eq!(engine.messages(&session.id).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_auto_rename_keeps_edit_of_other_session() {
        let (engine, _) = engine_with(&[("a", "New Chat"), ("b", "Budget")]).await;
        engine.list().await.unwrap();
        engine.begin_edit(&"b".into()).await.unwrap();

        engine.append(&"a".into(), "hello world", MessageOrigin::User).await.unwrap();

        assert_eq!(engine.directory().await[0].name, "hello world");
        assert_eq!(engine.editing().await, Some("b".into()));
    }

    #[tokio::test]
    async fn test_append_does_not_rename_custom_name() {
        let (engine, _) = engine_with(&[]).await;
        let session = engine.create(Some("Budget")).await.unwrap();

        engine.append(&session.id, LONG_TEXT, MessageOrigin::User).await.unwrap();

        assert_eq!(engine.directory().await[0].name, "Budget");
    }

    #[tokio::test]
    async fn test_append_does_not_rename_when_log_not_empty() {
        let store = Arc::new(MockSessionStore::with_sessions(&[("a", DEFAULT_SESSION_NAME)]));
        store.seed_message(&"a".into(), "earlier", MessageOrigin::User);
        let engine = SessionEngine::new(store.clone());
        engine.list().await.unwrap();

        engine.append(&"a".into(), LONG_TEXT, MessageOrigin::User).await.unwrap();

        assert_eq!(engine.directory().await[0].name, DEFAULT_SESSION_NAME);
    }

    #[tokio::test]
    async fn test_append_whitespace_is_rejected_locally() {
        let (engine, store) = engine_with(&[("a", "A")]).await;
        engine.list().await.unwrap();
        let calls = store.call_count();

        let err = engine.append(&"a".into(), "   ", MessageOrigin::User).await.unwrap_err();

        assert!(err.is_validation());
        assert_eq!(store.call_count(), calls);
        assert_eq!(engine.messages(&"a".into()).await, Some(Vec::new()));
    }

    #[tokio::test]
    async fn test_append_without_selection_is_rejected() {
        let (engine, store) = engine_with(&[]).await;
        let err = engine
            .append(&"a".into(), "hello", MessageOrigin::User)
            .await
            .unwrap_err();
        assert!(err.is_validation());
        assert_eq!(store.call_count(), 0);
    }

    #[tokio::test]
    async fn test_append_failure_leaves_log_unchanged() {
        let (engine, store) = engine_with(&[("a", "A")]).await;
        engine.list().await.unwrap();
        engine.append(&"a".into(), "first", MessageOrigin::User).await.unwrap();

        store.fail_next(ChatError::remote(None, "connection reset"));
        let err = engine.append(&"a".into(), "second", MessageOrigin::User).await.unwrap_err();

        assert!(err.is_remote());
        let log = engine.messages(&"a".into()).await.unwrap();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].text, "first");
    }

    #[tokio::test]
    async fn test_append_to_unselected_session_merges_by_id() {
        let (engine, _) = engine_with(&[("a", "A"), ("b", "B")]).await;
        engine.list().await.unwrap();

        // "a" is selected; append to "b" still lands in b's log
        engine.append(&"b".into(), "late", MessageOrigin::Assistant).await.unwrap();

        assert_eq!(engine.messages(&"b".into()).await.unwrap()[0].text, "late");
        assert_eq!(engine.messages(&"a".into()).await.unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_confirm_delete_of_selected_clears_selection() {
        let (engine, _) = engine_with(&[("a", "New Chat"), ("b", "Budget")]).await;
        engine.list().await.unwrap();

        engine.request_delete(&"a".into()).await.unwrap();
        let deleted = engine.confirm_delete().await.unwrap();

        assert_eq!(deleted, SessionId::from("a"));
        assert!(engine.directory().await.iter().all(|s| s.id.as_str() != "a"));
        assert_eq!(engine.selection().await, Selection::NoSelection);
        assert!(engine.detail(&"a".into()).await.is_none());
    }

    #[tokio::test]
    async fn test_confirm_delete_of_unselected_keeps_selection() {
        let (engine, _) = engine_with(&[("a", "A"), ("b", "B")]).await;
        engine.list().await.unwrap();

        engine.request_delete(&"b".into()).await.unwrap();
        engine.confirm_delete().await.unwrap();

        assert_eq!(engine.selection().await, Selection::Selected("a".into()));
        assert_selection_invariant(&engine).await;
    }

    #[tokio::test]
    async fn test_cancel_delete_makes_no_call() {
        let (engine, store) = engine_with(&[("a", "A")]).await;
        engine.list().await.unwrap();
        let before = engine.directory().await;
        let calls = store.call_count();

        engine.request_delete(&"a".into()).await.unwrap();
        engine.cancel_delete().await;

        assert_eq!(store.call_count(), calls);
        assert_eq!(engine.directory().await, before);
        assert_eq!(engine.selection().await, Selection::Selected("a".into()));
        assert_eq!(engine.pending_deletion().await, None);
    }

    #[tokio::test]
    async fn test_confirm_without_candidate_is_invalid() {
        let (engine, _) = engine_with(&[("a", "A")]).await;
        let err = engine.confirm_delete().await.unwrap_err();
        assert!(matches!(err, ChatError::InvalidState(_)));
    }

    #[tokio::test]
    async fn test_request_replaces_pending_candidate() {
        let (engine, _) = engine_with(&[("a", "A"), ("b", "B")]).await;
        engine.list().await.unwrap();

        engine.request_delete(&"a".into()).await.unwrap();
        engine.request_delete(&"b".into()).await.unwrap();

        assert_eq!(engine.pending_deletion().await, Some("b".into()));
    }

    #[tokio::test]
    async fn test_failed_delete_clears_candidate_and_keeps_directory() {
        let (engine, store) = engine_with(&[("a", "A")]).await;
        engine.list().await.unwrap();

        engine.request_delete(&"a".into()).await.unwrap();
        store.fail_next(ChatError::remote(Some(503), "unavailable"));
        let err = engine.confirm_delete().await.unwrap_err();

        assert!(err.is_remote());
        assert_eq!(engine.pending_deletion().await, None);
        assert_eq!(engine.directory().await.len(), 1);
        assert_eq!(engine.selection().await, Selection::Selected("a".into()));
    }
}
