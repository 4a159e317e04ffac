//! View model for the chat screen.
//!
//! Wraps a [`SessionEngine`] and keeps the purely visual state that the engine
//! deliberately knows nothing about: the composer draft, the session picker
//! overlay, transient error toasts and the "go back to login" flag.

use docchat_core::error::{ChatError, Result};
use docchat_core::identifiers::SessionId;
use docchat_core::session::{Message, MessageOrigin, Session, SessionEngine, SessionEvent};
use std::sync::Arc;
use tokio::sync::broadcast::Receiver;
use tokio::sync::broadcast::error::TryRecvError;

/// Maximum number of toasts kept; older ones are dropped first.
const MAX_TOASTS: usize = 5;

pub struct ChatViewModel {
    engine: Arc<SessionEngine>,
    events: Receiver<SessionEvent>,
    draft: String,
    rename_draft: Option<String>,
    picker_open: bool,
    constrained_viewport: bool,
    toasts: Vec<String>,
    auth_required: bool,
}

impl ChatViewModel {
    pub fn new(engine: Arc<SessionEngine>) -> Self {
        let events = engine.subscribe();
        Self {
            engine,
            events,
            draft: String::new(),
            rename_draft: None,
            picker_open: false,
            constrained_viewport: false,
            toasts: Vec::new(),
            auth_required: false,
        }
    }

    pub fn engine(&self) -> &Arc<SessionEngine> {
        &self.engine
    }

    // ============================================================================
    // View state
    // ============================================================================

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    /// Name being typed while a rename is in progress.
    pub fn rename_draft(&self) -> Option<&str> {
        self.rename_draft.as_deref()
    }

    pub fn is_picker_open(&self) -> bool {
        self.picker_open
    }

    pub fn open_picker(&mut self) {
        self.picker_open = true;
    }

    pub fn close_picker(&mut self) {
        self.picker_open = false;
    }

    /// Narrow layouts show the session list as an overlay.
    pub fn set_constrained_viewport(&mut self, constrained: bool) {
        self.constrained_viewport = constrained;
        if !constrained {
            self.picker_open = false;
        }
    }

    pub fn toasts(&self) -> &[String] {
        &self.toasts
    }

    pub fn dismiss_toasts(&mut self) {
        self.toasts.clear();
    }

    /// Set once a credential was rejected; the UI must return to login.
    pub fn auth_required(&self) -> bool {
        self.auth_required
    }

    pub async fn sessions(&self) -> Vec<Session> {
        self.engine.directory().await
    }

    /// Messages of the selected session, empty if none is loaded.
    pub async fn visible_messages(&self) -> Vec<Message> {
        match self.engine.selection().await.id() {
            Some(id) => self.engine.messages(id).await.unwrap_or_default(),
            None => Vec::new(),
        }
    }

    /// Session awaiting delete confirmation, for the confirmation dialog.
    pub async fn delete_prompt(&self) -> Option<Session> {
        let id = self.engine.pending_deletion().await?;
        self.engine.directory().await.into_iter().find(|s| s.id == id)
    }

    // ============================================================================
    // Operations
    // ============================================================================

    /// Loads the directory for a freshly mounted screen.
    pub async fn mount(&mut self) -> Result<()> {
        let result = self.engine.list().await.map(|_| ());
        self.settle(result)
    }

    pub async fn new_chat(&mut self) -> Result<Session> {
        let result = self.engine.create(None).await;
        self.settle(result)
    }

    pub async fn pick(&mut self, id: &SessionId) -> Result<()> {
        let result = self.engine.select(id).await;
        if result.is_ok() && self.constrained_viewport {
            self.picker_open = false;
        }
        self.settle(result)
    }

    /// Sends the draft to the selected session.
    ///
    /// The draft is only cleared once the server confirmed the message.
    pub async fn send(&mut self) -> Result<Message> {
        let selection = self.engine.selection().await;
        let Some(id) = selection.id() else {
            return Err(ChatError::validation("selection", "no active session"));
        };
        let result = self
            .engine
            .append(id, &self.draft, MessageOrigin::User)
            .await;
        if result.is_ok() {
            self.draft.clear();
        }
        self.settle(result)
    }

    pub async fn start_rename(&mut self, id: &SessionId) -> Result<()> {
        let result = self.engine.begin_edit(id).await;
        if result.is_ok() {
            let current = self
                .engine
                .directory()
                .await
                .into_iter()
                .find(|s| &s.id == id)
                .map(|s| s.name);
            self.rename_draft = current;
        }
        self.settle(result)
    }

    pub fn set_rename_draft(&mut self, name: impl Into<String>) {
        self.rename_draft = Some(name.into());
    }

    /// Commits the rename started with [`start_rename`](Self::start_rename).
    pub async fn commit_rename(&mut self, name: &str) -> Result<()> {
        let Some(id) = self.engine.editing().await else {
            return Err(ChatError::InvalidState("no rename in progress".to_string()));
        };
        let result = self.engine.rename(&id, name).await;
        self.rename_draft = None;
        self.settle(result)
    }

    pub async fn cancel_rename(&mut self) {
        self.engine.cancel_edit().await;
        self.rename_draft = None;
        self.drain_events();
    }

    pub async fn request_delete(&mut self, id: &SessionId) -> Result<()> {
        let result = self.engine.request_delete(id).await;
        self.settle(result)
    }

    pub async fn confirm_delete(&mut self) -> Result<SessionId> {
        let result = self.engine.confirm_delete().await;
        self.settle(result)
    }

    pub async fn cancel_delete(&mut self) {
        self.engine.cancel_delete().await;
        self.drain_events();
    }

    /// Folds pending engine events into view state and passes `result` on.
    fn settle<T>(&mut self, result: Result<T>) -> Result<T> {
        self.drain_events();
        result
    }

    /// Applies every event published since the last call.
    pub fn drain_events(&mut self) {
        loop {
            match self.events.try_recv() {
                Ok(event) => self.apply(event),
                Err(TryRecvError::Lagged(skipped)) => {
                    tracing::warn!("[ChatViewModel] Skipped {} engine events", skipped);
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            }
        }
    }

    fn apply(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::SessionCreated { .. } | SessionEvent::SelectionChanged { .. } => {
                if self.constrained_viewport {
                    self.picker_open = false;
                }
            }
            SessionEvent::EditFinished { .. } => {
                self.rename_draft = None;
            }
            SessionEvent::OperationFailed { operation, message } => {
                self.push_toast(format!("{operation} failed: {message}"));
            }
            SessionEvent::AuthenticationRequired => {
                self.auth_required = true;
            }
            SessionEvent::DirectoryRefreshed { .. }
            | SessionEvent::SessionRenamed { .. }
            | SessionEvent::MessagesLoaded { .. }
            | SessionEvent::MessageAppended { .. }
            | SessionEvent::DeletionPending { .. }
            | SessionEvent::SessionDeleted { .. } => {}
        }
    }

    fn push_toast(&mut self, toast: String) {
        if self.toasts.len() == MAX_TOASTS {
            self.toasts.remove(0);
        }
        self.toasts.push(toast);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docchat_core::session::Selection;
    use docchat_core::testing::MockSessionStore;

    fn view_model(sessions: &[(&str, &str)]) -> (ChatViewModel, Arc<MockSessionStore>) {
        let store = Arc::new(MockSessionStore::with_sessions(sessions));
        let engine = Arc::new(SessionEngine::new(store.clone()));
        (ChatViewModel::new(engine), store)
    }

    #[tokio::test]
    async fn test_mount_selects_first_session() {
        let (mut vm, _) = view_model(&[("a", "New Chat"), ("b", "Budget")]);
        vm.mount().await.unwrap();
        assert_eq!(vm.engine().selection().await, Selection::Selected("a".into()));
        assert_eq!(vm.sessions().await.len(), 2);
    }

    #[tokio::test]
    async fn test_new_chat_closes_picker_on_constrained_viewport() {
        let (mut vm, _) = view_model(&[]);
        vm.set_constrained_viewport(true);
        vm.open_picker();

        vm.new_chat().await.unwrap();

        assert!(!vm.is_picker_open());
    }

    #[tokio::test]
    async fn test_new_chat_keeps_picker_on_wide_viewport() {
        let (mut vm, _) = view_model(&[]);
        vm.open_picker();
        vm.new_chat().await.unwrap();
        assert!(vm.is_picker_open());
    }

    #[tokio::test]
    async fn test_picking_current_session_closes_picker() {
        let (mut vm, _) = view_model(&[("a", "A")]);
        vm.mount().await.unwrap();
        vm.set_constrained_viewport(true);
        vm.open_picker();

        vm.pick(&"a".into()).await.unwrap();

        assert!(!vm.is_picker_open());
    }

    #[tokio::test]
    async fn test_send_clears_draft_on_success() {
        let (mut vm, _) = view_model(&[("a", "A")]);
        vm.mount().await.unwrap();
        vm.set_draft("hello");

        vm.send().await.unwrap();

        assert_eq!(vm.draft(), "");
        assert_eq!(vm.visible_messages().await.len(), 1);
    }

    #[tokio::test]
    async fn test_send_failure_keeps_draft_and_shows_toast() {
        let (mut vm, store) = view_model(&[("a", "A")]);
        vm.mount().await.unwrap();
        vm.set_draft("hello");

        store.fail_next(ChatError::remote(Some(500), "boom"));
        assert!(vm.send().await.is_err());

        assert_eq!(vm.draft(), "hello");
        assert_eq!(vm.toasts().len(), 1);
        assert!(vm.toasts()[0].contains("boom"));
    }

    #[tokio::test]
    async fn test_unauthorized_sets_auth_required() {
        let (mut vm, store) = view_model(&[("a", "A")]);
        store.set_authorized(false);

        assert!(vm.mount().await.is_err());

        assert!(vm.auth_required());
        assert!(vm.toasts().is_empty());
    }

    #[tokio::test]
    async fn test_rename_flow() {
        let (mut vm, _) = view_model(&[("a", "A")]);
        vm.mount().await.unwrap();

        vm.start_rename(&"a".into()).await.unwrap();
        assert_eq!(vm.rename_draft(), Some("A"));

        vm.commit_rename("Trips").await.unwrap();

        assert_eq!(vm.sessions().await[0].name, "Trips");
        assert_eq!(vm.rename_draft(), None);
        assert_eq!(vm.engine().editing().await, None);
    }

    #[tokio::test]
    async fn test_auto_title_keeps_rename_draft_of_other_session() {
        let (mut vm, _) = view_model(&[("a", "New Chat"), ("b", "Budget")]);
        vm.mount().await.unwrap();
        vm.start_rename(&"b".into()).await.unwrap();
        vm.set_rename_draft("Budget 2025");

        vm.set_draft("hello world");
        vm.send().await.unwrap();

        assert_eq!(vm.sessions().await[0].name, "hello world");
        assert_eq!(vm.rename_draft(), Some("Budget 2025"));
        vm.commit_rename("Budget 2025").await.unwrap();
        assert_eq!(vm.sessions().await[1].name, "Budget 2025");
    }

    #[tokio::test]
    async fn test_commit_without_start_is_invalid() {
        let (mut vm, _) = view_model(&[("a", "A")]);
        vm.mount().await.unwrap();
        let err = vm.commit_rename("x").await.unwrap_err();
        assert!(matches!(err, ChatError::InvalidState(_)));
    }

    #[tokio::test]
    async fn test_delete_prompt_and_confirm() {
        let (mut vm, _) = view_model(&[("a", "A"), ("b", "B")]);
        vm.mount().await.unwrap();

        vm.request_delete(&"a".into()).await.unwrap();
        assert_eq!(vm.delete_prompt().await.unwrap().name, "A");

        vm.confirm_delete().await.unwrap();

        assert!(vm.delete_prompt().await.is_none());
        assert_eq!(vm.engine().selection().await, Selection::NoSelection);
        assert_eq!(vm.sessions().await.len(), 1);
    }

    #[tokio::test]
    async fn test_cancel_delete_keeps_sessions() {
        let (mut vm, store) = view_model(&[("a", "A")]);
        vm.mount().await.unwrap();
        let calls = store.call_count();

        vm.request_delete(&"a".into()).await.unwrap();
        vm.cancel_delete().await;

        assert!(vm.delete_prompt().await.is_none());
        assert_eq!(store.call_count(), calls);
        assert_eq!(vm.sessions().await.len(), 1);
    }
}
