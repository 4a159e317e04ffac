use serde::{Deserialize, Serialize};

use super::message::Message;
use super::model::Session;
use super::selection::Selection;
use crate::identifiers::SessionId;

/// State transitions published by the session engine.
///
/// The view layer subscribes to these instead of having the engine reach into
/// view state (overlays, edit affordances, toasts).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    /// The directory was replaced by a full refresh.
    DirectoryRefreshed { count: usize },
    /// A session was created and inserted at the front of the directory.
    SessionCreated { session: Session },
    /// A session name changed on the server and locally.
    SessionRenamed { id: SessionId, name: String },
    /// The edit-in-progress marker was cleared after a rename attempt.
    EditFinished {
        id: SessionId,
        #[serde(default)]
        succeeded: bool,
    },
    /// The active selection changed.
    SelectionChanged { selection: Selection },
    /// A message log was loaded from the remote store.
    MessagesLoaded { id: SessionId, count: usize },
    /// A server-confirmed message was appended to a cached log.
    MessageAppended { id: SessionId, message: Message },
    /// The deletion candidate changed (`None` when cleared).
    DeletionPending { id: Option<SessionId> },
    /// A session was removed from the directory.
    SessionDeleted { id: SessionId },
    /// An operation failed in a way that should be shown transiently.
    OperationFailed { operation: String, message: String },
    /// The credential was rejected; the view must return to authentication.
    AuthenticationRequired,
}
