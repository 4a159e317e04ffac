//! Active selection state machine.

use crate::identifiers::SessionId;
use serde::{Deserialize, Serialize};

/// Which single session is open in the view.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state", content = "id", rename_all = "snake_case")]
pub enum Selection {
    #[default]
    NoSelection,
    Selected(SessionId),
}

impl Selection {
    pub fn id(&self) -> Option<&SessionId> {
        match self {
            Selection::Selected(id) => Some(id),
            Selection::NoSelection => None,
        }
    }

    pub fn is_selected(&self, id: &SessionId) -> bool {
        self.id() == Some(id)
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Selection::NoSelection)
    }
}

/// Pending candidate of the two-step deletion flow.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PendingDeletion {
    candidate: Option<SessionId>,
}

impl PendingDeletion {
    /// Records a candidate, replacing any previous one.
    pub fn request(&mut self, id: SessionId) -> Option<SessionId> {
        self.candidate.replace(id)
    }

    pub fn take(&mut self) -> Option<SessionId> {
        self.candidate.take()
    }

    pub fn candidate(&self) -> Option<&SessionId> {
        self.candidate.as_ref()
    }

    pub fn clear(&mut self) {
        self.candidate = None;
    }
}
