//! Uploaded document model.

use crate::identifiers::DocumentId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A document the user uploaded for retrieval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    pub file_name: String,
    pub uploaded_at: DateTime<Utc>,
}
