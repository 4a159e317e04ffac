//! Upload limits enforced before any bytes leave the client.

use crate::error::{ChatError, Result};

/// Largest accepted upload, in bytes (20 MiB).
pub const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

/// Maximum number of documents a user may keep.
pub const MAX_DOCUMENTS_PER_USER: usize = 10;

/// Limits mirrored from the server's upload endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadPolicy {
    pub max_bytes: usize,
    pub max_documents: usize,
    pub extension: &'static str,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            max_bytes: MAX_UPLOAD_BYTES,
            max_documents: MAX_DOCUMENTS_PER_USER,
            extension: ".pdf",
        }
    }
}

impl UploadPolicy {
    /// Checks an upload against the limits.
    ///
    /// The checks run in the same order as on the server: document count,
    /// then size, then file type.
    ///
    /// # Arguments
    ///
    /// * `file_name` - Name the document will be stored under
    /// * `size` - Payload size in bytes
    /// * `existing` - Number of documents the user already has
    pub fn check(&self, file_name: &str, size: usize, existing: usize) -> Result<()> {
        if existing >= self.max_documents {
            return Err(ChatError::validation(
                "document",
                format!("document limit reached ({} per user)", self.max_documents),
            ));
        }
        if size > self.max_bytes {
            return Err(ChatError::validation(
                "file",
                format!("file size exceeds {} MiB limit", self.max_bytes / (1024 * 1024)),
            ));
        }
        if !file_name.ends_with(self.extension) {
            return Err(ChatError::validation("file_name", "only PDF files are allowed"));
        }
        Ok(())
    }
}
