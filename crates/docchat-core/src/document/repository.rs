//! Remote document store trait.

use super::model::Document;
use crate::error::Result;
use crate::identifiers::DocumentId;
use async_trait::async_trait;

/// Per-user document storage on the remote store.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Lists the documents of the current user.
    async fn list_documents(&self) -> Result<Vec<Document>>;

    /// Uploads a file and returns the stored record.
    async fn upload_document(&self, file_name: &str, bytes: Vec<u8>) -> Result<Document>;

    /// Deletes a document and returns the removed record.
    async fn delete_document(&self, document_id: &DocumentId) -> Result<Document>;
}
