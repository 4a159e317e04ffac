//! REST implementation of [`DocumentStore`].

use crate::client::ApiClient;
use crate::dto::{DocumentDto, convert_all};
use async_trait::async_trait;
use docchat_core::document::{Document, DocumentStore};
use docchat_core::error::{ChatError, Result};
use docchat_core::identifiers::DocumentId;
use reqwest::multipart::{Form, Part};
use std::sync::Arc;

/// Multipart field name expected by the upload endpoint.
const UPLOAD_FIELD: &str = "file";

#[derive(Clone)]
pub struct RestDocumentStore {
    client: Arc<ApiClient>,
}

impl RestDocumentStore {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DocumentStore for RestDocumentStore {
    async fn list_documents(&self) -> Result<Vec<Document>> {
        let dtos: Vec<DocumentDto> = self.client.get("documents").await?;
        convert_all(dtos)
    }

    async fn upload_document(&self, file_name: &str, bytes: Vec<u8>) -> Result<Document> {
        let part = Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str("application/pdf")
            .map_err(|e| ChatError::internal(format!("invalid upload part: {e}")))?;
        let form = Form::new().part(UPLOAD_FIELD, part);

        tracing::info!("[RestDocumentStore] Uploading {}", file_name);
        let dto: DocumentDto = self.client.post_multipart("upload", form).await?;
        Document::try_from(dto)
    }

    async fn delete_document(&self, document_id: &DocumentId) -> Result<Document> {
        let dto: DocumentDto = self
            .client
            .delete(&format!("documents/{document_id}"))
            .await?;
        Document::try_from(dto)
    }
}
