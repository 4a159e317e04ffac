//! Document management use case.

use docchat_core::document::{Document, DocumentStore, UploadPolicy};
use docchat_core::error::Result;
use docchat_core::identifiers::DocumentId;
use docchat_core::retrieval::DocumentIndex;
use std::sync::Arc;

/// What happened to an upload on the search index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexOutcome {
    Indexed,
    /// No index is attached
    Skipped,
    /// The upload is stored, but the index rejected it
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReceipt {
    pub document: Document,
    pub index: IndexOutcome,
}

/// Lists, uploads and deletes the user's documents.
///
/// Uploads are checked against [`UploadPolicy`] before any bytes are sent;
/// the document count comes from a fresh list. With an index attached, each
/// stored upload is also ingested for search.
pub struct DocumentUseCase {
    store: Arc<dyn DocumentStore>,
    policy: UploadPolicy,
    index: Option<Arc<dyn DocumentIndex>>,
}

impl DocumentUseCase {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self::with_policy(store, UploadPolicy::default())
    }

    pub fn with_policy(store: Arc<dyn DocumentStore>, policy: UploadPolicy) -> Self {
        Self {
            store,
            policy,
            index: None,
        }
    }

    /// Ingests every successful upload into `index`.
    pub fn with_index(mut self, index: Arc<dyn DocumentIndex>) -> Self {
        self.index = Some(index);
        self
    }

    pub async fn list(&self) -> Result<Vec<Document>> {
        self.store.list_documents().await
    }

    /// Uploads a file, then hands it to the index if one is attached.
    ///
    /// An indexing failure does not fail the upload; it is reported in the
    /// receipt.
    pub async fn upload(&self, file_name: &str, bytes: Vec<u8>) -> Result<UploadReceipt> {
        let existing = self.store.list_documents().await?.len();
        self.policy.check(file_name, bytes.len(), existing)?;

        let Some(index) = &self.index else {
            let document = self.store.upload_document(file_name, bytes).await?;
            tracing::info!("[DocumentUseCase] Uploaded {} as {}", file_name, document.id);
            return Ok(UploadReceipt {
                document,
                index: IndexOutcome::Skipped,
            });
        };

        let document = self.store.upload_document(file_name, bytes.clone()).await?;
        tracing::info!("[DocumentUseCase] Uploaded {} as {}", file_name, document.id);

        let outcome = match index.ingest(file_name, bytes).await {
            Ok(()) => IndexOutcome::Indexed,
            Err(e) => {
                tracing::warn!("[DocumentUseCase] Indexing {} failed: {}", file_name, e);
                IndexOutcome::Failed(e.to_string())
            }
        };
        Ok(UploadReceipt {
            document,
            index: outcome,
        })
    }

    pub async fn delete(&self, document_id: &DocumentId) -> Result<Document> {
        let document = self.store.delete_document(document_id).await?;
        tracing::info!("[DocumentUseCase] Deleted {}", document.file_name);
        Ok(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docchat_core::testing::{MockDocumentIndex, MockDocumentStore};

    #[tokio::test]
    async fn test_upload_pdf() {
        let store = Arc::new(MockDocumentStore::with_documents(2));
        let usecase = DocumentUseCase::new(store.clone());

        let receipt = usecase.upload("notes.pdf", vec![0; 128]).await.unwrap();

        assert_eq!(receipt.document.file_name, "notes.pdf");
        assert_eq!(receipt.index, IndexOutcome::Skipped);
        assert_eq!(usecase.list().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_upload_is_ingested_when_index_attached() {
        let index = Arc::new(MockDocumentIndex::new());
        let usecase = DocumentUseCase::new(Arc::new(MockDocumentStore::with_documents(0)))
            .with_index(index.clone());

        let receipt = usecase.upload("notes.pdf", vec![0; 16]).await.unwrap();

        assert_eq!(receipt.index, IndexOutcome::Indexed);
        assert_eq!(index.ingested(), vec!["notes.pdf".to_string()]);
    }

    #[tokio::test]
    async fn test_index_failure_keeps_upload() {
        let store = Arc::new(MockDocumentStore::with_documents(0));
        let index = Arc::new(MockDocumentIndex::new());
        index.set_failing(true);
        let usecase = DocumentUseCase::new(store.clone()).with_index(index.clone());

        let receipt = usecase.upload("notes.pdf", vec![0; 16]).await.unwrap();

        assert!(matches!(receipt.index, IndexOutcome::Failed(ref m) if m.contains("embedding")));
        assert_eq!(store.upload_count(), 1);
        assert!(index.ingested().is_empty());
    }

    #[tokio::test]
    async fn test_rejected_upload_is_not_ingested() {
        let index = Arc::new(MockDocumentIndex::new());
        let usecase = DocumentUseCase::new(Arc::new(MockDocumentStore::with_documents(0)))
            .with_index(index.clone());

        assert!(usecase.upload("photo.png", vec![1]).await.is_err());
        assert!(index.ingested().is_empty());
    }

    #[tokio::test]
    async fn test_limit_is_checked_before_upload() {
        let store = Arc::new(MockDocumentStore::with_documents(10));
        let usecase = DocumentUseCase::new(store.clone());

        let err = usecase.upload("eleventh.pdf", vec![0; 8]).await.unwrap_err();

        assert!(err.is_validation());
        assert_eq!(store.upload_count(), 0);
    }

    #[tokio::test]
    async fn test_non_pdf_is_rejected_locally() {
        let store = Arc::new(MockDocumentStore::with_documents(0));
        let usecase = DocumentUseCase::new(store.clone());

        assert!(usecase.upload("photo.png", vec![1]).await.is_err());
        assert_eq!(store.upload_count(), 0);
    }

    #[tokio::test]
    async fn test_delete_unknown_document() {
        let usecase = DocumentUseCase::new(Arc::new(MockDocumentStore::with_documents(1)));
        let err = usecase.delete(&"42".into()).await.unwrap_err();
        assert_eq!(err.status(), Some(404));
    }
}
