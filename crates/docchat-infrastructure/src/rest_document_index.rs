//! REST implementation of [`DocumentIndex`] for the retrieval service.

use crate::client::ApiClient;
use crate::dto::{HealthDto, IngestResponseDto, QueryRequest, QueryResponseDto};
use async_trait::async_trait;
use docchat_core::error::{ChatError, Result};
use docchat_core::retrieval::{DocumentIndex, IndexHealth, RetrievedChunk};
use reqwest::multipart::{Form, Part};
use std::sync::Arc;

const INGEST_FIELD: &str = "file";

/// Talks to the retrieval service. Its endpoints are unauthenticated, so the
/// client's credential is never attached.
#[derive(Clone)]
pub struct RestDocumentIndex {
    client: Arc<ApiClient>,
}

impl RestDocumentIndex {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DocumentIndex for RestDocumentIndex {
    async fn ingest(&self, file_name: &str, bytes: Vec<u8>) -> Result<()> {
        let part = Part::bytes(bytes).file_name(file_name.to_string());
        let form = Form::new().part(INGEST_FIELD, part);

        let response: IngestResponseDto = self
            .client
            .post_multipart_anonymous("ingest", form)
            .await?;
        if response.status != "success" {
            return Err(ChatError::remote(
                None,
                response
                    .message
                    .unwrap_or_else(|| format!("ingest returned status '{}'", response.status)),
            ));
        }
        tracing::info!("[RestDocumentIndex] Indexed {}", file_name);
        Ok(())
    }

    async fn query(&self, query: &str, top_k: usize) -> Result<Vec<RetrievedChunk>> {
        let request = QueryRequest { query, top_k };
        let response: QueryResponseDto = self.client.post_anonymous("query", &request).await?;
        tracing::debug!("[RestDocumentIndex] {} hits", response.results.len());
        Ok(response.results.into_iter().map(RetrievedChunk::from).collect())
    }

    async fn health(&self) -> Result<IndexHealth> {
        let dto: HealthDto = self.client.get_anonymous("health").await?;
        Ok(dto.into())
    }
}
