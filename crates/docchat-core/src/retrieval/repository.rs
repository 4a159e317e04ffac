//! Document index trait.

use super::model::{IndexHealth, RetrievedChunk};
use crate::error::Result;
use async_trait::async_trait;

/// Search index fed with uploaded documents.
///
/// # Implementation Notes
///
/// - `ingest` is not idempotent on the server side; ingesting a file twice
///   indexes its chunks twice
/// - `query` returns at most `top_k` chunks ordered by ascending distance
#[async_trait]
pub trait DocumentIndex: Send + Sync {
    /// Indexes the content of a file.
    async fn ingest(&self, file_name: &str, bytes: Vec<u8>) -> Result<()>;

    /// Returns the chunks nearest to `query`.
    async fn query(&self, query: &str, top_k: usize) -> Result<Vec<RetrievedChunk>>;

    /// Reports whether the service is up and how much it holds.
    async fn health(&self) -> Result<IndexHealth>;
}
