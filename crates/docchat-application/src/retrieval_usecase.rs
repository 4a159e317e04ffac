//! Search over uploaded documents.

use docchat_core::error::Result;
use docchat_core::retrieval::{DocumentIndex, IndexHealth, RetrievedChunk, check_query};
use std::sync::Arc;

pub struct RetrievalUseCase {
    index: Arc<dyn DocumentIndex>,
}

impl RetrievalUseCase {
    pub fn new(index: Arc<dyn DocumentIndex>) -> Self {
        Self { index }
    }

    /// Returns the chunks nearest to `query`, closest first.
    ///
    /// A blank query or a `top_k` outside `1..=MAX_TOP_K` is rejected without
    /// a request.
    pub async fn query(&self, query: &str, top_k: usize) -> Result<Vec<RetrievedChunk>> {
        check_query(query, top_k)?;
        let mut chunks = self.index.query(query.trim(), top_k).await?;
        chunks.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        chunks.truncate(top_k);
        Ok(chunks)
    }

    pub async fn health(&self) -> Result<IndexHealth> {
        self.index.health().await
    }
}
