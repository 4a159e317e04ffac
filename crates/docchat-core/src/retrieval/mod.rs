//! Semantic search over uploaded documents.
//!
//! The retrieval service is a separate server from the message store. It
//! splits ingested files into chunks, embeds them and answers nearest-chunk
//! queries. It has no notion of users, so its calls carry no credential.

pub mod model;
pub mod repository;

pub use model::{DEFAULT_TOP_K, IndexHealth, MAX_TOP_K, RetrievedChunk, check_query};
pub use repository::DocumentIndex;
