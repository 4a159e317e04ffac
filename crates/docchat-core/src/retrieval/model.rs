use crate::error::{ChatError, Result};
use serde::{Deserialize, Serialize};

/// Number of chunks returned when the caller does not ask for more.
pub const DEFAULT_TOP_K: usize = 5;

/// Upper bound accepted for `top_k`.
pub const MAX_TOP_K: usize = 50;

/// One chunk matched by a query, nearest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievedChunk {
    pub text: String,
    /// Name of the file the chunk was cut from
    pub file_name: Option<String>,
    pub chunk_index: Option<u32>,
    pub total_chunks: Option<u32>,
    /// L2 distance to the query embedding; smaller is closer
    pub distance: f32,
}

impl RetrievedChunk {
    /// `file.pdf #3/12`, or whatever part of that is known.
    pub fn location(&self) -> String {
        let file = self.file_name.as_deref().unwrap_or("unknown source");
        match (self.chunk_index, self.total_chunks) {
            (Some(index), Some(total)) => format!("{file} #{}/{total}", index + 1),
            (Some(index), None) => format!("{file} #{}", index + 1),
            _ => file.to_string(),
        }
    }
}

/// Status reported by the retrieval service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexHealth {
    pub status: String,
    /// Compute device the embeddings run on
    pub device: String,
    pub chunks_indexed: u64,
}

impl IndexHealth {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

/// Validates a query before it is sent.
pub fn check_query(query: &str, top_k: usize) -> Result<()> {
    if query.trim().is_empty() {
        return Err(ChatError::validation("query", "query must not be empty"));
    }
    if top_k == 0 || top_k > MAX_TOP_K {
        return Err(ChatError::validation(
            "top_k",
            format!("top_k must be between 1 and {MAX_TOP_K}"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(file_name: Option<&str>, index: Option<u32>, total: Option<u32>) -> RetrievedChunk {
        RetrievedChunk {
            text: "text".to_string(),
            file_name: file_name.map(str::to_string),
            chunk_index: index,
            total_chunks: total,
            distance: 0.5,
        }
    }

    #[test]
    fn test_location() {
        assert_eq!(chunk(Some("a.pdf"), Some(0), Some(4)).location(), "a.pdf #1/4");
        assert_eq!(chunk(Some("a.pdf"), Some(2), None).location(), "a.pdf #3");
        assert_eq!(chunk(None, None, None).location(), "unknown source");
    }

    #[test]
    fn test_check_query() {
        assert!(check_query("invoice total", DEFAULT_TOP_K).is_ok());
        assert!(check_query("  ", DEFAULT_TOP_K).unwrap_err().is_validation());
        assert!(check_query("x", 0).unwrap_err().is_validation());
        assert!(check_query("x", MAX_TOP_K + 1).is_err());
    }
}
