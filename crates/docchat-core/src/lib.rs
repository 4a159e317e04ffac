pub mod auth;
pub mod config;
pub mod credential;
pub mod document;
pub mod error;
pub mod identifiers;
pub mod retrieval;
pub mod session;
pub mod user;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

// Re-export common error type
pub use error::{ChatError, Result};
pub use identifiers::{DocumentId, MessageId, SessionId, UserId};
