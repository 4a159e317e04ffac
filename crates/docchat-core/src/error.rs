//! Error types for the docchat client.

use thiserror::Error;

/// A shared error type for the entire docchat client.
///
/// The first three variants are the failure classes every engine operation
/// reports to its caller. The remaining variants cover local concerns
/// (files, configuration, programming errors).
#[derive(Error, Debug, Clone)]
pub enum ChatError {
    /// Missing or expired credential. Never retried locally; the caller must
    /// send the user back to authentication.
    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    /// Input rejected before any network call.
    #[error("Validation rejected for {field}: {reason}")]
    ValidationRejected { field: &'static str, reason: String },

    /// Non-2xx response or transport failure (`status` is `None` for the latter).
    #[error("Remote failure{}: {message}", .status.map(|s| format!(" ({s})")).unwrap_or_default())]
    RemoteFailure {
        status: Option<u16>,
        message: String,
    },

    /// A 2xx response whose body does not match the response contract.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Entity not found error with type information
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// Operation called in a state that does not allow it
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization { format: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ChatError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates an Unauthorized error
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    /// Creates a ValidationRejected error
    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        Self::ValidationRejected {
            field,
            reason: reason.into(),
        }
    }

    /// Creates a RemoteFailure error
    pub fn remote(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::RemoteFailure {
            status,
            message: message.into(),
        }
    }

    /// Creates a NotFound error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is an Unauthorized error
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    /// Check if this is a ValidationRejected error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::ValidationRejected { .. })
    }

    /// Check if this error came from the remote side.
    ///
    /// Returns true for `RemoteFailure` and `MalformedResponse`.
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::RemoteFailure { .. } | Self::MalformedResponse(_))
    }

    /// Check if this is a NotFound error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// HTTP status attached to a remote failure, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::RemoteFailure { status, .. } => *status,
            Self::Unauthorized { .. } => Some(401),
            _ => None,
        }
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for ChatError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for ChatError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for ChatError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for ChatError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// Transport-level failures. Status errors are mapped by the HTTP adapter
/// itself, so anything reaching this conversion is a remote failure.
impl From<reqwest::Error> for ChatError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return Self::MalformedResponse(err.to_string());
        }
        Self::RemoteFailure {
            status: err.status().map(|s| s.as_u16()),
            message: err.to_string(),
        }
    }
}

impl From<anyhow::Error> for ChatError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// A type alias for `Result<T, ChatError>`.
pub type Result<T> = std::result::Result<T, ChatError>;
