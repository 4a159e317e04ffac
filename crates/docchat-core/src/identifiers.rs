//! Opaque identifiers assigned by the remote store.
//!
//! The backend emits integer primary keys, but the client never does arithmetic
//! on them. Every id is therefore kept as text; deserialization accepts either
//! a JSON number or a JSON string.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Int(i64),
    Text(String),
}

impl From<RawId> for String {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Int(n) => n.to_string(),
            RawId::Text(s) => s,
        }
    }
}

macro_rules! opaque_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id.to_string())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                RawId::deserialize(deserializer).map(|raw| Self(raw.into()))
            }
        }
    };
}

opaque_id!(
    /// Identifier of a chat session.
    SessionId
);
opaque_id!(
    /// Identifier of a message inside a session.
    MessageId
);
opaque_id!(
    /// Identifier of an uploaded document record.
    DocumentId
);
opaque_id!(
    /// Identifier of a user account.
    UserId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_from_number_and_string() {
        let from_int: SessionId = serde_json::from_str("42").unwrap();
        let from_text: SessionId = serde_json::from_str("\"42\"").unwrap();
        assert_eq!(from_int, from_text);
        assert_eq!(from_int.as_str(), "42");
    }

    #[test]
    fn test_serializes_as_string() {
        let id = MessageId::from(7);
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"7\"");
    }

    #[test]
    fn test_rejects_non_scalar() {
        assert!(serde_json::from_str::<DocumentId>("{\"id\": 1}").is_err());
    }
}
