//! Data Transfer Objects (DTOs) for the REST contract.
//!
//! These DTOs mirror the JSON bodies exchanged with the remote store. They are
//! private to the infrastructure layer and converted into domain types with
//! `TryFrom`; anything that does not fit the contract becomes
//! `ChatError::MalformedResponse`.
//!
//! The backend has used different field names over time (`session_name`,
//! `message_text`, `is_user`), so the response DTOs accept both spellings.

use chrono::{DateTime, NaiveDateTime, Utc};
use docchat_core::credential::Credential;
use docchat_core::document::Document;
use docchat_core::error::ChatError;
use docchat_core::identifiers::{DocumentId, MessageId, SessionId, UserId};
use docchat_core::retrieval::{IndexHealth, RetrievedChunk};
use docchat_core::session::{Message, MessageOrigin, Session};
use docchat_core::user::UserProfile;
use serde::{Deserialize, Serialize};

/// Parses a server timestamp.
///
/// Accepts RFC 3339 and the offset-less ISO 8601 form the backend emits for
/// UTC columns.
pub fn parse_timestamp(field: &str, raw: &str) -> Result<DateTime<Utc>, ChatError> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|e| ChatError::MalformedResponse(format!("invalid {field} '{raw}': {e}")))
}

/// The backend always stamps sessions and messages; a missing stamp means the
/// body is not ours.
fn required_timestamp(field: &str, raw: Option<&str>) -> Result<DateTime<Utc>, ChatError> {
    match raw {
        Some(raw) => parse_timestamp(field, raw),
        None => Err(ChatError::MalformedResponse(format!("missing {field}"))),
    }
}

// ============================================================================
// Sessions
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct SessionDto {
    pub id: SessionId,
    #[serde(alias = "session_name")]
    pub name: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl TryFrom<SessionDto> for Session {
    type Error = ChatError;

    fn try_from(dto: SessionDto) -> Result<Self, Self::Error> {
        if dto.id.as_str().is_empty() {
            return Err(ChatError::MalformedResponse("session without id".to_string()));
        }
        Ok(Session {
            created_at: required_timestamp("created_at", dto.created_at.as_deref())?,
            id: dto.id,
            name: dto.name,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionNameRequest<'a> {
    pub name: &'a str,
}

// ============================================================================
// Messages
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct MessageDto {
    pub id: MessageId,
    #[serde(alias = "message_text")]
    pub text: String,
    #[serde(default, alias = "created_at")]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub origin: Option<MessageOrigin>,
    #[serde(default)]
    pub is_user: Option<bool>,
}

impl TryFrom<MessageDto> for Message {
    type Error = ChatError;

    fn try_from(dto: MessageDto) -> Result<Self, Self::Error> {
        let origin = match (dto.origin, dto.is_user) {
            (Some(origin), _) => origin,
            (None, Some(true)) => MessageOrigin::User,
            (None, Some(false)) => MessageOrigin::Assistant,
            (None, None) => {
                return Err(ChatError::MalformedResponse(format!(
                    "message {} has no origin",
                    dto.id
                )));
            }
        };
        Ok(Message {
            timestamp: required_timestamp("timestamp", dto.timestamp.as_deref())?,
            id: dto.id,
            text: dto.text,
            origin,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateMessageRequest<'a> {
    pub text: &'a str,
    pub origin: MessageOrigin,
}

// ============================================================================
// Users and auth
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct UserDto {
    pub id: UserId,
    pub username: String,
    pub email: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub is_approved: bool,
    #[serde(default)]
    pub is_admin: bool,
}

fn default_true() -> bool {
    true
}

impl From<UserDto> for UserProfile {
    fn from(dto: UserDto) -> Self {
        UserProfile {
            id: dto.id,
            username: dto.username,
            email: dto.email,
            is_active: dto.is_active,
            is_approved: dto.is_approved,
            is_admin: dto.is_admin,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenDto {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
}

impl TryFrom<TokenDto> for Credential {
    type Error = ChatError;

    fn try_from(dto: TokenDto) -> Result<Self, Self::Error> {
        if dto.access_token.is_empty() {
            return Err(ChatError::MalformedResponse("empty access token".to_string()));
        }
        Ok(match dto.token_type {
            Some(token_type) => Credential::new(dto.access_token, token_type),
            None => Credential::bearer(dto.access_token),
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

// ============================================================================
// Documents
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct DocumentDto {
    pub id: DocumentId,
    pub file_name: String,
    pub uploaded_at: String,
}

impl TryFrom<DocumentDto> for Document {
    type Error = ChatError;

    fn try_from(dto: DocumentDto) -> Result<Self, Self::Error> {
        Ok(Document {
            uploaded_at: parse_timestamp("uploaded_at", &dto.uploaded_at)?,
            id: dto.id,
            file_name: dto.file_name,
        })
    }
}

// ============================================================================
// Retrieval
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct QueryRequest<'a> {
    pub query: &'a str,
    pub top_k: usize,
}

/// A search hit: the chunk's stored metadata plus its distance.
///
/// The metadata carries more keys (`source`, `chunk_id`, `file_type`) that
/// the client does not use.
#[derive(Debug, Clone, Deserialize)]
pub struct ChunkDto {
    pub text: String,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub chunk_index: Option<u32>,
    #[serde(default)]
    pub total_chunks: Option<u32>,
    pub distance: f32,
}

impl From<ChunkDto> for RetrievedChunk {
    fn from(dto: ChunkDto) -> Self {
        RetrievedChunk {
            text: dto.text,
            file_name: dto.filename,
            chunk_index: dto.chunk_index,
            total_chunks: dto.total_chunks,
            distance: dto.distance,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct QueryResponseDto {
    pub results: Vec<ChunkDto>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IngestResponseDto {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HealthDto {
    pub status: String,
    #[serde(default, alias = "cuda_available")]
    pub device: String,
    #[serde(default)]
    pub documents_indexed: u64,
}

impl From<HealthDto> for IndexHealth {
    fn from(dto: HealthDto) -> Self {
        IndexHealth {
            status: dto.status,
            device: dto.device,
            chunks_indexed: dto.documents_indexed,
        }
    }
}

/// Converts every DTO of a list, failing on the first malformed entry.
pub fn convert_all<D, T>(dtos: Vec<D>) -> Result<Vec<T>, ChatError>
where
    T: TryFrom<D, Error = ChatError>,
{
    dtos.into_iter().map(T::try_from).collect()
}
