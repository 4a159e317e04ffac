//! In-memory stand-ins for the remote store, used by unit tests across the
//! workspace. Enabled in other crates through the `testing` feature.

use crate::auth::{AuthService, Registration};
use crate::credential::Credential;
use crate::document::{Document, DocumentStore};
use crate::error::{ChatError, Result};
use crate::identifiers::{DocumentId, MessageId, SessionId, UserId};
use crate::retrieval::{DocumentIndex, IndexHealth, RetrievedChunk};
use crate::session::{Message, MessageOrigin, Session, SessionStore};
use crate::user::{UserDirectory, UserProfile};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

#[derive(Default)]
struct SessionStoreState {
    sessions: Vec<Session>,
    messages: Vec<(SessionId, Message)>,
    next_id: u64,
    fail_next: Option<ChatError>,
}

/// Session store that keeps everything in memory.
///
/// Every trait call increments [`call_count`](Self::call_count), so tests can
/// assert that an operation stayed local.
pub struct MockSessionStore {
    state: Mutex<SessionStoreState>,
    authorized: AtomicBool,
    calls: AtomicUsize,
}

impl Default for MockSessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MockSessionStore {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(SessionStoreState {
                next_id: 1000,
                ..Default::default()
            }),
            authorized: AtomicBool::new(true),
            calls: AtomicUsize::new(0),
        }
    }

    /// Seeds `(id, name)` pairs in listing order.
    pub fn with_sessions(sessions: &[(&str, &str)]) -> Self {
        let store = Self::new();
        {
            let mut state = store.state.lock().unwrap();
            state.sessions = sessions
                .iter()
                .map(|(id, name)| Session {
                    id: SessionId::from(*id),
                    name: name.to_string(),
                    created_at: Utc::now(),
                })
                .collect();
        }
        store
    }

    pub fn seed_message(&self, session_id: &SessionId, text: &str, origin: MessageOrigin) {
        let mut state = self.state.lock().unwrap();
        let message = Self::new_message(&mut state, text, origin);
        state.messages.push((session_id.clone(), message));
    }

    /// Removes a session behind the engine's back.
    pub fn remove_remote(&self, session_id: &SessionId) {
        let mut state = self.state.lock().unwrap();
        state.sessions.retain(|s| &s.id != session_id);
        state.messages.retain(|(id, _)| id != session_id);
    }

    /// Makes every following call fail with `Unauthorized` when `false`.
    pub fn set_authorized(&self, authorized: bool) {
        self.authorized.store(authorized, Ordering::SeqCst);
    }

    /// Makes the next call fail with `err`.
    pub fn fail_next(&self, err: ChatError) {
        self.state.lock().unwrap().fail_next = Some(err);
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn new_message(state: &mut SessionStoreState, text: &str, origin: MessageOrigin) -> Message {
        state.next_id += 1;
        Message {
            id: MessageId::from(state.next_id.to_string()),
            text: text.to_string(),
            timestamp: Utc::now(),
            origin,
        }
    }

    fn begin(&self) -> Result<std::sync::MutexGuard<'_, SessionStoreState>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.authorized.load(Ordering::SeqCst) {
            return Err(ChatError::unauthorized("Could not validate credentials"));
        }
        let mut state = self
            .state
            .lock()
            .map_err(|e| ChatError::internal(e.to_string()))?;
        if let Some(err) = state.fail_next.take() {
            return Err(err);
        }
        Ok(state)
    }
}

#[async_trait]
impl SessionStore for MockSessionStore {
    async fn list_sessions(&self) -> Result<Vec<Session>> {
        Ok(self.begin()?.sessions.clone())
    }

    async fn create_session(&self, name: &str) -> Result<Session> {
        let mut state = self.begin()?;
        state.next_id += 1;
        let session = Session {
            id: SessionId::from(state.next_id.to_string()),
            name: name.trim().to_string(),
            created_at: Utc::now(),
        };
        state.sessions.insert(0, session.clone());
        Ok(session)
    }

    async fn rename_session(&self, session_id: &SessionId, name: &str) -> Result<Session> {
        let mut state = self.begin()?;
        let session = state
            .sessions
            .iter_mut()
            .find(|s| &s.id == session_id)
            .ok_or_else(|| ChatError::remote(Some(404), "Session not found"))?;
        session.name = name.trim().to_string();
        Ok(session.clone())
    }

    async fn delete_session(&self, session_id: &SessionId) -> Result<()> {
        let mut state = self.begin()?;
        let before = state.sessions.len();
        state.sessions.retain(|s| &s.id != session_id);
        if state.sessions.len() == before {
            return Err(ChatError::remote(Some(404), "Session not found"));
        }
        state.messages.retain(|(id, _)| id != session_id);
        Ok(())
    }

    async fn list_messages(&self, session_id: &SessionId) -> Result<Vec<Message>> {
        let state = self.begin()?;
        Ok(state
            .messages
            .iter()
            .filter(|(id, _)| id == session_id)
            .map(|(_, m)| m.clone())
            .collect())
    }

    async fn create_message(
        &self,
        session_id: &SessionId,
        text: &str,
        origin: MessageOrigin,
    ) -> Result<Message> {
        let mut state = self.begin()?;
        if !state.sessions.iter().any(|s| &s.id == session_id) {
            return Err(ChatError::remote(Some(404), "Session not found"));
        }
        let message = Self::new_message(&mut state, text, origin);
        state.messages.push((session_id.clone(), message.clone()));
        Ok(message)
    }
}

/// Builds a profile for tests.
pub fn profile(id: &str, username: &str, is_approved: bool, is_admin: bool) -> UserProfile {
    UserProfile {
        id: UserId::from(id),
        username: username.to_string(),
        email: format!("{username}@example.com"),
        is_active: true,
        is_approved,
        is_admin,
    }
}

/// User directory backed by a list of profiles.
///
/// `current_user` fails with `Unauthorized` while no current user is set.
pub struct MockUserDirectory {
    users: Mutex<Vec<UserProfile>>,
    current: Mutex<Option<UserId>>,
    mutations: AtomicUsize,
}

impl MockUserDirectory {
    pub fn new(users: Vec<UserProfile>, current: Option<&str>) -> Self {
        Self {
            users: Mutex::new(users),
            current: Mutex::new(current.map(UserId::from)),
            mutations: AtomicUsize::new(0),
        }
    }

    pub fn set_current(&self, current: Option<&str>) {
        *self.current.lock().unwrap() = current.map(UserId::from);
    }

    /// Number of approve/disapprove calls that reached the store.
    pub fn mutation_count(&self) -> usize {
        self.mutations.load(Ordering::SeqCst)
    }

    fn set_approved(&self, user_id: &UserId, approved: bool) -> Result<UserProfile> {
        self.mutations.fetch_add(1, Ordering::SeqCst);
        let mut users = self.users.lock().unwrap();
        let user = users
            .iter_mut()
            .find(|u| &u.id == user_id)
            .ok_or_else(|| ChatError::remote(Some(404), "User not found"))?;
        user.is_approved = approved;
        Ok(user.clone())
    }
}

#[async_trait]
impl UserDirectory for MockUserDirectory {
    async fn current_user(&self) -> Result<UserProfile> {
        let current = self.current.lock().unwrap().clone();
        let id = current.ok_or_else(|| ChatError::unauthorized("Could not validate credentials"))?;
        self.users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id == id)
            .cloned()
            .ok_or_else(|| ChatError::unauthorized("Could not validate credentials"))
    }

    async fn list_users(&self) -> Result<Vec<UserProfile>> {
        Ok(self.users.lock().unwrap().clone())
    }

    async fn approve_user(&self, user_id: &UserId) -> Result<UserProfile> {
        self.set_approved(user_id, true)
    }

    async fn disapprove_user(&self, user_id: &UserId) -> Result<UserProfile> {
        self.set_approved(user_id, false)
    }
}

/// Document store backed by a vector.
#[derive(Default)]
pub struct MockDocumentStore {
    documents: Mutex<Vec<Document>>,
    uploads: AtomicUsize,
}

impl MockDocumentStore {
    pub fn with_documents(count: usize) -> Self {
        let documents = (0..count)
            .map(|i| Document {
                id: DocumentId::from(i as i64 + 1),
                file_name: format!("doc-{}.pdf", i + 1),
                uploaded_at: Utc::now(),
            })
            .collect();
        Self {
            documents: Mutex::new(documents),
            uploads: AtomicUsize::new(0),
        }
    }

    pub fn upload_count(&self) -> usize {
        self.uploads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DocumentStore for MockDocumentStore {
    async fn list_documents(&self) -> Result<Vec<Document>> {
        Ok(self.documents.lock().unwrap().clone())
    }

    async fn upload_document(&self, file_name: &str, _bytes: Vec<u8>) -> Result<Document> {
        self.uploads.fetch_add(1, Ordering::SeqCst);
        let mut documents = self.documents.lock().unwrap();
        let document = Document {
            id: DocumentId::from(documents.len() as i64 + 100),
            file_name: file_name.to_string(),
            uploaded_at: Utc::now(),
        };
        documents.push(document.clone());
        Ok(document)
    }

    async fn delete_document(&self, document_id: &DocumentId) -> Result<Document> {
        let mut documents = self.documents.lock().unwrap();
        let index = documents
            .iter()
            .position(|d| &d.id == document_id)
            .ok_or_else(|| ChatError::remote(Some(404), "Document not found or not owned by user"))?;
        Ok(documents.remove(index))
    }
}

/// Auth service that accepts a single username/password pair.
pub struct MockAuthService {
    username: String,
    password: String,
    approved: bool,
}

impl MockAuthService {
    pub fn new(username: &str, password: &str, approved: bool) -> Self {
        Self {
            username: username.to_string(),
            password: password.to_string(),
            approved,
        }
    }
}

#[async_trait]
impl AuthService for MockAuthService {
    async fn login(&self, username: &str, password: &str) -> Result<Credential> {
        if username != self.username || password != self.password {
            return Err(ChatError::unauthorized("Incorrect username or password"));
        }
        if !self.approved {
            return Err(ChatError::remote(Some(403), "Account pending approval"));
        }
        Ok(Credential::bearer(format!("token-{username}")))
    }

    async fn register(&self, registration: &Registration) -> Result<UserProfile> {
        Ok(profile("99", &registration.username, false, false))
    }
}

/// Index that keeps ingested file names and answers every query with one
/// chunk per ingested file.
#[derive(Default)]
pub struct MockDocumentIndex {
    ingested: Mutex<Vec<String>>,
    queries: AtomicUsize,
    fail_ingest: AtomicBool,
}

impl MockDocumentIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every `ingest` fail with a 500.
    pub fn set_failing(&self, failing: bool) {
        self.fail_ingest.store(failing, Ordering::SeqCst);
    }

    pub fn ingested(&self) -> Vec<String> {
        self.ingested.lock().unwrap().clone()
    }

    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DocumentIndex for MockDocumentIndex {
    async fn ingest(&self, file_name: &str, _bytes: Vec<u8>) -> Result<()> {
        if self.fail_ingest.load(Ordering::SeqCst) {
            return Err(ChatError::remote(Some(500), "embedding model not loaded"));
        }
        self.ingested.lock().unwrap().push(file_name.to_string());
        Ok(())
    }

    async fn query(&self, query: &str, top_k: usize) -> Result<Vec<RetrievedChunk>> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .ingested
            .lock()
            .unwrap()
            .iter()
            .take(top_k)
            .enumerate()
            .map(|(i, file_name)| RetrievedChunk {
                text: format!("{query} in {file_name}"),
                file_name: Some(file_name.clone()),
                chunk_index: Some(0),
                total_chunks: Some(1),
                distance: i as f32,
            })
            .collect())
    }

    async fn health(&self) -> Result<IndexHealth> {
        Ok(IndexHealth {
            status: "healthy".to_string(),
            device: "cpu".to_string(),
            chunks_indexed: self.ingested.lock().unwrap().len() as u64,
        })
    }
}
