//! Shared fixtures for REST adapter tests.
#![allow(dead_code)]

use docchat_core::config::ApiConfig;
use docchat_core::credential::{Credential, InMemoryCredentialStore};
use docchat_infrastructure::ApiClient;
use serde_json::{Value, json};
use std::sync::Arc;
use wiremock::MockServer;

pub const TOKEN: &str = "test-token";

/// Credential store holding [`TOKEN`].
pub fn logged_in() -> Arc<InMemoryCredentialStore> {
    Arc::new(InMemoryCredentialStore::with_credential(Credential::bearer(
        TOKEN,
    )))
}

pub fn client_for(server: &MockServer, credentials: Arc<InMemoryCredentialStore>) -> Arc<ApiClient> {
    let config = ApiConfig {
        base_url: server.uri(),
        timeout_secs: 5,
    };
    Arc::new(ApiClient::new(&config, credentials).unwrap())
}

pub fn session_json(id: i64, name: &str) -> Value {
    json!({ "id": id, "name": name, "created_at": "2024-05-01T09:00:00" })
}

pub fn message_json(id: i64, text: &str, origin: &str) -> Value {
    json!({ "id": id, "text": text, "origin": origin, "timestamp": "2024-05-01T09:01:00Z" })
}
