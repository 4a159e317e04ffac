//! HTTP client for the remote message store.
//!
//! Every adapter goes through [`ApiClient`], which owns the three cross-cutting
//! rules of the REST contract:
//!
//! - Authenticated requests carry the current bearer credential; without one,
//!   the request is refused locally with `Unauthorized`
//! - A 401 response clears the stored credential and surfaces `Unauthorized`
//! - Any other non-2xx response surfaces `RemoteFailure` with the server's
//!   `detail` text

use docchat_core::config::ApiConfig;
use docchat_core::credential::CredentialStore;
use docchat_core::error::{ChatError, Result};
use reqwest::header::{AUTHORIZATION, HeaderValue};
use reqwest::multipart::Form;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

/// Header used to correlate client and server logs.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Auth {
    Required,
    Anonymous,
}

/// Shared REST client.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    credentials: Arc<dyn CredentialStore>,
}

impl ApiClient {
    /// Creates a client for `config.base_url`.
    pub fn new(config: &ApiConfig, credentials: Arc<dyn CredentialStore>) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ChatError::config(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            credentials,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn credentials(&self) -> &Arc<dyn CredentialStore> {
        &self.credentials
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    // ============================================================================
    // Typed helpers
    // ============================================================================

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.send(Method::GET, path, Auth::Required, |b| b).await?;
        decode(response).await
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let response = self
            .send(Method::POST, path, Auth::Required, |b| b.json(body))
            .await?;
        decode(response).await
    }

    /// POST without a body.
    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.send(Method::POST, path, Auth::Required, |b| b).await?;
        decode(response).await
    }

    /// Anonymous POST, used for registration.
    pub async fn post_anonymous<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let response = self
            .send(Method::POST, path, Auth::Anonymous, |b| b.json(body))
            .await?;
        decode(response).await
    }

    /// Anonymous form POST, used for login.
    pub async fn post_form<T: DeserializeOwned>(
        &self,
        path: &str,
        form: &[(&str, &str)],
    ) -> Result<T> {
        let response = self
            .send(Method::POST, path, Auth::Anonymous, |b| b.form(form))
            .await?;
        decode(response).await
    }

    /// Anonymous GET, for services that do not know about users.
    pub async fn get_anonymous<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.send(Method::GET, path, Auth::Anonymous, |b| b).await?;
        decode(response).await
    }

    pub async fn post_multipart_anonymous<T: DeserializeOwned>(
        &self,
        path: &str,
        form: Form,
    ) -> Result<T> {
        let response = self
            .send(Method::POST, path, Auth::Anonymous, |b| b.multipart(form))
            .await?;
        decode(response).await
    }

    pub async fn post_multipart<T: DeserializeOwned>(&self, path: &str, form: Form) -> Result<T> {
        let response = self
            .send(Method::POST, path, Auth::Required, |b| b.multipart(form))
            .await?;
        decode(response).await
    }

    pub async fn patch<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let response = self
            .send(Method::PATCH, path, Auth::Required, |b| b.json(body))
            .await?;
        decode(response).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.send(Method::DELETE, path, Auth::Required, |b| b).await?;
        decode(response).await
    }

    /// DELETE that only cares about the status; the body is ignored.
    pub async fn delete_unit(&self, path: &str) -> Result<()> {
        self.send(Method::DELETE, path, Auth::Required, |b| b)
            .await
            .map(|_| ())
    }

    // ============================================================================
    // Transport
    // ============================================================================

    async fn send(
        &self,
        method: Method,
        path: &str,
        auth: Auth,
        build: impl FnOnce(RequestBuilder) -> RequestBuilder,
    ) -> Result<Response> {
        let request_id = Uuid::new_v4().to_string();
        let mut builder = self
            .http
            .request(method.clone(), self.url(path))
            .header(REQUEST_ID_HEADER, &request_id);

        if auth == Auth::Required {
            let credential = self
                .credentials
                .get()
                .ok_or_else(|| ChatError::unauthorized("Not logged in"))?;
            let mut value = HeaderValue::from_str(&format!("Bearer {}", credential.access_token()))
                .map_err(|_| ChatError::unauthorized("Stored credential is not a valid header"))?;
            value.set_sensitive(true);
            builder = builder.header(AUTHORIZATION, value);
        }

        tracing::debug!("[ApiClient] {} {} ({})", method, path, request_id);
        let response = build(builder).send().await.map_err(|e| {
            tracing::warn!("[ApiClient] {} {} failed: {}", method, path, e);
            ChatError::from(e)
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let detail = error_detail(status, &body);
        tracing::debug!("[ApiClient] {} {} -> {} ({})", method, path, status, request_id);

        if status == StatusCode::UNAUTHORIZED {
            if auth == Auth::Required {
                tracing::info!("[ApiClient] Credential rejected, clearing it");
                if let Err(e) = self.credentials.clear() {
                    tracing::warn!("[ApiClient] Failed to clear credential: {}", e);
                }
            }
            return Err(ChatError::unauthorized(detail));
        }
        Err(ChatError::remote(Some(status.as_u16()), detail))
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes)
        .map_err(|e| ChatError::MalformedResponse(format!("unexpected response body: {e}")))
}

/// Extracts a readable message from an error body.
///
/// The backend reports errors as `{"detail": "..."}`; validation errors carry
/// a list of objects with a `msg` field instead.
fn error_detail(status: StatusCode, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        match value.get("detail") {
            Some(serde_json::Value::String(detail)) => return detail.clone(),
            Some(serde_json::Value::Array(items)) => {
                let messages: Vec<&str> = items
                    .iter()
                    .filter_map(|item| item.get("msg").and_then(|m| m.as_str()))
                    .collect();
                if !messages.is_empty() {
                    return messages.join("; ");
                }
            }
            _ => {}
        }
    }
    let body = body.trim();
    if body.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string()
    } else {
        body.to_string()
    }
}
