//! Integration tests for login, users and documents over REST.

mod common;

use common::{client_for, logged_in};
use docchat_core::auth::{AuthService, Registration};
use docchat_core::credential::{CredentialStore, InMemoryCredentialStore};
use docchat_core::document::DocumentStore;
use docchat_core::user::UserDirectory;
use docchat_infrastructure::{RestAuthService, RestDocumentStore, RestUserDirectory};
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_login_posts_form_without_credential() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string_contains("username=ann"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "access_token": "jwt-abc", "token_type": "bearer" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let auth = RestAuthService::new(client_for(&server, Arc::new(InMemoryCredentialStore::new())));
    let credential = auth.login("ann", "secret").await.unwrap();

    assert_eq!(credential.access_token(), "jwt-abc");
}

#[tokio::test]
async fn test_login_pending_approval_is_403() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({ "detail": "Account pending approval" })))
        .mount(&server)
        .await;

    let auth = RestAuthService::new(client_for(&server, Arc::new(InMemoryCredentialStore::new())));
    let err = auth.login("ann", "secret").await.unwrap_err();

    assert_eq!(err.status(), Some(403));
    assert!(err.to_string().contains("pending approval"));
}

#[tokio::test]
async fn test_login_wrong_password_is_unauthorized() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "detail": "Incorrect username or password" })),
        )
        .mount(&server)
        .await;

    let auth = RestAuthService::new(client_for(&server, Arc::new(InMemoryCredentialStore::new())));
    assert!(auth.login("ann", "nope").await.unwrap_err().is_unauthorized());
}

#[tokio::test]
async fn test_register_returns_unapproved_profile() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/register"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 12, "username": "bob", "email": "bob@example.com",
            "is_active": true, "is_approved": false, "is_admin": false
        })))
        .mount(&server)
        .await;

    let auth = RestAuthService::new(client_for(&server, Arc::new(InMemoryCredentialStore::new())));
    let profile = auth
        .register(&Registration {
            username: "bob".to_string(),
            email: "bob@example.com".to_string(),
            password: "pw".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(profile.id.as_str(), "12");
    assert!(!profile.can_log_in());
}

#[tokio::test]
async fn test_approve_user() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/approve_user/12"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 12, "username": "bob", "email": "bob@example.com",
            "is_active": true, "is_approved": true, "is_admin": false
        })))
        .expect(1)
        .mount(&server)
        .await;

    let users = RestUserDirectory::new(client_for(&server, logged_in()));
    let profile = users.approve_user(&"12".into()).await.unwrap();

    assert!(profile.is_approved);
}

#[tokio::test]
async fn test_upload_sends_multipart_file() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload"))
        .and(body_string_contains("filename=\"report.pdf\""))
        .and(body_string_contains("name=\"file\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 4, "file_name": "report.pdf", "uploaded_at": "2024-05-01T10:00:00.5"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let documents = RestDocumentStore::new(client_for(&server, logged_in()));
    let document = documents
        .upload_document("report.pdf", b"%PDF-1.4".to_vec())
        .await
        .unwrap();

    assert_eq!(document.id.as_str(), "4");
    assert_eq!(document.file_name, "report.pdf");
}

#[tokio::test]
async fn test_delete_missing_document_is_404() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/documents/77"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "detail": "Document not found or not owned by user"
        })))
        .mount(&server)
        .await;

    let documents = RestDocumentStore::new(client_for(&server, logged_in()));
    let err = documents.delete_document(&"77".into()).await.unwrap_err();

    assert_eq!(err.status(), Some(404));
}

#[tokio::test]
async fn test_current_user_401_clears_credential() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/me"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "detail": "Could not validate credentials" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let credentials = logged_in();
    let users = RestUserDirectory::new(client_for(&server, credentials.clone()));
    let err = users.current_user().await.unwrap_err();

    assert!(err.is_unauthorized());
    assert!(credentials.get().is_none());
}
