pub mod client;
pub mod config_service;
pub mod dto;
pub mod paths;
pub mod rest_auth_service;
pub mod rest_document_index;
pub mod rest_document_store;
pub mod rest_session_store;
pub mod rest_user_directory;
pub mod storage;

pub use crate::client::ApiClient;
pub use crate::config_service::ConfigService;
pub use crate::paths::DocchatPaths;
pub use crate::rest_auth_service::RestAuthService;
pub use crate::rest_document_index::RestDocumentIndex;
pub use crate::rest_document_store::RestDocumentStore;
pub use crate::rest_session_store::RestSessionStore;
pub use crate::rest_user_directory::RestUserDirectory;
pub use crate::storage::FileCredentialStore;
