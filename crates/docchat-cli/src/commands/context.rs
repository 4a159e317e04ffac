use anyhow::{Context, Result};
use docchat_application::{AuthUseCase, DocumentUseCase, RetrievalUseCase, UserApprovalUseCase};
use docchat_core::config::ClientConfig;
use docchat_core::session::SessionEngine;
use docchat_infrastructure::{
    ApiClient, ConfigService, DocchatPaths, FileCredentialStore, RestAuthService,
    RestDocumentIndex, RestDocumentStore, RestSessionStore, RestUserDirectory,
};
use std::sync::Arc;

/// Wiring shared by every command.
pub struct AppContext {
    pub config: ClientConfig,
    pub credentials: Arc<FileCredentialStore>,
    client: Arc<ApiClient>,
    retrieval_client: Arc<ApiClient>,
}

impl AppContext {
    /// Loads config and credential, applying the `--api-url` override last.
    pub fn load(api_url: Option<&str>) -> Result<Self> {
        let paths = DocchatPaths::from_env();
        let mut config = ConfigService::from_paths(&paths)?.get_config()?;
        if let Some(url) = api_url {
            config.api.base_url = url.trim_end_matches('/').to_string();
        }

        let credential_path = paths
            .credential_file()
            .context("Failed to resolve credential path")?;
        let credentials = Arc::new(FileCredentialStore::open(credential_path));
        let client = Arc::new(ApiClient::new(&config.api, credentials.clone())?);
        let retrieval_client = Arc::new(ApiClient::new(
            &config.retrieval.endpoint(),
            credentials.clone(),
        )?);

        Ok(Self {
            config,
            credentials,
            client,
            retrieval_client,
        })
    }

    pub fn session_engine(&self) -> SessionEngine {
        SessionEngine::new(Arc::new(RestSessionStore::new(self.client.clone())))
    }

    pub fn auth(&self) -> AuthUseCase {
        AuthUseCase::new(
            Arc::new(RestAuthService::new(self.client.clone())),
            Arc::new(RestUserDirectory::new(self.client.clone())),
            self.credentials.clone(),
        )
    }

    pub fn documents(&self) -> DocumentUseCase {
        let documents = DocumentUseCase::new(Arc::new(RestDocumentStore::new(self.client.clone())));
        if self.config.retrieval.index_uploads {
            documents.with_index(self.document_index())
        } else {
            documents
        }
    }

    pub fn retrieval(&self) -> RetrievalUseCase {
        RetrievalUseCase::new(self.document_index())
    }

    fn document_index(&self) -> Arc<RestDocumentIndex> {
        Arc::new(RestDocumentIndex::new(self.retrieval_client.clone()))
    }

    pub fn approvals(&self) -> UserApprovalUseCase {
        UserApprovalUseCase::new(Arc::new(RestUserDirectory::new(self.client.clone())))
    }
}
