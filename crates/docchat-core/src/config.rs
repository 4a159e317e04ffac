use serde::{Deserialize, Serialize};

/// Base URL used when neither the config file nor the environment sets one.
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Default address of the retrieval service.
pub const DEFAULT_RETRIEVAL_URL: &str = "http://localhost:8001";

/// Root of `config.toml`.
///
/// Every section is optional; missing keys fall back to their defaults.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Root URL of the remote store, without a trailing slash
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

/// `[retrieval]` section: the document search service.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct RetrievalConfig {
    #[serde(default = "default_retrieval_url")]
    pub base_url: String,
    /// Ingestion parses and embeds a whole file, so this is longer than the API timeout
    #[serde(default = "default_retrieval_timeout_secs")]
    pub timeout_secs: u64,
    /// Send every uploaded document to the index right after the upload
    #[serde(default = "default_true")]
    pub index_uploads: bool,
}

impl RetrievalConfig {
    /// Endpoint settings in the shape the HTTP client takes.
    pub fn endpoint(&self) -> ApiConfig {
        ApiConfig {
            base_url: self.base_url.clone(),
            timeout_secs: self.timeout_secs,
        }
    }
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            base_url: default_retrieval_url(),
            timeout_secs: default_retrieval_timeout_secs(),
            index_uploads: true,
        }
    }
}

fn default_retrieval_url() -> String {
    DEFAULT_RETRIEVAL_URL.to_string()
}

fn default_retrieval_timeout_secs() -> u64 {
    300
}

fn default_true() -> bool {
    true
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Default filter directive, overridden by `RUST_LOG`
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}
