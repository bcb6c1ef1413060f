//! Client configuration.
//!
//! The backend endpoint is an explicit value passed at construction rather
//! than ambient global state. `from_env` exists for the binary; tests and
//! library users construct the config directly.

/// Environment variable that overrides the API endpoint.
pub const API_ENDPOINT_ENV: &str = "TRIAGEFLOW_API_ENDPOINT";

/// Default API endpoint for a locally running backend.
pub const DEFAULT_API_ENDPOINT: &str = "http://localhost:8000/api";

/// Configuration for the TriageFlow client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Base URL of the TriageFlow backend API.
    pub api_endpoint: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_endpoint: DEFAULT_API_ENDPOINT.to_string(),
        }
    }
}

impl AppConfig {
    /// Create a config with the default endpoint.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a config from the environment, falling back to the default
    /// endpoint when `TRIAGEFLOW_API_ENDPOINT` is unset or empty.
    pub fn from_env() -> Self {
        match std::env::var(API_ENDPOINT_ENV) {
            Ok(endpoint) if !endpoint.trim().is_empty() => Self {
                api_endpoint: endpoint.trim().to_string(),
            },
            _ => Self::default(),
        }
    }

    /// Set the API endpoint.
    pub fn with_api_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.api_endpoint = endpoint.into();
        self
    }

    /// Resolve a relative API path against the endpoint, normalizing the
    /// slash between them.
    pub fn url_for(&self, path: &str) -> String {
        let base = self.api_endpoint.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{}/{}", base, path)
    }
}
