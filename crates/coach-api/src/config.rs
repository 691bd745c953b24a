use std::env;
use std::time::Duration;

/// Backend connection configuration.
///
/// Reads from the `COACH_API_URL` environment variable, falling back to
/// `http://localhost:8000` when unset.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL of the REST backend, without a trailing slash.
    pub base_url: String,
    /// Bearer token attached to every authenticated request.
    pub token: Option<String>,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl ApiConfig {
    /// The default base URL used when no environment variable is set.
    pub const DEFAULT_URL: &str = "http://localhost:8000";

    /// Default per-request timeout in seconds.
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

    /// Build a config from the environment.
    ///
    /// Priority: `COACH_API_URL` / `COACH_TOKEN` env vars, then defaults.
    pub fn from_env() -> Self {
        let base_url = env::var("COACH_API_URL").unwrap_or_else(|_| Self::DEFAULT_URL.to_owned());
        let token = env::var("COACH_TOKEN").ok().filter(|t| !t.is_empty());
        let mut config = Self::new(base_url);
        config.token = token;
        config
    }

    /// Build a config from an explicit URL (useful for tests and CLI flags).
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_owned(),
            token: None,
            timeout: Duration::from_secs(Self::DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Attach a bearer token.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Override the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Join a resource path onto the base URL.
    pub fn url_for(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::from_env()
    }
}
