//! Client configuration.
//!
//! `ClientConfig` is built once by the caller and owned by the client; there
//! is no process-wide default. Only the base URL consults the environment,
//! and only at construction time.

use std::env;
use std::fmt;

use crate::error::ConfigError;

/// Production API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.checklyhq.com";

/// Overrides the base URL, e.g. to point at a staging or mock server.
pub const BASE_URL_ENV: &str = "CHECKLY_API_URL";

/// Read by `ClientConfig::from_env`.
pub const API_KEY_ENV: &str = "CHECKLY_API_KEY";

#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    api_key: String,
    base_url: String,
}

impl ClientConfig {
    /// Config for `api_key`, using `CHECKLY_API_URL` as the base URL when set
    /// and the production endpoint otherwise.
    pub fn new(api_key: impl Into<String>) -> Self {
        let base_url = env::var(BASE_URL_ENV).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self {
            api_key: api_key.into(),
            base_url: normalize(&base_url),
        }
    }

    /// Like `new`, with the API key taken from `CHECKLY_API_KEY`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = env::var(API_KEY_ENV).map_err(|_| ConfigError::MissingApiKey(API_KEY_ENV))?;
        Ok(Self::new(api_key))
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = normalize(base_url);
        self
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

// Keeps the key out of logs.
impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

fn normalize(base_url: &str) -> String {
    base_url.trim_end_matches('/').to_string()
}
