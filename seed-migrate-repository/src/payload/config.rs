//! Connection settings for the Payload REST API.

use std::fmt;
use std::time::Duration;

use url::Url;

use crate::errors::ContentStoreError;

/// Default auth collection used to build the API key header.
pub const DEFAULT_AUTH_COLLECTION: &str = "users";

/// Default per-request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for [`PayloadClient`](super::PayloadClient).
#[derive(Clone)]
pub struct PayloadConfig {
    /// Root of the Payload server (e.g. `http://localhost:4001`). The REST
    /// API is expected under `/api`.
    pub base_url: Url,

    /// API key of a user in `auth_collection`. Requests are sent
    /// unauthenticated when absent.
    pub api_key: Option<String>,

    /// Slug of the auth-enabled collection that owns the API key.
    pub auth_collection: String,

    pub timeout: Duration,
}

impl PayloadConfig {
    /// Create a config for the given server URL with default settings.
    ///
    /// # Returns
    ///
    /// * `Ok(PayloadConfig)` - If the URL is valid
    /// * `Err(ContentStoreError)` - A connection error if the URL cannot be parsed
    pub fn new(base_url: &str) -> Result<Self, ContentStoreError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ContentStoreError::connection(format!("invalid Payload URL: {}", e)))?;

        Ok(Self {
            base_url,
            api_key: None,
            auth_collection: DEFAULT_AUTH_COLLECTION.to_string(),
            timeout: DEFAULT_REQUEST_TIMEOUT,
        })
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_auth_collection(mut self, auth_collection: impl Into<String>) -> Self {
        self.auth_collection = auth_collection.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

// The API key never reaches the logs.
impl fmt::Debug for PayloadConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PayloadConfig")
            .field("base_url", &self.base_url.as_str())
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("auth_collection", &self.auth_collection)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PayloadConfig::new("http://localhost:4001").unwrap();
        assert_eq!(config.base_url.as_str(), "http://localhost:4001/");
        assert_eq!(config.api_key, None);
        assert_eq!(config.auth_collection, "users");
        assert_eq!(config.timeout, DEFAULT_REQUEST_TIMEOUT);
    }

    #[test]
    fn test_invalid_url() {
        let err = PayloadConfig::new("not a url").unwrap_err();
        assert!(err.is_fatal());
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = PayloadConfig::new("http://localhost:4001")
            .unwrap()
            .with_api_key("super-secret");
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
