//! Client configuration.

use std::fmt;

use crate::error::ClientError;

/// Production API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.useautumn.com/v1";

/// Default request timeout.
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

/// Environment variable holding the secret key.
pub const ENV_SECRET_KEY: &str = "AUTUMN_SECRET_KEY";

/// Environment variable overriding the API endpoint.
pub const ENV_BASE_URL: &str = "AUTUMN_BASE_URL";

/// Environment variable pinning the API version.
pub const ENV_API_VERSION: &str = "AUTUMN_API_VERSION";

/// Environment variable overriding the request timeout.
pub const ENV_TIMEOUT_SECONDS: &str = "AUTUMN_TIMEOUT_SECONDS";

/// Client configuration.
#[derive(Clone)]
pub struct ClientConfig {
    /// Secret API key, sent as a bearer token.
    pub secret_key: String,

    /// API base URL including the version prefix (default: [`DEFAULT_BASE_URL`]).
    pub base_url: String,

    /// Value for the `x-api-version` header, if pinned.
    pub api_version: Option<String>,

    /// Request timeout in seconds (default: 30).
    pub timeout_seconds: u64,

    /// User agent sent with every request.
    pub user_agent: String,
}

impl ClientConfig {
    /// Create a configuration with default settings for the given key.
    #[must_use]
    pub fn new(secret_key: impl Into<String>) -> Self {
        Self {
            secret_key: secret_key.into(),
            base_url: DEFAULT_BASE_URL.into(),
            api_version: None,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            user_agent: concat!("autumn-rust/", env!("CARGO_PKG_VERSION")).into(),
        }
    }

    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Configuration`] if `AUTUMN_SECRET_KEY` is unset
    /// or empty, or if `AUTUMN_TIMEOUT_SECONDS` is not a number.
    pub fn from_env() -> Result<Self, ClientError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Same as [`ClientConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ClientError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let secret_key = get(ENV_SECRET_KEY).ok_or_else(|| {
            ClientError::Configuration(format!("{ENV_SECRET_KEY} is not set"))
        })?;

        let mut config = Self::new(secret_key);

        if let Some(base_url) = get(ENV_BASE_URL) {
            config.base_url = base_url;
        }
        config.api_version = get(ENV_API_VERSION);
        if let Some(raw) = get(ENV_TIMEOUT_SECONDS) {
            config.timeout_seconds = raw.trim().parse().map_err(|_| {
                ClientError::Configuration(format!(
                    "{ENV_TIMEOUT_SECONDS} must be a whole number of seconds, got {raw:?}"
                ))
            })?;
        }

        tracing::debug!(
            base_url = %config.base_url,
            api_version = ?config.api_version,
            timeout_seconds = config.timeout_seconds,
            "Client configuration loaded from environment"
        );

        Ok(config)
    }

    /// Override the API base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Pin the API version.
    #[must_use]
    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = Some(version.into());
        self
    }

    /// Override the request timeout.
    #[must_use]
    pub fn with_timeout_seconds(mut self, seconds: u64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    /// The secret key with everything but its prefix masked.
    #[must_use]
    pub fn redacted_key(&self) -> String {
        let prefix: String = self.secret_key.chars().take(6).collect();
        if self.secret_key.chars().count() <= 6 {
            return "****".into();
        }
        format!("{prefix}****")
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("secret_key", &self.redacted_key())
            .field("base_url", &self.base_url)
            .field("api_version", &self.api_version)
            .field("timeout_seconds", &self.timeout_seconds)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn from_lookup_requires_secret_key() {
        let err = ClientConfig::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, ClientError::Configuration(_)));

        let err = ClientConfig::from_lookup(lookup(&[(ENV_SECRET_KEY, "  ")])).unwrap_err();
        assert!(matches!(err, ClientError::Configuration(_)));
    }

    #[test]
    fn from_lookup_defaults() {
        let config = ClientConfig::from_lookup(lookup(&[(ENV_SECRET_KEY, "am_sk_test_1")])).unwrap();
        assert_eq!(config.secret_key, "am_sk_test_1");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.api_version, None);
        assert_eq!(config.timeout_seconds, DEFAULT_TIMEOUT_SECONDS);
        assert!(config.user_agent.starts_with("autumn-rust/"));
    }

    #[test]
    fn from_lookup_overrides() {
        let config = ClientConfig::from_lookup(lookup(&[
            (ENV_SECRET_KEY, "am_sk_test_1"),
            (ENV_BASE_URL, "http://localhost:8080/v1"),
            (ENV_API_VERSION, "1.2"),
            (ENV_TIMEOUT_SECONDS, "5"),
        ]))
        .unwrap();
        assert_eq!(config.base_url, "http://localhost:8080/v1");
        assert_eq!(config.api_version.as_deref(), Some("1.2"));
        assert_eq!(config.timeout_seconds, 5);
    }

    #[test]
    fn from_lookup_rejects_bad_timeout() {
        let err = ClientConfig::from_lookup(lookup(&[
            (ENV_SECRET_KEY, "am_sk_test_1"),
            (ENV_TIMEOUT_SECONDS, "soon"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ClientError::Configuration(_)));
    }

    #[test]
    fn debug_redacts_secret() {
        let config = ClientConfig::new("am_sk_live_supersecret");
        let debug = format!("{config:?}");
        assert!(!debug.contains("supersecret"));
        assert!(debug.contains("am_sk_****"));
        assert_eq!(ClientConfig::new("short").redacted_key(), "****");
    }
}
