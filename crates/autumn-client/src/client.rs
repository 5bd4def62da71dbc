//! Autumn HTTP client implementation.

use reqwest::{header, Client, Method, RequestBuilder, StatusCode};
use serde::Deserialize;
use std::time::Duration;

use crate::config::ClientConfig;
use crate::customers::Customers;
use crate::error::ClientError;

/// Header used to pin the API version.
const API_VERSION_HEADER: &str = "x-api-version";

/// Autumn API client.
///
/// Cloning is cheap; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct AutumnClient {
    client: Client,
    base_url: String,
    secret_key: String,
    api_version: Option<String>,
}

/// Error body returned by the Autumn API.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
    code: String,
}

impl AutumnClient {
    /// Create a client for the production API.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is empty or the HTTP client cannot be built.
    pub fn new(secret_key: impl Into<String>) -> Result<Self, ClientError> {
        Self::from_config(ClientConfig::new(secret_key))
    }

    /// Create a client from environment variables (see [`ClientConfig::from_env`]).
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is missing or invalid.
    pub fn from_env() -> Result<Self, ClientError> {
        Self::from_config(ClientConfig::from_env()?)
    }

    /// Create a client from an explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the key or base URL is empty or the HTTP client
    /// cannot be built.
    pub fn from_config(config: ClientConfig) -> Result<Self, ClientError> {
        if config.secret_key.trim().is_empty() {
            return Err(ClientError::Configuration("secret key is empty".into()));
        }
        let base_url = config.base_url.trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(ClientError::Configuration("base URL is empty".into()));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(config.user_agent.clone())
            .build()?;

        tracing::debug!(
            base_url = %base_url,
            key = %config.redacted_key(),
            "Autumn client created"
        );

        Ok(Self {
            client,
            base_url,
            secret_key: config.secret_key,
            api_version: config.api_version,
        })
    }

    /// Access the customers resource.
    #[must_use]
    pub fn customers(&self) -> Customers<'_> {
        Customers::new(self)
    }

    /// Base URL requests are sent to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Start a request with authentication and version headers applied.
    pub(crate) fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{path}", self.base_url);
        tracing::debug!(%method, %url, "Sending Autumn request");

        let mut builder = self
            .client
            .request(method, url)
            .bearer_auth(&self.secret_key);

        if let Some(version) = &self.api_version {
            builder = builder.header(API_VERSION_HEADER, version);
        }

        builder
    }

    /// Send a request and decode the response.
    ///
    /// `customer_id` names the customer the request is about, so
    /// customer-specific error codes can carry it.
    pub(crate) async fn send<T: serde::de::DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        customer_id: Option<&str>,
    ) -> Result<T, ClientError> {
        let response = builder.send().await?;
        Self::handle_response(response, customer_id).await
    }

    /// Handle API response and convert errors.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
        customer_id: Option<&str>,
    ) -> Result<T, ClientError> {
        let status = response.status();

        if status.is_success() {
            let bytes = response.bytes().await?;
            return Ok(serde_json::from_slice(&bytes)?);
        }

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get(header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse().ok());
            tracing::warn!(?retry_after, "Autumn rate limit exceeded");
            return Err(ClientError::RateLimited { retry_after });
        }

        let error_body: Result<ApiErrorBody, _> = response.json().await;

        let err = match error_body {
            Ok(body) => Self::map_api_error(status, body, customer_id),
            Err(_) => ClientError::Api {
                status: status.as_u16(),
                code: "unknown".to_string(),
                message: format!("HTTP {status}"),
            },
        };

        tracing::warn!(status = status.as_u16(), error = %err, "Autumn request failed");
        Err(err)
    }

    fn map_api_error(
        status: StatusCode,
        body: ApiErrorBody,
        customer_id: Option<&str>,
    ) -> ClientError {
        let ApiErrorBody { message, code } = body;
        let customer_id = customer_id.map_or(message.clone(), str::to_string);

        match code.as_str() {
            "customer_not_found" => ClientError::CustomerNotFound { customer_id },
            "customer_already_exists" | "duplicate_customer_id" => {
                ClientError::CustomerAlreadyExists { customer_id }
            }
            _ => ClientError::Api {
                status: status.as_u16(),
                code,
                message,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_creation() {
        let client = AutumnClient::new("am_sk_test_key").unwrap();
        assert_eq!(client.base_url(), crate::config::DEFAULT_BASE_URL);
    }

    #[test]
    fn client_trims_trailing_slash() {
        let config = ClientConfig::new("am_sk_test_key").with_base_url("http://localhost:8080/v1/");
        let client = AutumnClient::from_config(config).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8080/v1");
    }

    #[test]
    fn client_rejects_empty_key() {
        let err = AutumnClient::new("").unwrap_err();
        assert!(matches!(err, ClientError::Configuration(_)));
    }

    #[test]
    fn client_rejects_empty_base_url() {
        let config = ClientConfig::new("am_sk_test_key").with_base_url("/");
        let err = AutumnClient::from_config(config).unwrap_err();
        assert!(matches!(err, ClientError::Configuration(_)));
    }

    #[test]
    fn maps_customer_error_codes() {
        let err = AutumnClient::map_api_error(
            StatusCode::NOT_FOUND,
            ApiErrorBody {
                message: "Customer user_1 not found".into(),
                code: "customer_not_found".into(),
            },
            Some("user_1"),
        );
        assert!(matches!(err, ClientError::CustomerNotFound { customer_id } if customer_id == "user_1"));

        let err = AutumnClient::map_api_error(
            StatusCode::CONFLICT,
            ApiErrorBody {
                message: "exists".into(),
                code: "duplicate_customer_id".into(),
            },
            None,
        );
        assert!(matches!(err, ClientError::CustomerAlreadyExists { customer_id } if customer_id == "exists"));

        let err = AutumnClient::map_api_error(
            StatusCode::BAD_REQUEST,
            ApiErrorBody {
                message: "bad".into(),
                code: "invalid_inputs".into(),
            },
            Some("user_1"),
        );
        assert!(matches!(err, ClientError::Api { status: 400, .. }));
    }
}
