//! HTTP client for the swap-station list endpoint.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client};
use tracing::debug;

use crate::config::Config;

use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// Public swap-station list endpoint
pub const DEFAULT_ENDPOINT: &str = "https://webapi.gogoro.com/api/vm/list";

/// HTTP request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

const USER_AGENT: &str = concat!("grmap/", env!("CARGO_PKG_VERSION"));

/// Something that can produce the raw station list body.
///
/// The body is returned undecoded; callers decide what a malformed body
/// means for them.
#[async_trait]
pub trait StationSource: Send + Sync {
    /// Fetch the response body. `Ok(None)` means the request succeeded but
    /// carried no body.
    async fn fetch_body(&self) -> Result<Option<Vec<u8>>, ApiError>;
}

/// API client for the station list.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    endpoint: String,
}

impl ApiClient {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    /// Create a client for the endpoint and timeout in `config`
    pub fn from_config(config: &Config) -> Result<Self, ApiError> {
        Self::new(
            config.endpoint.clone(),
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }
}

#[async_trait]
impl StationSource for ApiClient {
    async fn fetch_body(&self) -> Result<Option<Vec<u8>>, ApiError> {
        let response = self
            .client
            .get(&self.endpoint)
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;

        let response = Self::check_response(response).await?;
        let body = response.bytes().await?;
        debug!(url = %self.endpoint, bytes = body.len(), "Station list response received");

        if body.is_empty() {
            Ok(None)
        } else {
            Ok(Some(body.to_vec()))
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const LIST_PATH: &str = "/api/vm/list";

    fn client_for(server: &MockServer) -> ApiClient {
        ApiClient::new(format!("{}{}", server.uri(), LIST_PATH), Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_body_returns_bytes() {
        let server = MockServer::start().await;
        let body = r#"[{"Id":"A1","Latitude":25.03,"Longitude":121.56}]"#;
        Mock::given(method("GET"))
            .and(path(LIST_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let fetched = client.fetch_body().await.unwrap();
        assert_eq!(fetched, Some(body.as_bytes().to_vec()));
    }

    #[tokio::test]
    async fn test_empty_body_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(LIST_PATH))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let client = client_for(&server);
        assert_eq!(client.fetch_body().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_server_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(LIST_PATH))
            .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
            .mount(&server)
            .await;

        let client = client_for(&server);
        assert!(matches!(
            client.fetch_body().await,
            Err(ApiError::ServerError(ref body)) if body == "maintenance"
        ));
    }

    #[tokio::test]
    async fn test_connection_refused_is_network_error() {
        // Nothing listens on port 1
        let client = ApiClient::new("http://127.0.0.1:1/api/vm/list", Duration::from_secs(5)).unwrap();
        assert!(matches!(
            client.fetch_body().await,
            Err(ApiError::NetworkError(_))
        ));
    }

    #[test]
    fn test_from_config_uses_endpoint() {
        let config = Config::default();
        let client = ApiClient::from_config(&config).unwrap();
        assert_eq!(client.endpoint(), DEFAULT_ENDPOINT);
    }
}
