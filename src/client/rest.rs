//! REST transport over the platform API
//!
//! [`RestClient`] wraps a reqwest client configured with base-URI prefixing,
//! preset headers (JSON accept, API version) and basic authentication, and
//! translates non-2xx responses into [`RestApiError`] by parsing the
//! platform's structured error body.

use crate::client::Endpoint;
use crate::config::{HttpConfig, PollingConfig, RetryConfig, SecretString};
use crate::domain::{GoodDataError, RestApiError, Result};
use crate::gdc::UriResponse;
use base64::{engine::general_purpose, Engine as _};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::{Client, ClientBuilder, Method, Response};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

/// Name of the API version header sent with every request
pub const GDC_VERSION_HEADER: &str = "x-gdc-version";

/// API version the SDK speaks
pub const API_VERSION: &str = "3";

/// Configured HTTP transport shared by all services
///
/// Cheap to clone; every service holds its own copy. All request paths are
/// platform-relative (`/gdc/...`) and get prefixed with the endpoint URI;
/// absolute URLs returned by the server are passed through untouched.
#[derive(Clone)]
pub struct RestClient {
    http: Client,
    base_uri: String,
    username: String,
    password: SecretString,
    retry: RetryConfig,
    poll_interval: Duration,
    max_poll_attempts: usize,
}

impl RestClient {
    /// Creates a transport against the given endpoint
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the underlying HTTP client cannot
    /// be constructed.
    pub fn new(
        endpoint: &Endpoint,
        username: impl Into<String>,
        password: SecretString,
        http: &HttpConfig,
        polling: &PollingConfig,
    ) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(GDC_VERSION_HEADER, HeaderValue::from_static(API_VERSION));

        let mut builder = ClientBuilder::new()
            .default_headers(headers)
            .timeout(Duration::from_secs(http.timeout_seconds))
            .connect_timeout(Duration::from_secs(http.connect_timeout_seconds));

        if !http.tls_verify {
            builder = builder.danger_accept_invalid_certs(true);
        }

        let client = builder
            .build()
            .map_err(|e| GoodDataError::Configuration(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            http: client,
            base_uri: endpoint.to_uri(),
            username: username.into(),
            password,
            retry: http.retry.clone(),
            poll_interval: Duration::from_millis(polling.interval_ms),
            max_poll_attempts: polling.max_attempts,
        })
    }

    /// Fixed sleep between polls of an asynchronous operation
    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Poll count after which waiting for an asynchronous operation gives up
    pub fn max_poll_attempts(&self) -> usize {
        self.max_poll_attempts
    }

    /// GET a JSON resource, retrying retryable failures with backoff
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let bytes = self.get_with_retry(path).await?;
        serde_json::from_slice(&bytes).map_err(|e| {
            GoodDataError::Serialization(format!("Invalid response from {path}: {e}"))
        })
    }

    /// GET a binary resource (exported documents), retrying retryable
    /// failures with backoff
    pub async fn get_bytes(&self, path: &str) -> Result<Vec<u8>> {
        self.get_with_retry(path).await
    }

    /// GET without status translation
    ///
    /// Polling loops classify the raw status (and headers) themselves.
    pub async fn get_response(&self, path: &str) -> Result<Response> {
        self.send(Method::GET, path).await
    }

    /// POST a JSON body and deserialize the JSON answer
    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.request(Method::POST, path).json(body).send().await;
        let response = self.check_transport(path, response)?;
        let response = self.expect_success(response).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| GoodDataError::Connection(e.to_string()))?;
        serde_json::from_slice(&bytes).map_err(|e| {
            GoodDataError::Serialization(format!("Invalid response from {path}: {e}"))
        })
    }

    /// POST a JSON body to an endpoint answering `{"uri": ...}`
    ///
    /// This is the fire step of every fire-and-poll operation.
    pub async fn post_for_uri<B>(&self, path: &str, body: &B) -> Result<String>
    where
        B: Serialize + ?Sized,
    {
        let response: UriResponse = self.post_json(path, body).await?;
        Ok(response.uri)
    }

    /// POST a multipart form (process deployment) and deserialize the answer
    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> Result<T> {
        let response = self
            .request(Method::POST, path)
            .multipart(form)
            .send()
            .await;
        let response = self.check_transport(path, response)?;
        let response = self.expect_success(response).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| GoodDataError::Connection(e.to_string()))?;
        serde_json::from_slice(&bytes).map_err(|e| {
            GoodDataError::Serialization(format!("Invalid response from {path}: {e}"))
        })
    }

    /// DELETE a resource; 2xx answers (including 204) succeed
    pub async fn delete(&self, path: &str) -> Result<()> {
        let response = self.send(Method::DELETE, path).await?;
        self.expect_success(response).await?;
        Ok(())
    }

    /// Joins a platform-relative path with the endpoint base URI
    pub fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else {
            format!("{}{}", self.base_uri, path)
        }
    }

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        self.http
            .request(method, self.url(path))
            .header(AUTHORIZATION, self.auth_header())
    }

    fn auth_header(&self) -> String {
        let credentials = format!("{}:{}", self.username, self.password.expose_secret());
        let encoded = general_purpose::STANDARD.encode(credentials.as_bytes());
        format!("Basic {encoded}")
    }

    async fn send(&self, method: Method, path: &str) -> Result<Response> {
        let result = self.request(method, path).send().await;
        self.check_transport(path, result)
    }

    fn check_transport(
        &self,
        path: &str,
        result: std::result::Result<Response, reqwest::Error>,
    ) -> Result<Response> {
        result.map_err(|e| {
            tracing::error!(path = %path, error = %e, "Request transport failure");
            GoodDataError::Connection(e.to_string())
        })
    }

    /// Translates a non-2xx response into a [`RestApiError`]
    async fn expect_success(&self, response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let url = response.url().clone();
        let body = response.bytes().await.unwrap_or_default();
        let error = RestApiError::from_body(status.as_u16(), &body);
        tracing::warn!(
            url = %url,
            status = status.as_u16(),
            request_id = error.request_id.as_deref().unwrap_or(""),
            "Platform answered an error"
        );
        Err(error.into())
    }

    async fn get_with_retry(&self, path: &str) -> Result<Vec<u8>> {
        let mut attempt = 0;
        loop {
            let result = self.try_get(path).await;
            match result {
                Ok(bytes) => return Ok(bytes),
                Err(e) => {
                    attempt += 1;
                    if attempt >= self.retry.max_retries || !is_retryable(&e) {
                        return Err(e);
                    }

                    let delay_ms = backoff_delay_ms(&self.retry, attempt);

                    tracing::warn!(
                        path = %path,
                        attempt = attempt,
                        max_retries = self.retry.max_retries,
                        delay_ms = delay_ms,
                        error = %e,
                        "Retrying request after error"
                    );

                    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                }
            }
        }
    }

    async fn try_get(&self, path: &str) -> Result<Vec<u8>> {
        let response = self.send(Method::GET, path).await?;
        let response = self.expect_success(response).await?;
        Ok(response
            .bytes()
            .await
            .map_err(|e| GoodDataError::Connection(e.to_string()))?
            .to_vec())
    }
}

/// Backoff delay before the given retry attempt (1-based), capped
///
/// Computed in `f64` so fractional multipliers grow the delay and large
/// attempt counts saturate at the cap instead of overflowing.
fn backoff_delay_ms(retry: &RetryConfig, attempt: usize) -> u64 {
    let delay = retry.initial_delay_ms as f64
        * retry.backoff_multiplier.powf((attempt - 1) as f64);
    delay.min(retry.max_delay_ms as f64) as u64
}

fn is_retryable(error: &GoodDataError) -> bool {
    match error {
        GoodDataError::Connection(_) => true,
        GoodDataError::RestApi(e) => e.is_retryable(),
        _ => false,
    }
}

impl std::fmt::Debug for RestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestClient")
            .field("base_uri", &self.base_uri)
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::Secret;

    fn test_client(base: &str) -> RestClient {
        RestClient::new(
            &Endpoint::parse(base).unwrap(),
            "user@example.com",
            Secret::new("pass".into()),
            &HttpConfig::default(),
            &PollingConfig::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_url_prefixes_relative_paths() {
        let client = test_client("https://secure.gooddata.com");
        assert_eq!(
            client.url("/gdc/account/profile/current"),
            "https://secure.gooddata.com/gdc/account/profile/current"
        );
    }

    #[test]
    fn test_url_passes_absolute_urls_through() {
        let client = test_client("https://secure.gooddata.com");
        assert_eq!(
            client.url("https://other.example.com/task/1"),
            "https://other.example.com/task/1"
        );
    }

    #[test]
    fn test_auth_header_is_basic() {
        let client = test_client("https://secure.gooddata.com");
        let header = client.auth_header();
        assert!(header.starts_with("Basic "));
        let decoded = general_purpose::STANDARD
            .decode(header.trim_start_matches("Basic "))
            .unwrap();
        assert_eq!(decoded, b"user@example.com:pass");
    }

    #[test]
    fn test_is_retryable_classification() {
        assert!(is_retryable(&GoodDataError::Connection("reset".into())));
        assert!(is_retryable(&RestApiError::from_body(503, b"").into()));
        assert!(!is_retryable(&RestApiError::from_body(404, b"").into()));
        assert!(!is_retryable(&GoodDataError::Validation("x".into())));
    }

    #[test]
    fn test_backoff_grows_with_fractional_multiplier() {
        let retry = RetryConfig {
            max_retries: 10,
            initial_delay_ms: 100,
            backoff_multiplier: 1.5,
            max_delay_ms: 10_000,
        };
        assert_eq!(backoff_delay_ms(&retry, 1), 100);
        assert_eq!(backoff_delay_ms(&retry, 2), 150);
        assert_eq!(backoff_delay_ms(&retry, 3), 225);
    }

    #[test]
    fn test_backoff_is_capped() {
        let retry = RetryConfig {
            max_retries: 10,
            initial_delay_ms: 500,
            backoff_multiplier: 2.0,
            max_delay_ms: 3_000,
        };
        assert_eq!(backoff_delay_ms(&retry, 4), 3_000);
    }

    #[test]
    fn test_backoff_saturates_on_large_attempt_counts() {
        let retry = RetryConfig {
            max_retries: usize::MAX,
            initial_delay_ms: u64::MAX / 2,
            backoff_multiplier: 10.0,
            max_delay_ms: 10_000,
        };
        assert_eq!(backoff_delay_ms(&retry, 1_000), 10_000);
    }
}
