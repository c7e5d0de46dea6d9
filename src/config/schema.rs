//! Configuration schema types
//!
//! Defines the TOML-backed configuration structure of the SDK client.

use crate::config::SecretString;
use serde::{Deserialize, Serialize};

/// Main client configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Platform endpoint
    pub endpoint: EndpointConfig,

    /// Account credentials
    pub credentials: CredentialsConfig,

    /// HTTP transport settings
    #[serde(default)]
    pub http: HttpConfig,

    /// Asynchronous-operation polling settings
    #[serde(default)]
    pub polling: PollingConfig,
}

impl ClientConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error message if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.endpoint.validate()?;
        self.credentials.validate()?;
        self.http.validate()?;
        self.polling.validate()?;
        Ok(())
    }
}

/// Platform endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointConfig {
    /// Hostname of the platform, e.g. `secure.gooddata.com`
    pub hostname: String,

    /// Protocol (`https` or `http`)
    #[serde(default = "default_protocol")]
    pub protocol: String,

    /// Port; defaults by protocol when omitted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
}

impl EndpointConfig {
    fn validate(&self) -> Result<(), String> {
        if self.hostname.trim().is_empty() {
            return Err("endpoint.hostname must not be empty".to_string());
        }
        if self.protocol != "https" && self.protocol != "http" {
            return Err(format!(
                "Invalid endpoint.protocol '{}'. Must be 'https' or 'http'",
                self.protocol
            ));
        }
        Ok(())
    }
}

/// Account credentials
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialsConfig {
    /// Account login (email)
    pub username: String,

    /// Account password
    pub password: SecretString,
}

impl CredentialsConfig {
    fn validate(&self) -> Result<(), String> {
        if self.username.trim().is_empty() {
            return Err("credentials.username must not be empty".to_string());
        }
        Ok(())
    }
}

/// HTTP transport settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Overall request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Connect timeout in seconds
    #[serde(default = "default_connect_timeout_seconds")]
    pub connect_timeout_seconds: u64,

    /// Verify TLS certificates
    #[serde(default = "default_true")]
    pub tls_verify: bool,

    /// Retry behaviour for retryable failures
    #[serde(default)]
    pub retry: RetryConfig,
}

impl HttpConfig {
    fn validate(&self) -> Result<(), String> {
        if self.timeout_seconds == 0 {
            return Err("http.timeout_seconds must be greater than 0".to_string());
        }
        self.retry.validate()
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout_seconds(),
            connect_timeout_seconds: default_connect_timeout_seconds(),
            tls_verify: true,
            retry: RetryConfig::default(),
        }
    }
}

/// Retry configuration for retryable request failures
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts (1 = no retries)
    #[serde(default = "default_max_retries")]
    pub max_retries: usize,

    /// Initial delay in milliseconds
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,

    /// Backoff multiplier applied per attempt
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,

    /// Cap on the delay in milliseconds
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
}

impl RetryConfig {
    fn validate(&self) -> Result<(), String> {
        if self.max_retries == 0 {
            return Err("http.retry.max_retries must be at least 1".to_string());
        }
        if self.backoff_multiplier < 1.0 {
            return Err("http.retry.backoff_multiplier must be >= 1.0".to_string());
        }
        Ok(())
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            initial_delay_ms: default_initial_delay_ms(),
            backoff_multiplier: default_backoff_multiplier(),
            max_delay_ms: default_max_delay_ms(),
        }
    }
}

/// Asynchronous-operation polling settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollingConfig {
    /// Fixed sleep between polls in milliseconds
    #[serde(default = "default_poll_interval_ms")]
    pub interval_ms: u64,

    /// Give up after this many polls of a single operation
    #[serde(default = "default_max_poll_attempts")]
    pub max_attempts: usize,
}

impl PollingConfig {
    fn validate(&self) -> Result<(), String> {
        if self.max_attempts == 0 {
            return Err("polling.max_attempts must be at least 1".to_string());
        }
        Ok(())
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_poll_interval_ms(),
            max_attempts: default_max_poll_attempts(),
        }
    }
}

fn default_protocol() -> String {
    "https".to_string()
}

fn default_timeout_seconds() -> u64 {
    60
}

fn default_connect_timeout_seconds() -> u64 {
    30
}

fn default_true() -> bool {
    true
}

fn default_max_retries() -> usize {
    3
}

fn default_initial_delay_ms() -> u64 {
    500
}

fn default_backoff_multiplier() -> f64 {
    2.0
}

fn default_max_delay_ms() -> u64 {
    10_000
}

fn default_poll_interval_ms() -> u64 {
    1_000
}

fn default_max_poll_attempts() -> usize {
    120
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_config() -> ClientConfig {
        toml::from_str(
            r#"
            [endpoint]
            hostname = "secure.gooddata.com"

            [credentials]
            username = "user@example.com"
            password = "secret"
            "#,
        )
        .unwrap()
    }

    #[test]
    fn test_minimal_config_defaults() {
        let config = minimal_config();
        assert_eq!(config.endpoint.protocol, "https");
        assert!(config.endpoint.port.is_none());
        assert_eq!(config.http.timeout_seconds, 60);
        assert!(config.http.tls_verify);
        assert_eq!(config.polling.interval_ms, 1_000);
        assert_eq!(config.polling.max_attempts, 120);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_hostname() {
        let mut config = minimal_config();
        config.endpoint.hostname = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_protocol() {
        let mut config = minimal_config();
        config.endpoint.protocol = "ftp".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.contains("protocol"));
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let mut config = minimal_config();
        config.http.timeout_seconds = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_poll_attempts() {
        let mut config = minimal_config();
        config.polling.max_attempts = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_retry_defaults() {
        let retry = RetryConfig::default();
        assert_eq!(retry.max_retries, 3);
        assert_eq!(retry.initial_delay_ms, 500);
        assert!((retry.backoff_multiplier - 2.0).abs() < f64::EPSILON);
    }
}
