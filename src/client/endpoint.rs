//! Platform endpoint: protocol, hostname and port of the REST API

use crate::config::EndpointConfig;
use crate::domain::{GoodDataError, Result};
use url::Url;

/// Location of the platform's REST API
///
/// Every request the SDK issues is prefixed with the URI this endpoint
/// renders. Default ports (443 for https, 80 for http) are omitted from the
/// rendered URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    protocol: String,
    hostname: String,
    port: u16,
}

impl Endpoint {
    /// Hostname of the hosted platform
    pub const DEFAULT_HOSTNAME: &'static str = "secure.gooddata.com";

    /// Creates an https endpoint on the default port
    pub fn new(hostname: impl Into<String>) -> Self {
        Self {
            protocol: "https".to_string(),
            hostname: hostname.into(),
            port: 443,
        }
    }

    /// Creates an endpoint with explicit protocol and port
    pub fn with_port(protocol: impl Into<String>, hostname: impl Into<String>, port: u16) -> Self {
        Self {
            protocol: protocol.into(),
            hostname: hostname.into(),
            port,
        }
    }

    /// Parses an endpoint from a URL such as `https://secure.gooddata.com`
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the URL is malformed, has no host,
    /// or uses a scheme other than http/https.
    pub fn parse(url: &str) -> Result<Self> {
        let parsed = Url::parse(url)
            .map_err(|e| GoodDataError::Configuration(format!("Invalid endpoint URL: {e}")))?;

        let scheme = parsed.scheme();
        if scheme != "https" && scheme != "http" {
            return Err(GoodDataError::Configuration(format!(
                "Unsupported endpoint scheme '{scheme}'. Must be 'https' or 'http'"
            )));
        }

        let hostname = parsed
            .host_str()
            .ok_or_else(|| GoodDataError::Configuration("Endpoint URL has no host".to_string()))?
            .to_string();

        let port = parsed
            .port()
            .unwrap_or(if scheme == "https" { 443 } else { 80 });

        Ok(Self {
            protocol: scheme.to_string(),
            hostname,
            port,
        })
    }

    /// Builds an endpoint from configuration
    pub fn from_config(config: &EndpointConfig) -> Result<Self> {
        config.validate_protocol()?;
        let port = config
            .port
            .unwrap_or(if config.protocol == "https" { 443 } else { 80 });
        Ok(Self {
            protocol: config.protocol.clone(),
            hostname: config.hostname.clone(),
            port,
        })
    }

    /// Renders the base URI all request paths are appended to
    pub fn to_uri(&self) -> String {
        let default_port = match self.protocol.as_str() {
            "https" => 443,
            _ => 80,
        };
        if self.port == default_port {
            format!("{}://{}", self.protocol, self.hostname)
        } else {
            format!("{}://{}:{}", self.protocol, self.hostname, self.port)
        }
    }

    /// Hostname of the endpoint
    pub fn hostname(&self) -> &str {
        &self.hostname
    }
}

impl Default for Endpoint {
    fn default() -> Self {
        Self::new(Self::DEFAULT_HOSTNAME)
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_uri())
    }
}

impl EndpointConfig {
    fn validate_protocol(&self) -> Result<()> {
        if self.protocol != "https" && self.protocol != "http" {
            return Err(GoodDataError::Configuration(format!(
                "Invalid endpoint protocol '{}'",
                self.protocol
            )));
        }
        Ok(())
    }
}
