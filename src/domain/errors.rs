//! Error types for the GoodData SDK
//!
//! All errors are domain-specific and don't expose third-party types.
//! Service modules have their own error enums that fold into the top-level
//! [`GoodDataError`].

use crate::gdc::ErrorStructure;
use thiserror::Error;

/// Main SDK error type
///
/// This is the primary error type used throughout the crate. It wraps
/// service-specific error types and provides context for error handling.
#[derive(Debug, Error)]
pub enum GoodDataError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Input validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Non-2xx response translated from the platform error structure
    #[error(transparent)]
    RestApi(#[from] RestApiError),

    /// Network/connection errors
    #[error("Connection error: {0}")]
    Connection(String),

    /// Polling of an asynchronous platform operation gave up or broke
    #[error("Polling error: {0}")]
    Polling(String),

    /// Metadata service errors
    #[error("Metadata error: {0}")]
    Metadata(#[from] MetadataError),

    /// Report export errors
    #[error("Report error: {0}")]
    Report(#[from] ReportError),

    /// Dataload process and schedule errors
    #[error("Process error: {0}")]
    Process(#[from] ProcessError),

    /// Connector integration errors
    #[error("Connector error: {0}")]
    Connector(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),
}

/// Error translated from a non-2xx platform response
///
/// Carries whatever subset of the platform's error envelope was parseable.
/// An unparseable body degrades to the HTTP status line only.
#[derive(Debug, Error)]
#[error("HTTP {status_code}: {message}")]
pub struct RestApiError {
    /// HTTP status code of the failed response
    pub status_code: u16,

    /// Human-readable message, interpolated from the error structure when present
    pub message: String,

    /// Platform component that produced the error
    pub component: Option<String>,

    /// Platform error class
    pub error_class: Option<String>,

    /// Request id for support correlation
    pub request_id: Option<String>,
}

impl RestApiError {
    /// Build an error from a response status and raw body
    ///
    /// Attempts to parse the platform error envelope (`{"error": {...}}`);
    /// falls back to the plain body or the status code alone.
    pub fn from_body(status_code: u16, body: &[u8]) -> Self {
        match serde_json::from_slice::<ErrorEnvelope>(body) {
            Ok(envelope) => {
                let error = envelope.error;
                Self {
                    status_code,
                    message: error
                        .formatted_message()
                        .unwrap_or_else(|| "no error message provided".to_string()),
                    component: error.component,
                    error_class: error.error_class,
                    request_id: error.request_id,
                }
            }
            Err(_) => {
                let text = String::from_utf8_lossy(body);
                let trimmed = text.trim();
                Self {
                    status_code,
                    message: if trimmed.is_empty() {
                        "no error details provided".to_string()
                    } else {
                        trimmed.to_string()
                    },
                    component: None,
                    error_class: None,
                    request_id: None,
                }
            }
        }
    }

    /// Whether a retry of the same request may succeed
    pub fn is_retryable(&self) -> bool {
        self.status_code == 429 || self.status_code >= 500
    }
}

#[derive(serde::Deserialize)]
struct ErrorEnvelope {
    error: ErrorStructure,
}

/// Metadata service errors
#[derive(Debug, Error)]
pub enum MetadataError {
    /// No metadata object matched the given restrictions
    #[error("No {type_name} matching the restrictions found in project {project_id}")]
    NotFound {
        type_name: &'static str,
        project_id: String,
    },

    /// More than one metadata object matched the given restrictions
    #[error("Expected a single {type_name} but {count} matched the restrictions")]
    Ambiguous {
        type_name: &'static str,
        count: usize,
    },

    /// A metadata object was used where a URI was required but carries none
    #[error("Metadata object has no URI: {0}")]
    MissingUri(String),
}

/// Report export errors
#[derive(Debug, Error)]
pub enum ReportError {
    /// The report contains no data (exporter answered 204)
    #[error("Report contains no data")]
    NoData,

    /// Report execution request failed
    #[error("Unable to execute report: {0}")]
    Execute(String),

    /// Report export failed or answered an unexpected status
    #[error("Unable to export report: {0}")]
    Export(String),
}

/// Dataload process and schedule errors
#[derive(Debug, Error)]
pub enum ProcessError {
    /// Process lookup answered 404
    #[error("Process not found: {0}")]
    NotFound(String),

    /// Schedule lookup answered 404
    #[error("Schedule not found: {0}")]
    ScheduleNotFound(String),

    /// Process deployment (create/update) failed
    #[error("Unable to deploy process: {0}")]
    Deploy(String),

    /// Process execution finished with a non-OK status
    #[error("Process execution finished with status {status}: {message}")]
    ExecutionFailed {
        status: String,
        message: String,
        detail: Box<crate::dataload::processes::ProcessExecutionDetail>,
    },
}

// Conversion from std::io::Error
impl From<std::io::Error> for GoodDataError {
    fn from(err: std::io::Error) -> Self {
        GoodDataError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for GoodDataError {
    fn from(err: serde_json::Error) -> Self {
        GoodDataError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for GoodDataError {
    fn from(err: toml::de::Error) -> Self {
        GoodDataError::Configuration(format!("TOML parse error: {err}"))
    }
}
