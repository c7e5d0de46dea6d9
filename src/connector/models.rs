//! Connector integration DTOs

use crate::gdc::WireObject;
use crate::util::dates::iso_datetime_opt;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Supported connector types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Connector {
    #[serde(rename = "zendesk4")]
    Zendesk4,
}

impl Connector {
    /// Connector name as used in integration URIs
    pub fn value(self) -> &'static str {
        match self {
            Connector::Zendesk4 => "zendesk4",
        }
    }
}

impl std::fmt::Display for Connector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.value())
    }
}

/// Status code reported by a connector integration process
///
/// The platform may report codes this SDK does not know; those parse to
/// `None` and count as neither finished nor failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntegrationStatusCode {
    New,
    Scheduled,
    Downloading,
    Downloaded,
    Transforming,
    Transformed,
    Uploading,
    Uploaded,
    Synchronized,
    Error,
    UserError,
}

impl IntegrationStatusCode {
    fn parse(code: &str) -> Option<Self> {
        match code {
            "NEW" => Some(Self::New),
            "SCHEDULED" => Some(Self::Scheduled),
            "DOWNLOADING" => Some(Self::Downloading),
            "DOWNLOADED" => Some(Self::Downloaded),
            "TRANSFORMING" => Some(Self::Transforming),
            "TRANSFORMED" => Some(Self::Transformed),
            "UPLOADING" => Some(Self::Uploading),
            "UPLOADED" => Some(Self::Uploaded),
            "SYNCHRONIZED" => Some(Self::Synchronized),
            "ERROR" => Some(Self::Error),
            "USER_ERROR" => Some(Self::UserError),
            _ => None,
        }
    }
}

/// Status block of an integration process
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Status {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Status {
    /// Parses the status code, `None` when missing or unrecognized
    pub fn code(&self) -> Option<IntegrationStatusCode> {
        self.code.as_deref().and_then(IntegrationStatusCode::parse)
    }
}

/// One run of a connector integration
///
/// Travels inside a `{"process": {...}}` envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntegrationProcessStatus {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,

    #[serde(default, with = "iso_datetime_opt", skip_serializing_if = "Option::is_none")]
    pub started: Option<DateTime<Utc>>,

    #[serde(default, with = "iso_datetime_opt", skip_serializing_if = "Option::is_none")]
    pub finished: Option<DateTime<Utc>>,
}

impl IntegrationProcessStatus {
    /// Whether the integration reached a terminal status
    ///
    /// Only recognized codes count; a missing or unknown status keeps the
    /// process pending.
    pub fn is_finished(&self) -> bool {
        matches!(
            self.code(),
            Some(
                IntegrationStatusCode::Synchronized
                    | IntegrationStatusCode::Error
                    | IntegrationStatusCode::UserError
            )
        )
    }

    /// Whether the integration finished with an error
    pub fn is_failed(&self) -> bool {
        matches!(
            self.code(),
            Some(IntegrationStatusCode::Error | IntegrationStatusCode::UserError)
        )
    }

    fn code(&self) -> Option<IntegrationStatusCode> {
        self.status.as_ref().and_then(Status::code)
    }
}

impl WireObject for IntegrationProcessStatus {
    const ROOT: &'static str = "process";
}
