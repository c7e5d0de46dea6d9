//! Wire types shared by all platform services
//!
//! The platform wraps every resource in a one-key JSON envelope
//! (`{"metric": {...}}`, `{"process": {...}}`, ...). The [`WireObject`] trait
//! names that root key per type; [`wrap`]/[`unwrap`] move values in and out
//! of the envelope.

use crate::domain::{GoodDataError, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A resource that travels inside a one-key JSON envelope
pub trait WireObject: Serialize + DeserializeOwned {
    /// Root key of the envelope, e.g. `"metric"` or `"process"`
    const ROOT: &'static str;
}

/// Wraps a resource into its wire envelope
pub fn wrap<T: WireObject>(obj: &T) -> Result<Value> {
    let inner = serde_json::to_value(obj)?;
    Ok(serde_json::json!({ T::ROOT: inner }))
}

/// Extracts a resource from its wire envelope
pub fn unwrap<T: WireObject>(value: Value) -> Result<T> {
    match value {
        Value::Object(mut map) => {
            let inner = map.remove(T::ROOT).ok_or_else(|| {
                GoodDataError::Serialization(format!("missing '{}' root in response", T::ROOT))
            })?;
            Ok(serde_json::from_value(inner)?)
        }
        other => Err(GoodDataError::Serialization(format!(
            "expected a JSON object with '{}' root, got {other}",
            T::ROOT
        ))),
    }
}

/// Extracts a resource envelope from raw response bytes
pub fn unwrap_slice<T: WireObject>(bytes: &[u8]) -> Result<T> {
    let value: Value = serde_json::from_slice(bytes)?;
    unwrap(value)
}

/// Plain URI answer returned by asynchronous-operation endpoints
///
/// The exporter, dataload executor and similar endpoints answer a freshly
/// created task with `{"uri": "/gdc/..."}`; the URI is then polled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UriResponse {
    pub uri: String,
}

/// The platform's structured error body
///
/// Sent inside an `{"error": {...}}` envelope on non-2xx responses. The
/// message may contain `%s` placeholders filled from `parameters`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorStructure {
    #[serde(default)]
    pub message: Option<String>,

    #[serde(default)]
    pub parameters: Vec<Value>,

    #[serde(default)]
    pub component: Option<String>,

    #[serde(default)]
    pub error_class: Option<String>,

    #[serde(default)]
    pub error_code: Option<String>,

    #[serde(default)]
    pub request_id: Option<String>,
}

impl ErrorStructure {
    /// Message with `%s` placeholders replaced by the parameters, in order
    ///
    /// Parameters beyond the number of placeholders are ignored; missing
    /// parameters leave the placeholder in place.
    pub fn formatted_message(&self) -> Option<String> {
        let message = self.message.as_deref()?;
        let mut result = String::with_capacity(message.len());
        let mut params = self.parameters.iter();
        let mut rest = message;

        while let Some(pos) = rest.find("%s") {
            result.push_str(&rest[..pos]);
            match params.next() {
                Some(Value::String(s)) => result.push_str(s),
                Some(other) => result.push_str(&other.to_string()),
                None => result.push_str("%s"),
            }
            rest = &rest[pos + 2..];
        }
        result.push_str(rest);
        Some(result)
    }
}
