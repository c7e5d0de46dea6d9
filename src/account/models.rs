//! Account DTOs. Deserialization only.

use crate::gdc::WireObject;
use crate::util::uri;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Platform account profile
///
/// Travels inside an `{"accountSetting": {...}}` envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub login: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    links: Option<HashMap<String, String>>,
}

impl Account {
    const SELF_LINK: &'static str = "self";
    const PROJECTS_LINK: &'static str = "projects";

    /// Self URI of the account profile
    pub fn uri(&self) -> Option<&str> {
        self.links
            .as_ref()
            .and_then(|links| links.get(Self::SELF_LINK))
            .map(String::as_str)
    }

    /// Account id, the last segment of the profile URI
    pub fn id(&self) -> Option<&str> {
        self.uri().and_then(uri::last_segment)
    }

    /// URI listing the projects this account can access
    pub fn projects_uri(&self) -> Option<&str> {
        self.links
            .as_ref()
            .and_then(|links| links.get(Self::PROJECTS_LINK))
            .map(String::as_str)
    }
}

impl WireObject for Account {
    const ROOT: &'static str = "accountSetting";
}
