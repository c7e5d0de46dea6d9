//! Project DTOs

use crate::gdc::WireObject;
use crate::md::Meta;
use crate::util::uri;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Platform project (workspace)
///
/// Travels inside a `{"project": {...}}` envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub content: ProjectContent,

    pub meta: Meta,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    links: Option<HashMap<String, String>>,
}

impl Project {
    const SELF_LINK: &'static str = "self";

    /// Self URI of the project, `/gdc/projects/{id}`
    pub fn uri(&self) -> Option<&str> {
        self.links
            .as_ref()
            .and_then(|links| links.get(Self::SELF_LINK))
            .map(String::as_str)
            .or(self.meta.uri.as_deref())
    }

    /// Project id, the last segment of the project URI
    pub fn id(&self) -> Option<&str> {
        self.uri().and_then(uri::last_segment)
    }
}

impl WireObject for Project {
    const ROOT: &'static str = "project";
}

/// Project content section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guided_navigation: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub driver: Option<String>,
}
