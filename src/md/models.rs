//! Metadata object DTOs
//!
//! Every metadata object shares a `meta` header and a type-specific
//! `content` section, wrapped on the wire in a one-key envelope. The [`Obj`]
//! trait marks the envelope; [`Queryable`] additionally names the query URI
//! segment the object type is listed under.

use crate::gdc::WireObject;
use serde::{Deserialize, Serialize};

/// A metadata object addressed by URI within the platform's object store
pub trait Obj: WireObject {
    /// Human-readable type name used in error messages
    const TYPE_NAME: &'static str;

    /// Self URI of the object, when the server assigned one
    fn uri(&self) -> Option<&str>;
}

/// A metadata object type listable via `/gdc/md/{projectId}/query/{type}`
pub trait Queryable: Obj {
    /// Query URI segment, e.g. `attributes` or `metrics`
    const QUERY_TYPE: &'static str;
}

/// Common metadata header shared by all metadata objects
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contributor: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<String>,
}

impl Meta {
    /// Header with just a title, for freshly created objects
    pub fn with_title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }
}

/// Metric: a computed measure defined by a MAQL expression
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metric {
    pub content: MetricContent,
    pub meta: Meta,
}

impl Metric {
    pub fn new(title: impl Into<String>, expression: impl Into<String>) -> Self {
        Self {
            content: MetricContent {
                expression: expression.into(),
                format: None,
            },
            meta: Meta::with_title(title),
        }
    }

    pub fn title(&self) -> Option<&str> {
        self.meta.title.as_deref()
    }

    pub fn expression(&self) -> &str {
        &self.content.expression
    }

    pub fn format(&self) -> Option<&str> {
        self.content.format.as_deref()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricContent {
    pub expression: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

impl WireObject for Metric {
    const ROOT: &'static str = "metric";
}

impl Obj for Metric {
    const TYPE_NAME: &'static str = "metric";

    fn uri(&self) -> Option<&str> {
        self.meta.uri.as_deref()
    }
}

impl Queryable for Metric {
    const QUERY_TYPE: &'static str = "metrics";
}

/// Attribute: a dimension of the project's logical data model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attribute {
    #[serde(default)]
    pub content: AttributeContent,
    pub meta: Meta,
}

impl Attribute {
    pub fn title(&self) -> Option<&str> {
        self.meta.title.as_deref()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeContent {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub display_forms: Vec<serde_json::Value>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pk: Vec<serde_json::Value>,
}

impl WireObject for Attribute {
    const ROOT: &'static str = "attribute";
}

impl Obj for Attribute {
    const TYPE_NAME: &'static str = "attribute";

    fn uri(&self) -> Option<&str> {
        self.meta.uri.as_deref()
    }
}

impl Queryable for Attribute {
    const QUERY_TYPE: &'static str = "attributes";
}

/// Report: a saved view over one or more report definitions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub content: ReportContent,
    pub meta: Meta,
}

impl Report {
    pub fn title(&self) -> Option<&str> {
        self.meta.title.as_deref()
    }

    /// URI of the report's current (most recent) definition
    pub fn definition_uri(&self) -> Option<&str> {
        self.content.definitions.last().map(String::as_str)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportContent {
    /// Definition URIs, oldest first
    #[serde(default)]
    pub definitions: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub domains: Vec<String>,
}

impl WireObject for Report {
    const ROOT: &'static str = "report";
}

impl Obj for Report {
    const TYPE_NAME: &'static str = "report";

    fn uri(&self) -> Option<&str> {
        self.meta.uri.as_deref()
    }
}

impl Queryable for Report {
    const QUERY_TYPE: &'static str = "reports";
}

/// Report definition: grid layout and filtering of a single report version
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportDefinition {
    pub content: ReportDefinitionContent,
    pub meta: Meta,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportDefinitionContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grid: Option<serde_json::Value>,
}

impl WireObject for ReportDefinition {
    const ROOT: &'static str = "reportDefinition";
}

impl Obj for ReportDefinition {
    const TYPE_NAME: &'static str = "report definition";

    fn uri(&self) -> Option<&str> {
        self.meta.uri.as_deref()
    }
}

impl Queryable for ReportDefinition {
    const QUERY_TYPE: &'static str = "reportdefinition";
}

/// Listing answer of `/gdc/md/{projectId}/query/{type}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Query {
    #[serde(default)]
    pub entries: Vec<Entry>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<serde_json::Value>,
}

impl WireObject for Query {
    const ROOT: &'static str = "query";
}

/// One listed metadata object, as returned by the query resource
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    pub link: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gdc;

    const METRIC_JSON: &str = r#"{
        "metric": {
            "content": {
                "expression": "SELECT SUM([/gdc/md/PROJECT_ID/obj/3])",
                "format": "FORMAT"
            },
            "meta": {
                "title": "Person Name",
                "uri": "/gdc/md/PROJECT_ID/obj/DF_ID",
                "identifier": "metric.person.name",
                "category": "metric"
            }
        }
    }"#;

    #[test]
    fn test_metric_deserialization() {
        let metric: Metric = gdc::unwrap_slice(METRIC_JSON.as_bytes()).unwrap();
        assert_eq!(metric.title(), Some("Person Name"));
        assert_eq!(metric.format(), Some("FORMAT"));
        assert_eq!(metric.uri(), Some("/gdc/md/PROJECT_ID/obj/DF_ID"));
    }

    #[test]
    fn test_metric_serialization_is_enveloped() {
        let metric = Metric::new("Count", "SELECT COUNT([/gdc/md/p/obj/1])");
        let value = gdc::wrap(&metric).unwrap();
        assert_eq!(
            value["metric"]["content"]["expression"],
            "SELECT COUNT([/gdc/md/p/obj/1])"
        );
        assert_eq!(value["metric"]["meta"]["title"], "Count");
        // no format was set, the key must be absent
        assert!(value["metric"]["content"].get("format").is_none());
    }

    #[test]
    fn test_report_definition_uri_is_last() {
        let report: Report = serde_json::from_str(
            r#"{
                "content": {"definitions": ["/gdc/md/p/obj/1", "/gdc/md/p/obj/2"]},
                "meta": {"title": "Sales", "uri": "/gdc/md/p/obj/9"}
            }"#,
        )
        .unwrap();
        assert_eq!(report.definition_uri(), Some("/gdc/md/p/obj/2"));
    }

    #[test]
    fn test_query_deserialization() {
        let query: Query = gdc::unwrap_slice(
            br#"{
                "query": {
                    "entries": [
                        {"link": "/gdc/md/PROJ_ID/obj/127", "title": "Resource"},
                        {"link": "/gdc/md/PROJ_ID/obj/118", "title": "Name"}
                    ],
                    "meta": {"category": "query"}
                }
            }"#,
        )
        .unwrap();
        assert_eq!(query.entries.len(), 2);
        assert_eq!(query.entries[0].link, "/gdc/md/PROJ_ID/obj/127");
        assert_eq!(query.entries[1].title.as_deref(), Some("Name"));
    }
}
