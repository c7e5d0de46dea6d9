//! Report execution and export wire types

use serde::{Deserialize, Serialize};

/// Format of an exported report document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Pdf,
    Xls,
    Png,
    Csv,
    Html,
    Xlsx,
}

impl ExportFormat {
    /// Wire value sent to the exporter
    pub fn value(self) -> &'static str {
        match self {
            ExportFormat::Pdf => "pdf",
            ExportFormat::Xls => "xls",
            ExportFormat::Png => "png",
            ExportFormat::Csv => "csv",
            ExportFormat::Html => "html",
            ExportFormat::Xlsx => "xlsx",
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.value())
    }
}

/// What to execute: a saved report or a bare report definition
///
/// Serializes to the executor's `{"report": uri}` /
/// `{"reportDefinition": uri}` request body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ReportRequest {
    Report(String),
    ReportDefinition(String),
}

impl ReportRequest {
    /// Wraps the request in the executor envelope `{"report_req": ...}`
    pub fn to_body(&self) -> serde_json::Value {
        serde_json::json!({ "report_req": self })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(ExportFormat::Pdf, "pdf")]
    #[test_case(ExportFormat::Xls, "xls")]
    #[test_case(ExportFormat::Png, "png")]
    #[test_case(ExportFormat::Csv, "csv")]
    #[test_case(ExportFormat::Html, "html")]
    #[test_case(ExportFormat::Xlsx, "xlsx")]
    fn test_format_value(format: ExportFormat, expected: &str) {
        assert_eq!(format.value(), expected);
        assert_eq!(format.to_string(), expected);
        assert_eq!(serde_json::to_value(format).unwrap(), expected);
    }

    #[test]
    fn test_report_request_body() {
        let request = ReportRequest::Report("/gdc/md/p/obj/1".to_string());
        assert_eq!(
            request.to_body(),
            serde_json::json!({"report_req": {"report": "/gdc/md/p/obj/1"}})
        );
    }

    #[test]
    fn test_definition_request_body() {
        let request = ReportRequest::ReportDefinition("/gdc/md/p/obj/2".to_string());
        assert_eq!(
            request.to_body(),
            serde_json::json!({"report_req": {"reportDefinition": "/gdc/md/p/obj/2"}})
        );
    }
}
