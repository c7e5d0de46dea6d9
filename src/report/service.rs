//! Report export service
//!
//! Exporting is a three-step fire-and-poll interaction: execute the report,
//! hand the raw execution result to the exporter, then poll the export URI
//! until the document is ready and download it.

use super::models::{ExportFormat, ReportRequest};
use crate::client::{FutureResult, PollHandler, PollResponse, RestClient};
use crate::domain::{GoodDataError, MetadataError, ReportError, Result};
use crate::md::models::Obj;
use crate::md::service::project_id_of_obj_uri;
use crate::md::{Report, ReportDefinition};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use serde_json::Value;

/// URI of the report executor
pub const REPORT_EXECUTOR_URI: &str = "/gdc/xtab2/executor3";

/// URI of the document exporter
pub const EXPORTING_URI: &str = "/gdc/exporter/executor";

/// Service for report export
#[derive(Debug, Clone)]
pub struct ReportService {
    client: RestClient,
}

impl ReportService {
    pub fn new(client: RestClient) -> Self {
        Self { client }
    }

    /// Exports a saved report in the given format
    ///
    /// The returned handle resolves to the exported document bytes.
    ///
    /// # Errors
    ///
    /// The handle resolves to [`ReportError::NoData`] when the report
    /// contains no data, and to a report error on any other failure.
    pub async fn export_report(
        &self,
        report: &Report,
        format: ExportFormat,
    ) -> Result<FutureResult<Vec<u8>>> {
        let uri = required_uri(report)?;
        self.export(ReportRequest::Report(uri), format).await
    }

    /// Exports a report definition in the given format
    pub async fn export_definition(
        &self,
        definition: &ReportDefinition,
        format: ExportFormat,
    ) -> Result<FutureResult<Vec<u8>>> {
        let uri = required_uri(definition)?;
        self.export(ReportRequest::ReportDefinition(uri), format)
            .await
    }

    async fn export(
        &self,
        request: ReportRequest,
        format: ExportFormat,
    ) -> Result<FutureResult<Vec<u8>>> {
        let exec_result = self.execute_report(&request).await?;
        let export_uri = self.request_export(&exec_result, format).await?;

        tracing::debug!(uri = %export_uri, format = %format, "Report export started");

        Ok(FutureResult::new(
            self.client.clone(),
            Box::new(ExportPollHandler { uri: export_uri }),
        ))
    }

    /// Exports a report as raw CSV via the project's raw executor
    ///
    /// The raw executor has no status endpoint; readiness is signalled by
    /// the task URI's Content-Type flipping from JSON (still computing) to
    /// CSV (the data itself).
    pub async fn export_report_raw_csv(&self, report: &Report) -> Result<Vec<u8>> {
        let report_uri = required_uri(report)?;
        let project_id = project_id_of_obj_uri(&report_uri)?;
        let path = format!("/gdc/projects/{project_id}/execute/raw");

        let request = ReportRequest::Report(report_uri);
        let task_uri = self.client.post_for_uri(&path, &request.to_body()).await?;

        tracing::debug!(uri = %task_uri, "Raw CSV export started");

        let interval = self.client.poll_interval();
        let max_attempts = self.client.max_poll_attempts();

        for attempt in 1..=max_attempts {
            let response = self.client.get_response(&task_uri).await?;
            let status = response.status();

            if !status.is_success() {
                let body = response.bytes().await.unwrap_or_default();
                return Err(crate::domain::RestApiError::from_body(
                    status.as_u16(),
                    &body,
                )
                .into());
            }

            let content_type = response
                .headers()
                .get(CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
                .ok_or_else(|| {
                    GoodDataError::from(ReportError::Export(
                        "raw export response has no Content-Type".to_string(),
                    ))
                })?;

            if content_type.starts_with("text/csv") {
                let bytes = response
                    .bytes()
                    .await
                    .map_err(|e| GoodDataError::Connection(e.to_string()))?;
                return Ok(bytes.to_vec());
            }

            if !content_type.starts_with("application/json") {
                return Err(ReportError::Export(format!(
                    "unexpected Content-Type '{content_type}' while exporting raw CSV"
                ))
                .into());
            }

            tracing::debug!(uri = %task_uri, attempt = attempt, "Raw CSV export still running");
            tokio::time::sleep(interval).await;
        }

        Err(GoodDataError::Polling(format!(
            "Gave up polling {task_uri} after {max_attempts} attempts"
        )))
    }

    async fn execute_report(&self, request: &ReportRequest) -> Result<Value> {
        self.client
            .post_json(REPORT_EXECUTOR_URI, &request.to_body())
            .await
            .map_err(|e| ReportError::Execute(e.to_string()).into())
    }

    async fn request_export(&self, exec_result: &Value, format: ExportFormat) -> Result<String> {
        let body = serde_json::json!({
            "result_req": {
                "format": format.value(),
                "result": exec_result,
            }
        });
        self.client
            .post_for_uri(EXPORTING_URI, &body)
            .await
            .map_err(|e| ReportError::Export(e.to_string()).into())
    }
}

/// Export status mapping: 200 done, 202 pending, 204 no data
struct ExportPollHandler {
    uri: String,
}

#[async_trait]
impl PollHandler<Vec<u8>> for ExportPollHandler {
    fn polling_uri(&self) -> &str {
        &self.uri
    }

    fn is_finished(&self, response: &PollResponse) -> Result<bool> {
        match response.status() {
            StatusCode::OK => Ok(true),
            StatusCode::ACCEPTED => Ok(false),
            StatusCode::NO_CONTENT => Err(ReportError::NoData.into()),
            status => Err(ReportError::Export(format!(
                "unexpected HTTP status {status} while exporting report"
            ))
            .into()),
        }
    }

    async fn on_finish(&self, client: &RestClient, _response: PollResponse) -> Result<Vec<u8>> {
        client.get_bytes(&self.uri).await
    }
}

fn required_uri<T: Obj>(obj: &T) -> Result<String> {
    obj.uri()
        .map(str::to_string)
        .ok_or_else(|| MetadataError::MissingUri(T::TYPE_NAME.to_string()).into())
}
