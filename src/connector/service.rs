//! Connector integration service

use super::models::{Connector, IntegrationProcessStatus};
use crate::client::{FutureResult, PollHandler, PollResponse, RestClient};
use crate::domain::{GoodDataError, Result};
use crate::gdc;
use crate::project::Project;
use async_trait::async_trait;
use serde_json::Value;

/// Service for connector integrations
#[derive(Debug, Clone)]
pub struct ConnectorService {
    client: RestClient,
}

impl ConnectorService {
    pub fn new(client: RestClient) -> Self {
        Self { client }
    }

    /// Starts an integration process of the given connector
    ///
    /// The returned handle resolves once the process reaches a terminal
    /// status; a failed integration resolves to a connector error carrying
    /// the status detail.
    pub async fn execute_process(
        &self,
        project: &Project,
        connector: Connector,
    ) -> Result<FutureResult<IntegrationProcessStatus>> {
        let project_id = project.id().ok_or_else(|| {
            GoodDataError::Validation("project has no id".to_string())
        })?;
        let path = format!(
            "/gdc/projects/{project_id}/connectors/{connector}/integration/processes"
        );

        let uri = self
            .client
            .post_for_uri(&path, &serde_json::json!({"process": {}}))
            .await
            .map_err(|e| GoodDataError::Connector(e.to_string()))?;

        tracing::info!(uri = %uri, connector = %connector, "Integration process started");

        Ok(FutureResult::new(
            self.client.clone(),
            Box::new(IntegrationPollHandler { uri }),
        ))
    }

    /// Fetches the current status of an integration process
    pub async fn get_process_status(&self, uri: &str) -> Result<IntegrationProcessStatus> {
        let value: Value = self.client.get_json(uri).await?;
        gdc::unwrap(value)
    }
}

/// Integration polling: done once the body reports a terminal status code,
/// failed codes abort with a connector error
struct IntegrationPollHandler {
    uri: String,
}

#[async_trait]
impl PollHandler<IntegrationProcessStatus> for IntegrationPollHandler {
    fn polling_uri(&self) -> &str {
        &self.uri
    }

    fn is_finished(&self, response: &PollResponse) -> Result<bool> {
        if !response.status().is_success() {
            return Err(response.to_rest_error().into());
        }
        let process: IntegrationProcessStatus = gdc::unwrap(response.json()?)?;
        if process.is_failed() {
            return Err(GoodDataError::Connector(failure_message(&process)));
        }
        Ok(process.is_finished())
    }

    async fn on_finish(
        &self,
        _client: &RestClient,
        response: PollResponse,
    ) -> Result<IntegrationProcessStatus> {
        gdc::unwrap(response.json()?)
    }
}

fn failure_message(process: &IntegrationProcessStatus) -> String {
    let status = process.status.as_ref();
    let code = status
        .and_then(|s| s.code.as_deref())
        .unwrap_or("UNKNOWN");
    match status.and_then(|s| s.detail.as_deref()) {
        Some(detail) => format!("integration process failed with {code}: {detail}"),
        None => format!("integration process failed with {code}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    fn poll_body(code: &str) -> Vec<u8> {
        format!(r#"{{"process": {{"status": {{"code": "{code}"}}}}}}"#).into_bytes()
    }

    #[test]
    fn test_handler_pending_while_running() {
        let handler = IntegrationPollHandler {
            uri: "/gdc/projects/P/connectors/zendesk4/integration/processes/1".to_string(),
        };
        let response = PollResponse::new(StatusCode::OK, poll_body("DOWNLOADING"));
        assert!(!handler.is_finished(&response).unwrap());
    }

    #[test]
    fn test_handler_finished_when_synchronized() {
        let handler = IntegrationPollHandler {
            uri: "/gdc/projects/P/connectors/zendesk4/integration/processes/1".to_string(),
        };
        let response = PollResponse::new(StatusCode::OK, poll_body("SYNCHRONIZED"));
        assert!(handler.is_finished(&response).unwrap());
    }

    #[test]
    fn test_handler_fails_on_error_codes() {
        let handler = IntegrationPollHandler {
            uri: "/gdc/projects/P/connectors/zendesk4/integration/processes/1".to_string(),
        };
        for code in ["ERROR", "USER_ERROR"] {
            let response = PollResponse::new(StatusCode::OK, poll_body(code));
            assert!(matches!(
                handler.is_finished(&response),
                Err(GoodDataError::Connector(_))
            ));
        }
    }

    #[test]
    fn test_handler_propagates_http_errors() {
        let handler = IntegrationPollHandler {
            uri: "/gdc/projects/P/connectors/zendesk4/integration/processes/1".to_string(),
        };
        let response = PollResponse::new(StatusCode::INTERNAL_SERVER_ERROR, Vec::new());
        assert!(matches!(
            handler.is_finished(&response),
            Err(GoodDataError::RestApi(e)) if e.status_code == 500
        ));
    }
}
