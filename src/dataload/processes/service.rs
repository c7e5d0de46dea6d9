//! Dataload process and schedule service
//!
//! Deployment uploads a multipart form (process descriptor + zip archive);
//! execution is fire-and-poll ending with a follow-up fetch of the execution
//! detail.

use super::models::{
    DataloadProcess, ProcessExecution, ProcessExecutionDetail, Schedule, ScheduleExecution,
};
use crate::account::AccountService;
use crate::client::{FutureResult, PollHandler, PollResponse, RestClient};
use crate::domain::{GoodDataError, ProcessError, Result};
use crate::gdc;
use crate::project::Project;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;

/// Service for dataload processes and their schedules
#[derive(Debug, Clone)]
pub struct ProcessService {
    client: RestClient,
    accounts: AccountService,
}

impl ProcessService {
    pub fn new(client: RestClient, accounts: AccountService) -> Self {
        Self { client, accounts }
    }

    /// Deploys a new process with the given zipped data
    ///
    /// # Errors
    ///
    /// Returns a deployment error when the multipart upload fails.
    pub async fn create_process(
        &self,
        project: &Project,
        process: &DataloadProcess,
        archive: Vec<u8>,
    ) -> Result<DataloadProcess> {
        let project_id = project_id(project)?;
        let path = format!("/gdc/projects/{project_id}/dataload/processes");
        self.deploy(&path, process, archive).await
    }

    /// Redeploys an existing process with new data
    pub async fn update_process(
        &self,
        process: &DataloadProcess,
        archive: Vec<u8>,
    ) -> Result<DataloadProcess> {
        let uri = process
            .uri()
            .map(str::to_string)
            .ok_or_else(|| ProcessError::NotFound(process.name.clone()))?;
        self.deploy(&uri, process, archive).await
    }

    async fn deploy(
        &self,
        path: &str,
        process: &DataloadProcess,
        archive: Vec<u8>,
    ) -> Result<DataloadProcess> {
        let descriptor = serde_json::to_string(&gdc::wrap(process)?).map_err(|e| {
            GoodDataError::Serialization(format!("Cannot serialize process: {e}"))
        })?;

        let form = Form::new()
            .part(
                "process",
                Part::text(descriptor)
                    .mime_str("application/json")
                    .map_err(|e| ProcessError::Deploy(e.to_string()))?,
            )
            .part(
                "data",
                Part::bytes(archive)
                    .file_name("process.zip")
                    .mime_str("application/zip")
                    .map_err(|e| ProcessError::Deploy(e.to_string()))?,
            );

        tracing::info!(path = %path, name = %process.name, "Deploying process");

        let value: Value = self.client.post_multipart(path, form).await?;
        gdc::unwrap(value)
    }

    /// Fetches a process by project and process id
    pub async fn get_process_by_id(
        &self,
        project: &Project,
        process_id: &str,
    ) -> Result<DataloadProcess> {
        let project_id = project_id(project)?;
        self.get_process_by_uri(&format!(
            "/gdc/projects/{project_id}/dataload/processes/{process_id}"
        ))
        .await
    }

    /// Fetches a process by its URI
    ///
    /// # Errors
    ///
    /// Returns [`ProcessError::NotFound`] when the platform answers 404.
    pub async fn get_process_by_uri(&self, uri: &str) -> Result<DataloadProcess> {
        let value: Value = self
            .client
            .get_json(uri)
            .await
            .map_err(not_found_as(ProcessError::NotFound(uri.to_string())))?;
        gdc::unwrap(value)
    }

    /// Lists processes deployed in the project
    pub async fn list_processes(&self, project: &Project) -> Result<Vec<DataloadProcess>> {
        let project_id = project_id(project)?;
        let path = format!("/gdc/projects/{project_id}/dataload/processes");
        self.list_process_items(&path).await
    }

    /// Lists processes deployed by the authenticated account across projects
    pub async fn list_user_processes(&self) -> Result<Vec<DataloadProcess>> {
        let account = self.accounts.get_current().await?;
        let account_id = account.id().ok_or_else(|| {
            GoodDataError::Validation("current account has no id".to_string())
        })?;
        let path = format!("/gdc/account/profile/{account_id}/dataload/processes");
        self.list_process_items(&path).await
    }

    async fn list_process_items(&self, path: &str) -> Result<Vec<DataloadProcess>> {
        let listing: ProcessesListing = self.client.get_json(path).await?;
        listing
            .processes
            .items
            .into_iter()
            .map(gdc::unwrap::<DataloadProcess>)
            .collect()
    }

    /// Removes a deployed process
    pub async fn remove_process(&self, process: &DataloadProcess) -> Result<()> {
        let uri = process
            .uri()
            .ok_or_else(|| ProcessError::NotFound(process.name.clone()))?;
        self.client.delete(uri).await
    }

    /// Executes a deployed process
    ///
    /// The returned handle resolves to the execution detail of a successful
    /// run; a run that finishes with a non-OK status resolves to
    /// [`ProcessError::ExecutionFailed`] carrying the detail.
    pub async fn execute_process(
        &self,
        execution: &ProcessExecution,
    ) -> Result<FutureResult<ProcessExecutionDetail>> {
        let body = gdc::wrap(execution)?;
        let execution_uri = self
            .client
            .post_for_uri(execution.executions_uri(), &body)
            .await?;

        tracing::info!(uri = %execution_uri, executable = %execution.executable, "Process execution started");

        Ok(FutureResult::new(
            self.client.clone(),
            Box::new(ExecutionPollHandler { uri: execution_uri }),
        ))
    }

    /// Creates a schedule in the project
    pub async fn create_schedule(
        &self,
        project: &Project,
        schedule: &Schedule,
    ) -> Result<Schedule> {
        let project_id = project_id(project)?;
        let path = format!("/gdc/projects/{project_id}/schedules");
        let body = gdc::wrap(schedule)?;

        let value: Value = self.client.post_json(&path, &body).await?;
        gdc::unwrap(value)
    }

    /// Fetches a schedule by project and schedule id
    pub async fn get_schedule_by_id(
        &self,
        project: &Project,
        schedule_id: &str,
    ) -> Result<Schedule> {
        let project_id = project_id(project)?;
        self.get_schedule_by_uri(&format!(
            "/gdc/projects/{project_id}/schedules/{schedule_id}"
        ))
        .await
    }

    /// Fetches a schedule by its URI
    ///
    /// # Errors
    ///
    /// Returns [`ProcessError::ScheduleNotFound`] when the platform answers 404.
    pub async fn get_schedule_by_uri(&self, uri: &str) -> Result<Schedule> {
        let value: Value = self
            .client
            .get_json(uri)
            .await
            .map_err(not_found_as(ProcessError::ScheduleNotFound(
                uri.to_string(),
            )))?;
        gdc::unwrap(value)
    }

    /// Lists schedules defined in the project
    pub async fn list_schedules(&self, project: &Project) -> Result<Vec<Schedule>> {
        let project_id = project_id(project)?;
        let path = format!("/gdc/projects/{project_id}/schedules");

        let listing: SchedulesListing = self.client.get_json(&path).await?;
        listing
            .schedules
            .items
            .into_iter()
            .map(gdc::unwrap::<Schedule>)
            .collect()
    }

    /// Removes a schedule
    pub async fn remove_schedule(&self, schedule: &Schedule) -> Result<()> {
        let uri = schedule
            .uri()
            .ok_or_else(|| ProcessError::ScheduleNotFound("schedule has no self link".to_string()))?;
        self.client.delete(uri).await
    }

    /// Triggers a manual execution of a schedule
    ///
    /// The returned handle resolves to the execution once it reaches a
    /// terminal status, successful or not; inspect
    /// [`ScheduleExecution::is_finished`] and the status yourself.
    pub async fn execute_schedule(
        &self,
        schedule: &Schedule,
    ) -> Result<FutureResult<ScheduleExecution>> {
        let executions_uri = schedule.executions_uri().ok_or_else(|| {
            ProcessError::ScheduleNotFound("schedule has no self link".to_string())
        })?;

        let body = gdc::wrap(&ScheduleExecution::new())?;
        let value: Value = self.client.post_json(&executions_uri, &body).await?;
        let execution: ScheduleExecution = gdc::unwrap(value)?;

        let uri = execution
            .uri()
            .map(str::to_string)
            .ok_or_else(|| {
                GoodDataError::Validation("schedule execution has no self link".to_string())
            })?;

        tracing::info!(uri = %uri, "Schedule execution started");

        Ok(FutureResult::new(
            self.client.clone(),
            Box::new(ScheduleExecutionPollHandler { uri }),
        ))
    }
}

/// Execution status mapping: 202 pending, 200 and 204 finished
///
/// A finishing poll is followed by a fetch of the execution detail; a non-OK
/// detail fails the operation with the detail attached.
struct ExecutionPollHandler {
    uri: String,
}

#[async_trait]
impl PollHandler<ProcessExecutionDetail> for ExecutionPollHandler {
    fn polling_uri(&self) -> &str {
        &self.uri
    }

    fn is_finished(&self, response: &PollResponse) -> Result<bool> {
        match response.status() {
            StatusCode::ACCEPTED => Ok(false),
            StatusCode::OK | StatusCode::NO_CONTENT => Ok(true),
            _ => Err(response.to_rest_error().into()),
        }
    }

    async fn on_finish(
        &self,
        client: &RestClient,
        _response: PollResponse,
    ) -> Result<ProcessExecutionDetail> {
        let detail_uri = ProcessExecutionDetail::uri_from_execution_uri(&self.uri);
        let value: Value = client.get_json(&detail_uri).await?;
        let detail: ProcessExecutionDetail = gdc::unwrap(value)?;

        if detail.is_success() {
            return Ok(detail);
        }

        let message = detail
            .error
            .as_ref()
            .and_then(|e| e.formatted_message())
            .unwrap_or_else(|| "process execution failed".to_string());

        Err(ProcessError::ExecutionFailed {
            status: detail.status.clone(),
            message,
            detail: Box::new(detail),
        }
        .into())
    }
}

/// Schedule execution polling: done once the execution body reports a
/// terminal status; the terminal execution itself is the result
struct ScheduleExecutionPollHandler {
    uri: String,
}

#[async_trait]
impl PollHandler<ScheduleExecution> for ScheduleExecutionPollHandler {
    fn polling_uri(&self) -> &str {
        &self.uri
    }

    fn is_finished(&self, response: &PollResponse) -> Result<bool> {
        if !response.status().is_success() {
            return Err(response.to_rest_error().into());
        }
        let execution: ScheduleExecution = gdc::unwrap(response.json()?)?;
        Ok(execution.is_finished())
    }

    async fn on_finish(
        &self,
        _client: &RestClient,
        response: PollResponse,
    ) -> Result<ScheduleExecution> {
        gdc::unwrap(response.json()?)
    }
}

fn project_id(project: &Project) -> Result<&str> {
    project
        .id()
        .ok_or_else(|| GoodDataError::Validation("project has no id".to_string()))
}

/// Maps a 404 REST error onto a domain error, passing other errors through
fn not_found_as(error: ProcessError) -> impl FnOnce(GoodDataError) -> GoodDataError {
    move |e| match e {
        GoodDataError::RestApi(ref rest) if rest.status_code == 404 => error.into(),
        other => other,
    }
}

#[derive(Deserialize)]
struct ProcessesListing {
    processes: Items,
}

#[derive(Deserialize)]
struct SchedulesListing {
    schedules: Items,
}

#[derive(Deserialize)]
struct Items {
    items: Vec<Value>,
}
