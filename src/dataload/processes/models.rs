//! Dataload process and schedule DTOs

use crate::gdc::{ErrorStructure, WireObject};
use crate::util::dates::{iso_datetime, iso_datetime_opt};
use crate::util::uri;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

/// Type of a deployed dataload process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ProcessType {
    Graph,
    Ruby,
}

/// Deployed dataload process
///
/// Travels inside a `{"process": {...}}` envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataloadProcess {
    pub name: String,

    #[serde(rename = "type")]
    pub process_type: ProcessType,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub executables: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    links: Option<HashMap<String, String>>,
}

impl DataloadProcess {
    const SELF_LINK: &'static str = "self";
    const EXECUTIONS_LINK: &'static str = "executions";

    /// Describes a process to deploy; the server assigns links on creation
    pub fn new(name: impl Into<String>, process_type: ProcessType) -> Self {
        Self {
            name: name.into(),
            process_type,
            executables: Vec::new(),
            links: None,
        }
    }

    /// Self URI, present once the process is deployed
    pub fn uri(&self) -> Option<&str> {
        self.links
            .as_ref()
            .and_then(|links| links.get(Self::SELF_LINK))
            .map(String::as_str)
    }

    /// Process id, the last segment of the self URI
    pub fn id(&self) -> Option<&str> {
        self.uri().and_then(uri::last_segment)
    }

    /// URI executions of this process are POSTed to
    pub fn executions_uri(&self) -> Option<String> {
        self.links
            .as_ref()
            .and_then(|links| links.get(Self::EXECUTIONS_LINK))
            .cloned()
            .or_else(|| self.uri().map(|uri| format!("{uri}/executions")))
    }
}

impl WireObject for DataloadProcess {
    const ROOT: &'static str = "process";
}

/// Request to execute a deployed process
///
/// Travels inside an `{"execution": {...}}` envelope; the target executions
/// URI is carried out of band.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessExecution {
    pub executable: String,

    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub params: HashMap<String, String>,

    #[serde(skip)]
    executions_uri: String,
}

impl ProcessExecution {
    /// Builds an execution of one of the process's executables
    ///
    /// # Errors
    ///
    /// Fails when the process has not been deployed (carries no links).
    pub fn new(
        process: &DataloadProcess,
        executable: impl Into<String>,
    ) -> crate::domain::Result<Self> {
        let executions_uri = process.executions_uri().ok_or_else(|| {
            crate::domain::GoodDataError::Validation(
                "process has no executions link; was it deployed?".to_string(),
            )
        })?;
        Ok(Self {
            executable: executable.into(),
            params: HashMap::new(),
            executions_uri,
        })
    }

    /// Adds an execution parameter
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    pub(crate) fn executions_uri(&self) -> &str {
        &self.executions_uri
    }
}

impl WireObject for ProcessExecution {
    const ROOT: &'static str = "execution";
}

/// Dataload process execution detail. Deserialization only.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessExecutionDetail {
    #[serde(deserialize_with = "non_empty_status")]
    pub status: String,

    #[serde(with = "iso_datetime")]
    pub created: DateTime<Utc>,

    #[serde(default, with = "iso_datetime_opt", skip_serializing_if = "Option::is_none")]
    pub started: Option<DateTime<Utc>>,

    #[serde(default, with = "iso_datetime_opt", skip_serializing_if = "Option::is_none")]
    pub updated: Option<DateTime<Utc>>,

    #[serde(default, with = "iso_datetime_opt", skip_serializing_if = "Option::is_none")]
    pub finished: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorStructure>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    links: Option<HashMap<String, String>>,
}

impl ProcessExecutionDetail {
    const STATUS_OK: &'static str = "OK";
    const SELF_LINK: &'static str = "self";
    const LOG_LINK: &'static str = "log";
    const POLL_LINK: &'static str = "poll";

    /// Whether the execution finished successfully
    pub fn is_success(&self) -> bool {
        self.status == Self::STATUS_OK
    }

    /// Self URI of this detail
    pub fn uri(&self) -> Option<&str> {
        self.link(Self::SELF_LINK)
    }

    /// URI of the execution log
    pub fn log_uri(&self) -> Option<&str> {
        self.link(Self::LOG_LINK)
    }

    /// URI of the execution this detail belongs to
    pub fn execution_uri(&self) -> Option<&str> {
        self.link(Self::POLL_LINK)
    }

    fn link(&self, name: &str) -> Option<&str> {
        self.links
            .as_ref()
            .and_then(|links| links.get(name))
            .map(String::as_str)
    }

    /// Detail URI of an execution task URI
    pub fn uri_from_execution_uri(execution_uri: &str) -> String {
        format!("{execution_uri}/detail")
    }
}

impl WireObject for ProcessExecutionDetail {
    const ROOT: &'static str = "executionDetail";
}

/// The platform always reports a status on a finished execution
fn non_empty_status<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let status = String::deserialize(deserializer)?;
    if status.is_empty() {
        return Err(serde::de::Error::custom(
            "execution detail status must not be empty",
        ));
    }
    Ok(status)
}

/// State of a schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ScheduleState {
    Enabled,
    Disabled,
}

/// Cron-triggered execution of a deployed process
///
/// Travels inside a `{"schedule": {...}}` envelope. The target process and
/// executable are carried in `params` under well-known keys.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Schedule {
    #[serde(rename = "type")]
    pub schedule_type: String,

    pub state: ScheduleState,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cron: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,

    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub params: HashMap<String, String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    links: Option<HashMap<String, String>>,
}

impl Schedule {
    const MSETL_TYPE: &'static str = "MSETL";
    const PROCESS_ID_PARAM: &'static str = "PROCESS_ID";
    const EXECUTABLE_PARAM: &'static str = "EXECUTABLE";
    const SELF_LINK: &'static str = "self";
    const EXECUTIONS_LINK: &'static str = "executions";

    /// Builds an enabled schedule of the process's executable
    ///
    /// # Errors
    ///
    /// Fails when the process has not been deployed (carries no id).
    pub fn new(
        process: &DataloadProcess,
        executable: impl Into<String>,
        cron: impl Into<String>,
    ) -> crate::domain::Result<Self> {
        let process_id = process.id().ok_or_else(|| {
            crate::domain::GoodDataError::Validation(
                "process has no id; was it deployed?".to_string(),
            )
        })?;

        let mut params = HashMap::new();
        params.insert(Self::PROCESS_ID_PARAM.to_string(), process_id.to_string());
        params.insert(Self::EXECUTABLE_PARAM.to_string(), executable.into());

        Ok(Self {
            schedule_type: Self::MSETL_TYPE.to_string(),
            state: ScheduleState::Enabled,
            cron: Some(cron.into()),
            timezone: None,
            params,
            links: None,
        })
    }

    /// Id of the scheduled process
    pub fn process_id(&self) -> Option<&str> {
        self.params.get(Self::PROCESS_ID_PARAM).map(String::as_str)
    }

    /// Scheduled executable
    pub fn executable(&self) -> Option<&str> {
        self.params.get(Self::EXECUTABLE_PARAM).map(String::as_str)
    }

    /// Self URI, present once the schedule exists
    pub fn uri(&self) -> Option<&str> {
        self.links
            .as_ref()
            .and_then(|links| links.get(Self::SELF_LINK))
            .map(String::as_str)
    }

    /// Schedule id, the last segment of the self URI
    pub fn id(&self) -> Option<&str> {
        self.uri().and_then(uri::last_segment)
    }

    /// URI executions of this schedule are POSTed to
    pub fn executions_uri(&self) -> Option<String> {
        self.links
            .as_ref()
            .and_then(|links| links.get(Self::EXECUTIONS_LINK))
            .cloned()
            .or_else(|| self.uri().map(|uri| format!("{uri}/executions")))
    }
}

impl WireObject for Schedule {
    const ROOT: &'static str = "schedule";
}

/// One execution of a schedule
///
/// Travels inside an `{"execution": {...}}` envelope. A fresh execution
/// request serializes to the empty envelope `{"execution": {}}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleExecution {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trigger: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub process_last_deployed_by: Option<String>,

    #[serde(default, with = "iso_datetime_opt", skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    links: Option<HashMap<String, String>>,
}

impl ScheduleExecution {
    const SELF_LINK: &'static str = "self";
    const TERMINAL_STATUSES: [&'static str; 4] = ["OK", "ERROR", "CANCELED", "TIMEOUT"];

    /// Empty execution request
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the execution reached a terminal status
    pub fn is_finished(&self) -> bool {
        self.status
            .as_deref()
            .is_some_and(|status| Self::TERMINAL_STATUSES.contains(&status))
    }

    /// Self URI of this execution
    pub fn uri(&self) -> Option<&str> {
        self.links
            .as_ref()
            .and_then(|links| links.get(Self::SELF_LINK))
            .map(String::as_str)
    }

    /// Link map of this execution
    pub fn links(&self) -> Option<&HashMap<String, String>> {
        self.links.as_ref()
    }
}

impl WireObject for ScheduleExecution {
    const ROOT: &'static str = "execution";
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gdc;
    use chrono::TimeZone;

    const PROCESS_JSON: &str = r#"{
        "process": {
            "name": "test process",
            "type": "GRAPH",
            "executables": ["graph/run.grf"],
            "links": {
                "self": "/gdc/projects/PROJECT_ID/dataload/processes/PROCESS_ID",
                "executions": "/gdc/projects/PROJECT_ID/dataload/processes/PROCESS_ID/executions"
            }
        }
    }"#;

    const EXECUTION_DETAIL_JSON: &str = r#"{
        "executionDetail": {
            "status": "OK",
            "created": "2014-01-01T10:00:00.000Z",
            "started": "2014-01-01T10:00:01.000Z",
            "updated": "2014-01-01T10:05:00.000Z",
            "finished": "2014-01-01T10:05:00.000Z",
            "links": {
                "self": "/gdc/projects/P/dataload/processes/X/executions/1/detail",
                "poll": "/gdc/projects/P/dataload/processes/X/executions/1",
                "log": "/gdc/projects/P/dataload/processes/X/executions/1/log"
            }
        }
    }"#;

    const SCHEDULE_EXECUTION_JSON: &str = r#"{
        "execution": {
            "status": "OK",
            "trigger": "MANUAL",
            "processLastDeployedBy": "bear@gooddata.com",
            "created": "2017-05-09T21:54:50.924Z",
            "links": {
                "self": "/gdc/projects/PROJECT_ID/schedules/SCHEDULE_ID/executions/EXECUTION_ID"
            }
        }
    }"#;

    #[test]
    fn test_process_deserialization() {
        let process: DataloadProcess = gdc::unwrap_slice(PROCESS_JSON.as_bytes()).unwrap();
        assert_eq!(process.name, "test process");
        assert_eq!(process.process_type, ProcessType::Graph);
        assert_eq!(process.id(), Some("PROCESS_ID"));
        assert_eq!(
            process.executions_uri().as_deref(),
            Some("/gdc/projects/PROJECT_ID/dataload/processes/PROCESS_ID/executions")
        );
    }

    #[test]
    fn test_new_process_serialization() {
        let process = DataloadProcess::new("etl", ProcessType::Ruby);
        let value = gdc::wrap(&process).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"process": {"name": "etl", "type": "RUBY"}})
        );
    }

    #[test]
    fn test_execution_serialization() {
        let process: DataloadProcess = gdc::unwrap_slice(PROCESS_JSON.as_bytes()).unwrap();
        let execution = ProcessExecution::new(&process, "graph/run.grf")
            .unwrap()
            .with_param("LIMIT", "100");

        let value = gdc::wrap(&execution).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"execution": {
                "executable": "graph/run.grf",
                "params": {"LIMIT": "100"}
            }})
        );
    }

    #[test]
    fn test_execution_of_undeployed_process_fails() {
        let process = DataloadProcess::new("etl", ProcessType::Graph);
        assert!(ProcessExecution::new(&process, "main.rb").is_err());
    }

    #[test]
    fn test_execution_detail_deserialization() {
        let detail: ProcessExecutionDetail =
            gdc::unwrap_slice(EXECUTION_DETAIL_JSON.as_bytes()).unwrap();
        assert!(detail.is_success());
        assert_eq!(
            detail.created,
            Utc.with_ymd_and_hms(2014, 1, 1, 10, 0, 0).unwrap()
        );
        assert_eq!(
            detail.log_uri(),
            Some("/gdc/projects/P/dataload/processes/X/executions/1/log")
        );
        assert_eq!(
            detail.execution_uri(),
            Some("/gdc/projects/P/dataload/processes/X/executions/1")
        );
    }

    #[test]
    fn test_execution_detail_rejects_empty_status() {
        let result: crate::domain::Result<ProcessExecutionDetail> = gdc::unwrap_slice(
            br#"{
                "executionDetail": {
                    "status": "",
                    "created": "2014-01-01T10:00:00.000Z"
                }
            }"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_execution_detail_rejects_missing_status() {
        let result: crate::domain::Result<ProcessExecutionDetail> = gdc::unwrap_slice(
            br#"{"executionDetail": {"created": "2014-01-01T10:00:00.000Z"}}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_detail_uri_from_execution_uri() {
        assert_eq!(
            ProcessExecutionDetail::uri_from_execution_uri("/gdc/exec/1"),
            "/gdc/exec/1/detail"
        );
    }

    #[test]
    fn test_empty_schedule_execution_serialization() {
        let execution = ScheduleExecution::new();
        let value = gdc::wrap(&execution).unwrap();
        assert_eq!(value, serde_json::json!({"execution": {}}));
    }

    #[test]
    fn test_schedule_execution_deserialization() {
        let execution: ScheduleExecution =
            gdc::unwrap_slice(SCHEDULE_EXECUTION_JSON.as_bytes()).unwrap();
        assert_eq!(execution.status.as_deref(), Some("OK"));
        assert_eq!(execution.trigger.as_deref(), Some("MANUAL"));
        assert_eq!(
            execution.process_last_deployed_by.as_deref(),
            Some("bear@gooddata.com")
        );
        assert_eq!(
            execution.created,
            Some(
                Utc.with_ymd_and_hms(2017, 5, 9, 21, 54, 50).unwrap()
                    + chrono::Duration::milliseconds(924)
            )
        );
        assert_eq!(
            execution.uri(),
            Some("/gdc/projects/PROJECT_ID/schedules/SCHEDULE_ID/executions/EXECUTION_ID")
        );
        assert!(execution.is_finished());
    }

    #[test]
    fn test_schedule_execution_not_finished_while_running() {
        let execution: ScheduleExecution =
            serde_json::from_str(r#"{"status": "RUNNING"}"#).unwrap();
        assert!(!execution.is_finished());

        let no_status = ScheduleExecution::new();
        assert!(!no_status.is_finished());
    }

    #[test]
    fn test_schedule_construction() {
        let process: DataloadProcess = gdc::unwrap_slice(PROCESS_JSON.as_bytes()).unwrap();
        let schedule = Schedule::new(&process, "graph/run.grf", "0 2 * * *").unwrap();

        assert_eq!(schedule.schedule_type, "MSETL");
        assert_eq!(schedule.state, ScheduleState::Enabled);
        assert_eq!(schedule.process_id(), Some("PROCESS_ID"));
        assert_eq!(schedule.executable(), Some("graph/run.grf"));
        assert_eq!(schedule.cron.as_deref(), Some("0 2 * * *"));
    }

    #[test]
    fn test_schedule_deserialization() {
        let schedule: Schedule = gdc::unwrap_slice(
            br#"{
                "schedule": {
                    "type": "MSETL",
                    "state": "DISABLED",
                    "cron": "0 2 * * *",
                    "timezone": "UTC",
                    "params": {"PROCESS_ID": "p1", "EXECUTABLE": "main.rb"},
                    "links": {"self": "/gdc/projects/P/schedules/SCHEDULE_ID"}
                }
            }"#,
        )
        .unwrap();
        assert_eq!(schedule.state, ScheduleState::Disabled);
        assert_eq!(schedule.id(), Some("SCHEDULE_ID"));
        assert_eq!(
            schedule.executions_uri().as_deref(),
            Some("/gdc/projects/P/schedules/SCHEDULE_ID/executions")
        );
    }
}
