//! Dataload processes, executions and schedules

pub mod models;
pub mod service;

pub use models::{
    DataloadProcess, ProcessExecution, ProcessExecutionDetail, ProcessType, Schedule,
    ScheduleExecution, ScheduleState,
};
pub use service::ProcessService;
