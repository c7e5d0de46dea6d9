//! Report execution and export

pub mod models;
pub mod service;

pub use models::{ExportFormat, ReportRequest};
pub use service::{ReportService, EXPORTING_URI, REPORT_EXECUTOR_URI};
