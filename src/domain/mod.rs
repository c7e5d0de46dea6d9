//! Core domain types: error hierarchy and result alias

pub mod errors;
pub mod result;

pub use errors::{GoodDataError, MetadataError, ProcessError, ReportError, RestApiError};
pub use result::Result;
