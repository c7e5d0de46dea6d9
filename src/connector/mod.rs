//! Connector integrations (downloaded data sources)

pub mod models;
pub mod service;

pub use models::{Connector, IntegrationProcessStatus, IntegrationStatusCode, Status};
pub use service::ConnectorService;
