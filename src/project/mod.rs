//! Projects (workspaces)

pub mod models;
pub mod service;

pub use models::{Project, ProjectContent};
pub use service::ProjectService;
