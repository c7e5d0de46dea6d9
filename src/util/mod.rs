//! Shared utilities: date serde helpers and URI template matching

pub mod dates;
pub mod uri;
