//! Result type alias used throughout the crate

use super::errors::GoodDataError;

/// Convenience result alias over [`GoodDataError`]
pub type Result<T> = std::result::Result<T, GoodDataError>;
