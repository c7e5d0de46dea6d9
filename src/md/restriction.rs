//! Client-side restrictions on metadata query listings
//!
//! The query resource has no server-side filtering; restrictions are exact
//! string matches applied to the listed entries.

use super::models::Entry;

/// Exact-match filter on a listed metadata entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Restriction {
    /// Matches `entry.identifier`
    Identifier(String),
    /// Matches `entry.title`
    Title(String),
    /// Matches `entry.summary`
    Summary(String),
}

impl Restriction {
    pub fn identifier(value: impl Into<String>) -> Self {
        Restriction::Identifier(value.into())
    }

    pub fn title(value: impl Into<String>) -> Self {
        Restriction::Title(value.into())
    }

    pub fn summary(value: impl Into<String>) -> Self {
        Restriction::Summary(value.into())
    }

    /// Whether the entry satisfies this restriction
    pub fn matches(&self, entry: &Entry) -> bool {
        match self {
            Restriction::Identifier(value) => entry.identifier.as_deref() == Some(value),
            Restriction::Title(value) => entry.title.as_deref() == Some(value),
            Restriction::Summary(value) => entry.summary.as_deref() == Some(value),
        }
    }
}
