//! Serde helpers for the platform's datetime format
//!
//! The platform reports timestamps as ISO-8601 datetimes with milliseconds
//! in UTC (`2017-05-09T21:54:50.924Z`). These modules plug into
//! `#[serde(with = "...")]` on `chrono` fields.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serializer};

/// ISO-8601 datetime with milliseconds, e.g. `2017-05-09T21:54:50.924Z`
pub mod iso_datetime {
    use super::*;

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        parse_iso_datetime(&text).map_err(serde::de::Error::custom)
    }
}

/// Optional variant of [`iso_datetime`]
pub mod iso_datetime_opt {
    use super::*;

    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(dt) => iso_datetime::serialize(dt, serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            Some(text) => parse_iso_datetime(&text)
                .map(Some)
                .map_err(serde::de::Error::custom),
            None => Ok(None),
        }
    }
}

fn parse_iso_datetime(text: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(text)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| format!("invalid ISO datetime '{text}': {e}"))
}
