//! Wire timestamps: `yyyy-MM-dd'T'HH:mm:ss'Z'`, always UTC.
//!
//! Usable as a serde `with` module; [`option`] covers optional fields.

use crate::error::{Error, Result};
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serializer};

/// chrono pattern of the wire format.
pub const FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Format a timestamp the way the service expects it.
pub fn format(ts: &DateTime<Utc>) -> String {
    ts.format(FORMAT).to_string()
}

/// Parse a wire timestamp.
pub fn parse(s: &str) -> Result<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(s, FORMAT)
        .map(|naive| Utc.from_utc_datetime(&naive))
        .map_err(|e| Error::format(format!("invalid timestamp \"{}\": {}", s, e)))
}

pub fn serialize<S>(ts: &DateTime<Utc>, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format(ts))
}

pub fn deserialize<'de, D>(deserializer: D) -> std::result::Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    parse(&s).map_err(Error::into_de)
}

/// Optional timestamps; `null` and missing both decode to `None`.
pub mod option {
    use super::*;

    pub fn serialize<S>(
        ts: &Option<DateTime<Utc>>,
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match ts {
            Some(ts) => serializer.serialize_some(&format(ts)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(
        deserializer: D,
    ) -> std::result::Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            Some(s) => parse(&s).map(Some).map_err(Error::into_de),
            None => Ok(None),
        }
    }
}
