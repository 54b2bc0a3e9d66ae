//! Timestamp codec for `#[serde(with = "iso8601")]` fields.
//!
//! Decoding accepts ISO-8601 date-times in extended or basic format, with or
//! without seconds, and any offset form (`Z`, `+hh:mm`, `+hhmm`, `+hh`).
//! An offset-less timestamp is read as UTC. Encoding renders RFC 3339 with
//! `Z` for a zero offset and keeps any other offset.

use chrono::{DateTime, FixedOffset, NaiveDateTime, SecondsFormat, Utc};
use serde::de::{self, Unexpected};
use serde::{Deserialize, Deserializer, Serializer};

/// Date and time layouts, tried in order, each with `%#z` appended first and
/// then bare for the offset-less fallback.
const LAYOUTS: [&str; 6] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y%m%dT%H%M%S%.f",
    "%Y%m%dT%H%M",
];

pub fn parse(value: &str) -> Option<DateTime<FixedOffset>> {
    if let Ok(date_time) = DateTime::parse_from_rfc3339(value) {
        return Some(date_time);
    }

    let with_offset = LAYOUTS.iter().find_map(|layout| {
        DateTime::parse_from_str(value, &format!("{layout}%#z")).ok()
    });
    if with_offset.is_some() {
        return with_offset;
    }

    let naive_date_time = LAYOUTS
        .iter()
        .find_map(|layout| NaiveDateTime::parse_from_str(value, layout).ok())?;
    let date_time: DateTime<Utc> = DateTime::from_naive_utc_and_offset(naive_date_time, Utc);
    Some(date_time.into())
}

pub fn format(value: &DateTime<FixedOffset>) -> String {
    value.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

pub fn serialize<S>(value: &DateTime<FixedOffset>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format(value))
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<FixedOffset>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse(&raw)
        .ok_or_else(|| de::Error::invalid_value(Unexpected::Str(&raw), &"an ISO-8601 timestamp"))
}
