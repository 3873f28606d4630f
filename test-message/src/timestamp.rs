//! ISO-8601 timestamps for message payloads.

use chrono::{DateTime, Local, SecondsFormat, TimeZone};
use std::fmt::Display;

/// Formats `instant` as ISO-8601 with millisecond precision.
///
/// The zone is always rendered as a numeric offset (`Z` for UTC), never as a
/// bracketed region id such as `[Europe/Paris]`.
pub fn iso_timestamp<Tz>(instant: DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Current wall-clock time in the system time zone.
pub fn local_iso_timestamp() -> String {
    iso_timestamp(Local::now())
}
