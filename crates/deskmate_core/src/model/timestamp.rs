//! ISO-8601 text encoding for stored date-times.
//!
//! # Invariants
//! - `parse_timestamp(&format_timestamp(t)) == Ok(t)` for every `t`.
//! - Fraction digits are only written when the sub-second part is non-zero.

use chrono::{Local, NaiveDateTime};

const ISO_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";
const ISO_FORMAT_SPACED: &str = "%Y-%m-%d %H:%M:%S%.f";

/// Encodes a local date-time as `YYYY-MM-DDTHH:MM:SS[.fraction]`.
pub fn format_timestamp(value: &NaiveDateTime) -> String {
    value.format(ISO_FORMAT).to_string()
}

/// Decodes text written by [`format_timestamp`].
///
/// A space separator between date and time is also accepted.
pub fn parse_timestamp(value: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    let trimmed = value.trim();
    NaiveDateTime::parse_from_str(trimmed, ISO_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(trimmed, ISO_FORMAT_SPACED))
}

/// Current wall-clock time in the local zone, without zone information.
pub fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}
