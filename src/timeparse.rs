//! Ambiguous time input parsing.
//!
//! Classifies a raw input string as either a pure-digit Unix timestamp or a
//! calendar/clock string, then resolves it to a single UTC instant. The
//! caller provides the timezone for interpreting naive times.
//!
//! # Supported Formats
//!
//! - **Unix timestamps**: unit inferred from digit count — `"1706486400"`
//!   (seconds), `"1706486400000"` (milliseconds), `"1706486400000000"`
//!   (microseconds), 17 or more digits (nanoseconds). A leading `-` or `+`
//!   is allowed for pre-epoch values.
//! - **RFC 3339 / ISO 8601**: `"2024-01-29T12:30:00+08:00"`, `"2024-01-29T04:30:00Z"`
//! - **Date and time**: `"2024-01-29 12:30:00"`, `"2024-01-29T12:30:00"`,
//!   `"2024/01/29 12:30:00"`
//! - **Date only**: `"2024-01-29"`, `"2024/01/29"` (midnight in the resolution timezone)
//! - **Time only**: `"12:30:00"` (today's date in the resolution timezone)

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::errors::{Error, Result};

/// How a raw input string should be interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    /// A pure-digit literal, optionally signed: a Unix timestamp.
    Numeric,
    /// Anything else: a calendar/clock string.
    Textual,
}

/// Classify a trimmed input string.
///
/// A string is `Numeric` iff every character is an ASCII digit after an
/// optional single leading `-` or `+`. Empty input is rejected before
/// classification.
pub fn classify(raw: &str) -> Result<InputKind> {
    if raw.is_empty() {
        return Err(Error::EmptyInput);
    }
    let digits = raw.strip_prefix(['-', '+']).unwrap_or(raw);
    if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
        Ok(InputKind::Numeric)
    } else {
        Ok(InputKind::Textual)
    }
}

// Digit-count thresholds for timestamp unit inference. Present-day epoch
// values are 10 digits in seconds, 13 in milliseconds and 16 in microseconds;
// the bands extend one order of magnitude below each of those.
const MAX_SECONDS_DIGITS: usize = 10;
const MAX_MILLIS_DIGITS: usize = 13;
const MAX_MICROS_DIGITS: usize = 16;

/// Parse a pure-digit literal as a Unix timestamp.
///
/// The unit is inferred from the digit count of the magnitude (sign
/// excluded). Values that overflow `i64` or the representable date range
/// are an error, never truncated.
pub fn parse_numeric(raw: &str) -> Result<DateTime<Utc>> {
    let negative = raw.starts_with('-');
    let digits = raw.strip_prefix(['-', '+']).unwrap_or(raw);

    let invalid = || Error::InvalidNumericTimestamp {
        raw: raw.to_string(),
    };

    let magnitude: i64 = digits.parse().map_err(|_| invalid())?;
    let value = if negative { -magnitude } else { magnitude };

    let parsed = if digits.len() <= MAX_SECONDS_DIGITS {
        DateTime::from_timestamp(value, 0)
    } else if digits.len() <= MAX_MILLIS_DIGITS {
        DateTime::from_timestamp_millis(value)
    } else if digits.len() <= MAX_MICROS_DIGITS {
        DateTime::from_timestamp_micros(value)
    } else {
        Some(DateTime::from_timestamp_nanos(value))
    };

    parsed.ok_or_else(invalid)
}

/// One accepted calendar/clock string shape.
enum Layout {
    /// RFC 3339 with an explicit offset; the offset in the string wins.
    Rfc3339,
    /// A naive date and time, resolved in the caller's timezone.
    DateTime(&'static str),
    /// A naive date, resolved to midnight in the caller's timezone.
    DateOnly(&'static str),
    /// A naive clock time on today's date in the caller's timezone.
    TimeOnly(&'static str),
}

/// Candidate layouts, most specific first. The first layout that parses the
/// entire input wins; chrono rejects trailing garbage, so partial matches
/// fall through to the next candidate.
const LAYOUTS: &[Layout] = &[
    Layout::Rfc3339,
    Layout::DateTime("%Y-%m-%d %H:%M:%S"),
    Layout::DateTime("%Y-%m-%dT%H:%M:%S"),
    Layout::DateTime("%Y/%m/%d %H:%M:%S"),
    Layout::DateOnly("%Y-%m-%d"),
    Layout::DateOnly("%Y/%m/%d"),
    Layout::TimeOnly("%H:%M:%S"),
];

/// Parse a calendar/clock string.
///
/// # Arguments
/// * `raw` - the trimmed input string
/// * `now` - the current time, used for today-relative layouts
/// * `tz` - the timezone for interpreting naive strings
pub fn parse_textual(raw: &str, now: DateTime<Tz>, tz: Tz) -> Result<DateTime<Utc>> {
    for layout in LAYOUTS {
        let naive = match layout {
            Layout::Rfc3339 => match DateTime::parse_from_rfc3339(raw) {
                Ok(dt) => return Ok(dt.with_timezone(&Utc)),
                Err(_) => continue,
            },
            Layout::DateTime(fmt) => NaiveDateTime::parse_from_str(raw, fmt).ok(),
            Layout::DateOnly(fmt) => NaiveDate::parse_from_str(raw, fmt)
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0)),
            Layout::TimeOnly(fmt) => NaiveTime::parse_from_str(raw, fmt)
                .ok()
                .map(|t| now.date_naive().and_time(t)),
        };
        if let Some(naive) = naive {
            return resolve_local(naive, tz);
        }
    }

    Err(Error::UnrecognizedTimeFormat {
        raw: raw.to_string(),
    })
}

/// Resolve a naive local date-time in `tz`. An ambiguous wall-clock time
/// (DST fall-back) resolves to the earlier instant; a skipped one (DST
/// spring-forward gap) does not correspond to any instant.
fn resolve_local(naive: NaiveDateTime, tz: Tz) -> Result<DateTime<Utc>> {
    tz.from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| Error::InstantOutOfRange {
            context: format!("{naive} does not exist in {tz}"),
        })
}

/// Parse an arbitrary time input into a UTC instant.
///
/// Surrounding whitespace is ignored. Empty input and unparseable input are
/// errors; nothing ever falls back to the current time.
///
/// # Arguments
/// * `input` - the raw input string
/// * `now` - the current time, used for today-relative layouts
/// * `tz` - the timezone for interpreting naive calendar/clock strings
pub fn parse(input: &str, now: DateTime<Tz>, tz: Tz) -> Result<DateTime<Utc>> {
    let input = input.trim();
    match classify(input)? {
        InputKind::Numeric => parse_numeric(input),
        InputKind::Textual => parse_textual(input, now, tz),
    }
}
