//! Projection of an instant into timezone-relative display fields.

use chrono::{DateTime, SecondsFormat, TimeZone, Utc};
use chrono_tz::Tz;
use serde::Serialize;

use crate::errors::{Error, Result};

/// The normalized rendering of one instant in one timezone.
///
/// Every field is a pure function of the instant and the resolved zone; a
/// record is built fresh per call and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeInfo {
    /// RFC 3339 with a numeric offset; `Z` only when the offset is zero.
    pub iso8601: String,
    /// Seconds since the epoch, truncated.
    pub timestamp: i64,
    /// Milliseconds since the epoch, truncated.
    pub timestamp_ms: i64,
    /// Microseconds since the epoch, truncated.
    pub timestamp_us: i64,
    /// Local calendar date, `YYYY-MM-DD`.
    pub date: String,
    /// Local clock time, `HH:MM:SS`.
    pub time: String,
    /// Full English weekday name of the local date.
    pub weekday: String,
    /// Seconds timestamp of the start of the local calendar day.
    pub zero_timestamp: i64,
    /// Canonical name of the resolved zone.
    pub timezone: String,
}

impl TimeInfo {
    /// Project `instant` into `tz`.
    pub fn project(instant: DateTime<Utc>, tz: Tz) -> Result<TimeInfo> {
        let local = instant.with_timezone(&tz);
        let day_start = start_of_day(&local, tz).ok_or_else(|| Error::InstantOutOfRange {
            context: format!("no start of day for {local} in {tz}"),
        })?;

        Ok(TimeInfo {
            iso8601: local.to_rfc3339_opts(SecondsFormat::Secs, true),
            timestamp: local.timestamp(),
            timestamp_ms: local.timestamp_millis(),
            timestamp_us: local.timestamp_micros(),
            date: local.format("%Y-%m-%d").to_string(),
            time: local.format("%H:%M:%S").to_string(),
            weekday: local.format("%A").to_string(),
            zero_timestamp: day_start.timestamp(),
            timezone: tz.name().to_string(),
        })
    }
}

/// The first valid instant of the local calendar day containing `local`.
///
/// Usually plain midnight, but some zones spring forward at 00:00 and skip
/// it entirely; scan forward hour by hour until the day starts.
fn start_of_day(local: &DateTime<Tz>, tz: Tz) -> Option<DateTime<Tz>> {
    let date = local.date_naive();
    (0..24).find_map(|hour| {
        let naive = date.and_hms_opt(hour, 0, 0)?;
        tz.from_local_datetime(&naive).earliest()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeparse;

    fn utc() -> Tz {
        Tz::UTC
    }

    fn instant(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(secs, 0).unwrap()
    }

    #[test]
    fn test_project_epoch_utc() {
        let info = TimeInfo::project(instant(0), utc()).unwrap();
        assert_eq!(info.iso8601, "1970-01-01T00:00:00Z");
        assert_eq!(info.timestamp, 0);
        assert_eq!(info.timestamp_ms, 0);
        assert_eq!(info.timestamp_us, 0);
        assert_eq!(info.date, "1970-01-01");
        assert_eq!(info.time, "00:00:00");
        assert_eq!(info.weekday, "Thursday");
        assert_eq!(info.zero_timestamp, 0);
        assert_eq!(info.timezone, "UTC");
    }

    #[test]
    fn test_project_date_string_utc() {
        let now = utc().with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let parsed = timeparse::parse("2024-01-29", now, utc()).unwrap();
        let info = TimeInfo::project(parsed, utc()).unwrap();
        assert_eq!(info.date, "2024-01-29");
        assert_eq!(info.time, "00:00:00");
        assert_eq!(info.weekday, "Monday");
    }

    #[test]
    fn test_project_non_utc_offset_is_numeric() {
        // 2024-01-29T00:00:00Z is 08:00 the same day in Shanghai
        let tz: Tz = "Asia/Shanghai".parse().unwrap();
        let info = TimeInfo::project(instant(1_706_486_400), tz).unwrap();
        assert_eq!(info.iso8601, "2024-01-29T08:00:00+08:00");
        assert_eq!(info.date, "2024-01-29");
        assert_eq!(info.time, "08:00:00");
        assert_eq!(info.weekday, "Monday");
        assert_eq!(info.timezone, "Asia/Shanghai");
        // Local midnight is 16:00 UTC of the previous day
        assert_eq!(info.zero_timestamp, 1_706_457_600);
    }

    #[test]
    fn test_weekday_follows_local_date() {
        // Monday 15:00 UTC is already past midnight on Tuesday in Tokyo
        let tz: Tz = "Asia/Tokyo".parse().unwrap();
        let late_monday = instant(1_706_540_400); // 2024-01-29T15:00:00Z
        assert_eq!(
            TimeInfo::project(late_monday, utc()).unwrap().weekday,
            "Monday"
        );
        assert_eq!(TimeInfo::project(late_monday, tz).unwrap().weekday, "Tuesday");
    }

    #[test]
    fn test_zero_timestamp_bounds() {
        let tz: Tz = "America/New_York".parse().unwrap();
        for secs in [0, 1_706_486_400, 1_718_000_000] {
            let info = TimeInfo::project(instant(secs), tz).unwrap();
            assert!(info.zero_timestamp <= info.timestamp);
            assert!(info.timestamp < info.zero_timestamp + 86_400);
        }
    }

    #[test]
    fn test_zero_timestamp_when_midnight_is_skipped() {
        // Sao Paulo sprang forward at midnight on 2018-11-04; the local day
        // began at 01:00
        let tz: Tz = "America/Sao_Paulo".parse().unwrap();
        let noon = tz
            .with_ymd_and_hms(2018, 11, 4, 12, 0, 0)
            .single()
            .unwrap()
            .with_timezone(&Utc);
        let info = TimeInfo::project(noon, tz).unwrap();
        let day_start = tz.with_ymd_and_hms(2018, 11, 4, 1, 0, 0).single().unwrap();
        assert_eq!(info.zero_timestamp, day_start.timestamp());
    }

    #[test]
    fn test_sub_second_truncation() {
        let dt = DateTime::from_timestamp(12, 999_999_999).unwrap();
        let info = TimeInfo::project(dt, utc()).unwrap();
        assert_eq!(info.timestamp, 12);
        assert_eq!(info.timestamp_ms, 12_999);
        assert_eq!(info.timestamp_us, 12_999_999);
        // The ISO string shows whole seconds only
        assert_eq!(info.iso8601, "1970-01-01T00:00:12Z");
    }

    #[test]
    fn test_round_trip_second_timestamps() {
        for raw in ["0", "1706486400", "-86400"] {
            let parsed = timeparse::parse_numeric(raw).unwrap();
            let info = TimeInfo::project(parsed, utc()).unwrap();
            assert_eq!(info.timestamp, raw.parse::<i64>().unwrap());
        }
    }

    #[test]
    fn test_projection_is_deterministic() {
        let tz: Tz = "Europe/Paris".parse().unwrap();
        let a = TimeInfo::project(instant(1_706_486_400), tz).unwrap();
        let b = TimeInfo::project(instant(1_706_486_400), tz).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_wire_field_names() {
        let info = TimeInfo::project(instant(0), utc()).unwrap();
        let value = serde_json::to_value(&info).unwrap();
        for key in [
            "iso8601",
            "timestamp",
            "timestamp_ms",
            "timestamp_us",
            "date",
            "time",
            "weekday",
            "zero_timestamp",
            "timezone",
        ] {
            assert!(value.get(key).is_some(), "missing field {key}");
        }
    }
}
