//! Signed calendar/clock offsets.
//!
//! A shift is applied once, between parsing and projection, and in the
//! target timezone so that day and month steps follow the local calendar
//! instead of fixed second counts.

use chrono::{DateTime, Days, Duration, Months, Utc};
use chrono_tz::Tz;
use regex::Regex;

use crate::errors::{Error, Result};

/// A signed calendar/clock offset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShiftSpec {
    pub years: i32,
    pub months: i32,
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

impl ShiftSpec {
    pub fn is_zero(&self) -> bool {
        *self == ShiftSpec::default()
    }

    /// Merge two specs unit-wise.
    pub fn combine(self, other: ShiftSpec) -> ShiftSpec {
        ShiftSpec {
            years: self.years.saturating_add(other.years),
            months: self.months.saturating_add(other.months),
            days: self.days.saturating_add(other.days),
            hours: self.hours.saturating_add(other.hours),
            minutes: self.minutes.saturating_add(other.minutes),
            seconds: self.seconds.saturating_add(other.seconds),
        }
    }

    /// Parse a compact shift expression like `+2d`, `-3h30m` or `1y6mo`.
    ///
    /// Units: `y` years, `mo` months, `w` weeks, `d` days, `h` hours,
    /// `m` minutes, `s` seconds. The sign of a token carries over to the
    /// following unsigned ones, so `-3h30m` means minus three and a half
    /// hours.
    pub fn parse(expr: &str) -> Result<ShiftSpec> {
        let invalid = || Error::InvalidShift {
            raw: expr.to_string(),
        };

        let token = Regex::new(r"^([+-]?)(\d+)\s*(mo|y|w|d|h|m|s)\s*").map_err(|_| invalid())?;

        let mut spec = ShiftSpec::default();
        let mut rest = expr.trim();
        if rest.is_empty() {
            return Err(invalid());
        }

        let mut sign: i64 = 1;
        while !rest.is_empty() {
            let caps = token.captures(rest).ok_or_else(invalid)?;
            match &caps[1] {
                "-" => sign = -1,
                "+" => sign = 1,
                _ => {}
            }
            let value = caps[2]
                .parse::<i64>()
                .ok()
                .and_then(|v| v.checked_mul(sign))
                .ok_or_else(invalid)?;
            let calendar = i32::try_from(value).ok();
            match &caps[3] {
                "y" => {
                    spec.years = calendar
                        .and_then(|v| spec.years.checked_add(v))
                        .ok_or_else(invalid)?
                }
                "mo" => {
                    spec.months = calendar
                        .and_then(|v| spec.months.checked_add(v))
                        .ok_or_else(invalid)?
                }
                "w" => {
                    spec.days = value
                        .checked_mul(7)
                        .and_then(|v| spec.days.checked_add(v))
                        .ok_or_else(invalid)?
                }
                "d" => spec.days = spec.days.checked_add(value).ok_or_else(invalid)?,
                "h" => spec.hours = spec.hours.checked_add(value).ok_or_else(invalid)?,
                "m" => spec.minutes = spec.minutes.checked_add(value).ok_or_else(invalid)?,
                "s" => spec.seconds = spec.seconds.checked_add(value).ok_or_else(invalid)?,
                _ => return Err(invalid()),
            }
            let end = caps.get(0).map(|m| m.end()).ok_or_else(invalid)?;
            rest = &rest[end..];
        }

        Ok(spec)
    }

    /// Apply the shift to `instant`, calendar-aware in `tz`.
    ///
    /// Year, month and day steps move through the local calendar (month
    /// steps clamp to month ends, day steps keep the local clock time
    /// across DST); hour, minute and second steps are exact durations.
    pub fn apply(&self, instant: DateTime<Utc>, tz: Tz) -> Result<DateTime<Utc>> {
        let out_of_range = || Error::InstantOutOfRange {
            context: format!("shifting {instant} by {self:?}"),
        };

        let mut local = instant.with_timezone(&tz);

        let months = i64::from(self.years) * 12 + i64::from(self.months);
        if months != 0 {
            let magnitude = u32::try_from(months.unsigned_abs()).map_err(|_| out_of_range())?;
            local = if months > 0 {
                local.checked_add_months(Months::new(magnitude))
            } else {
                local.checked_sub_months(Months::new(magnitude))
            }
            .ok_or_else(out_of_range)?;
        }

        if self.days != 0 {
            let magnitude = Days::new(self.days.unsigned_abs());
            local = if self.days > 0 {
                local.checked_add_days(magnitude)
            } else {
                local.checked_sub_days(magnitude)
            }
            .ok_or_else(out_of_range)?;
        }

        let clock = Duration::try_hours(self.hours)
            .and_then(|d| Duration::try_minutes(self.minutes).and_then(|m| d.checked_add(&m)))
            .and_then(|d| Duration::try_seconds(self.seconds).and_then(|s| d.checked_add(&s)))
            .ok_or_else(out_of_range)?;
        let shifted = local.checked_add_signed(clock).ok_or_else(out_of_range)?;

        Ok(shifted.with_timezone(&Utc))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use chrono_tz::America::New_York;

    const TEST_TZ: Tz = New_York;

    fn utc_at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    #[test]
    fn test_parse_single_unit() {
        assert_eq!(
            ShiftSpec::parse("+2d").unwrap(),
            ShiftSpec {
                days: 2,
                ..Default::default()
            }
        );
        assert_eq!(
            ShiftSpec::parse("-1y").unwrap(),
            ShiftSpec {
                years: -1,
                ..Default::default()
            }
        );
        assert_eq!(
            ShiftSpec::parse("45s").unwrap(),
            ShiftSpec {
                seconds: 45,
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_parse_sign_carries_over() {
        assert_eq!(
            ShiftSpec::parse("-3h30m").unwrap(),
            ShiftSpec {
                hours: -3,
                minutes: -30,
                ..Default::default()
            }
        );
        assert_eq!(
            ShiftSpec::parse("-1d+6h").unwrap(),
            ShiftSpec {
                days: -1,
                hours: 6,
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_parse_compound() {
        assert_eq!(
            ShiftSpec::parse("1y6mo").unwrap(),
            ShiftSpec {
                years: 1,
                months: 6,
                ..Default::default()
            }
        );
        assert_eq!(
            ShiftSpec::parse("2w").unwrap(),
            ShiftSpec {
                days: 14,
                ..Default::default()
            }
        );
        // Weeks and days accumulate into the same unit
        assert_eq!(
            ShiftSpec::parse("2w3d").unwrap(),
            ShiftSpec {
                days: 17,
                ..Default::default()
            }
        );
        assert_eq!(
            ShiftSpec::parse("1d 2h 3m").unwrap(),
            ShiftSpec {
                days: 1,
                hours: 2,
                minutes: 3,
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_parse_invalid() {
        for expr in ["", "abc", "3x", "d3", "1.5h", "--2d"] {
            assert!(
                matches!(ShiftSpec::parse(expr), Err(Error::InvalidShift { .. })),
                "expected {expr:?} to be rejected"
            );
        }
    }

    #[test]
    fn test_combine() {
        let total = ShiftSpec::parse("1d").unwrap().combine(ShiftSpec::parse("-2h").unwrap());
        assert_eq!(
            total,
            ShiftSpec {
                days: 1,
                hours: -2,
                ..Default::default()
            }
        );
        assert!(ShiftSpec::default().is_zero());
        assert!(!total.is_zero());
    }

    #[test]
    fn test_apply_exact_clock_units() {
        let spec = ShiftSpec::parse("3h30m").unwrap();
        let start = utc_at(2024, 1, 29, 0, 0, 0);
        let shifted = spec.apply(start, Tz::UTC).unwrap();
        assert_eq!(shifted.timestamp() - start.timestamp(), 12_600);
    }

    #[test]
    fn test_apply_day_keeps_local_clock_across_dst() {
        // New York springs forward on 2025-03-09; the calendar day is 23
        // real hours long
        let start = TEST_TZ
            .with_ymd_and_hms(2025, 3, 8, 9, 0, 0)
            .single()
            .unwrap()
            .with_timezone(&Utc);
        let shifted = ShiftSpec::parse("1d").unwrap().apply(start, TEST_TZ).unwrap();
        let local = shifted.with_timezone(&TEST_TZ);
        assert_eq!(local.format("%Y-%m-%d %H:%M:%S").to_string(), "2025-03-09 09:00:00");
        assert_eq!(shifted.timestamp() - start.timestamp(), 23 * 3600);
    }

    #[test]
    fn test_apply_month_clamps_to_month_end() {
        let start = utc_at(2024, 1, 31, 12, 0, 0);
        let shifted = ShiftSpec::parse("1mo").unwrap().apply(start, Tz::UTC).unwrap();
        assert_eq!(shifted, utc_at(2024, 2, 29, 12, 0, 0));

        let back = ShiftSpec::parse("-1mo").unwrap().apply(shifted, Tz::UTC).unwrap();
        assert_eq!(back, utc_at(2024, 1, 29, 12, 0, 0));
    }

    #[test]
    fn test_apply_year() {
        let start = utc_at(2024, 2, 29, 0, 0, 0);
        // Feb 29 plus one year clamps to Feb 28
        let shifted = ShiftSpec::parse("1y").unwrap().apply(start, Tz::UTC).unwrap();
        assert_eq!(shifted, utc_at(2025, 2, 28, 0, 0, 0));
    }

    #[test]
    fn test_apply_out_of_range() {
        let spec = ShiftSpec {
            years: i32::MAX,
            ..Default::default()
        };
        assert!(matches!(
            spec.apply(utc_at(2024, 1, 1, 0, 0, 0), Tz::UTC),
            Err(Error::InstantOutOfRange { .. })
        ));
    }
}
