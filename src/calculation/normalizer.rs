//! Literal timestamp normalization.
//!
//! Stored timestamps are already local wall-clock time. They are read digit by
//! digit and never pass through a timezone-aware type, so an ISO string such
//! as `2025-03-03T23:30:00.000Z` stays on March 3rd at 23:30.

use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveTime, Timelike};
use regex::Regex;

static DATE_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{4})-(\d{2})-(\d{2})").expect("valid date regex"));

static ISO_TIME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"T(\d{2}):(\d{2})").expect("valid ISO time regex"));

static ANY_TIME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{2}):(\d{2})").expect("valid time regex"));

/// The calendar date and clock time read from a raw timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizedTimestamp {
    /// The calendar date.
    pub date: NaiveDate,
    /// The clock time, truncated to the minute.
    pub time: NaiveTime,
}

impl NormalizedTimestamp {
    /// Minutes since midnight of the clock time.
    pub fn minute_of_day(&self) -> u32 {
        minutes_since_midnight(self.time)
    }
}

/// Reads the calendar date from the leading `YYYY-MM-DD` of a timestamp.
///
/// Returns `None` if the text does not start with that pattern or the digits
/// do not form a real date.
///
/// # Example
///
/// ```
/// use attendance_engine::calculation::extract_date;
/// use chrono::NaiveDate;
///
/// let expected = NaiveDate::from_ymd_opt(2025, 3, 3);
/// assert_eq!(extract_date("2025-03-03T23:30:00.000Z"), expected);
/// assert_eq!(extract_date("2025-03-03 08:05:00"), expected);
/// assert_eq!(extract_date("2025-03-03"), expected);
/// assert_eq!(extract_date("03/03/2025"), None);
/// ```
pub fn extract_date(raw: &str) -> Option<NaiveDate> {
    let captures = DATE_PREFIX.captures(raw.trim())?;
    let year = captures[1].parse().ok()?;
    let month = captures[2].parse().ok()?;
    let day = captures[3].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Reads the `HH:MM` clock time from a timestamp or a bare time string.
///
/// A `T`-separated ISO time wins; otherwise the first `HH:MM` group is used.
/// Seconds are ignored.
///
/// # Example
///
/// ```
/// use attendance_engine::calculation::extract_clock_time;
/// use chrono::NaiveTime;
///
/// let expected = NaiveTime::from_hms_opt(8, 5, 0);
/// assert_eq!(extract_clock_time("2025-03-03T08:05:59.000Z"), expected);
/// assert_eq!(extract_clock_time("2025-03-03 08:05:00"), expected);
/// assert_eq!(extract_clock_time("08:05"), expected);
/// assert_eq!(extract_clock_time("2025-03-03"), None);
/// ```
pub fn extract_clock_time(raw: &str) -> Option<NaiveTime> {
    let raw = raw.trim();
    let captures = ISO_TIME
        .captures(raw)
        .or_else(|| ANY_TIME.captures(raw))?;
    let hour = captures[1].parse().ok()?;
    let minute = captures[2].parse().ok()?;
    NaiveTime::from_hms_opt(hour, minute, 0)
}

/// Reads both the date and the clock time from a punch timestamp.
///
/// Returns `None` if either part is missing; such a punch cannot be placed
/// on a day or in a window.
pub fn normalize_timestamp(raw: &str) -> Option<NormalizedTimestamp> {
    Some(NormalizedTimestamp {
        date: extract_date(raw)?,
        time: extract_clock_time(raw)?,
    })
}

/// Minutes since midnight for a clock time.
pub fn minutes_since_midnight(time: NaiveTime) -> u32 {
    time.hour() * 60 + time.minute()
}

/// Converts minutes since midnight back to a clock time.
pub fn time_from_minutes(minutes: u32) -> Option<NaiveTime> {
    NaiveTime::from_hms_opt(minutes / 60, minutes % 60, 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_utc_suffix_is_not_converted() {
        let normalized = normalize_timestamp("2025-03-03T23:30:00.000Z").unwrap();
        assert_eq!(normalized.date, date(2025, 3, 3));
        assert_eq!(normalized.time, time(23, 30));
    }

    #[test]
    fn test_offset_suffix_is_not_converted() {
        let normalized = normalize_timestamp("2025-03-03T00:15:00+08:00").unwrap();
        assert_eq!(normalized.date, date(2025, 3, 3));
        assert_eq!(normalized.time, time(0, 15));
    }

    #[test]
    fn test_space_separated_timestamp() {
        let normalized = normalize_timestamp("  2025-12-31 17:45:10  ").unwrap();
        assert_eq!(normalized.date, date(2025, 12, 31));
        assert_eq!(normalized.minute_of_day(), 17 * 60 + 45);
    }

    #[test]
    fn test_date_only_has_no_time() {
        assert_eq!(extract_date("2025-03-03"), Some(date(2025, 3, 3)));
        assert_eq!(normalize_timestamp("2025-03-03"), None);
    }

    #[test]
    fn test_unmatched_date_fails_silently() {
        assert_eq!(extract_date(""), None);
        assert_eq!(extract_date("March 3, 2025 08:00"), None);
        assert_eq!(normalize_timestamp("3/3/2025 08:00"), None);
    }

    #[test]
    fn test_impossible_date_rejected() {
        assert_eq!(extract_date("2025-02-30T08:00:00"), None);
        assert_eq!(extract_date("2025-13-01"), None);
    }

    #[test]
    fn test_impossible_time_rejected() {
        assert_eq!(extract_clock_time("2025-03-03T25:00:00"), None);
        assert_eq!(extract_clock_time("12:75"), None);
    }

    #[test]
    fn test_iso_time_preferred_over_other_groups() {
        // The offset also looks like HH:MM; the T-separated time must win.
        assert_eq!(
            extract_clock_time("2025-03-03T09:10:00+08:00"),
            Some(time(9, 10))
        );
    }

    #[test]
    fn test_minutes_roundtrip() {
        assert_eq!(minutes_since_midnight(time(23, 59)), 1439);
        assert_eq!(time_from_minutes(1439), Some(time(23, 59)));
        assert_eq!(time_from_minutes(0), Some(time(0, 0)));
        assert_eq!(time_from_minutes(24 * 60), None);
    }
}
