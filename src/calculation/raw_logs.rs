//! Raw log view.
//!
//! Lists every punch per date without any schedule reconciliation, split at
//! noon into morning and afternoon punches.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use super::normalizer::{minutes_since_midnight, normalize_timestamp};
use super::period_aggregator::check_date_range;
use crate::config::EngineConfig;
use crate::error::EngineResult;
use crate::models::ClockPunch;

const NOON: u32 = 12 * 60;

/// All punches recorded on one date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawDayLogs {
    /// The calendar date.
    pub date: NaiveDate,
    /// Punches before 12:00, ascending.
    pub am_logs: Vec<NaiveTime>,
    /// Punches from 12:00 on, ascending.
    pub pm_logs: Vec<NaiveTime>,
    /// Whether the date is a weekend day.
    pub is_weekend: bool,
    /// `"Weekend"` on weekend days, empty otherwise.
    pub remarks: String,
}

/// Groups punches by date for every date in `[start, end]`.
///
/// Dates without punches are included with empty lists. Unreadable
/// timestamps are skipped. The range is limited like a computation's.
///
/// # Example
///
/// ```
/// use attendance_engine::calculation::group_raw_logs;
/// use attendance_engine::config::EngineConfig;
/// use attendance_engine::models::ClockPunch;
/// use chrono::NaiveDate;
///
/// let day = NaiveDate::from_ymd_opt(2025, 3, 3).unwrap();
/// let punches = vec![
///     ClockPunch::new("7", "2025-03-03 13:01:00"),
///     ClockPunch::new("7", "2025-03-03 07:58:00"),
/// ];
/// let logs = group_raw_logs(&punches, day, day, &EngineConfig::default()).unwrap();
/// assert_eq!(logs[0].am_logs.len(), 1);
/// assert_eq!(logs[0].pm_logs.len(), 1);
/// ```
pub fn group_raw_logs(
    punches: &[ClockPunch],
    start: NaiveDate,
    end: NaiveDate,
    config: &EngineConfig,
) -> EngineResult<Vec<RawDayLogs>> {
    check_date_range(start, end, config)?;

    let mut by_date: BTreeMap<NaiveDate, Vec<NaiveTime>> = BTreeMap::new();
    for normalized in punches.iter().filter_map(|p| normalize_timestamp(&p.timestamp)) {
        by_date.entry(normalized.date).or_default().push(normalized.time);
    }

    let days = start
        .iter_days()
        .take_while(|date| *date <= end)
        .map(|date| {
            let mut times = by_date.remove(&date).unwrap_or_default();
            times.sort_unstable();
            let (am_logs, pm_logs): (Vec<NaiveTime>, Vec<NaiveTime>) = times
                .into_iter()
                .partition(|t| minutes_since_midnight(*t) < NOON);

            let is_weekend = config.weekend_days().contains(&date.weekday());
            RawDayLogs {
                date,
                am_logs,
                pm_logs,
                is_weekend,
                remarks: if is_weekend { "Weekend".to_string() } else { String::new() },
            }
        })
        .collect();

    Ok(days)
}
