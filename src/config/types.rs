//! Configuration types for the attendance engine.
//!
//! [`EngineConfigFile`] mirrors `engine.yaml` as written on disk. It is
//! validated into an [`EngineConfig`], whose fields are private so the engine
//! can rely on its invariants (non-zero working day, ordered windows).

use chrono::Weekday;
use serde::Deserialize;

use crate::calculation::{
    DEFAULT_AM_CHECK_IN_WINDOW, DEFAULT_AM_CHECK_OUT_WINDOW, DEFAULT_PM_CHECK_IN_WINDOW,
    DEFAULT_PM_CHECK_OUT_WINDOW, TimeWindow,
};
use crate::error::{EngineError, EngineResult};
use crate::models::Checkpoint;

/// Minutes in one working day, used to turn lateness into day-equivalents.
pub const DEFAULT_MINUTES_PER_DAY: u32 = 480;

/// Decimal places kept on net days.
pub const DEFAULT_NET_DAYS_DECIMAL_PLACES: u32 = 4;

/// Decimal places kept on the equivalent days deducted.
pub const DEFAULT_DEDUCTION_DECIMAL_PLACES: u32 = 2;

/// Longest date range, in days, a single computation accepts.
pub const DEFAULT_MAX_RANGE_DAYS: u32 = 366;

/// A window as written in YAML (`start: "04:00"`, `end: "11:59"`).
#[derive(Debug, Clone, Deserialize)]
pub struct WindowConfig {
    /// First minute of the window, as clock text.
    pub start: String,
    /// Last minute of the window, as clock text.
    pub end: String,
}

/// Fallback windows as written in YAML. A missing entry means the
/// checkpoint has no fallback.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FallbackWindowsConfig {
    /// Fallback for the AM check-in.
    #[serde(default)]
    pub am_check_in: Option<WindowConfig>,
    /// Fallback for the AM check-out.
    #[serde(default)]
    pub am_check_out: Option<WindowConfig>,
    /// Fallback for the PM check-in.
    #[serde(default)]
    pub pm_check_in: Option<WindowConfig>,
    /// Fallback for the PM check-out.
    #[serde(default)]
    pub pm_check_out: Option<WindowConfig>,
}

/// The `engine.yaml` file structure.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfigFile {
    /// Per-checkpoint fallback windows.
    pub fallback_windows: FallbackWindowsConfig,
    /// Minutes in one working day.
    #[serde(default = "default_minutes_per_day")]
    pub minutes_per_day: u32,
    /// Decimal places kept on net days.
    #[serde(default = "default_net_days_decimal_places")]
    pub net_days_decimal_places: u32,
    /// Decimal places kept on the equivalent days deducted.
    #[serde(default = "default_deduction_decimal_places")]
    pub deduction_decimal_places: u32,
    /// Longest accepted date range, in days.
    #[serde(default = "default_max_range_days")]
    pub max_range_days: u32,
    /// Days of the week treated as weekend.
    #[serde(default = "default_weekend_days")]
    pub weekend_days: Vec<Weekday>,
}

fn default_minutes_per_day() -> u32 {
    DEFAULT_MINUTES_PER_DAY
}

fn default_net_days_decimal_places() -> u32 {
    DEFAULT_NET_DAYS_DECIMAL_PLACES
}

fn default_deduction_decimal_places() -> u32 {
    DEFAULT_DEDUCTION_DECIMAL_PLACES
}

fn default_max_range_days() -> u32 {
    DEFAULT_MAX_RANGE_DAYS
}

fn default_weekend_days() -> Vec<Weekday> {
    vec![Weekday::Sat, Weekday::Sun]
}

/// Resolved fallback windows, one optional window per checkpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FallbackWindows {
    windows: [Option<TimeWindow>; 4],
}

impl FallbackWindows {
    /// Creates fallbacks in checkpoint order (AM-in, AM-out, PM-in, PM-out).
    pub fn new(windows: [Option<TimeWindow>; 4]) -> Self {
        Self { windows }
    }

    /// Returns the fallback window for a checkpoint, if one is configured.
    pub fn get(&self, checkpoint: Checkpoint) -> Option<TimeWindow> {
        self.windows[checkpoint.index()]
    }
}

impl Default for FallbackWindows {
    fn default() -> Self {
        Self::new([
            Some(DEFAULT_AM_CHECK_IN_WINDOW),
            Some(DEFAULT_AM_CHECK_OUT_WINDOW),
            Some(DEFAULT_PM_CHECK_IN_WINDOW),
            Some(DEFAULT_PM_CHECK_OUT_WINDOW),
        ])
    }
}

/// The validated engine configuration.
///
/// # Example
///
/// ```
/// use attendance_engine::config::EngineConfig;
///
/// let config = EngineConfig::default();
/// assert_eq!(config.minutes_per_day(), 480);
/// assert_eq!(config.net_days_decimal_places(), 4);
/// assert_eq!(config.deduction_decimal_places(), 2);
/// assert_eq!(config.max_range_days(), 366);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    fallback_windows: FallbackWindows,
    minutes_per_day: u32,
    net_days_decimal_places: u32,
    deduction_decimal_places: u32,
    max_range_days: u32,
    weekend_days: Vec<Weekday>,
}

impl EngineConfig {
    /// Creates a configuration, rejecting a zero-length working day.
    pub fn new(
        fallback_windows: FallbackWindows,
        minutes_per_day: u32,
        net_days_decimal_places: u32,
        weekend_days: Vec<Weekday>,
    ) -> EngineResult<Self> {
        if minutes_per_day == 0 {
            return Err(EngineError::ConfigParseError {
                path: "minutes_per_day".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }

        Ok(Self {
            fallback_windows,
            minutes_per_day,
            net_days_decimal_places,
            deduction_decimal_places: DEFAULT_DEDUCTION_DECIMAL_PLACES,
            max_range_days: DEFAULT_MAX_RANGE_DAYS,
            weekend_days,
        })
    }

    /// Sets the decimal places kept on the equivalent days deducted.
    pub fn with_deduction_decimal_places(mut self, places: u32) -> Self {
        self.deduction_decimal_places = places;
        self
    }

    /// Sets the longest accepted date range, rejecting zero.
    pub fn with_max_range_days(mut self, days: u32) -> EngineResult<Self> {
        if days == 0 {
            return Err(EngineError::ConfigParseError {
                path: "max_range_days".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }
        self.max_range_days = days;
        Ok(self)
    }

    /// Returns the fallback windows.
    pub fn fallback_windows(&self) -> &FallbackWindows {
        &self.fallback_windows
    }

    /// Returns the minutes in one working day.
    pub fn minutes_per_day(&self) -> u32 {
        self.minutes_per_day
    }

    /// Returns the decimal places kept on net days.
    pub fn net_days_decimal_places(&self) -> u32 {
        self.net_days_decimal_places
    }

    /// Returns the decimal places kept on the equivalent days deducted.
    pub fn deduction_decimal_places(&self) -> u32 {
        self.deduction_decimal_places
    }

    /// Returns the longest accepted date range, in days.
    pub fn max_range_days(&self) -> u32 {
        self.max_range_days
    }

    /// Returns the weekend days.
    pub fn weekend_days(&self) -> &[Weekday] {
        &self.weekend_days
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            fallback_windows: FallbackWindows::default(),
            minutes_per_day: DEFAULT_MINUTES_PER_DAY,
            net_days_decimal_places: DEFAULT_NET_DAYS_DECIMAL_PLACES,
            deduction_decimal_places: DEFAULT_DEDUCTION_DECIMAL_PLACES,
            max_range_days: DEFAULT_MAX_RANGE_DAYS,
            weekend_days: default_weekend_days(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_fallbacks_match_constants() {
        let fallbacks = FallbackWindows::default();
        assert_eq!(
            fallbacks.get(Checkpoint::AmCheckIn),
            Some(TimeWindow::from_minutes(240, 719))
        );
        assert_eq!(
            fallbacks.get(Checkpoint::PmCheckOut),
            Some(TimeWindow::from_minutes(841, 1439))
        );
    }

    #[test]
    fn test_zero_minutes_per_day_rejected() {
        let result = EngineConfig::new(FallbackWindows::default(), 0, 4, vec![]);
        assert!(matches!(result, Err(EngineError::ConfigParseError { .. })));
    }

    #[test]
    fn test_default_weekend_is_saturday_and_sunday() {
        assert_eq!(
            EngineConfig::default().weekend_days(),
            &[Weekday::Sat, Weekday::Sun]
        );
    }

    #[test]
    fn test_config_file_defaults() {
        let yaml = "fallback_windows: {}\n";
        let file: EngineConfigFile = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(file.minutes_per_day, 480);
        assert_eq!(file.net_days_decimal_places, 4);
        assert_eq!(file.deduction_decimal_places, 2);
        assert_eq!(file.max_range_days, 366);
        assert!(file.fallback_windows.am_check_in.is_none());
    }

    #[test]
    fn test_zero_max_range_days_rejected() {
        let result = EngineConfig::default().with_max_range_days(0);
        assert!(matches!(result, Err(EngineError::ConfigParseError { .. })));
    }
}
