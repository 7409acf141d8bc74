//! Configuration loader.
//!
//! This module reads `engine.yaml` from a configuration directory and
//! validates it into an [`EngineConfig`].

use std::fs;
use std::path::Path;

use tracing::debug;

use super::types::{EngineConfig, EngineConfigFile, FallbackWindows, WindowConfig};
use crate::calculation::{TimeWindow, extract_clock_time};
use crate::error::{EngineError, EngineResult};

/// Loads and provides access to the engine configuration.
///
/// # Example
///
/// ```no_run
/// use attendance_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/default").unwrap();
/// println!("Working day: {} minutes", loader.config().minutes_per_day());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    config: EngineConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration directory (e.g., "./config/default")
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` on success, or an error if:
    /// - `engine.yaml` is missing
    /// - the file contains invalid YAML
    /// - a window bound is not a clock time, or a window ends before it starts
    /// - `minutes_per_day` or `max_range_days` is zero
    ///
    /// # Example
    ///
    /// ```no_run
    /// use attendance_engine::config::ConfigLoader;
    ///
    /// let loader = ConfigLoader::load("./config/default")?;
    /// # Ok::<(), attendance_engine::error::EngineError>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let engine_path = path.as_ref().join("engine.yaml");
        let file = Self::load_yaml::<EngineConfigFile>(&engine_path)?;
        let path_str = engine_path.display().to_string();

        let fallbacks = &file.fallback_windows;
        let fallback_windows = FallbackWindows::new([
            Self::resolve_window(&path_str, "am_check_in", fallbacks.am_check_in.as_ref())?,
            Self::resolve_window(&path_str, "am_check_out", fallbacks.am_check_out.as_ref())?,
            Self::resolve_window(&path_str, "pm_check_in", fallbacks.pm_check_in.as_ref())?,
            Self::resolve_window(&path_str, "pm_check_out", fallbacks.pm_check_out.as_ref())?,
        ]);

        let config = EngineConfig::new(
            fallback_windows,
            file.minutes_per_day,
            file.net_days_decimal_places,
            file.weekend_days,
        )
        .and_then(|config| {
            config
                .with_deduction_decimal_places(file.deduction_decimal_places)
                .with_max_range_days(file.max_range_days)
        })
        .map_err(|err| EngineError::ConfigParseError {
            path: path_str.clone(),
            message: err.to_string(),
        })?;

        debug!(path = %path_str, "Loaded engine configuration");
        Ok(Self { config })
    }

    /// Wraps an already-built configuration.
    pub fn from_config(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Converts a YAML window into minutes, validating both bounds.
    fn resolve_window(
        path: &str,
        name: &str,
        window: Option<&WindowConfig>,
    ) -> EngineResult<Option<TimeWindow>> {
        let Some(window) = window else {
            return Ok(None);
        };

        let parse = |text: &str| {
            extract_clock_time(text).ok_or_else(|| EngineError::ConfigParseError {
                path: path.to_string(),
                message: format!("fallback_windows.{}: '{}' is not a clock time", name, text),
            })
        };

        let resolved = TimeWindow::new(parse(&window.start)?, parse(&window.end)?);
        if resolved.start > resolved.end {
            return Err(EngineError::ConfigParseError {
                path: path.to_string(),
                message: format!("fallback_windows.{}: window ends before it starts", name),
            });
        }

        Ok(Some(resolved))
    }

    /// Returns the underlying engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}
