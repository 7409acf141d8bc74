//! Configuration loading and management for the attendance engine.
//!
//! This module loads the engine configuration (fallback windows, working-day
//! length, rounding and weekend days) from YAML.
//!
//! # Example
//!
//! ```no_run
//! use attendance_engine::config::ConfigLoader;
//!
//! let loader = ConfigLoader::load("./config/default").unwrap();
//! println!("Weekend: {:?}", loader.config().weekend_days());
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    DEFAULT_DEDUCTION_DECIMAL_PLACES, DEFAULT_MAX_RANGE_DAYS, DEFAULT_MINUTES_PER_DAY,
    DEFAULT_NET_DAYS_DECIMAL_PLACES, EngineConfig, EngineConfigFile, FallbackWindows,
    FallbackWindowsConfig, WindowConfig,
};
