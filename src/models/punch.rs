//! Clock punch model.

use serde::{Deserialize, Serialize};

/// A single biometric clock event as stored by the punch store.
///
/// The timestamp is kept as the raw stored text. It is already local wall-clock
/// time and is only ever read literally by the normalizer.
///
/// # Example
///
/// ```
/// use attendance_engine::models::ClockPunch;
///
/// let punch = ClockPunch::new("1042", "2025-03-03 08:05:12");
/// assert_eq!(punch.employee_id, "1042");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClockPunch {
    /// The employee the punch belongs to.
    pub employee_id: String,
    /// The raw stored timestamp, e.g. `2025-03-03T08:05:00` or `2025-03-03 08:05:00`.
    pub timestamp: String,
}

impl ClockPunch {
    /// Creates a punch for an employee.
    pub fn new(employee_id: impl Into<String>, timestamp: impl Into<String>) -> Self {
        Self {
            employee_id: employee_id.into(),
            timestamp: timestamp.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_punch() {
        let json = r#"{"employee_id": "1042", "timestamp": "2025-03-03T08:05:00.000Z"}"#;
        let punch: ClockPunch = serde_json::from_str(json).unwrap();
        assert_eq!(punch, ClockPunch::new("1042", "2025-03-03T08:05:00.000Z"));
    }
}
