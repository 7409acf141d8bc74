//! Day-credit classification.
//!
//! Turns the presence or absence of the four selected punches into a credit of
//! a whole day, half a day or nothing. The table is ordered and the first
//! matching row wins; every one of the 16 combinations lands on exactly one
//! value.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::Checkpoint;

/// Which of the four checkpoints have a selected punch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CheckpointPresence {
    /// AM check-in present.
    pub am_check_in: bool,
    /// AM check-out present.
    pub am_check_out: bool,
    /// PM check-in present.
    pub pm_check_in: bool,
    /// PM check-out present.
    pub pm_check_out: bool,
}

impl CheckpointPresence {
    /// Builds presence flags in checkpoint order.
    pub fn new([am_check_in, am_check_out, pm_check_in, pm_check_out]: [bool; 4]) -> Self {
        Self {
            am_check_in,
            am_check_out,
            pm_check_in,
            pm_check_out,
        }
    }

    /// Returns the flag for one checkpoint.
    pub fn is_present(&self, checkpoint: Checkpoint) -> bool {
        match checkpoint {
            Checkpoint::AmCheckIn => self.am_check_in,
            Checkpoint::AmCheckOut => self.am_check_out,
            Checkpoint::PmCheckIn => self.pm_check_in,
            Checkpoint::PmCheckOut => self.pm_check_out,
        }
    }

    /// Returns true if any punch was selected.
    pub fn any(&self) -> bool {
        self.am_check_in || self.am_check_out || self.pm_check_in || self.pm_check_out
    }
}

/// The credit a day earns from its punches alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayCredit {
    /// A whole day.
    Full,
    /// Half a day.
    Half,
    /// Nothing.
    Zero,
}

impl DayCredit {
    /// The credit as a number of days.
    ///
    /// # Example
    ///
    /// ```
    /// use attendance_engine::calculation::DayCredit;
    /// use rust_decimal::Decimal;
    ///
    /// assert_eq!(DayCredit::Full.value(), Decimal::ONE);
    /// assert_eq!(DayCredit::Half.value(), Decimal::new(5, 1));
    /// assert_eq!(DayCredit::Zero.value(), Decimal::ZERO);
    /// ```
    pub fn value(self) -> Decimal {
        match self {
            DayCredit::Full => Decimal::ONE,
            DayCredit::Half => Decimal::new(5, 1),
            DayCredit::Zero => Decimal::ZERO,
        }
    }
}

/// Classifies a day's credit from which checkpoints have a punch.
///
/// Rows, first match wins (`in`/`out` = present, `-` = absent, `*` = either):
///
/// | AM in | AM out | PM in | PM out | credit |
/// |-------|--------|-------|--------|--------|
/// | in    | out    | in    | out    | 1.0    |
/// | in    | out    | -     | out    | 1.0    |
/// | in    | -      | in    | out    | 1.0    |
/// | in    | *      | *     | out    | 1.0    |
/// | in    | out    | -     | -      | 0.5    |
/// | -     | -      | in    | out    | 0.5    |
/// | -     | out    | in    | out    | 0.5    |
/// | in    | out    | in    | -      | 0.5    |
/// | in    | -      | in    | -      | 0.5    |
/// | -     | out    | -     | out    | 0.5    |
/// | otherwise                      || 0      |
///
/// # Example
///
/// ```
/// use attendance_engine::calculation::{CheckpointPresence, DayCredit, classify_day_credit};
///
/// let morning_only = CheckpointPresence::new([true, true, false, false]);
/// assert_eq!(classify_day_credit(morning_only), DayCredit::Half);
///
/// let in_and_out = CheckpointPresence::new([true, false, false, true]);
/// assert_eq!(classify_day_credit(in_and_out), DayCredit::Full);
/// ```
pub fn classify_day_credit(presence: CheckpointPresence) -> DayCredit {
    let CheckpointPresence {
        am_check_in: ai,
        am_check_out: ao,
        pm_check_in: pi,
        pm_check_out: po,
    } = presence;

    match (ai, ao, pi, po) {
        (true, true, true, true) => DayCredit::Full,
        (true, true, false, true) => DayCredit::Full,
        (true, false, true, true) => DayCredit::Full,
        (true, _, _, true) => DayCredit::Full,
        (true, true, false, false) => DayCredit::Half,
        (false, false, true, true) => DayCredit::Half,
        (false, true, true, true) => DayCredit::Half,
        (true, true, true, false) => DayCredit::Half,
        (true, false, true, false) => DayCredit::Half,
        (false, true, false, true) => DayCredit::Half,
        _ => DayCredit::Zero,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn presence(bits: u8) -> CheckpointPresence {
        CheckpointPresence::new([bits & 8 != 0, bits & 4 != 0, bits & 2 != 0, bits & 1 != 0])
    }

    #[test]
    fn test_exhaustive_table() {
        // Bits: AM-in, AM-out, PM-in, PM-out.
        let expected = [
            (0b0000, DayCredit::Zero),
            (0b0001, DayCredit::Zero),
            (0b0010, DayCredit::Zero),
            (0b0011, DayCredit::Half),
            (0b0100, DayCredit::Zero),
            (0b0101, DayCredit::Half),
            (0b0110, DayCredit::Zero),
            (0b0111, DayCredit::Half),
            (0b1000, DayCredit::Zero),
            (0b1001, DayCredit::Full),
            (0b1010, DayCredit::Half),
            (0b1011, DayCredit::Full),
            (0b1100, DayCredit::Half),
            (0b1101, DayCredit::Full),
            (0b1110, DayCredit::Half),
            (0b1111, DayCredit::Full),
        ];

        for (bits, credit) in expected {
            assert_eq!(
                classify_day_credit(presence(bits)),
                credit,
                "combination {:04b}",
                bits
            );
        }
    }

    #[test]
    fn test_value_distribution() {
        let credits: Vec<DayCredit> = (0..16u8).map(|b| classify_day_credit(presence(b))).collect();
        assert_eq!(credits.iter().filter(|&&c| c == DayCredit::Full).count(), 4);
        assert_eq!(credits.iter().filter(|&&c| c == DayCredit::Half).count(), 6);
        assert_eq!(credits.iter().filter(|&&c| c == DayCredit::Zero).count(), 6);
    }

    #[test]
    fn test_single_punch_earns_nothing() {
        for checkpoint in Checkpoint::ALL {
            let mut flags = [false; 4];
            flags[checkpoint.index()] = true;
            assert_eq!(
                classify_day_credit(CheckpointPresence::new(flags)),
                DayCredit::Zero,
                "{checkpoint} alone"
            );
        }
    }

    #[test]
    fn test_presence_accessors() {
        let p = CheckpointPresence::new([true, false, false, true]);
        assert!(p.is_present(Checkpoint::AmCheckIn));
        assert!(!p.is_present(Checkpoint::PmCheckIn));
        assert!(p.any());
        assert!(!CheckpointPresence::default().any());
    }

    proptest! {
        #[test]
        fn prop_am_in_and_pm_out_is_always_full(ao in any::<bool>(), pi in any::<bool>()) {
            let p = CheckpointPresence::new([true, ao, pi, true]);
            prop_assert_eq!(classify_day_credit(p), DayCredit::Full);
        }

        #[test]
        fn prop_credit_is_one_of_three_values(bits in 0u8..16) {
            let value = classify_day_credit(presence(bits)).value();
            prop_assert!(value == Decimal::ZERO || value == Decimal::new(5, 1) || value == Decimal::ONE);
        }

        #[test]
        fn prop_adding_a_punch_never_lowers_credit_from_full(bits in 0u8..16, extra in 0u8..4) {
            let before = classify_day_credit(presence(bits));
            let after = classify_day_credit(presence(bits | (1 << extra)));
            if before == DayCredit::Full {
                prop_assert_eq!(after, DayCredit::Full);
            }
        }
    }
}
