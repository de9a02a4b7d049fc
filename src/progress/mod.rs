//! Progress engine.
//!
//! Pure computation over tracker counters: every function takes the current
//! state plus a requested change and returns either the next state together
//! with its completion percentage, or a [`ProgressError`]. Nothing in here
//! touches the store or the clock.

pub mod attendance;
pub mod budget;
pub mod expense;
pub mod habit;

use serde::Serialize;
use thiserror::Error;

/// Why the engine refused a change
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProgressError {
    #[error("{field} cannot go below {floor}")]
    BelowFloor { field: &'static str, floor: i64 },

    #[error("{field} cannot exceed {ceiling}")]
    AboveCeiling { field: &'static str, ceiling: i64 },

    #[error("{field} must be greater than zero")]
    NotPositive { field: &'static str },

    #[error("{field} must not be negative")]
    Negative { field: &'static str },

    #[error("{field} must be a finite number")]
    NotFinite { field: &'static str },

    #[error("{field} change must not be zero")]
    ZeroDelta { field: &'static str },
}

impl ProgressError {
    /// True when the change was well-formed but would leave the counter outside its bounds
    pub fn is_boundary(&self) -> bool {
        matches!(self, ProgressError::BelowFloor { .. } | ProgressError::AboveCeiling { .. })
    }

    /// Wire name of the field the error refers to
    pub fn field(&self) -> &'static str {
        match self {
            ProgressError::BelowFloor { field, .. }
            | ProgressError::AboveCeiling { field, .. }
            | ProgressError::NotPositive { field }
            | ProgressError::Negative { field }
            | ProgressError::NotFinite { field }
            | ProgressError::ZeroDelta { field } => field,
        }
    }
}

/// Next state of a tracker plus its derived completion percentage
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Progress<S> {
    pub state: S,
    pub percentage: f64,
}

/// Completion percentage in `[0, 100]`.
///
/// A zero or negative denominator yields 0 rather than NaN or infinity, and
/// numerators above the denominator are displayed as 100.
pub fn percentage(numerator: f64, denominator: f64) -> f64 {
    if !numerator.is_finite() || !denominator.is_finite() || denominator <= 0.0 {
        return 0.0;
    }
    (100.0 * numerator / denominator).clamp(0.0, 100.0)
}

/// `current + delta`.
///
/// An increment is rejected when it would pass `ceiling`, a decrement when it
/// would drop below `floor`. Each direction only checks its own bound, so a
/// counter left above a lowered ceiling can still be walked back down.
pub fn accumulate(
    field: &'static str,
    current: i32,
    delta: i32,
    floor: i32,
    ceiling: i32,
) -> Result<i32, ProgressError> {
    require_non_zero(field, delta)?;
    let next = i64::from(current) + i64::from(delta);
    if delta > 0 && next > i64::from(ceiling) {
        return Err(ProgressError::AboveCeiling { field, ceiling: i64::from(ceiling) });
    }
    if delta < 0 && next < i64::from(floor) {
        return Err(ProgressError::BelowFloor { field, floor: i64::from(floor) });
    }
    // Lies between floor and current, or between current and ceiling
    Ok(next as i32)
}

pub fn require_non_zero(field: &'static str, delta: i32) -> Result<(), ProgressError> {
    if delta == 0 {
        return Err(ProgressError::ZeroDelta { field });
    }
    Ok(())
}

pub fn require_positive_count(field: &'static str, value: i32) -> Result<i32, ProgressError> {
    if value <= 0 {
        return Err(ProgressError::NotPositive { field });
    }
    Ok(value)
}

pub fn require_positive_amount(field: &'static str, value: f64) -> Result<f64, ProgressError> {
    if !value.is_finite() {
        return Err(ProgressError::NotFinite { field });
    }
    if value <= 0.0 {
        return Err(ProgressError::NotPositive { field });
    }
    Ok(value)
}

pub fn require_non_negative_amount(field: &'static str, value: f64) -> Result<f64, ProgressError> {
    if !value.is_finite() {
        return Err(ProgressError::NotFinite { field });
    }
    if value < 0.0 {
        return Err(ProgressError::Negative { field });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentage_of_zero_denominator_is_zero() {
        assert_eq!(percentage(0.0, 0.0), 0.0);
        assert_eq!(percentage(5.0, 0.0), 0.0);
        assert_eq!(percentage(5.0, -3.0), 0.0);
        assert_eq!(percentage(f64::NAN, 10.0), 0.0);
    }

    #[test]
    fn percentage_is_clamped_to_hundred() {
        assert_eq!(percentage(3.0, 10.0), 30.0);
        assert_eq!(percentage(10.0, 10.0), 100.0);
        assert_eq!(percentage(2000.0, 1000.0), 100.0);
    }

    #[test]
    fn percentage_is_monotonic_in_numerator() {
        let mut previous = 0.0;
        for n in 0..=30 {
            let p = percentage(f64::from(n), 17.0);
            assert!(p >= previous, "{p} < {previous} at n={n}");
            previous = p;
        }
    }

    #[test]
    fn accumulate_respects_bounds() {
        assert_eq!(accumulate("achieved", 3, 4, 0, 10), Ok(7));
        assert_eq!(accumulate("achieved", 3, 7, 0, 10), Ok(10));
        assert_eq!(accumulate("achieved", 3, -3, 0, 10), Ok(0));
        assert_eq!(
            accumulate("achieved", 3, 8, 0, 10),
            Err(ProgressError::AboveCeiling { field: "achieved", ceiling: 10 })
        );
        assert_eq!(
            accumulate("achieved", 3, -4, 0, 10),
            Err(ProgressError::BelowFloor { field: "achieved", floor: 0 })
        );
    }

    #[test]
    fn accumulate_rejects_zero_and_survives_overflow() {
        assert_eq!(accumulate("achieved", 1, 0, 0, 10), Err(ProgressError::ZeroDelta { field: "achieved" }));
        assert!(accumulate("achieved", i32::MAX, i32::MAX, 0, i32::MAX).is_err());
        assert!(accumulate("achieved", 0, i32::MIN, 0, 10).is_err());
    }

    #[test]
    fn accumulate_walks_down_from_above_a_lowered_ceiling() {
        assert_eq!(accumulate("achieved", 8, -1, 0, 4), Ok(7));
        assert_eq!(accumulate("achieved", 8, -8, 0, 4), Ok(0));
        assert_eq!(
            accumulate("achieved", 8, 1, 0, 4),
            Err(ProgressError::AboveCeiling { field: "achieved", ceiling: 4 })
        );
        assert_eq!(
            accumulate("achieved", 8, -9, 0, 4),
            Err(ProgressError::BelowFloor { field: "achieved", floor: 0 })
        );
    }

    #[test]
    fn amount_checks() {
        assert!(require_positive_amount("goal", 0.0).is_err());
        assert!(require_positive_amount("goal", f64::INFINITY).is_err());
        assert_eq!(require_positive_amount("goal", 12.5), Ok(12.5));
        assert_eq!(require_non_negative_amount("saving", 0.0), Ok(0.0));
        assert!(require_non_negative_amount("saving", -0.01).is_err());
    }
}
