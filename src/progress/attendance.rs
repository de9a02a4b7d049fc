use serde::Serialize;

use super::{accumulate, percentage, require_non_zero, require_positive_count, Progress, ProgressError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AttendanceState {
    pub total_class: i32,
    pub class_attended: i32,
    pub completed: bool,
}

impl AttendanceState {
    pub fn percentage(&self) -> f64 {
        percentage(f64::from(self.class_attended), f64::from(self.total_class))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttendanceChange {
    /// Signed change to the number of scheduled classes
    AddTotalClass(i32),
    /// Signed change to the number of attended classes
    AddClassAttended(i32),
    /// Flip the stored completion flag
    ToggleCompleted,
}

impl AttendanceChange {
    pub fn validate(&self) -> Result<(), ProgressError> {
        match *self {
            AttendanceChange::AddTotalClass(delta) => require_non_zero("incrementTotalClass", delta),
            AttendanceChange::AddClassAttended(delta) => require_non_zero("incrementClassAttended", delta),
            AttendanceChange::ToggleCompleted => Ok(()),
        }
    }
}

pub fn seed(total_class: i32) -> Result<AttendanceState, ProgressError> {
    Ok(AttendanceState {
        total_class: require_positive_count("totalClass", total_class)?,
        class_attended: 0,
        completed: false,
    })
}

pub fn apply(
    state: AttendanceState,
    change: AttendanceChange,
) -> Result<Progress<AttendanceState>, ProgressError> {
    change.validate()?;
    let next = match change {
        // The schedule may shrink, but never below one class or below what was already attended
        AttendanceChange::AddTotalClass(delta) => AttendanceState {
            total_class: accumulate(
                "totalClass",
                state.total_class,
                delta,
                state.class_attended.max(1),
                i32::MAX,
            )?,
            ..state
        },
        AttendanceChange::AddClassAttended(delta) => AttendanceState {
            class_attended: accumulate("classAttended", state.class_attended, delta, 0, state.total_class)?,
            ..state
        },
        AttendanceChange::ToggleCompleted => AttendanceState {
            completed: !state.completed,
            ..state
        },
    };
    Ok(Progress { state: next, percentage: next.percentage() })
}
