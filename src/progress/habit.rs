use serde::Serialize;

use super::{accumulate, percentage, require_non_zero, require_positive_count, Progress, ProgressError};

/// Counters of one habit bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TrackerState {
    pub goal: i32,
    pub achieved: i32,
}

impl TrackerState {
    pub fn percentage(&self) -> f64 {
        percentage(f64::from(self.achieved), f64::from(self.goal))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HabitChange {
    /// Replace the goal; the recorded achieved count is left as is
    SetGoal(i32),
    /// Add a signed delta to the achieved count
    AddAchieved(i32),
}

impl HabitChange {
    /// Checks that don't depend on the stored counters
    pub fn validate(&self) -> Result<(), ProgressError> {
        match *self {
            HabitChange::SetGoal(goal) => require_positive_count("updateGoalValue", goal).map(|_| ()),
            HabitChange::AddAchieved(delta) => require_non_zero("achievedIncrementValue", delta),
        }
    }
}

/// Initial counters for a new bucket
pub fn seed(goal: i32, achieved: i32) -> Result<TrackerState, ProgressError> {
    let goal = require_positive_count("goal", goal)?;
    if achieved < 0 {
        return Err(ProgressError::BelowFloor { field: "achieved", floor: 0 });
    }
    if achieved > goal {
        return Err(ProgressError::AboveCeiling { field: "achieved", ceiling: i64::from(goal) });
    }
    Ok(TrackerState { goal, achieved })
}

pub fn apply(state: TrackerState, change: HabitChange) -> Result<Progress<TrackerState>, ProgressError> {
    change.validate()?;
    let next = match change {
        HabitChange::SetGoal(goal) => TrackerState { goal, ..state },
        HabitChange::AddAchieved(delta) => TrackerState {
            achieved: accumulate("achieved", state.achieved, delta, 0, state.goal)?,
            ..state
        },
    };
    Ok(Progress { state: next, percentage: next.percentage() })
}
