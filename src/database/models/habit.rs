use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::period::{find_bucket, Bucketed, Period};
use crate::progress::habit::TrackerState;
use crate::types::OwnerId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    pub id: Uuid,
    pub owner_id: OwnerId,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Loaded separately from `habit_trackers`
    #[sqlx(skip)]
    #[serde(default)]
    pub trackers: Vec<HabitTracker>,
}

/// One `(month, year)` bucket of a habit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct HabitTracker {
    pub id: Uuid,
    pub habit_id: Uuid,
    pub month: i32,
    pub year: i32,
    pub goal: i32,
    pub achieved: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl HabitTracker {
    pub fn state(&self) -> TrackerState {
        TrackerState { goal: self.goal, achieved: self.achieved }
    }

    pub fn apply_state(&mut self, state: TrackerState, at: DateTime<Utc>) {
        self.goal = state.goal;
        self.achieved = state.achieved;
        self.updated_at = at;
    }
}

impl Bucketed for HabitTracker {
    fn period(&self) -> Period {
        Period { month: self.month, year: self.year }
    }
}

impl Habit {
    pub fn current_tracker(&self, period: Period) -> Option<&HabitTracker> {
        find_bucket(&self.trackers, period)
    }

    /// Completion of the bucket for `period`; zero when the habit has none
    pub fn percentage(&self, period: Period) -> f64 {
        self.current_tracker(period)
            .map(|t| t.state().percentage())
            .unwrap_or(0.0)
    }

    pub fn view(self, period: Period) -> HabitView {
        let current_tracker = self.current_tracker(period).cloned();
        let percentage = self.percentage(period);
        HabitView { habit: self, current_tracker, percentage }
    }
}

#[derive(Debug, Clone)]
pub struct NewHabit {
    pub title: String,
    pub period: Period,
    pub tracker: TrackerState,
}

/// Habit as returned by reads, with progress for the current period
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitView {
    #[serde(flatten)]
    pub habit: Habit,
    pub current_tracker: Option<HabitTracker>,
    pub percentage: f64,
}
