use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::{failure, require_title, to_data, Command, CommandError};
use crate::app::AppState;
use crate::database::models::{HabitTracker, HabitView, NewHabit};
use crate::database::HabitStore;
use crate::middleware::{ApiResponse, ApiResult};
use crate::progress::habit::{self as engine, HabitChange};
use crate::types::OwnerId;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum HabitCommand {
    #[serde(rename_all = "camelCase")]
    Create {
        title: String,
        goal: i32,
        #[serde(default)]
        achieved: i32,
    },
    #[serde(rename_all = "camelCase")]
    UpdateGoal { habit_id: Uuid, update_goal_value: i32 },
    #[serde(rename_all = "camelCase")]
    UpdateAchieved { habit_id: Uuid, achieved_increment_value: i32 },
    /// Opens the bucket of the current period if the habit has none yet
    #[serde(rename_all = "camelCase")]
    StartPeriod { habit_id: Uuid, goal: i32 },
}

impl Command for HabitCommand {
    const ACTIONS: &'static [&'static str] = &["create", "updateGoal", "updateAchieved", "startPeriod"];

    fn validate(&self) -> Result<(), CommandError> {
        match self {
            HabitCommand::Create { title, goal, achieved } => {
                require_title(title)?;
                engine::seed(*goal, *achieved)?;
            }
            HabitCommand::UpdateGoal { update_goal_value, .. } => {
                HabitChange::SetGoal(*update_goal_value).validate()?;
            }
            HabitCommand::UpdateAchieved { achieved_increment_value, .. } => {
                HabitChange::AddAchieved(*achieved_increment_value).validate()?;
            }
            HabitCommand::StartPeriod { goal, .. } => {
                engine::seed(*goal, 0)?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteHabit {
    pub habit_id: Uuid,
}

/// A single bucket with its completion
#[derive(Debug, Serialize)]
struct TrackerView<'a> {
    #[serde(flatten)]
    tracker: &'a HabitTracker,
    percentage: f64,
}

impl<'a> TrackerView<'a> {
    fn new(tracker: &'a HabitTracker) -> Self {
        Self { tracker, percentage: tracker.state().percentage() }
    }
}

pub async fn list(state: &AppState, owner: &OwnerId) -> ApiResult<Vec<HabitView>> {
    let period = state.clock.current_period();
    let habits = state
        .store
        .list_habits(owner)
        .await
        .map_err(failure("Failed to fetch habits"))?;

    let views = habits.into_iter().map(|habit| habit.view(period)).collect();
    Ok(ApiResponse::success(views, "Habits fetched successfully"))
}

pub async fn dispatch(state: &AppState, owner: &OwnerId, command: HabitCommand) -> ApiResult<Value> {
    let period = state.clock.current_period();
    tracing::debug!("Dispatching habit command {:?} for owner {} in {}", command, owner, period);

    match command {
        HabitCommand::Create { title, goal, achieved } => {
            let tracker = engine::seed(goal, achieved)?;
            let habit = state
                .store
                .create_habit(owner, NewHabit { title, period, tracker })
                .await
                .map_err(failure("Failed to create habit, please try again"))?;

            Ok(ApiResponse::created(to_data(&habit.view(period))?, "Habit created successfully"))
        }
        HabitCommand::UpdateGoal { habit_id, update_goal_value } => {
            let tracker = state
                .store
                .update_tracker(owner, habit_id, period, HabitChange::SetGoal(update_goal_value))
                .await
                .map_err(failure("Failed to update goal, please try again"))?;

            Ok(ApiResponse::success(to_data(&TrackerView::new(&tracker))?, "Goal updated successfully"))
        }
        HabitCommand::UpdateAchieved { habit_id, achieved_increment_value } => {
            let tracker = state
                .store
                .update_tracker(owner, habit_id, period, HabitChange::AddAchieved(achieved_increment_value))
                .await
                .map_err(failure("Failed to update achieved, please try again"))?;

            Ok(ApiResponse::success(
                to_data(&TrackerView::new(&tracker))?,
                "Updated achieved successfully",
            ))
        }
        HabitCommand::StartPeriod { habit_id, goal } => {
            let (tracker, created) = state
                .store
                .start_period(owner, habit_id, period, goal)
                .await
                .map_err(failure("Failed to start habit period, please try again"))?;

            let data = to_data(&TrackerView::new(&tracker))?;
            if created {
                Ok(ApiResponse::created(data, "Habit period started successfully"))
            } else {
                Ok(ApiResponse::success(data, "Habit period already started"))
            }
        }
    }
}

pub async fn delete(state: &AppState, owner: &OwnerId, request: DeleteHabit) -> ApiResult<Value> {
    state
        .store
        .delete_habit(owner, request.habit_id)
        .await
        .map_err(failure("Failed to delete habit"))?;

    tracing::debug!("Deleted habit {} for owner {}", request.habit_id, owner);
    Ok(ApiResponse::no_content("Habit deleted successfully"))
}
