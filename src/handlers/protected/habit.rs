use axum::{body::Bytes, extract::State};
use serde_json::Value;

use crate::app::AppState;
use crate::commands::habit::{self, DeleteHabit, HabitCommand};
use crate::commands::{parse_body, parse_command};
use crate::database::models::HabitView;
use crate::middleware::{ApiResult, AuthUser};

/// GET /api/habit - List the caller's habits with progress for the current period
pub async fn habit_get(State(state): State<AppState>, auth: AuthUser) -> ApiResult<Vec<HabitView>> {
    habit::list(&state, &auth.owner_id).await
}

/// POST /api/habit - Dispatch a habit command
///
/// Expected Input:
/// ```json
/// { "action": "updateAchieved", "habitId": "uuid", "achievedIncrementValue": 1 }
/// ```
pub async fn habit_post(State(state): State<AppState>, auth: AuthUser, body: Bytes) -> ApiResult<Value> {
    let command = parse_command::<HabitCommand>(&body)?;
    habit::dispatch(&state, &auth.owner_id, command).await
}

/// DELETE /api/habit - Delete a habit and all of its buckets
pub async fn habit_delete(State(state): State<AppState>, auth: AuthUser, body: Bytes) -> ApiResult<Value> {
    let request = parse_body::<DeleteHabit>(&body)?;
    habit::delete(&state, &auth.owner_id, request).await
}
