use axum::{body::Bytes, extract::State};
use serde_json::Value;

use crate::app::AppState;
use crate::commands::attendance::{self, AttendanceCommand, DeleteAttendance};
use crate::commands::{parse_body, parse_command};
use crate::database::models::AttendanceView;
use crate::middleware::{ApiResult, AuthUser};

/// GET /api/attendance
pub async fn attendance_get(State(state): State<AppState>, auth: AuthUser) -> ApiResult<Vec<AttendanceView>> {
    attendance::list(&state, &auth.owner_id).await
}

/// POST /api/attendance - create, updateTotalClass, updateClassAttended, completed
pub async fn attendance_post(State(state): State<AppState>, auth: AuthUser, body: Bytes) -> ApiResult<Value> {
    let command = parse_command::<AttendanceCommand>(&body)?;
    attendance::dispatch(&state, &auth.owner_id, command).await
}

/// DELETE /api/attendance - body `{ "habitId": "uuid" }`
pub async fn attendance_delete(State(state): State<AppState>, auth: AuthUser, body: Bytes) -> ApiResult<Value> {
    let request = parse_body::<DeleteAttendance>(&body)?;
    attendance::delete(&state, &auth.owner_id, request).await
}
