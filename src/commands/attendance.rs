use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use super::{failure, require_title, to_data, Command, CommandError};
use crate::app::AppState;
use crate::database::models::{AttendanceView, NewAttendance};
use crate::database::AttendanceStore;
use crate::middleware::{ApiResponse, ApiResult};
use crate::progress::attendance::{self as engine, AttendanceChange};
use crate::types::OwnerId;

/// Attendance actions. Records are addressed by `habitId` on the wire.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum AttendanceCommand {
    #[serde(rename_all = "camelCase")]
    Create { title: String, total_class: i32 },
    #[serde(rename_all = "camelCase")]
    UpdateTotalClass { habit_id: Uuid, increment_total_class: i32 },
    #[serde(rename_all = "camelCase")]
    UpdateClassAttended { habit_id: Uuid, increment_class_attended: i32 },
    /// Flips the stored flag; a `completed` value in the body is accepted and ignored
    #[serde(rename_all = "camelCase")]
    Completed {
        habit_id: Uuid,
        #[serde(default)]
        completed: Option<bool>,
    },
}

impl AttendanceCommand {
    fn change(&self) -> Option<AttendanceChange> {
        match *self {
            AttendanceCommand::Create { .. } => None,
            AttendanceCommand::UpdateTotalClass { increment_total_class, .. } => {
                Some(AttendanceChange::AddTotalClass(increment_total_class))
            }
            AttendanceCommand::UpdateClassAttended { increment_class_attended, .. } => {
                Some(AttendanceChange::AddClassAttended(increment_class_attended))
            }
            AttendanceCommand::Completed { .. } => Some(AttendanceChange::ToggleCompleted),
        }
    }
}

impl Command for AttendanceCommand {
    const ACTIONS: &'static [&'static str] = &["create", "updateTotalClass", "updateClassAttended", "completed"];

    fn validate(&self) -> Result<(), CommandError> {
        if let AttendanceCommand::Create { title, total_class } = self {
            require_title(title)?;
            engine::seed(*total_class)?;
        }
        if let Some(change) = self.change() {
            change.validate()?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteAttendance {
    pub habit_id: Uuid,
}

pub async fn list(state: &AppState, owner: &OwnerId) -> ApiResult<Vec<AttendanceView>> {
    let records = state
        .store
        .list_attendance(owner)
        .await
        .map_err(failure("Failed to fetch attendance trackers, please refresh"))?;

    let views = records.into_iter().map(|record| record.view()).collect();
    Ok(ApiResponse::success(views, "All attendance tracker fetched"))
}

pub async fn dispatch(state: &AppState, owner: &OwnerId, command: AttendanceCommand) -> ApiResult<Value> {
    tracing::debug!("Dispatching attendance command {:?} for owner {}", command, owner);

    let (habit_id, change, success, failed) = match command {
        AttendanceCommand::Create { title, total_class } => {
            let record = state
                .store
                .create_attendance(owner, NewAttendance { title, state: engine::seed(total_class)? })
                .await
                .map_err(failure("Failed to create attendance tracker"))?;

            return Ok(ApiResponse::created(
                to_data(&record.view())?,
                "Attendance tracker created successfully",
            ));
        }
        AttendanceCommand::UpdateTotalClass { habit_id, increment_total_class } => (
            habit_id,
            AttendanceChange::AddTotalClass(increment_total_class),
            "Total class updated successfully",
            "Failed to update total class value",
        ),
        AttendanceCommand::UpdateClassAttended { habit_id, increment_class_attended } => (
            habit_id,
            AttendanceChange::AddClassAttended(increment_class_attended),
            "Class attended updated successfully",
            "Failed to update class attended value",
        ),
        AttendanceCommand::Completed { habit_id, .. } => (
            habit_id,
            AttendanceChange::ToggleCompleted,
            "Completed updated successfully",
            "Failed to update completed",
        ),
    };

    let record = state
        .store
        .update_attendance(owner, habit_id, change)
        .await
        .map_err(failure(failed))?;

    Ok(ApiResponse::success(to_data(&record.view())?, success))
}

pub async fn delete(state: &AppState, owner: &OwnerId, request: DeleteAttendance) -> ApiResult<Value> {
    state
        .store
        .delete_attendance(owner, request.habit_id)
        .await
        .map_err(failure("Failed to delete attendance tracker"))?;

    tracing::debug!("Deleted attendance tracker {} for owner {}", request.habit_id, owner);
    Ok(ApiResponse::no_content("Attendance tracker deleted successfully"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::parse_command;

    #[test]
    fn completed_ignores_payload_value() {
        let id = Uuid::new_v4();
        let body = format!(r#"{{"action":"completed","habitId":"{id}","completed":true}}"#);
        let command: AttendanceCommand = parse_command(body.as_bytes()).unwrap();
        assert_eq!(command.change(), Some(AttendanceChange::ToggleCompleted));

        let body = format!(r#"{{"action":"completed","habitId":"{id}"}}"#);
        assert!(parse_command::<AttendanceCommand>(body.as_bytes()).is_ok());
    }

    #[test]
    fn create_requires_positive_total() {
        assert!(matches!(
            parse_command::<AttendanceCommand>(br#"{"action":"create","title":"Math","totalClass":0}"#),
            Err(CommandError::Rejected(_))
        ));
        assert_eq!(
            parse_command::<AttendanceCommand>(br#"{"action":"create","title":"Math"}"#),
            Err(CommandError::MissingField("totalClass".into()))
        );
    }
}
