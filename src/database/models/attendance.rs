use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::progress::attendance::AttendanceState;
use crate::types::OwnerId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Attendance {
    pub id: Uuid,
    pub owner_id: OwnerId,
    pub title: String,
    pub total_class: i32,
    pub class_attended: i32,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Attendance {
    pub fn state(&self) -> AttendanceState {
        AttendanceState {
            total_class: self.total_class,
            class_attended: self.class_attended,
            completed: self.completed,
        }
    }

    pub fn apply_state(&mut self, state: AttendanceState, at: DateTime<Utc>) {
        self.total_class = state.total_class;
        self.class_attended = state.class_attended;
        self.completed = state.completed;
        self.updated_at = at;
    }

    pub fn view(self) -> AttendanceView {
        let percentage = self.state().percentage();
        AttendanceView { attendance: self, percentage }
    }
}

#[derive(Debug, Clone)]
pub struct NewAttendance {
    pub title: String,
    pub state: AttendanceState,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttendanceView {
    #[serde(flatten)]
    pub attendance: Attendance,
    pub percentage: f64,
}
