use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::progress::budget::BudgetState;
use crate::types::OwnerId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    pub id: Uuid,
    pub owner_id: OwnerId,
    pub title: String,
    pub goal: f64,
    pub saving: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Budget {
    pub fn state(&self) -> BudgetState {
        BudgetState { goal: self.goal, saving: self.saving }
    }

    pub fn apply_state(&mut self, state: BudgetState, at: DateTime<Utc>) {
        self.goal = state.goal;
        self.saving = state.saving;
        self.updated_at = at;
    }

    pub fn view(self) -> BudgetView {
        let percentage = self.state().percentage();
        BudgetView { budget: self, percentage }
    }
}

#[derive(Debug, Clone)]
pub struct NewBudget {
    pub title: String,
    pub state: BudgetState,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetView {
    #[serde(flatten)]
    pub budget: Budget,
    pub percentage: f64,
}
