use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::period::{Bucketed, Period};
use crate::types::OwnerId;

/// An expense belongs to the period it was created in, for good
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: Uuid,
    pub owner_id: OwnerId,
    pub title: String,
    pub amount: f64,
    pub month: i32,
    pub year: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Bucketed for Expense {
    fn period(&self) -> Period {
        Period { month: self.month, year: self.year }
    }
}

#[derive(Debug, Clone)]
pub struct NewExpense {
    pub title: String,
    pub amount: f64,
    pub period: Period,
}

/// Spending of one owner in one period
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpenseSummary {
    pub month: i32,
    pub year: i32,
    pub count: usize,
    pub total: f64,
}
