use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use super::{failure, require_title, to_data, Command, CommandError};
use crate::app::AppState;
use crate::database::models::{Expense, ExpenseSummary, NewExpense};
use crate::database::ExpenseStore;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::period::Period;
use crate::progress::expense as engine;
use crate::types::OwnerId;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum ExpenseCommand {
    #[serde(rename_all = "camelCase")]
    Create { title: String, amount: f64 },
    /// Replaces the amount. `title` is required but the stored title is kept.
    #[serde(rename_all = "camelCase")]
    Update { expense_id: Uuid, title: String, amount: f64 },
}

impl Command for ExpenseCommand {
    const ACTIONS: &'static [&'static str] = &["create", "update"];

    fn validate(&self) -> Result<(), CommandError> {
        match self {
            ExpenseCommand::Create { title, amount } => {
                require_title(title)?;
                engine::amount(*amount)?;
            }
            ExpenseCommand::Update { title, amount, .. } => {
                require_title(title)?;
                engine::amount(*amount)?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteExpense {
    pub expense_id: Uuid,
}

/// Optional `?month=&year=` selector; both or neither
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PeriodQuery {
    pub month: Option<i32>,
    pub year: Option<i32>,
}

impl PeriodQuery {
    /// The requested period, or the current one when none was given
    pub fn resolve(self, current: Period) -> Result<Period, ApiError> {
        match (self.month, self.year) {
            (None, None) => Ok(current),
            (Some(month), Some(year)) => {
                Period::new(month, year).map_err(|e| ApiError::bad_request(format!("Invalid period: {}", e)))
            }
            _ => Err(ApiError::bad_request("month and year must be given together")),
        }
    }
}

pub async fn list(state: &AppState, owner: &OwnerId, query: PeriodQuery) -> ApiResult<Vec<Expense>> {
    let period = query.resolve(state.clock.current_period())?;
    let expenses = state
        .store
        .list_expenses(owner, period)
        .await
        .map_err(failure("Failed to fetch expenses"))?;

    Ok(ApiResponse::success(expenses, "Expenses fetched successfully"))
}

pub async fn summary(state: &AppState, owner: &OwnerId, query: PeriodQuery) -> ApiResult<ExpenseSummary> {
    let period = query.resolve(state.clock.current_period())?;
    let expenses = state
        .store
        .list_expenses(owner, period)
        .await
        .map_err(failure("Failed to fetch expense summary"))?;

    let summary = ExpenseSummary {
        month: period.month,
        year: period.year,
        count: expenses.len(),
        total: engine::period_total(expenses.iter().map(|expense| expense.amount)),
    };
    Ok(ApiResponse::success(summary, "Expense summary fetched successfully"))
}

pub async fn dispatch(state: &AppState, owner: &OwnerId, command: ExpenseCommand) -> ApiResult<Value> {
    tracing::debug!("Dispatching expense command {:?} for owner {}", command, owner);

    match command {
        ExpenseCommand::Create { title, amount } => {
            let period = state.clock.current_period();
            let expense = state
                .store
                .create_expense(owner, NewExpense { title, amount: engine::amount(amount)?, period })
                .await
                .map_err(failure("Failed to create expense"))?;

            Ok(ApiResponse::created(to_data(&expense)?, "Expense created successfully"))
        }
        ExpenseCommand::Update { expense_id, amount, .. } => {
            let expense = state
                .store
                .update_expense_amount(owner, expense_id, amount)
                .await
                .map_err(failure("Failed to update expense"))?;

            Ok(ApiResponse::success(to_data(&expense)?, "Expense updated successfully"))
        }
    }
}

pub async fn delete(state: &AppState, owner: &OwnerId, request: DeleteExpense) -> ApiResult<Value> {
    state
        .store
        .delete_expense(owner, request.expense_id)
        .await
        .map_err(failure("Failed to delete expense"))?;

    tracing::debug!("Deleted expense {} for owner {}", request.expense_id, owner);
    Ok(ApiResponse::no_content("Expense deleted successfully"))
}
