use axum::{
    body::Bytes,
    extract::{rejection::QueryRejection, Query, State},
};
use serde_json::Value;

use crate::app::AppState;
use crate::commands::expense::{self, DeleteExpense, ExpenseCommand, PeriodQuery};
use crate::commands::{parse_body, parse_command};
use crate::database::models::{Expense, ExpenseSummary};
use crate::error::ApiError;
use crate::middleware::{ApiResult, AuthUser};

fn period_query(query: Result<Query<PeriodQuery>, QueryRejection>) -> Result<PeriodQuery, ApiError> {
    query
        .map(|Query(query)| query)
        .map_err(|e| ApiError::bad_request(format!("Invalid period: {}", e.body_text())))
}

/// GET /api/expense[?month=&year=] - Expenses of one period, the current one by default
pub async fn expense_get(
    State(state): State<AppState>,
    auth: AuthUser,
    query: Result<Query<PeriodQuery>, QueryRejection>,
) -> ApiResult<Vec<Expense>> {
    expense::list(&state, &auth.owner_id, period_query(query)?).await
}

/// GET /api/expense/summary[?month=&year=] - Count and total of one period
pub async fn expense_summary(
    State(state): State<AppState>,
    auth: AuthUser,
    query: Result<Query<PeriodQuery>, QueryRejection>,
) -> ApiResult<ExpenseSummary> {
    expense::summary(&state, &auth.owner_id, period_query(query)?).await
}

pub async fn expense_post(State(state): State<AppState>, auth: AuthUser, body: Bytes) -> ApiResult<Value> {
    let command = parse_command::<ExpenseCommand>(&body)?;
    expense::dispatch(&state, &auth.owner_id, command).await
}

pub async fn expense_delete(State(state): State<AppState>, auth: AuthUser, body: Bytes) -> ApiResult<Value> {
    let request = parse_body::<DeleteExpense>(&body)?;
    expense::delete(&state, &auth.owner_id, request).await
}
