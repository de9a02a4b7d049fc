use axum::{body::Bytes, extract::State};
use serde_json::Value;

use crate::app::AppState;
use crate::commands::budget::{self, BudgetCommand, DeleteBudget};
use crate::commands::{parse_body, parse_command};
use crate::database::models::BudgetView;
use crate::middleware::{ApiResult, AuthUser};

/// GET /api/budget - Budgets ordered by title
pub async fn budget_get(State(state): State<AppState>, auth: AuthUser) -> ApiResult<Vec<BudgetView>> {
    budget::list(&state, &auth.owner_id).await
}

pub async fn budget_post(State(state): State<AppState>, auth: AuthUser, body: Bytes) -> ApiResult<Value> {
    let command = parse_command::<BudgetCommand>(&body)?;
    budget::dispatch(&state, &auth.owner_id, command).await
}

pub async fn budget_delete(State(state): State<AppState>, auth: AuthUser, body: Bytes) -> ApiResult<Value> {
    let request = parse_body::<DeleteBudget>(&body)?;
    budget::delete(&state, &auth.owner_id, request).await
}
