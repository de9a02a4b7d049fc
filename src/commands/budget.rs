use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use super::{failure, require_title, to_data, Command, CommandError};
use crate::app::AppState;
use crate::database::models::{BudgetView, NewBudget};
use crate::database::BudgetStore;
use crate::middleware::{ApiResponse, ApiResult};
use crate::progress::budget::{self as engine, BudgetChange};
use crate::types::OwnerId;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum BudgetCommand {
    #[serde(rename_all = "camelCase")]
    Create { title: String, goal: f64 },
    #[serde(rename_all = "camelCase")]
    UpdateGoal { budget_id: Uuid, update_goal_value: f64 },
    /// Replaces the saving with the given value
    #[serde(rename_all = "camelCase")]
    UpdateSavings { budget_id: Uuid, updated_savings_value: f64 },
}

impl Command for BudgetCommand {
    const ACTIONS: &'static [&'static str] = &["create", "updateGoal", "updateSavings"];

    fn validate(&self) -> Result<(), CommandError> {
        match self {
            BudgetCommand::Create { title, goal } => {
                require_title(title)?;
                engine::seed(*goal)?;
            }
            BudgetCommand::UpdateGoal { update_goal_value, .. } => {
                BudgetChange::SetGoal(*update_goal_value).validate()?;
            }
            BudgetCommand::UpdateSavings { updated_savings_value, .. } => {
                BudgetChange::SetSaving(*updated_savings_value).validate()?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteBudget {
    pub budget_id: Uuid,
}

pub async fn list(state: &AppState, owner: &OwnerId) -> ApiResult<Vec<BudgetView>> {
    let budgets = state
        .store
        .list_budgets(owner)
        .await
        .map_err(failure("Failed to fetch budget trackers"))?;

    let views = budgets.into_iter().map(|budget| budget.view()).collect();
    Ok(ApiResponse::success(views, "Budget trackers fetched successfully"))
}

pub async fn dispatch(state: &AppState, owner: &OwnerId, command: BudgetCommand) -> ApiResult<Value> {
    tracing::debug!("Dispatching budget command {:?} for owner {}", command, owner);

    let (budget_id, change, success, failed) = match command {
        BudgetCommand::Create { title, goal } => {
            let budget = state
                .store
                .create_budget(owner, NewBudget { title, state: engine::seed(goal)? })
                .await
                .map_err(failure("Failed to create budget tracker"))?;

            return Ok(ApiResponse::created(to_data(&budget.view())?, "Budget tracker created successfully"));
        }
        BudgetCommand::UpdateGoal { budget_id, update_goal_value } => (
            budget_id,
            BudgetChange::SetGoal(update_goal_value),
            "Budget tracker goal updated successfully",
            "Failed to update budget tracker goal",
        ),
        BudgetCommand::UpdateSavings { budget_id, updated_savings_value } => (
            budget_id,
            BudgetChange::SetSaving(updated_savings_value),
            "Budget tracker savings updated successfully",
            "Failed to update budget tracker savings",
        ),
    };

    let budget = state
        .store
        .update_budget(owner, budget_id, change)
        .await
        .map_err(failure(failed))?;

    Ok(ApiResponse::success(to_data(&budget.view())?, success))
}

pub async fn delete(state: &AppState, owner: &OwnerId, request: DeleteBudget) -> ApiResult<Value> {
    state
        .store
        .delete_budget(owner, request.budget_id)
        .await
        .map_err(failure("Failed to delete budget tracker"))?;

    tracing::debug!("Deleted budget tracker {} for owner {}", request.budget_id, owner);
    Ok(ApiResponse::no_content("Budget tracker deleted successfully"))
}
