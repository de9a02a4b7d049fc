use axum::extract::State;

use crate::app::AppState;
use crate::commands::failure;
use crate::database::models::UserProfile;
use crate::database::UserStore;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};

/// GET /api/settings - Profile of the signed-in user
pub async fn settings_get(State(state): State<AppState>, auth: AuthUser) -> ApiResult<UserProfile> {
    let profile = state
        .store
        .find_user(&auth.owner_id)
        .await
        .map_err(failure("Failed to fetch user settings"))?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    Ok(ApiResponse::success(profile, "User settings fetched successfully"))
}
