// handlers/public/mod.rs - Public handlers (no session required)
use axum::extract::State;
use serde_json::{json, Value};

use crate::app::AppState;
use crate::database::{DatabaseError, Store};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};

/// GET / - Service description
pub async fn root() -> ApiResponse<Value> {
    let version = env!("CARGO_PKG_VERSION");

    ApiResponse::success(
        json!({
            "name": "Tracklytic API",
            "version": version,
            "description": "Owner-scoped progress tracking for habits, attendance, budgets and expenses",
            "endpoints": {
                "health": "/health (public)",
                "habit": "/api/habit (protected)",
                "attendance": "/api/attendance (protected)",
                "budget": "/api/budget (protected)",
                "expense": "/api/expense[/summary] (protected)",
                "settings": "/api/settings (protected)",
            },
        }),
        "Tracklytic API",
    )
}

/// GET /health - Store liveness
pub async fn health(State(state): State<AppState>) -> ApiResult<Value> {
    health_report(state.store.health_check().await)
}

fn health_report(check: Result<(), DatabaseError>) -> ApiResult<Value> {
    match check {
        Ok(()) => Ok(ApiResponse::success(
            json!({
                "status": "ok",
                "timestamp": chrono::Utc::now(),
                "database": "ok",
            }),
            "Service healthy",
        )),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            Err(ApiError::internal_server_error("Database unavailable", Some(e.to_string())))
        }
    }
}
