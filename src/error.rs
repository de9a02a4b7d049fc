// HTTP API Error Types
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Map, Value};
use std::collections::HashMap;

use crate::commands::CommandError;
use crate::database::DatabaseError;
use crate::progress::ProgressError;

/// Failure outcome of an operation, rendered as the response envelope
#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    // 400 Bad Request
    BadRequest(String),
    ValidationError {
        message: String,
        field_errors: Option<HashMap<String, String>>,
    },
    InvalidJson(String),
    BoundaryExceeded {
        message: String,
        field: String,
    },

    // 401 Unauthorized
    Unauthorized(String),

    // 404 Not Found
    NotFound(String),

    // 500 Internal Server Error
    InternalServerError {
        message: String,
        details: Option<String>,
    },
}

impl ApiError {
    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::BadRequest(_) => 400,
            ApiError::ValidationError { .. } => 400,
            ApiError::InvalidJson(_) => 400,
            ApiError::BoundaryExceeded { .. } => 400,
            ApiError::Unauthorized(_) => 401,
            ApiError::NotFound(_) => 404,
            ApiError::InternalServerError { .. } => 500,
        }
    }

    /// Get client-safe error message
    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(msg) => msg,
            ApiError::ValidationError { message, .. } => message,
            ApiError::InvalidJson(msg) => msg,
            ApiError::BoundaryExceeded { message, .. } => message,
            ApiError::Unauthorized(msg) => msg,
            ApiError::NotFound(msg) => msg,
            ApiError::InternalServerError { message, .. } => message,
        }
    }

    /// Get error code for client handling
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::ValidationError { .. } => "VALIDATION_ERROR",
            ApiError::InvalidJson(_) => "INVALID_JSON",
            ApiError::BoundaryExceeded { .. } => "BOUNDARY_EXCEEDED",
            ApiError::Unauthorized(_) => "UNAUTHORIZED",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::InternalServerError { .. } => "INTERNAL_SERVER_ERROR",
        }
    }

    /// Diagnostic object placed in the envelope's `error` field
    pub fn error_detail(&self) -> Value {
        let mut detail = Map::new();
        detail.insert("code".into(), Value::String(self.error_code().to_string()));
        match self {
            ApiError::ValidationError { field_errors: Some(field_errors), .. } => {
                detail.insert("field_errors".into(), json!(field_errors));
            }
            ApiError::BoundaryExceeded { field, .. } => {
                detail.insert("field".into(), Value::String(field.clone()));
            }
            ApiError::InternalServerError { details: Some(details), .. } => {
                detail.insert("details".into(), Value::String(details.clone()));
            }
            _ => {}
        }
        Value::Object(detail)
    }

    /// Convert to the `{status, data, message, error}` envelope
    pub fn to_json(&self) -> Value {
        json!({
            "status": self.status_code(),
            "data": {},
            "message": self.message(),
            "error": self.error_detail(),
        })
    }

    /// Replaces the human-readable message of a store failure, keeping its diagnostics.
    /// Client errors keep their own message.
    pub fn on_failure(self, message: impl Into<String>) -> Self {
        match self {
            ApiError::InternalServerError { details, .. } => ApiError::InternalServerError {
                message: message.into(),
                details,
            },
            other => other,
        }
    }
}

// Static constructor methods
impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn validation_error(message: impl Into<String>, field_errors: Option<HashMap<String, String>>) -> Self {
        ApiError::ValidationError {
            message: message.into(),
            field_errors,
        }
    }

    pub fn invalid_json(message: impl Into<String>) -> Self {
        ApiError::InvalidJson(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn internal_server_error(message: impl Into<String>, details: Option<String>) -> Self {
        ApiError::InternalServerError {
            message: message.into(),
            details,
        }
    }
}

impl From<ProgressError> for ApiError {
    fn from(err: ProgressError) -> Self {
        let field = err.field().to_string();
        if err.is_boundary() {
            return ApiError::BoundaryExceeded {
                message: format!("Boundary exceeded: {}", err),
                field,
            };
        }
        let mut field_errors = HashMap::new();
        field_errors.insert(field, err.to_string());
        ApiError::validation_error(err.to_string(), Some(field_errors))
    }
}

impl From<DatabaseError> for ApiError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::NotFound(msg) => ApiError::not_found(msg),
            DatabaseError::Rejected(progress) => progress.into(),
            other => {
                // Log the real error; it only reaches the client as a diagnostic
                tracing::error!("Store error: {}", other);
                ApiError::internal_server_error("Database error occurred", Some(other.to_string()))
            }
        }
    }
}

impl From<CommandError> for ApiError {
    fn from(err: CommandError) -> Self {
        match err {
            CommandError::InvalidJson(msg) => ApiError::invalid_json(format!("Invalid JSON body: {}", msg)),
            CommandError::InvalidAction(_) => ApiError::bad_request("Invalid action"),
            CommandError::MissingField(field) => {
                let mut field_errors = HashMap::new();
                field_errors.insert(field.clone(), "This field is required".to_string());
                ApiError::validation_error(format!("Missing required field: {}", field), Some(field_errors))
            }
            CommandError::InvalidField(reason) => {
                ApiError::validation_error(format!("Invalid field value: {}", reason), None)
            }
            CommandError::Rejected(progress) => progress.into(),
        }
    }
}

// Standard error trait implementations
impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.to_json())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_shape() {
        let value = ApiError::not_found("Habit not found").to_json();
        assert_eq!(value["status"], 404);
        assert_eq!(value["data"], json!({}));
        assert_eq!(value["message"], "Habit not found");
        assert_eq!(value["error"]["code"], "NOT_FOUND");
    }

    #[test]
    fn store_failures_keep_message_and_details_apart() {
        let err = ApiError::from(DatabaseError::ConfigMissing("DATABASE_URL")).on_failure("Failed to create habit");
        let value = err.to_json();
        assert_eq!(value["status"], 500);
        assert_eq!(value["message"], "Failed to create habit");
        assert_eq!(value["error"]["details"], "Missing configuration: DATABASE_URL");
    }

    #[test]
    fn on_failure_leaves_client_errors_alone() {
        let err = ApiError::not_found("Budget tracker not found").on_failure("Failed to update budget");
        assert_eq!(err.message(), "Budget tracker not found");
    }

    #[test]
    fn boundary_errors_are_bad_requests() {
        let err: ApiError = DatabaseError::Rejected(ProgressError::AboveCeiling { field: "achieved", ceiling: 10 }).into();
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.error_code(), "BOUNDARY_EXCEEDED");
        assert_eq!(err.error_detail()["field"], "achieved");
    }
}
