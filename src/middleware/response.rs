use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::{json, Value};

/// Successful outcome of an operation, rendered as the `{status, data, message, error}` envelope
#[derive(Debug)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub status_code: StatusCode,
    pub message: String,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a successful API response with 200 status
    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self::with_status(data, StatusCode::OK, message)
    }

    /// Create an API response with custom status code
    pub fn with_status(data: T, status_code: StatusCode, message: impl Into<String>) -> Self {
        Self {
            data,
            status_code,
            message: message.into(),
        }
    }

    /// Create a 201 Created response
    pub fn created(data: T, message: impl Into<String>) -> Self {
        Self::with_status(data, StatusCode::CREATED, message)
    }
}

impl ApiResponse<Value> {
    /// Envelope with status 204 and empty data
    pub fn no_content(message: impl Into<String>) -> Self {
        Self::with_status(json!({}), StatusCode::NO_CONTENT, message)
    }
}

impl<T: Serialize> ApiResponse<T> {
    pub fn to_json(&self) -> Result<Value, serde_json::Error> {
        Ok(json!({
            "status": self.status_code.as_u16(),
            "data": serde_json::to_value(&self.data)?,
            "message": self.message,
            "error": {},
        }))
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let envelope = match self.to_json() {
            Ok(value) => value,
            Err(e) => {
                tracing::error!("Failed to serialize response data: {}", e);
                return crate::error::ApiError::internal_server_error(
                    "Failed to serialize response data",
                    Some(e.to_string()),
                )
                .into_response();
            }
        };

        // A 204 carries no body on the wire; the envelope still says 204
        let status = if self.status_code == StatusCode::NO_CONTENT {
            StatusCode::OK
        } else {
            self.status_code
        };

        (status, Json(envelope)).into_response()
    }
}

pub type ApiResult<T> = Result<ApiResponse<T>, crate::error::ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_carries_status_and_message() {
        let response = ApiResponse::created(json!({"title": "Read"}), "Habit created successfully");
        let value = response.to_json().unwrap();
        assert_eq!(value["status"], 201);
        assert_eq!(value["data"]["title"], "Read");
        assert_eq!(value["message"], "Habit created successfully");
        assert_eq!(value["error"], json!({}));
    }

    #[test]
    fn no_content_is_sent_as_ok() {
        let response = ApiResponse::no_content("Habit deleted successfully").into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
