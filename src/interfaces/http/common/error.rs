//! Mapping from domain errors to HTTP responses

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::error;

use super::ApiResponse;
use crate::domain::DomainError;

/// Error half of every handler result, rendered in the standard envelope
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

/// Handler result for plain `200 OK` endpoints
pub type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

/// Handler result for endpoints answering `201 Created`
pub type CreatedResult<T> = Result<(StatusCode, Json<ApiResponse<T>>), ApiError>;

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

pub fn status_for(err: &DomainError) -> StatusCode {
    match err {
        DomainError::RoomUnavailable(_)
        | DomainError::DuplicateRoomNumber(_)
        | DomainError::AlreadyCancelled(_)
        | DomainError::Validation(_) => StatusCode::BAD_REQUEST,
        DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
        DomainError::Conflict(_) => StatusCode::CONFLICT,
        DomainError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        DomainError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Storage faults are logged and reported with a generic message.
impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        let status = status_for(&err);
        let message = match err {
            DomainError::Storage(detail) => {
                error!(error = %detail, "Request failed with storage error");
                "Internal server error".to_string()
            }
            DomainError::Validation(msg)
            | DomainError::Conflict(msg)
            | DomainError::Unauthorized(msg) => msg,
            other => other.to_string(),
        };
        Self { status, message }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ApiResponse::<()>::error(self.message))).into_response()
    }
}

/// Parse a `{roomNumber}` path segment.
pub fn parse_room_number(raw: &str) -> Result<i32, ApiError> {
    match raw.parse::<i32>() {
        Ok(n) if n >= 1 => Ok(n),
        _ => Err(ApiError::new(
            StatusCode::BAD_REQUEST,
            format!("roomNumber must be a positive integer (got '{}')", raw),
        )),
    }
}
