//! Error types for the calendar server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Application error codes exposed in error bodies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCode {
    Success = 0,
    Failure = 1,
    DbFailure = 2,
    NoSuchData = 3,
    BadValue = 4,
    RowsAffectedMismatch = 5,
}

/// Validation and consistency failures raised by the domain models,
/// always before any I/O except for the location lookup.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("{0} cannot be empty")]
    EmptyField(&'static str),

    #[error("frequency cannot be empty")]
    EmptyFrequency,

    #[error("start date cannot be empty")]
    EmptyStartDate,

    #[error("end date cannot be empty")]
    EmptyEndDate,

    #[error("date cannot be empty")]
    EmptyDate,

    #[error("location_id cannot be empty")]
    EmptyLocationId,

    #[error("end date {end} cannot be before start date {start}")]
    InvalidRange { start: String, end: String },

    #[error("unsupported frequency: {0:?}")]
    UnsupportedFrequency(String),

    #[error("unsupported date type: {0:?}")]
    UnsupportedDateType(String),

    #[error("unsupported status: {0:?}")]
    UnsupportedStatus(String),

    #[error("opening time must be empty for a closed day")]
    InvalidClosedDayOpeningTime,

    #[error("location not found: {0}")]
    LocationNotFound(String),

    #[error("identity cannot be empty")]
    EmptyIdentity,

    #[error("identity {0} appears more than once")]
    DuplicateIdentity(String),

    #[error("create scheduler request cannot be empty")]
    EmptyRequest,
}

/// One rejected entry of a batch request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub struct ItemError {
    /// Position of the entry in the request
    pub index: usize,
    /// Caller identity of the entry (may be empty)
    pub identity: String,
    pub message: String,
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Invalid batch: {}", format_item_errors(.0))]
    BatchValidation(Vec<ItemError>),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Unexpected rows affected: expected {expected}, got {actual}")]
    RowsAffected { expected: u64, actual: u64 },

    #[error("Internal server error: {0}")]
    Internal(String),
}

fn format_item_errors(errors: &[ItemError]) -> String {
    errors
        .iter()
        .map(|e| format!("[{}] {}: {}", e.index, e.identity, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Validation(errors.to_string())
    }
}

/// Error response body
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub code: u32,
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<ItemError>>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let mut details = None;
        let (status, code, message) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, ErrorCode::NoSuchData, msg),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, ErrorCode::BadValue, msg),
            // Location lookups are not told apart from other internal failures.
            AppError::Domain(DomainError::LocationNotFound(msg)) => {
                tracing::error!("Location lookup failed: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::Failure,
                    format!("location not found: {}", msg),
                )
            }
            AppError::Domain(e) => (StatusCode::BAD_REQUEST, ErrorCode::BadValue, e.to_string()),
            AppError::BatchValidation(errors) => {
                let message = format!("{} invalid entries", errors.len());
                details = Some(errors);
                (StatusCode::BAD_REQUEST, ErrorCode::BadValue, message)
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::DbFailure,
                    "Database error".to_string(),
                )
            }
            AppError::RowsAffected { expected, actual } => {
                tracing::error!("Rows affected mismatch: expected {}, got {}", expected, actual);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::RowsAffectedMismatch,
                    "Internal server error".to_string(),
                )
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::Failure,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse {
            code: code as u32,
            error: format!("{:?}", code),
            message,
            details,
        });

        (status, body).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_error_mentions_every_entry() {
        let err = AppError::BatchValidation(vec![
            ItemError {
                index: 0,
                identity: "lesson-1".to_string(),
                message: DomainError::EmptyRequest.to_string(),
            },
            ItemError {
                index: 1,
                identity: "lesson-2".to_string(),
                message: "end date is before start date".to_string(),
            },
        ]);
        let text = err.to_string();
        assert!(text.contains("lesson-1"));
        assert!(text.contains("create scheduler request cannot be empty"));
        assert!(text.contains("lesson-2"));
    }

    #[test]
    fn test_status_mapping() {
        let resp = AppError::Domain(DomainError::EmptyDate).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let resp = AppError::Domain(DomainError::LocationNotFound("loc-1".into())).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let resp = AppError::RowsAffected { expected: 1, actual: 0 }.into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
