use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ValidationIssue {
    pub field: String,
    pub message: String,
}

impl ValidationIssue {
    pub fn new(field: impl ToString, message: impl ToString) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid workload input")]
    InvalidWorkload(Vec<ValidationIssue>),
    #[error("Invalid workload input: {0}")]
    InvalidPayload(String),
}

#[derive(Serialize)]
struct ErrorResponse {
    message: String,
    issues: Vec<ValidationIssue>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let issues = match self {
            AppError::InvalidWorkload(issues) => issues,
            AppError::InvalidPayload(detail) => vec![ValidationIssue::new("body", detail)],
        };
        let body = ErrorResponse {
            message: "Invalid workload input".to_string(),
            issues,
        };
        (StatusCode::BAD_REQUEST, Json(body)).into_response()
    }
}
