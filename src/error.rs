use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Error type returned by every handler and by the access gate.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),
    /// Reported as 400: existing clients treat a taken email as a bad request.
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    NotFound(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// Uniform failure body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            stack: None,
        }
    }
}

/// Attached to responses for unexpected failures so the error-log middleware
/// can persist them without re-deriving anything from the body.
#[derive(Debug, Clone)]
pub struct FailureReport {
    pub message: String,
    pub stack: String,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::Conflict(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            AppError::Internal(err) => {
                tracing::error!(error = ?err, "internal error");
                let report = FailureReport {
                    message: err.to_string(),
                    stack: format!("{:?}", err),
                };
                let mut res = (status, Json(ErrorBody::new("Internal server error"))).into_response();
                res.extensions_mut().insert(report);
                res
            }
            other => (status, Json(ErrorBody::new(other.to_string()))).into_response(),
        }
    }
}
