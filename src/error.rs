use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use sqlx::Error as SqlxError;
use thiserror::Error as ThisError;
use tracing::error;

#[derive(Debug, ThisError)]
pub enum SchoolError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    PayloadTooLarge(String),

    #[error("Database error: {0}")]
    DatabaseError(#[from] SqlxError),
}

impl SchoolError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    /// True when the store rejected a write because a UNIQUE constraint fired.
    pub fn is_unique_violation(&self) -> bool {
        match self {
            SchoolError::DatabaseError(e) => e
                .as_database_error()
                .is_some_and(|db| db.is_unique_violation()),
            _ => false,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            SchoolError::Validation(_) => StatusCode::BAD_REQUEST,
            SchoolError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            SchoolError::NotFound(_) => StatusCode::NOT_FOUND,
            SchoolError::Conflict(_) => StatusCode::CONFLICT,
            SchoolError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            SchoolError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for SchoolError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        if let SchoolError::DatabaseError(e) = &self {
            error!(error = %e, "request failed on infrastructure error");
        }
        let error_body = match self {
            SchoolError::Validation(message) => ApiErrorBody {
                code: "VALIDATION_ERROR".to_string(),
                message,
            },
            SchoolError::Unauthorized(message) => ApiErrorBody {
                code: "UNAUTHORIZED".to_string(),
                message,
            },
            SchoolError::NotFound(message) => ApiErrorBody {
                code: "NOT_FOUND".to_string(),
                message,
            },
            SchoolError::Conflict(message) => ApiErrorBody {
                code: "CONFLICT".to_string(),
                message,
            },
            SchoolError::PayloadTooLarge(message) => ApiErrorBody {
                code: "PAYLOAD_TOO_LARGE".to_string(),
                message,
            },
            SchoolError::DatabaseError(_) => ApiErrorBody {
                code: "INTERNAL_ERROR".to_string(),
                message: "An internal server error occurred.".to_string(),
            },
        };
        (status, Json(ApiErrorResponse { error: error_body })).into_response()
    }
}

/// Standardized API error response body
#[derive(Serialize)]
pub struct ApiErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Serialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorBody,
}
