//! API error mapping for the gateway

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::error;

use autosplit_database::DatabaseError;
use autosplit_ledger::LedgerError;

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

/// Error surfaced to HTTP callers. Every domain error maps onto a status
/// code here; none of them is fatal to the process.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorResponse {
            error: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<LedgerError> for ApiError {
    fn from(value: LedgerError) -> Self {
        let status = match value {
            LedgerError::Validation(_) => StatusCode::BAD_REQUEST,
            LedgerError::GroupNotFound(_) => StatusCode::NOT_FOUND,
            LedgerError::ConcurrentSaveConflict => StatusCode::CONFLICT,
            LedgerError::Database(_) => {
                error!(error = %value, "ledger database error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self::new(status, value.to_string())
    }
}

impl From<DatabaseError> for ApiError {
    fn from(value: DatabaseError) -> Self {
        let status = match value {
            DatabaseError::NotFound(_) => StatusCode::NOT_FOUND,
            DatabaseError::ValidationError(_) => StatusCode::BAD_REQUEST,
            _ => {
                error!(error = %value, "database error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self::new(status, value.to_string())
    }
}
