//! Error types for the HTTP API.
//!
//! Every failure leaves as JSON: `{"error": "...", "details": "..."}`, with
//! `details` only where there is more to say.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::error;

use stockbill_core::{CoreError, ValidationError};
use stockbill_db::DbError;

/// API errors.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// A stock request failed a ledger rule.
    #[error(transparent)]
    Stock(CoreError),

    /// Invoice creation was refused before anything changed.
    #[error("Failed to create invoice")]
    InvoiceRejected(CoreError),

    #[error("Invalid items data")]
    InvalidItems,

    #[error("No valid items to add")]
    NoValidItems,

    #[error("Invoice not found: {0}")]
    InvoiceNotFound(String),

    #[error("Invalid JSON body")]
    InvalidJson(#[from] JsonRejection),

    /// The sheets could not be written; memory was left unchanged.
    #[error("Failed to save changes")]
    Persistence(#[from] DbError),

    #[error("Failed to render invoice")]
    Render(CoreError),

    #[error("Failed to render invoice")]
    Template(#[from] askama::Error),
}

/// Convenience alias for handler results.
pub type ApiResult<T> = Result<T, ApiError>;

impl From<CoreError> for ApiError {
    fn from(error: CoreError) -> Self {
        ApiError::Stock(error)
    }
}

/// JSON error body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Stock(CoreError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Stock(_)
            | ApiError::InvoiceRejected(_)
            | ApiError::InvalidItems
            | ApiError::NoValidItems
            | ApiError::InvalidJson(_) => StatusCode::BAD_REQUEST,
            ApiError::InvoiceNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Persistence(_) | ApiError::Render(_) | ApiError::Template(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn body(&self) -> ErrorBody {
        let (error, details) = match self {
            ApiError::Stock(CoreError::Validation(ValidationError::Required { field })) => {
                ("Missing required fields".to_string(), Some(field.clone()))
            }
            ApiError::InvoiceRejected(e) | ApiError::Render(e) => {
                (self.to_string(), Some(e.to_string()))
            }
            ApiError::InvalidJson(rejection) => (self.to_string(), Some(rejection.body_text())),
            ApiError::Persistence(e) => (self.to_string(), Some(e.to_string())),
            ApiError::Template(e) => (self.to_string(), Some(e.to_string())),
            _ => (self.to_string(), None),
        };
        ErrorBody { error, details }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(error = %self, details = ?self.body().details, "Request failed");
        }
        (status, Json(self.body())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::Stock(CoreError::DuplicateKey {
                serial_no: "A".to_string()
            })
            .status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::InvoiceRejected(CoreError::NotFound("A".to_string())).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::InvoiceNotFound("INV-1".to_string()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Persistence(DbError::Unavailable("down".to_string())).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::Template(askama::Error::Fmt(std::fmt::Error)).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_duplicate_serial_message() {
        let body = ApiError::Stock(CoreError::DuplicateKey {
            serial_no: "EX-1".to_string(),
        })
        .body();
        assert_eq!(body.error, "Serial number EX-1 already exists");
        assert!(body.details.is_none());
    }

    #[test]
    fn test_invoice_rejection_carries_details() {
        let body = ApiError::InvoiceRejected(
            ValidationError::Empty {
                field: "items".to_string(),
            }
            .into(),
        )
        .body();
        assert_eq!(body.error, "Failed to create invoice");
        assert_eq!(
            body.details.as_deref(),
            Some("Validation error: items must not be empty")
        );
    }

    #[test]
    fn test_missing_field_message() {
        let body = ApiError::from(CoreError::from(ValidationError::Required {
            field: "brand".to_string(),
        }))
        .body();
        assert_eq!(body.error, "Missing required fields");
        assert_eq!(body.details.as_deref(), Some("brand"));
    }
}
