//! # API Error Types
//!
//! Structured error type implementing `axum::response::IntoResponse`.
//! Every variant renders as a failure [`Envelope`] with a fixed status.
//!
//! Internal faults render as a generic 500. The underlying detail is logged
//! and attached to the response as a [`FaultDetail`] extension, never to the
//! body; the fault detail middleware copies it into `details.message` only
//! in environments that allow it.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use stockpile_schema::FieldErrors;
use thiserror::Error;

use crate::envelope::Envelope;
use crate::repository::RepositoryError;
use crate::service::ServiceError;

/// Error text of a validation failure.
pub const VALIDATION_FAILED: &str = "Validation failed";
/// Error text of a generic 500.
pub const INTERNAL_SERVER_ERROR: &str = "Internal server error";

/// Server-side detail of an internal fault, carried as a response
/// extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaultDetail(pub String);

/// Application-level error type that implements [`IntoResponse`] for Axum.
#[derive(Error, Debug)]
pub enum AppError {
    /// Request input violated its schema (400). Carries every violation.
    #[error("validation failed: {0}")]
    Validation(FieldErrors),

    /// Request body was not parseable JSON (400).
    #[error("invalid JSON body: {0}")]
    InvalidJson(String),

    /// Request was malformed or broke a business rule (400).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Request body exceeded the size limit (413).
    #[error("request body too large")]
    PayloadTooLarge,

    /// Resource or route not found (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// Route exists but not for this method (405).
    #[error("method not allowed")]
    MethodNotAllowed,

    /// A validated request did not convert into its DTO (500).
    #[error("validation conversion failed: {0}")]
    Conversion(String),

    /// Internal server error (500). Detail is logged but not returned by
    /// default.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status of this error.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::InvalidJson(_) | Self::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::Conversion(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The client-facing envelope. Internal details are never included.
    pub fn envelope(&self) -> Envelope {
        match self {
            Self::Validation(errors) => Envelope::failure(VALIDATION_FAILED)
                .with_details(serde_json::to_value(errors).unwrap_or_default()),
            Self::InvalidJson(message) => {
                Envelope::failure("Invalid JSON body").with_details(json!({ "message": message }))
            }
            Self::BadRequest(message) | Self::NotFound(message) => {
                Envelope::failure(message.as_str())
            }
            Self::PayloadTooLarge => Envelope::failure("Request body too large"),
            Self::MethodNotAllowed => Envelope::failure("Method not allowed"),
            Self::Conversion(_) => Envelope::failure("Internal validation error"),
            Self::Internal(_) => Envelope::failure(INTERNAL_SERVER_ERROR),
        }
    }

    fn fault_detail(&self) -> Option<&str> {
        match self {
            Self::Conversion(detail) | Self::Internal(detail) => Some(detail),
            _ => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let mut response = (status, Json(self.envelope())).into_response();

        if let Some(detail) = self.fault_detail() {
            tracing::error!(error = %self, "internal server error");
            response
                .extensions_mut()
                .insert(FaultDetail(detail.to_string()));
        }

        response
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::NotFound(_) => Self::NotFound("Item not found".to_string()),
            ServiceError::Invalid(message) => Self::BadRequest(message),
            ServiceError::Repository(err) => err.into(),
        }
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        Self::Internal(err.to_string())
    }
}
