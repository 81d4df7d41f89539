//! # Response Envelope
//!
//! Every JSON response of the service, success or failure, is an
//! [`Envelope`]:
//!
//! ```text
//! success: { "success": true,  "data": T | [T], "message"?: string, "count"?: number }
//! failure: { "success": false, "error": string, "details"?: any }
//! ```
//!
//! Handlers return [`ApiResponse`] for successes; failures are rendered by
//! [`AppError`](crate::error::AppError). Neither path can produce a success
//! envelope with an `error` or a failure envelope with `data`, and `count`
//! is only ever derived from an array payload.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::error::AppError;

/// The normalized response body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Envelope {
    /// Whether the request succeeded.
    pub success: bool,
    /// Payload of a successful request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    /// Error text of a failed request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Optional human-readable note.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Number of elements, present iff `data` is an array.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    /// Additional failure context, such as per-field validation messages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl Envelope {
    /// Success envelope around `data`. Arrays get a `count`.
    pub fn success(data: Value) -> Self {
        let count = data.as_array().map(Vec::len);
        Self {
            success: true,
            data: Some(data),
            error: None,
            message: None,
            count,
            details: None,
        }
    }

    /// Success envelope with a message and no payload.
    pub fn message_only(message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: None,
            error: None,
            message: Some(message.into()),
            count: None,
            details: None,
        }
    }

    /// Failure envelope.
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
            message: None,
            count: None,
            details: None,
        }
    }

    /// Attach a message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Attach failure details. Ignored on success envelopes.
    pub fn with_details(mut self, details: Value) -> Self {
        if !self.success {
            self.details = Some(details);
        }
        self
    }
}

/// A successful handler result: status, payload and optional message.
///
/// The payload is serialized when the response is rendered; a payload that
/// fails to serialize becomes a 500 failure envelope.
#[derive(Debug)]
pub struct ApiResponse<T = ()> {
    status: StatusCode,
    data: Option<T>,
    message: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    /// 200 with `data`.
    pub fn ok(data: T) -> Self {
        Self {
            status: StatusCode::OK,
            data: Some(data),
            message: None,
        }
    }

    /// 201 with `data`.
    pub fn created(data: T) -> Self {
        Self::ok(data).with_status(StatusCode::CREATED)
    }

    /// Attach a message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Override the status code.
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }
}

impl ApiResponse<()> {
    /// 200 with a message and no payload.
    pub fn message_only(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::OK,
            data: None,
            message: Some(message.into()),
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let envelope = match (self.data, self.message) {
            (None, message) => Envelope::message_only(message.unwrap_or_default()),
            (Some(data), message) => {
                let envelope = match serde_json::to_value(&data) {
                    Ok(value) => Envelope::success(value),
                    Err(err) => {
                        return AppError::Internal(format!("response serialization failed: {err}"))
                            .into_response()
                    }
                };
                match message {
                    Some(message) => envelope.with_message(message),
                    None => envelope,
                }
            }
        };
        (self.status, Json(envelope)).into_response()
    }
}
