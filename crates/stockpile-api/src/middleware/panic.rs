//! Panic recovery.
//!
//! A handler panic is turned into the same 500 envelope as any other
//! internal fault, so clients still receive exactly one envelope.

use std::any::Any;

use axum::response::{IntoResponse, Response};

use crate::error::AppError;

/// `CatchPanicLayer` callback.
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        (*s).to_string()
    } else {
        "unknown panic payload".to_string()
    };
    AppError::Internal(format!("handler panicked: {detail}")).into_response()
}
