//! # Route Handlers
//!
//! | Prefix           | Module         |
//! |------------------|----------------|
//! | `/api`           | [`index`]      |
//! | `/api/items/*`   | [`items`]      |
//! | `/health/*`      | [`health`]     |
//! | `/metrics`       | [`metrics`]    |
//!
//! Requests that match no route, or a route but not its method, still get
//! a failure envelope.

pub mod health;
pub mod index;
pub mod items;
pub mod metrics;

use crate::error::AppError;

/// Fallback for unknown routes.
pub async fn not_found() -> AppError {
    AppError::NotFound("Route not found".to_string())
}

/// Fallback for known routes called with an unsupported method.
pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}
