//! # stockpile-api: Axum HTTP Service for Stockpile
//!
//! A small item catalogue whose request handling is driven by declarative
//! validation schemas. Every input source (body, path, query) is checked by
//! a schema-backed extractor before a handler runs, and every response,
//! success or failure, is a JSON [`envelope::Envelope`].
//!
//! ## API Surface
//!
//! | Route                 | Methods            | Module                 |
//! |-----------------------|--------------------|------------------------|
//! | `/api`                | GET                | [`routes::index`]      |
//! | `/api/items`          | GET, POST          | [`routes::items`]      |
//! | `/api/items/{id}`     | GET, PUT, DELETE   | [`routes::items`]      |
//! | `/health`             | GET                | [`routes::health`]     |
//! | `/health/ready`       | GET                | [`routes::health`]     |
//! | `/metrics`            | GET                | [`routes::metrics`]    |
//! | `/openapi.json`       | GET                | [`openapi`]            |
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! Cors → Trace → Metrics → FaultDetail (non-production) → CatchPanic → Handler
//! ```

pub mod config;
pub mod db;
pub mod envelope;
pub mod error;
pub mod extractors;
pub mod middleware;
pub mod openapi;
pub mod repository;
pub mod routes;
pub mod service;
pub mod state;

use axum::middleware::from_fn;
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;

use crate::state::AppState;

/// Assemble the full application router with all routes and middleware.
pub fn app(state: AppState) -> Router {
    let expose_faults = state.config.environment.exposes_fault_details();

    let mut router = Router::new()
        .merge(routes::index::router())
        .merge(routes::items::router())
        .merge(routes::health::router())
        .merge(routes::metrics::router())
        .merge(openapi::router())
        .fallback(routes::not_found)
        .method_not_allowed_fallback(routes::method_not_allowed)
        .layer(CatchPanicLayer::custom(middleware::panic::handle_panic));

    if expose_faults {
        router = router.layer(from_fn(middleware::fault_detail::expose_fault_details));
    }

    router
        .layer(from_fn(middleware::metrics::metrics_middleware))
        .layer(middleware::tracing_layer::layer())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
