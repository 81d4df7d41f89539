//! # Health Probes
//!
//! `GET /health` reports process and store status; `GET /health/ready`
//! answers whether the service can take traffic. Both return 503 with a
//! failure envelope, the report under `details`, when the item store is
//! unreachable.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::envelope::{ApiResponse, Envelope};
use crate::state::AppState;

/// Store connectivity.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DatabaseStatus {
    pub connected: bool,
    /// `memory` or `postgres`.
    pub kind: String,
}

/// Body of `GET /health`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct HealthReport {
    /// `healthy` or `unhealthy`.
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub uptime_seconds: f64,
    pub environment: String,
    pub database: DatabaseStatus,
}

/// Body of `GET /health/ready`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ReadyReport {
    /// `ready` or `not ready`.
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(ready))
}

async fn store_reachable(state: &AppState) -> bool {
    match state.repository().ping().await {
        Ok(()) => true,
        Err(err) => {
            tracing::warn!(%err, "item store unreachable");
            false
        }
    }
}

/// Success envelope when `healthy`, otherwise 503 with the report as details.
fn respond<T: Serialize>(healthy: bool, report: T, failure: &str) -> Response {
    if healthy {
        return ApiResponse::ok(report).into_response();
    }
    let details = serde_json::to_value(&report).unwrap_or_default();
    (
        StatusCode::SERVICE_UNAVAILABLE,
        Json(Envelope::failure(failure).with_details(details)),
    )
        .into_response()
}

/// GET /health: Process and store status.
#[utoipa::path(
    get, path = "/health",
    responses(
        (status = 200, description = "Service healthy", body = Envelope),
        (status = 503, description = "Item store unreachable", body = Envelope),
    ),
    tag = "health"
)]
pub async fn health(State(state): State<AppState>) -> Response {
    let connected = store_reachable(&state).await;
    let report = HealthReport {
        status: if connected { "healthy" } else { "unhealthy" }.to_string(),
        timestamp: Utc::now(),
        uptime_seconds: state.started_at.elapsed().as_secs_f64(),
        environment: state.config.environment.as_str().to_string(),
        database: DatabaseStatus {
            connected,
            kind: state.repository().kind().to_string(),
        },
    };
    respond(connected, report, "Service unhealthy")
}

/// GET /health/ready: Readiness to take traffic.
#[utoipa::path(
    get, path = "/health/ready",
    responses(
        (status = 200, description = "Ready", body = Envelope),
        (status = 503, description = "Not ready", body = Envelope),
    ),
    tag = "health"
)]
pub async fn ready(State(state): State<AppState>) -> Response {
    let ready = store_reachable(&state).await;
    let report = ReadyReport {
        status: if ready { "ready" } else { "not ready" }.to_string(),
        timestamp: Utc::now(),
    };
    respond(ready, report, "Service not ready")
}
