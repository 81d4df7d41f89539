//! `GET /api`: service index.

use axum::extract::State;
use axum::routing::get;
use axum::Router;
use serde::Serialize;
use utoipa::ToSchema;

use crate::envelope::{ApiResponse, Envelope};
use crate::state::AppState;

/// Endpoints served by this process.
const ENDPOINTS: &[&str] = &[
    "GET /api",
    "GET /api/items",
    "POST /api/items",
    "GET /api/items/{id}",
    "PUT /api/items/{id}",
    "DELETE /api/items/{id}",
    "GET /health",
    "GET /health/ready",
    "GET /metrics",
    "GET /openapi.json",
];

/// Body of the index response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiIndex {
    pub name: String,
    pub version: String,
    pub environment: String,
    pub endpoints: Vec<String>,
    /// Names of the request schemas the service validates against.
    pub schemas: Vec<String>,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/api", get(index))
}

/// GET /api: List endpoints and registered schemas.
#[utoipa::path(
    get, path = "/api",
    responses((status = 200, description = "Service index", body = Envelope)),
    tag = "meta"
)]
pub async fn index(State(state): State<AppState>) -> ApiResponse<ApiIndex> {
    ApiResponse::ok(ApiIndex {
        name: "stockpile".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        environment: state.config.environment.as_str().to_string(),
        endpoints: ENDPOINTS.iter().map(|e| e.to_string()).collect(),
        schemas: state.schemas.names().map(str::to_string).collect(),
    })
    .with_message("Welcome to the API")
}
