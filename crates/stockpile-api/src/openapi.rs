//! # OpenAPI Specification Assembly
//!
//! Assembles the utoipa-documented routes into a single OpenAPI 3.1 spec,
//! served at `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

/// Assembled OpenAPI spec for the entire API surface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Stockpile API",
        description = "Item catalogue service. Every request input is validated against a declared schema; every response is a JSON envelope."
    ),
    paths(
        crate::routes::index::index,
        crate::routes::items::list_items,
        crate::routes::items::get_item,
        crate::routes::items::create_item,
        crate::routes::items::update_item,
        crate::routes::items::delete_item,
        crate::routes::health::health,
        crate::routes::health::ready,
    ),
    components(
        schemas(
            crate::envelope::Envelope,
            crate::routes::index::ApiIndex,
            crate::routes::health::HealthReport,
            crate::routes::health::DatabaseStatus,
            crate::routes::health::ReadyReport,
            stockpile_core::Item,
            stockpile_schema::CreateItem,
            stockpile_schema::UpdateItem,
        ),
    ),
    tags(
        (name = "items", description = "Item CRUD"),
        (name = "health", description = "Liveness and readiness probes"),
        (name = "meta", description = "Service index"),
    )
)]
pub struct ApiDoc;

/// Router serving the spec.
pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
