//! # Item API
//!
//! CRUD over catalogue items. Every input is validated by a schema-backed
//! extractor before the handler runs; handlers only see typed DTOs.

use axum::extract::State;
use axum::routing::get;
use axum::Router;
use stockpile_core::Item;
use stockpile_schema::{CreateItem, IdParam, ListItemsQuery, UpdateItem};

use crate::envelope::{ApiResponse, Envelope};
use crate::error::AppError;
use crate::extractors::{ValidatedBody, ValidatedPath, ValidatedQuery};
use crate::state::AppState;

/// Build the items router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/items", get(list_items).post(create_item))
        .route(
            "/api/items/{id}",
            get(get_item).put(update_item).delete(delete_item),
        )
}

/// GET /api/items: List items, newest first.
#[utoipa::path(
    get, path = "/api/items",
    params(ListItemsQuery),
    responses(
        (status = 200, description = "Items with count", body = Envelope),
        (status = 400, description = "Invalid pagination", body = Envelope),
    ),
    tag = "items"
)]
pub async fn list_items(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<ListItemsQuery>,
) -> Result<ApiResponse<Vec<Item>>, AppError> {
    let items = state.items.list(query.page()).await?;
    Ok(ApiResponse::ok(items))
}

/// GET /api/items/{id}: Fetch one item.
#[utoipa::path(
    get, path = "/api/items/{id}",
    params(("id" = i64, Path, description = "Item ID")),
    responses(
        (status = 200, description = "Item found", body = Envelope),
        (status = 400, description = "Invalid ID", body = Envelope),
        (status = 404, description = "Item not found", body = Envelope),
    ),
    tag = "items"
)]
pub async fn get_item(
    State(state): State<AppState>,
    ValidatedPath(IdParam { id }): ValidatedPath<IdParam>,
) -> Result<ApiResponse<Item>, AppError> {
    let item = state.items.get(id).await?;
    Ok(ApiResponse::ok(item))
}

/// POST /api/items: Create an item.
#[utoipa::path(
    post, path = "/api/items",
    request_body = CreateItem,
    responses(
        (status = 201, description = "Item created", body = Envelope),
        (status = 400, description = "Validation failed", body = Envelope),
    ),
    tag = "items"
)]
pub async fn create_item(
    State(state): State<AppState>,
    ValidatedBody(request): ValidatedBody<CreateItem>,
) -> Result<ApiResponse<Item>, AppError> {
    let item = state.items.create(request).await?;
    Ok(ApiResponse::created(item).with_message("Item created successfully"))
}

/// PUT /api/items/{id}: Update the supplied fields of an item.
///
/// The path is validated before the body; a bad ID short-circuits.
#[utoipa::path(
    put, path = "/api/items/{id}",
    params(("id" = i64, Path, description = "Item ID")),
    request_body = UpdateItem,
    responses(
        (status = 200, description = "Item updated", body = Envelope),
        (status = 400, description = "Validation failed", body = Envelope),
        (status = 404, description = "Item not found", body = Envelope),
    ),
    tag = "items"
)]
pub async fn update_item(
    State(state): State<AppState>,
    ValidatedPath(IdParam { id }): ValidatedPath<IdParam>,
    ValidatedBody(request): ValidatedBody<UpdateItem>,
) -> Result<ApiResponse<Item>, AppError> {
    let item = state.items.update(id, request).await?;
    Ok(ApiResponse::ok(item).with_message("Item updated successfully"))
}

/// DELETE /api/items/{id}: Delete an item.
#[utoipa::path(
    delete, path = "/api/items/{id}",
    params(("id" = i64, Path, description = "Item ID")),
    responses(
        (status = 200, description = "Item deleted", body = Envelope),
        (status = 400, description = "Invalid ID", body = Envelope),
        (status = 404, description = "Item not found", body = Envelope),
    ),
    tag = "items"
)]
pub async fn delete_item(
    State(state): State<AppState>,
    ValidatedPath(IdParam { id }): ValidatedPath<IdParam>,
) -> Result<ApiResponse, AppError> {
    state.items.delete(id).await?;
    Ok(ApiResponse::message_only("Item deleted successfully"))
}
