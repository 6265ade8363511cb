use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    Extension, Json,
};
use uuid::Uuid;

use common::types::Message;
use service::auth::Identity;
use service::items::{service as items, Item, ItemCreate, ItemUpdate, ItemsPage};
use service::pagination::PageRequest;

use crate::{errors::JsonApiError, routes::auth::ServerState};

fn item_id(id: Result<Path<Uuid>, PathRejection>) -> Result<Uuid, JsonApiError> {
    id.map(|Path(id)| id).map_err(|e| JsonApiError::invalid_input("id", e.body_text()))
}

#[utoipa::path(
    get, path = "/items", tag = "items",
    params(
        ("skip" = Option<u64>, Query, description = "Items to skip, default 0"),
        ("limit" = Option<u64>, Query, description = "Page size, clamped to the configured maximum"),
    ),
    responses(
        (status = 200, description = "Visible items", body = crate::openapi::ItemsPageDoc),
        (status = 401, description = "Could not validate credentials", body = crate::openapi::ErrorDoc),
        (status = 422, description = "Validation Error", body = crate::openapi::ErrorDoc)
    ),
    security(("bearer" = []))
)]
pub async fn list(
    State(state): State<ServerState>,
    Extension(identity): Extension<Identity>,
    page: Result<Query<PageRequest>, QueryRejection>,
) -> Result<Json<ItemsPage>, JsonApiError> {
    let Query(page) = page?;
    let page = items::list(state.store.as_ref(), &identity, page, &state.policy).await?;
    Ok(Json(page))
}

#[utoipa::path(
    get, path = "/items/{id}", tag = "items",
    params(("id" = Uuid, Path, description = "Item id")),
    responses(
        (status = 200, description = "Item", body = crate::openapi::ItemDoc),
        (status = 401, description = "Could not validate credentials", body = crate::openapi::ErrorDoc),
        (status = 403, description = "Not enough permissions", body = crate::openapi::ErrorDoc),
        (status = 404, description = "Item not found", body = crate::openapi::ErrorDoc)
    ),
    security(("bearer" = []))
)]
pub async fn get(
    State(state): State<ServerState>,
    Extension(identity): Extension<Identity>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Item>, JsonApiError> {
    let id = item_id(id)?;
    let item = items::get(state.store.as_ref(), &identity, id, &state.policy).await?;
    Ok(Json(item))
}

/// Owner is always the caller; an `owner_id` in the body is ignored.
#[utoipa::path(
    post, path = "/items", tag = "items",
    request_body = crate::openapi::ItemCreateDoc,
    responses(
        (status = 200, description = "Created", body = crate::openapi::ItemDoc),
        (status = 401, description = "Could not validate credentials", body = crate::openapi::ErrorDoc),
        (status = 422, description = "Validation Error", body = crate::openapi::ErrorDoc)
    ),
    security(("bearer" = []))
)]
pub async fn create(
    State(state): State<ServerState>,
    Extension(identity): Extension<Identity>,
    input: Result<Json<ItemCreate>, JsonRejection>,
) -> Result<Json<Item>, JsonApiError> {
    let Json(input) = input?;
    let item = items::create(state.store.as_ref(), &identity, input).await?;
    Ok(Json(item))
}

#[utoipa::path(
    put, path = "/items/{id}", tag = "items",
    params(("id" = Uuid, Path, description = "Item id")),
    request_body = crate::openapi::ItemUpdateDoc,
    responses(
        (status = 200, description = "Updated", body = crate::openapi::ItemDoc),
        (status = 401, description = "Could not validate credentials", body = crate::openapi::ErrorDoc),
        (status = 403, description = "Not enough permissions", body = crate::openapi::ErrorDoc),
        (status = 404, description = "Item not found", body = crate::openapi::ErrorDoc),
        (status = 422, description = "Validation Error", body = crate::openapi::ErrorDoc)
    ),
    security(("bearer" = []))
)]
pub async fn update(
    State(state): State<ServerState>,
    Extension(identity): Extension<Identity>,
    id: Result<Path<Uuid>, PathRejection>,
    changes: Result<Json<ItemUpdate>, JsonRejection>,
) -> Result<Json<Item>, JsonApiError> {
    let id = item_id(id)?;
    let Json(changes) = changes?;
    let item = items::update(state.store.as_ref(), &identity, id, changes, &state.policy).await?;
    Ok(Json(item))
}

#[utoipa::path(
    delete, path = "/items/{id}", tag = "items",
    params(("id" = Uuid, Path, description = "Item id")),
    responses(
        (status = 200, description = "Deleted", body = crate::openapi::MessageDoc),
        (status = 401, description = "Could not validate credentials", body = crate::openapi::ErrorDoc),
        (status = 403, description = "Not enough permissions", body = crate::openapi::ErrorDoc),
        (status = 404, description = "Item not found", body = crate::openapi::ErrorDoc)
    ),
    security(("bearer" = []))
)]
pub async fn delete(
    State(state): State<ServerState>,
    Extension(identity): Extension<Identity>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Message>, JsonApiError> {
    let id = item_id(id)?;
    let msg = items::delete(state.store.as_ref(), &identity, id, &state.policy).await?;
    Ok(Json(msg))
}
