use axum::Json;
use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use store::{NewRecord, records::validate_name};
use tracing::{info, instrument};

use crate::error::{AppError, ErrorBody};
use crate::extractors::base_url::BaseUrl;
use crate::extractors::body::AppJson;
use crate::handlers::uploads::{
    PhotoUpload, blob_response, next_field, read_photo_field, read_text_field,
};
use crate::models::inventory::{InventoryItemResponse, UpdateItemRequest};
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/inventory",
    tag = "Inventory",
    operation_id = "registerItem",
    summary = "Register a new inventory item",
    description = "Creates an item from a multipart form. `inventory_name` is required; \
        `description` defaults to an empty string; an optional `photo` file is stored and \
        linked to the item. IDs are assigned by the server, always increase, and are \
        never reused, even after the newest item is deleted.",
    request_body(content_type = "multipart/form-data", description = "Fields `inventory_name`, `description`, `photo`"),
    responses(
        (status = 201, description = "Item created", body = InventoryItemResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, base_url, multipart))]
pub async fn register_item(
    State(state): State<AppState>,
    BaseUrl(base_url): BaseUrl,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let mut name: Option<String> = None;
    let mut description: Option<String> = None;
    let mut photo: Option<PhotoUpload> = None;

    while let Some(field) = next_field(&mut multipart).await? {
        match field.name() {
            Some("inventory_name") => name = Some(read_text_field(field).await?),
            Some("description") => description = Some(read_text_field(field).await?),
            Some("photo") => {
                photo = read_photo_field(field, state.config.storage.max_upload_size).await?;
            }
            _ => {} // Ignore unknown fields.
        }
    }

    let name = name.unwrap_or_default();
    // Checked before the photo is written so a rejected request leaves no blob behind.
    validate_name(&name)?;

    let photo_ref = match photo {
        Some(upload) => Some(upload.store(&*state.blob_store).await?),
        None => None,
    };

    let record = state
        .records
        .create(NewRecord {
            name,
            description,
            photo_ref,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(InventoryItemResponse::from_record(record, &base_url)),
    ))
}

#[utoipa::path(
    get,
    path = "/inventory",
    tag = "Inventory",
    operation_id = "listItems",
    summary = "List all inventory items",
    description = "Returns every item in stored order. An empty inventory yields an empty array.",
    responses(
        (status = 200, description = "All items", body = [InventoryItemResponse]),
    ),
)]
#[instrument(skip(state, base_url))]
pub async fn list_items(
    State(state): State<AppState>,
    BaseUrl(base_url): BaseUrl,
) -> Result<Json<Vec<InventoryItemResponse>>, AppError> {
    let records = state.records.list().await?;
    Ok(Json(
        records
            .into_iter()
            .map(|r| InventoryItemResponse::from_record(r, &base_url))
            .collect(),
    ))
}

#[utoipa::path(
    get,
    path = "/inventory/{id}",
    tag = "Inventory",
    operation_id = "getItem",
    summary = "Get an inventory item by ID",
    params(("id" = u64, Path, description = "Item ID")),
    responses(
        (status = 200, description = "Item details", body = InventoryItemResponse),
        (status = 404, description = "Item not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, base_url))]
pub async fn get_item(
    State(state): State<AppState>,
    BaseUrl(base_url): BaseUrl,
    Path(id): Path<u64>,
) -> Result<Json<InventoryItemResponse>, AppError> {
    let record = state.records.get(id).await?;
    Ok(Json(InventoryItemResponse::from_record(record, &base_url)))
}

#[utoipa::path(
    put,
    path = "/inventory/{id}",
    tag = "Inventory",
    operation_id = "updateItem",
    summary = "Update an item's name and description",
    description = "Overwrites only the fields that are present and non-empty. An empty string is \
        treated the same as an omitted field, so a field cannot be cleared through this endpoint.",
    params(("id" = u64, Path, description = "Item ID")),
    request_body = UpdateItemRequest,
    responses(
        (status = 200, description = "Item updated", body = InventoryItemResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Item not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, base_url, payload))]
pub async fn update_item(
    State(state): State<AppState>,
    BaseUrl(base_url): BaseUrl,
    Path(id): Path<u64>,
    AppJson(payload): AppJson<UpdateItemRequest>,
) -> Result<Json<InventoryItemResponse>, AppError> {
    let record = state.records.update(id, payload.into()).await?;
    Ok(Json(InventoryItemResponse::from_record(record, &base_url)))
}

#[utoipa::path(
    delete,
    path = "/inventory/{id}",
    tag = "Inventory",
    operation_id = "deleteItem",
    summary = "Delete an inventory item",
    description = "Permanently removes the item. Its photo file is kept on disk.",
    params(("id" = u64, Path, description = "Item ID")),
    responses(
        (status = 204, description = "Item deleted"),
        (status = 404, description = "Item not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn delete_item(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<impl IntoResponse, AppError> {
    state.records.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/inventory/{id}/photo",
    tag = "Inventory",
    operation_id = "getItemPhoto",
    summary = "Download an item's photo",
    params(("id" = u64, Path, description = "Item ID")),
    responses(
        (status = 200, description = "Photo content"),
        (status = 404, description = "Item not found, or it has no photo (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn get_item_photo(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Response, AppError> {
    let record = state.records.get(id).await?;
    let photo_ref = record
        .photo_ref
        .ok_or_else(|| AppError::NotFound(format!("Inventory item {id} has no photo")))?;

    blob_response(&*state.blob_store, &photo_ref).await
}

#[utoipa::path(
    put,
    path = "/inventory/{id}/photo",
    tag = "Inventory",
    operation_id = "replaceItemPhoto",
    summary = "Replace an item's photo",
    description = "Stores the uploaded `photo` file and points the item at it. \
        The previous photo file is kept on disk.",
    params(("id" = u64, Path, description = "Item ID")),
    request_body(content_type = "multipart/form-data", description = "Field `photo`"),
    responses(
        (status = 200, description = "Photo replaced", body = InventoryItemResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Item not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, base_url, multipart))]
pub async fn replace_item_photo(
    State(state): State<AppState>,
    BaseUrl(base_url): BaseUrl,
    Path(id): Path<u64>,
    mut multipart: Multipart,
) -> Result<Json<InventoryItemResponse>, AppError> {
    // Fail before touching storage when the item does not exist.
    state.records.get(id).await?;

    let mut photo: Option<PhotoUpload> = None;
    while let Some(field) = next_field(&mut multipart).await? {
        if field.name() == Some("photo") {
            photo = read_photo_field(field, state.config.storage.max_upload_size).await?;
        }
    }

    let upload = photo.ok_or_else(|| AppError::Validation("Missing 'photo' field".into()))?;
    let photo_ref = upload.store(&*state.blob_store).await?;
    info!(id, %photo_ref, "Replacing item photo");

    let record = state.records.set_photo(id, photo_ref).await?;
    Ok(Json(InventoryItemResponse::from_record(record, &base_url)))
}
