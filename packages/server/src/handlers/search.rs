use axum::Json;
use axum::extract::State;
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::base_url::BaseUrl;
use crate::extractors::body::AppForm;
use crate::models::inventory::{InventoryItemResponse, SearchRequest};
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/search",
    tag = "Search",
    operation_id = "searchItem",
    summary = "Look up an item by exact ID",
    description = "Accepts the search page's URL-encoded form. The `photo_url` field is included \
        only when `has_photo` is checked; otherwise it is left out of the response entirely.",
    request_body(content = SearchRequest, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Matching item", body = InventoryItemResponse),
        (status = 400, description = "Malformed ID (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Item not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, base_url, form))]
pub async fn search_item(
    State(state): State<AppState>,
    BaseUrl(base_url): BaseUrl,
    AppForm(form): AppForm<SearchRequest>,
) -> Result<Json<InventoryItemResponse>, AppError> {
    let id = form
        .parse_id()
        .ok_or_else(|| AppError::Validation("id must be a positive integer".into()))?;

    let record = state.records.get(id).await?;
    Ok(Json(InventoryItemResponse::from_record_with_photo(
        record,
        &base_url,
        form.wants_photo(),
    )))
}
