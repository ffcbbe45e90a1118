use axum::body::Body;
use axum::extract::{Multipart, Path, State};
use axum::extract::multipart::Field;
use axum::http::{StatusCode, header};
use axum::response::Response;
use store::{BlobStore, StorageRef};
use tokio_util::io::ReaderStream;
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/uploads/{storage_ref}",
    tag = "Uploads",
    operation_id = "getUpload",
    summary = "Download a stored photo",
    description = "Streams a stored photo by its storage name. This is the target of every `photo_url`.",
    params(("storage_ref" = String, Path, description = "Storage name, e.g. `1718044800123.png`")),
    responses(
        (status = 200, description = "Photo content"),
        (status = 400, description = "Malformed storage name (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Photo not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn serve_upload(
    State(state): State<AppState>,
    Path(storage_ref): Path<String>,
) -> Result<Response, AppError> {
    let storage_ref = StorageRef::parse(&storage_ref)?;
    blob_response(&*state.blob_store, &storage_ref).await
}

/// Build a streaming response for a stored photo.
pub(crate) async fn blob_response(
    blob_store: &dyn BlobStore,
    storage_ref: &StorageRef,
) -> Result<Response, AppError> {
    let reader = blob_store.open(storage_ref).await?;
    let body = Body::from_stream(ReaderStream::new(reader));

    let mime = mime_guess::from_path(storage_ref.as_str()).first_or_octet_stream();

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, mime.as_ref())
        .header(header::CACHE_CONTROL, "public, max-age=3600")
        .body(body)
        .map_err(|e| AppError::Internal(format!("Failed to build response: {e}")))
}

/// An uploaded file held in memory until the request is validated.
pub(crate) struct PhotoUpload {
    pub file_name: String,
    pub data: Vec<u8>,
}

impl PhotoUpload {
    pub async fn store(self, blob_store: &dyn BlobStore) -> Result<StorageRef, AppError> {
        Ok(blob_store.put(&self.data, &self.file_name).await?)
    }
}

/// Read a multipart file field, enforcing `max_size`.
///
/// Returns `None` for the empty part browsers send when no file was chosen.
pub(crate) async fn read_photo_field(
    mut field: Field<'_>,
    max_size: u64,
) -> Result<Option<PhotoUpload>, AppError> {
    let file_name = field.file_name().unwrap_or_default().to_string();
    let mut data = Vec::new();

    while let Some(chunk) = field
        .chunk()
        .await
        .map_err(|e| AppError::Validation(format!("Upload read error: {e}")))?
    {
        if (data.len() + chunk.len()) as u64 > max_size {
            return Err(AppError::Validation(format!(
                "File exceeds maximum size of {max_size} bytes"
            )));
        }
        data.extend_from_slice(&chunk);
    }

    if file_name.is_empty() && data.is_empty() {
        return Ok(None);
    }

    Ok(Some(PhotoUpload { file_name, data }))
}

/// Read a multipart text field.
pub(crate) async fn read_text_field(field: Field<'_>) -> Result<String, AppError> {
    let name = field.name().unwrap_or_default().to_string();
    field
        .text()
        .await
        .map_err(|e| AppError::Validation(format!("Failed to read {name}: {e}")))
}

/// Pull the next multipart field, mapping parse failures to validation errors.
pub(crate) async fn next_field<'a>(
    multipart: &'a mut Multipart,
) -> Result<Option<Field<'a>>, AppError> {
    multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Multipart error: {e}")))
}
