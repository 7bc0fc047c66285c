use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::Path,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Extension, Json,
};
use catalog_storage::perfume::PerfumeStorage;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::{
    middleware::AuthenticatedUser,
    photo_storage::PhotoStorage,
    routes::v1::perfumes::load_owned_perfume,
    types::AppError,
};

/// Maximum accepted photo size in bytes
pub const MAX_PHOTO_BYTES: usize = 10 * 1024 * 1024;

/// Image content types accepted for upload
const ALLOWED_CONTENT_TYPES: [&str; 3] = ["image/jpeg", "image/png", "image/webp"];

/// Response after a successful photo upload
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct PhotoUploadResponse {
    /// ID of the perfume the photo belongs to
    pub perfume_id: String,
    /// Content type recorded for the photo
    pub content_type: String,
    /// Size of the stored photo in bytes
    pub size_bytes: usize,
}

/// Raw image response with its recorded content type
pub struct PhotoBody {
    bytes: Vec<u8>,
    content_type: String,
}

impl IntoResponse for PhotoBody {
    fn into_response(self) -> Response {
        ([(header::CONTENT_TYPE, self.content_type)], self.bytes).into_response()
    }
}

impl aide::OperationOutput for PhotoBody {
    type Inner = Self;

    fn operation_response(
        _ctx: &mut aide::generate::GenContext,
        _operation: &mut aide::openapi::Operation,
    ) -> Option<aide::openapi::Response> {
        None
    }
}

/// Extracts and checks the request content type against the image allowlist
fn validate_content_type(headers: &HeaderMap) -> Result<String, AppError> {
    const UNSUPPORTED: AppError = AppError::new(
        StatusCode::BAD_REQUEST,
        "unsupported_media_type",
        "Photo must be image/jpeg, image/png or image/webp",
        false,
    );

    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .ok_or(UNSUPPORTED)?;

    let essence = content_type
        .parse::<mime::Mime>()
        .map_err(|_| UNSUPPORTED)?
        .essence_str()
        .to_string();

    if !ALLOWED_CONTENT_TYPES.contains(&essence.as_str()) {
        return Err(UNSUPPORTED);
    }

    Ok(essence)
}

/// Upload or replace the photo for a perfume
///
/// Accepts raw image bytes with an `image/jpeg`, `image/png` or
/// `image/webp` content type, up to 10 MiB.
///
/// # Returns
///
/// Returns `201 CREATED` with the stored photo's metadata
///
/// # Errors
///
/// Returns an error if:
/// - `400 BAD_REQUEST` - Missing or unsupported content type, or empty body
/// - `401 UNAUTHORIZED` - Invalid or missing authentication
/// - `403 FORBIDDEN` - The perfume belongs to another user
/// - `404 NOT_FOUND` - No perfume with this ID exists
/// - `413 PAYLOAD_TOO_LARGE` - Photo exceeds the size limit
/// - `503 SERVICE_UNAVAILABLE` - Storage connectivity issues
#[instrument(skip_all)]
pub async fn upload_photo(
    user: AuthenticatedUser,
    Path(id): Path<String>,
    Extension(perfume_storage): Extension<Arc<PerfumeStorage>>,
    Extension(photo_storage): Extension<Arc<PhotoStorage>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<PhotoUploadResponse>), AppError> {
    let content_type = validate_content_type(&headers)?;

    if body.is_empty() {
        return Err(AppError::new(
            StatusCode::BAD_REQUEST,
            "validation_error",
            "Photo body must not be empty",
            false,
        ));
    }

    let perfume = load_owned_perfume(&perfume_storage, &user, &id).await?;

    let key = PhotoStorage::photo_key(&perfume.id);
    photo_storage
        .upload(&key, body.to_vec(), &content_type)
        .await?;
    perfume_storage.set_photo_key(&perfume.id, &key).await?;

    tracing::info!(perfume_id = %perfume.id, size_bytes = body.len(), "Uploaded photo");

    Ok((
        StatusCode::CREATED,
        Json(PhotoUploadResponse {
            perfume_id: perfume.id,
            content_type,
            size_bytes: body.len(),
        }),
    ))
}

/// Get the photo for a perfume
///
/// Returns the raw image bytes with the content type recorded at upload.
///
/// # Errors
///
/// Returns an error if:
/// - `401 UNAUTHORIZED` - Invalid or missing authentication
/// - `403 FORBIDDEN` - The perfume belongs to another user
/// - `404 NOT_FOUND` - No perfume with this ID exists, or it has no photo
/// - `503 SERVICE_UNAVAILABLE` - Storage connectivity issues
#[instrument(skip_all)]
pub async fn get_photo(
    user: AuthenticatedUser,
    Path(id): Path<String>,
    Extension(perfume_storage): Extension<Arc<PerfumeStorage>>,
    Extension(photo_storage): Extension<Arc<PhotoStorage>>,
) -> Result<PhotoBody, AppError> {
    let perfume = load_owned_perfume(&perfume_storage, &user, &id).await?;

    let Some(photo_key) = &perfume.photo_key else {
        return Err(AppError::new(
            StatusCode::NOT_FOUND,
            "photo_not_found",
            "Photo not found",
            false,
        ));
    };

    let photo = photo_storage.download(photo_key).await?;

    Ok(PhotoBody {
        bytes: photo.bytes,
        content_type: photo.content_type,
    })
}

/// Delete the photo for a perfume
///
/// The perfume record survives with its photo reference cleared.
///
/// # Returns
///
/// Returns `204 NO_CONTENT` on successful deletion
///
/// # Errors
///
/// Returns an error if:
/// - `401 UNAUTHORIZED` - Invalid or missing authentication
/// - `403 FORBIDDEN` - The perfume belongs to another user
/// - `404 NOT_FOUND` - No perfume with this ID exists, or it has no photo
/// - `503 SERVICE_UNAVAILABLE` - Storage connectivity issues
#[instrument(skip_all)]
pub async fn delete_photo(
    user: AuthenticatedUser,
    Path(id): Path<String>,
    Extension(perfume_storage): Extension<Arc<PerfumeStorage>>,
    Extension(photo_storage): Extension<Arc<PhotoStorage>>,
) -> Result<StatusCode, AppError> {
    let perfume = load_owned_perfume(&perfume_storage, &user, &id).await?;

    let Some(photo_key) = &perfume.photo_key else {
        return Err(AppError::new(
            StatusCode::NOT_FOUND,
            "photo_not_found",
            "Photo not found",
            false,
        ));
    };

    photo_storage.delete(photo_key).await?;
    perfume_storage.clear_photo_key(&perfume.id).await?;

    tracing::info!(perfume_id = %perfume.id, "Deleted photo");

    Ok(StatusCode::NO_CONTENT)
}
