//! Multipart parsing shared by the image endpoints.

use axum::extract::{DefaultBodyLimit, Multipart};

use crate::error::{CatalogError, CatalogResult};
use crate::storage::{IMAGE_FIELD, ImageUpload, MAX_IMAGE_BYTES};

/// Body limit for image routes; leaves room for multipart framing so an
/// oversized file gets the size message rather than a framing error.
pub fn body_limit() -> DefaultBodyLimit {
    DefaultBodyLimit::max(MAX_IMAGE_BYTES + 1024 * 1024)
}

/// Take the `image` field off the request
pub async fn read_image(mut multipart: Multipart) -> CatalogResult<ImageUpload> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| CatalogError::Validation(e.body_text()))?
    {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }

        let content_type = field.content_type().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| CatalogError::Validation(e.body_text()))?;

        return Ok(ImageUpload {
            content_type,
            bytes: bytes.to_vec(),
        });
    }

    Err(CatalogError::Validation("File is required".to_string()))
}
