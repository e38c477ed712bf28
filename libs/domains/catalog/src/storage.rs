//! Image uploads for categories, brands and product covers.

use std::path::PathBuf;

use async_trait::async_trait;
use tracing::instrument;
use uuid::Uuid;

use crate::error::{CatalogError, CatalogResult};

pub const MAX_IMAGE_BYTES: usize = 2 * 1024 * 1024;

pub const ALLOWED_CONTENT_TYPES: &[&str] = &["image/jpeg", "image/png", "image/webp"];

/// Multipart field that carries the file
pub const IMAGE_FIELD: &str = "image";

/// Where an image goes and the size it is meant for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageTarget {
    pub dir: &'static str,
    pub width: u32,
    pub height: u32,
    pub quality: u8,
}

impl ImageTarget {
    pub const fn square(dir: &'static str) -> Self {
        Self {
            dir,
            width: 600,
            height: 600,
            quality: 90,
        }
    }
}

pub const CATEGORY_IMAGES: ImageTarget = ImageTarget::square("categories");
pub const BRAND_IMAGES: ImageTarget = ImageTarget::square("brands");
pub const PRODUCT_IMAGES: ImageTarget = ImageTarget::square("products");

/// A file taken off a multipart request, not yet checked
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    /// Reject anything that is not a small jpeg, png or webp
    pub fn check(&self) -> CatalogResult<()> {
        if self.bytes.is_empty() {
            return Err(CatalogError::Validation("File is required".to_string()));
        }

        if !ALLOWED_CONTENT_TYPES.contains(&self.content_type.as_str()) {
            return Err(CatalogError::Validation(format!(
                "Invalid file type: {}. Allowed types: {}",
                self.content_type,
                ALLOWED_CONTENT_TYPES.join(", ")
            )));
        }

        if self.bytes.len() > MAX_IMAGE_BYTES {
            return Err(CatalogError::Validation(format!(
                "File too large. Max {} MB",
                MAX_IMAGE_BYTES / (1024 * 1024)
            )));
        }

        Ok(())
    }

    fn extension(&self) -> &'static str {
        match self.content_type.as_str() {
            "image/png" => "png",
            "image/webp" => "webp",
            _ => "jpeg",
        }
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImageStorage: Send + Sync {
    /// Persist a checked upload and return the stored file name
    async fn store(&self, upload: ImageUpload, target: ImageTarget) -> CatalogResult<String>;

    /// Public URL of a stored file
    fn public_url(&self, dir: &str, file: &str) -> String;
}

/// Writes images under `{root}/{dir}/` and serves them from
/// `{base_url}/uploads/{dir}/`.
///
/// Bytes are written as received; the target size is only recorded.
#[derive(Debug, Clone)]
pub struct LocalImageStorage {
    root: PathBuf,
    base_url: String,
}

impl LocalImageStorage {
    pub fn new(root: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn root(&self) -> &PathBuf {
        &self.root
    }

    fn file_name(target: &ImageTarget, extension: &str) -> String {
        format!(
            "{}-{}-{}.{}",
            target.dir,
            Uuid::new_v4(),
            chrono::Utc::now().timestamp_millis(),
            extension
        )
    }
}

#[async_trait]
impl ImageStorage for LocalImageStorage {
    #[instrument(
        skip(self, upload),
        fields(
            dir = target.dir,
            width = target.width,
            height = target.height,
            quality = target.quality,
            bytes = upload.bytes.len()
        )
    )]
    async fn store(&self, upload: ImageUpload, target: ImageTarget) -> CatalogResult<String> {
        upload.check()?;

        let dir = self.root.join(target.dir);
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| CatalogError::Storage(format!("Failed to create {}: {e}", dir.display())))?;

        let file_name = Self::file_name(&target, upload.extension());
        let path = dir.join(&file_name);
        tokio::fs::write(&path, &upload.bytes)
            .await
            .map_err(|e| CatalogError::Storage(format!("Failed to write {}: {e}", path.display())))?;

        tracing::info!(file = %file_name, "Image stored");
        Ok(file_name)
    }

    fn public_url(&self, dir: &str, file: &str) -> String {
        format!("{}/uploads/{}/{}", self.base_url, dir, file)
    }
}
