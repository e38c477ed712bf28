//! Brand Service - Business logic layer

use std::sync::Arc;

use list_query::{ListResult, QuerySpec};
use mongodb::bson::oid::ObjectId;
use tracing::instrument;
use validator::Validate;

use super::models::{Brand, BrandPatch, CreateBrand, UpdateBrand};
use super::repository::BrandRepository;
use crate::error::CatalogResult;
use crate::storage::{BRAND_IMAGES, ImageStorage, ImageUpload};

pub struct BrandService<R: BrandRepository> {
    repository: Arc<R>,
    storage: Arc<dyn ImageStorage>,
}

impl<R: BrandRepository> BrandService<R> {
    pub fn new(repository: R, storage: Arc<dyn ImageStorage>) -> Self {
        Self::from_shared(Arc::new(repository), storage)
    }

    /// Share one repository between this service and its other readers
    pub fn from_shared(repository: Arc<R>, storage: Arc<dyn ImageStorage>) -> Self {
        Self {
            repository,
            storage,
        }
    }

    pub fn storage(&self) -> &dyn ImageStorage {
        self.storage.as_ref()
    }

    #[instrument(skip(self, spec))]
    pub async fn list(&self, spec: &QuerySpec) -> CatalogResult<ListResult<Brand>> {
        self.repository.list(spec).await
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: ObjectId) -> CatalogResult<Brand> {
        self.repository.get_by_id(id).await
    }

    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create(&self, input: CreateBrand) -> CatalogResult<Brand> {
        input.validate()?;
        self.repository.create(Brand::new(input)).await
    }

    #[instrument(skip(self, input))]
    pub async fn update(&self, id: ObjectId, input: UpdateBrand) -> CatalogResult<Brand> {
        input.validate()?;
        self.repository
            .update_by_id(id, BrandPatch::from(input))
            .await
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: ObjectId) -> CatalogResult<()> {
        self.repository.delete_by_id(id).await
    }

    /// Store the upload and point the brand at it
    #[instrument(skip(self, upload), fields(content_type = %upload.content_type))]
    pub async fn set_image(&self, id: ObjectId, upload: ImageUpload) -> CatalogResult<Brand> {
        upload.check()?;
        // fail before writing a file nobody will reference
        self.repository.get_by_id(id).await?;

        let file = self.storage.store(upload, BRAND_IMAGES).await?;
        self.repository
            .update_by_id(id, BrandPatch::image(file))
            .await
    }
}

impl<R: BrandRepository> Clone for BrandService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            storage: Arc::clone(&self.storage),
        }
    }
}
