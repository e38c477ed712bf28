//! Product Service - Business logic layer

use std::sync::Arc;

use futures::future::try_join_all;
use list_query::{ListResult, QuerySpec};
use mongodb::bson::oid::ObjectId;
use tracing::instrument;
use validator::Validate;

use super::enricher::ReferenceEnricher;
use super::models::{CreateProduct, Product, ProductPatch, ProductReferences, UpdateProduct};
use super::repository::ProductRepository;
use crate::error::CatalogResult;
use crate::storage::{ImageStorage, ImageUpload, PRODUCT_IMAGES};

/// Product operations; every product handed back carries enriched references
pub struct ProductService<R: ProductRepository> {
    repository: Arc<R>,
    enricher: ReferenceEnricher,
    storage: Arc<dyn ImageStorage>,
}

impl<R: ProductRepository> ProductService<R> {
    pub fn new(
        repository: R,
        enricher: ReferenceEnricher,
        storage: Arc<dyn ImageStorage>,
    ) -> Self {
        Self {
            repository: Arc::new(repository),
            enricher,
            storage,
        }
    }

    pub fn storage(&self) -> &dyn ImageStorage {
        self.storage.as_ref()
    }

    /// One page of products, each enriched concurrently
    #[instrument(skip(self, spec))]
    pub async fn list(&self, spec: &QuerySpec) -> CatalogResult<ListResult<Product>> {
        let mut page = self.repository.list(spec).await?;
        let items = std::mem::take(&mut page.items);
        let enriched =
            try_join_all(items.into_iter().map(|product| self.enricher.enrich(product))).await?;
        Ok(page.with_items(enriched))
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: ObjectId) -> CatalogResult<Product> {
        let product = self.repository.get_by_id(id).await?;
        self.enricher.enrich(product).await
    }

    /// Every reference must resolve before anything is written
    #[instrument(skip(self, input), fields(title = %input.title))]
    pub async fn create(&self, input: CreateProduct) -> CatalogResult<Product> {
        input.validate()?;
        let product = Product::try_from(input)?;

        let resolved = self
            .enricher
            .resolve(&ProductReferences::of(&product))
            .await?;
        let created = self.repository.create(product).await?;
        Ok(resolved.apply(created))
    }

    /// Only references the update changes are checked up front
    #[instrument(skip(self, input))]
    pub async fn update(&self, id: ObjectId, input: UpdateProduct) -> CatalogResult<Product> {
        input.validate()?;
        let patch = ProductPatch::try_from(input)?;

        self.enricher.resolve(&patch.references()).await?;
        let updated = self.repository.update_by_id(id, patch).await?;
        self.enricher.enrich(updated).await
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: ObjectId) -> CatalogResult<()> {
        self.repository.delete_by_id(id).await
    }

    /// Store the upload as the product's cover image
    #[instrument(skip(self, upload), fields(content_type = %upload.content_type))]
    pub async fn set_image_cover(
        &self,
        id: ObjectId,
        upload: ImageUpload,
    ) -> CatalogResult<Product> {
        upload.check()?;
        self.repository.get_by_id(id).await?;

        let file = self.storage.store(upload, PRODUCT_IMAGES).await?;
        let updated = self
            .repository
            .update_by_id(id, ProductPatch::image_cover(file))
            .await?;
        self.enricher.enrich(updated).await
    }
}

impl<R: ProductRepository> Clone for ProductService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            enricher: self.enricher.clone(),
            storage: Arc::clone(&self.storage),
        }
    }
}
