//! MongoDB implementation of BrandRepository

use async_trait::async_trait;
use chrono::Utc;
use list_query::{EntityKind, ListResult, QuerySpec};
use mongodb::{
    Database,
    bson::{doc, oid::ObjectId},
};
use tracing::instrument;

use super::models::{Brand, BrandDocument, BrandPatch};
use super::repository::BrandRepository;
use crate::error::CatalogResult;
use crate::store::DocumentStore;

pub const COLLECTION: &str = "brands";

pub struct MongoBrandRepository {
    store: DocumentStore<BrandDocument>,
}

impl MongoBrandRepository {
    pub fn new(db: &Database) -> Self {
        Self::with_collection(db, COLLECTION)
    }

    pub fn with_collection(db: &Database, collection_name: &str) -> Self {
        Self {
            store: DocumentStore::new(db, collection_name, "name", EntityKind::Brand, "Brand"),
        }
    }

    pub async fn init_indexes(&self) -> CatalogResult<()> {
        self.store.init_unique_index().await
    }
}

#[async_trait]
impl BrandRepository for MongoBrandRepository {
    async fn exists_by_name(&self, name: &str) -> CatalogResult<bool> {
        self.store.exists_by_unique(name).await
    }

    async fn count(&self) -> CatalogResult<u64> {
        self.store.count(doc! {}).await
    }

    #[instrument(skip(self, spec))]
    async fn list(&self, spec: &QuerySpec) -> CatalogResult<ListResult<Brand>> {
        Ok(self.store.list(doc! {}, spec).await?.map(Brand::from))
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: ObjectId) -> CatalogResult<Brand> {
        self.store.get_by_id(id).await.map(Brand::from)
    }

    #[instrument(skip(self, brand), fields(name = %brand.name))]
    async fn create(&self, brand: Brand) -> CatalogResult<Brand> {
        let document = BrandDocument::from(&brand);
        self.store.insert(&brand.name, &document).await?;

        let created = Brand::from(document);
        tracing::info!(brand_id = %created.id, "Brand created");
        Ok(created)
    }

    #[instrument(skip(self, patch))]
    async fn update_by_id(&self, id: ObjectId, patch: BrandPatch) -> CatalogResult<Brand> {
        let updated = self.store.update(id, patch.to_set(Utc::now())).await?;

        tracing::info!(brand_id = %id, "Brand updated");
        Ok(Brand::from(updated))
    }

    #[instrument(skip(self))]
    async fn delete_by_id(&self, id: ObjectId) -> CatalogResult<()> {
        if self.store.delete(id).await? {
            tracing::info!(brand_id = %id, "Brand deleted");
        }
        Ok(())
    }
}
