//! MongoDB implementation of CategoryRepository

use async_trait::async_trait;
use chrono::Utc;
use list_query::{EntityKind, ListResult, QuerySpec};
use mongodb::{
    Database,
    bson::{doc, oid::ObjectId},
};
use tracing::instrument;

use super::models::{Category, CategoryDocument, CategoryPatch};
use super::repository::CategoryRepository;
use crate::error::CatalogResult;
use crate::store::DocumentStore;

pub const COLLECTION: &str = "categories";

pub struct MongoCategoryRepository {
    store: DocumentStore<CategoryDocument>,
}

impl MongoCategoryRepository {
    pub fn new(db: &Database) -> Self {
        Self::with_collection(db, COLLECTION)
    }

    pub fn with_collection(db: &Database, collection_name: &str) -> Self {
        Self {
            store: DocumentStore::new(db, collection_name, "name", EntityKind::Category, "Category"),
        }
    }

    pub async fn init_indexes(&self) -> CatalogResult<()> {
        self.store.init_unique_index().await
    }
}

#[async_trait]
impl CategoryRepository for MongoCategoryRepository {
    async fn exists_by_name(&self, name: &str) -> CatalogResult<bool> {
        self.store.exists_by_unique(name).await
    }

    async fn exists_by_id(&self, id: ObjectId) -> CatalogResult<bool> {
        self.store.exists_by_id(id).await
    }

    async fn count(&self) -> CatalogResult<u64> {
        self.store.count(doc! {}).await
    }

    #[instrument(skip(self, spec))]
    async fn list(&self, spec: &QuerySpec) -> CatalogResult<ListResult<Category>> {
        Ok(self.store.list(doc! {}, spec).await?.map(Category::from))
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: ObjectId) -> CatalogResult<Category> {
        self.store.get_by_id(id).await.map(Category::from)
    }

    #[instrument(skip(self, category), fields(name = %category.name))]
    async fn create(&self, category: Category) -> CatalogResult<Category> {
        let document = CategoryDocument::from(&category);
        self.store.insert(&category.name, &document).await?;

        let created = Category::from(document);
        tracing::info!(category_id = %created.id, "Category created");
        Ok(created)
    }

    #[instrument(skip(self, patch))]
    async fn update_by_id(&self, id: ObjectId, patch: CategoryPatch) -> CatalogResult<Category> {
        let updated = self.store.update(id, patch.to_set(Utc::now())).await?;

        tracing::info!(category_id = %id, "Category updated");
        Ok(Category::from(updated))
    }

    #[instrument(skip(self))]
    async fn delete_by_id(&self, id: ObjectId) -> CatalogResult<()> {
        if self.store.delete(id).await? {
            tracing::info!(category_id = %id, "Category deleted");
        }
        Ok(())
    }
}
