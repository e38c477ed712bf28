//! MongoDB implementation of SubCategoryRepository

use async_trait::async_trait;
use chrono::Utc;
use list_query::{EntityKind, ListResult, QuerySpec};
use mongodb::{
    Database, IndexModel,
    bson::{doc, oid::ObjectId},
    options::IndexOptions,
};
use tracing::instrument;

use super::models::{SubCategory, SubCategoryDocument, SubCategoryPatch};
use super::repository::SubCategoryRepository;
use crate::error::CatalogResult;
use crate::store::DocumentStore;

pub const COLLECTION: &str = "subcategories";

pub struct MongoSubCategoryRepository {
    store: DocumentStore<SubCategoryDocument>,
}

impl MongoSubCategoryRepository {
    pub fn new(db: &Database) -> Self {
        Self::with_collection(db, COLLECTION)
    }

    pub fn with_collection(db: &Database, collection_name: &str) -> Self {
        Self {
            store: DocumentStore::new(
                db,
                collection_name,
                "name",
                EntityKind::SubCategory,
                "SubCategory",
            ),
        }
    }

    /// Unique name plus a lookup index for the per-category listing
    pub async fn init_indexes(&self) -> CatalogResult<()> {
        self.store.init_unique_index().await?;

        let by_category = IndexModel::builder()
            .keys(doc! { "category": 1, "createdAt": -1 })
            .options(
                IndexOptions::builder()
                    .name("idx_category_created".to_string())
                    .build(),
            )
            .build();
        self.store.collection().create_index(by_category).await?;

        tracing::info!("SubCategory indexes created successfully");
        Ok(())
    }
}

#[async_trait]
impl SubCategoryRepository for MongoSubCategoryRepository {
    async fn exists_by_name(&self, name: &str) -> CatalogResult<bool> {
        self.store.exists_by_unique(name).await
    }

    async fn count(&self) -> CatalogResult<u64> {
        self.store.count(doc! {}).await
    }

    #[instrument(skip(self, spec))]
    async fn list(
        &self,
        spec: &QuerySpec,
        category: Option<ObjectId>,
    ) -> CatalogResult<ListResult<SubCategory>> {
        let scope = match category {
            Some(id) => doc! { "category": id },
            None => doc! {},
        };

        Ok(self.store.list(scope, spec).await?.map(SubCategory::from))
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: ObjectId) -> CatalogResult<SubCategory> {
        self.store.get_by_id(id).await.map(SubCategory::from)
    }

    #[instrument(skip(self, sub_category), fields(name = %sub_category.name))]
    async fn create(&self, sub_category: SubCategory) -> CatalogResult<SubCategory> {
        let document = SubCategoryDocument::from(&sub_category);
        self.store.insert(&sub_category.name, &document).await?;

        let created = SubCategory::from(document);
        tracing::info!(sub_category_id = %created.id, "SubCategory created");
        Ok(created)
    }

    #[instrument(skip(self, patch))]
    async fn update_by_id(
        &self,
        id: ObjectId,
        patch: SubCategoryPatch,
    ) -> CatalogResult<SubCategory> {
        let updated = self.store.update(id, patch.to_set(Utc::now())).await?;

        tracing::info!(sub_category_id = %id, "SubCategory updated");
        Ok(SubCategory::from(updated))
    }

    #[instrument(skip(self))]
    async fn delete_by_id(&self, id: ObjectId) -> CatalogResult<()> {
        if self.store.delete(id).await? {
            tracing::info!(sub_category_id = %id, "SubCategory deleted");
        }
        Ok(())
    }
}
