//! MongoDB implementation of ProductRepository

use async_trait::async_trait;
use chrono::Utc;
use list_query::{EntityKind, ListResult, QuerySpec};
use mongodb::{
    Database, IndexModel,
    bson::{doc, oid::ObjectId},
    options::IndexOptions,
};
use tracing::instrument;

use super::models::{Product, ProductDocument, ProductPatch};
use super::repository::ProductRepository;
use crate::error::CatalogResult;
use crate::store::DocumentStore;

pub const COLLECTION: &str = "products";

pub struct MongoProductRepository {
    store: DocumentStore<ProductDocument>,
}

impl MongoProductRepository {
    pub fn new(db: &Database) -> Self {
        Self::with_collection(db, COLLECTION)
    }

    pub fn with_collection(db: &Database, collection_name: &str) -> Self {
        Self {
            store: DocumentStore::new(db, collection_name, "title", EntityKind::Product, "Product"),
        }
    }

    /// Unique title plus the lookups products are filtered by
    pub async fn init_indexes(&self) -> CatalogResult<()> {
        self.store.init_unique_index().await?;

        let indexes = vec![
            IndexModel::builder()
                .keys(doc! { "category": 1 })
                .options(
                    IndexOptions::builder()
                        .name("idx_category".to_string())
                        .build(),
                )
                .build(),
            IndexModel::builder()
                .keys(doc! { "brand": 1 })
                .options(IndexOptions::builder().name("idx_brand".to_string()).build())
                .build(),
        ];
        self.store.collection().create_indexes(indexes).await?;

        tracing::info!("Product indexes initialized");
        Ok(())
    }
}

#[async_trait]
impl ProductRepository for MongoProductRepository {
    async fn exists_by_title(&self, title: &str) -> CatalogResult<bool> {
        self.store.exists_by_unique(title).await
    }

    async fn count(&self) -> CatalogResult<u64> {
        self.store.count(doc! {}).await
    }

    #[instrument(skip(self, spec))]
    async fn list(&self, spec: &QuerySpec) -> CatalogResult<ListResult<Product>> {
        Ok(self.store.list(doc! {}, spec).await?.map(Product::from))
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: ObjectId) -> CatalogResult<Product> {
        self.store.get_by_id(id).await.map(Product::from)
    }

    #[instrument(skip(self, product), fields(title = %product.title))]
    async fn create(&self, product: Product) -> CatalogResult<Product> {
        let document = ProductDocument::from(&product);
        self.store.insert(&product.title, &document).await?;

        let created = Product::from(document);
        tracing::info!(product_id = %created.id, "Product created");
        Ok(created)
    }

    #[instrument(skip(self, patch))]
    async fn update_by_id(&self, id: ObjectId, patch: ProductPatch) -> CatalogResult<Product> {
        let updated = self.store.update(id, patch.to_set(Utc::now())).await?;

        tracing::info!(product_id = %id, "Product updated");
        Ok(Product::from(updated))
    }

    #[instrument(skip(self))]
    async fn delete_by_id(&self, id: ObjectId) -> CatalogResult<()> {
        if self.store.delete(id).await? {
            tracing::info!(product_id = %id, "Product deleted");
        }
        Ok(())
    }
}
