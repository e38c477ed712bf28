use async_trait::async_trait;
use list_query::{ListResult, QuerySpec};
use mongodb::bson::oid::ObjectId;

use super::models::{Product, ProductPatch};
use crate::error::CatalogResult;

/// Repository trait for Product persistence.
///
/// Products come back with thin references; enrichment happens above this
/// layer.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn exists_by_title(&self, title: &str) -> CatalogResult<bool>;

    async fn count(&self) -> CatalogResult<u64>;

    async fn list(&self, spec: &QuerySpec) -> CatalogResult<ListResult<Product>>;

    async fn get_by_id(&self, id: ObjectId) -> CatalogResult<Product>;

    /// Fails with `Conflict` when the title is taken
    async fn create(&self, product: Product) -> CatalogResult<Product>;

    async fn update_by_id(&self, id: ObjectId, patch: ProductPatch) -> CatalogResult<Product>;

    async fn delete_by_id(&self, id: ObjectId) -> CatalogResult<()>;
}
