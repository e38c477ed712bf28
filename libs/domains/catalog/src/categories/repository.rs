use async_trait::async_trait;
use list_query::{ListResult, QuerySpec};
use mongodb::bson::oid::ObjectId;

use super::models::{Category, CategoryPatch};
use crate::error::CatalogResult;

/// Repository trait for Category persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// True when a category already uses `name`; an empty name never matches
    async fn exists_by_name(&self, name: &str) -> CatalogResult<bool>;

    async fn exists_by_id(&self, id: ObjectId) -> CatalogResult<bool>;

    async fn count(&self) -> CatalogResult<u64>;

    /// One page of categories, counted before the keyword is applied
    async fn list(&self, spec: &QuerySpec) -> CatalogResult<ListResult<Category>>;

    /// Fails with `NotFound` ("Category not found")
    async fn get_by_id(&self, id: ObjectId) -> CatalogResult<Category>;

    /// Fails with `Conflict` when the name is taken
    async fn create(&self, category: Category) -> CatalogResult<Category>;

    async fn update_by_id(&self, id: ObjectId, patch: CategoryPatch) -> CatalogResult<Category>;

    /// Idempotent
    async fn delete_by_id(&self, id: ObjectId) -> CatalogResult<()>;
}
