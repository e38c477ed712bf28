use async_trait::async_trait;
use list_query::{ListResult, QuerySpec};
use mongodb::bson::oid::ObjectId;

use super::models::{SubCategory, SubCategoryPatch};
use crate::error::CatalogResult;

/// Repository trait for SubCategory persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubCategoryRepository: Send + Sync {
    async fn exists_by_name(&self, name: &str) -> CatalogResult<bool>;

    async fn count(&self) -> CatalogResult<u64>;

    /// One page of sub-categories, optionally only those under `category`.
    ///
    /// Pagination is computed from the scoped count.
    async fn list(
        &self,
        spec: &QuerySpec,
        category: Option<ObjectId>,
    ) -> CatalogResult<ListResult<SubCategory>>;

    async fn get_by_id(&self, id: ObjectId) -> CatalogResult<SubCategory>;

    async fn create(&self, sub_category: SubCategory) -> CatalogResult<SubCategory>;

    async fn update_by_id(
        &self,
        id: ObjectId,
        patch: SubCategoryPatch,
    ) -> CatalogResult<SubCategory>;

    async fn delete_by_id(&self, id: ObjectId) -> CatalogResult<()>;
}
