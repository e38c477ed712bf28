use async_trait::async_trait;
use list_query::{ListResult, QuerySpec};
use mongodb::bson::oid::ObjectId;

use super::models::{Brand, BrandPatch};
use crate::error::CatalogResult;

/// Repository trait for Brand persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BrandRepository: Send + Sync {
    /// True when a brand already uses `name`; an empty name never matches
    async fn exists_by_name(&self, name: &str) -> CatalogResult<bool>;

    async fn count(&self) -> CatalogResult<u64>;

    /// One page of brands, counted before the keyword is applied
    async fn list(&self, spec: &QuerySpec) -> CatalogResult<ListResult<Brand>>;

    /// Fails with `NotFound` ("Brand not found")
    async fn get_by_id(&self, id: ObjectId) -> CatalogResult<Brand>;

    /// Fails with `Conflict` when the name is taken
    async fn create(&self, brand: Brand) -> CatalogResult<Brand>;

    async fn update_by_id(&self, id: ObjectId, patch: BrandPatch) -> CatalogResult<Brand>;

    /// Idempotent
    async fn delete_by_id(&self, id: ObjectId) -> CatalogResult<()>;
}
