//! SubCategory Service - Business logic layer

use std::sync::Arc;

use list_query::{ListResult, QuerySpec};
use mongodb::bson::oid::ObjectId;
use tracing::instrument;
use validator::Validate;

use super::models::{CreateSubCategory, SubCategory, SubCategoryPatch, UpdateSubCategory};
use super::repository::SubCategoryRepository;
use crate::categories::CategoryRepository;
use crate::error::{CatalogError, CatalogResult};
use crate::reference::parse_object_id;

pub struct SubCategoryService<R: SubCategoryRepository> {
    repository: Arc<R>,
    categories: Arc<dyn CategoryRepository>,
}

impl<R: SubCategoryRepository> SubCategoryService<R> {
    pub fn new(repository: R, categories: Arc<dyn CategoryRepository>) -> Self {
        Self::from_shared(Arc::new(repository), categories)
    }

    pub fn from_shared(repository: Arc<R>, categories: Arc<dyn CategoryRepository>) -> Self {
        Self {
            repository,
            categories,
        }
    }

    #[instrument(skip(self, spec))]
    pub async fn list(
        &self,
        spec: &QuerySpec,
        category: Option<ObjectId>,
    ) -> CatalogResult<ListResult<SubCategory>> {
        self.repository.list(spec, category).await
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: ObjectId) -> CatalogResult<SubCategory> {
        self.repository.get_by_id(id).await
    }

    /// Create under `route_category` when given, otherwise under the body's
    /// category. The category must exist.
    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create(
        &self,
        input: CreateSubCategory,
        route_category: Option<ObjectId>,
    ) -> CatalogResult<SubCategory> {
        input.validate()?;

        let category = match (route_category, input.category.as_deref()) {
            (Some(id), _) => id,
            (None, Some(raw)) => parse_object_id(raw)?,
            (None, None) => {
                return Err(CatalogError::Validation("Category is required".to_string()));
            }
        };

        self.ensure_category(category).await?;
        self.repository
            .create(SubCategory::new(input.name, category))
            .await
    }

    #[instrument(skip(self, input))]
    pub async fn update(
        &self,
        id: ObjectId,
        input: UpdateSubCategory,
    ) -> CatalogResult<SubCategory> {
        input.validate()?;

        let category = input.category.as_deref().map(parse_object_id).transpose()?;
        if let Some(category) = category {
            self.ensure_category(category).await?;
        }

        self.repository
            .update_by_id(
                id,
                SubCategoryPatch {
                    name: input.name,
                    category,
                },
            )
            .await
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: ObjectId) -> CatalogResult<()> {
        self.repository.delete_by_id(id).await
    }

    async fn ensure_category(&self, id: ObjectId) -> CatalogResult<()> {
        if self.categories.exists_by_id(id).await? {
            Ok(())
        } else {
            Err(CatalogError::NotFound("Category does not exist".to_string()))
        }
    }
}

impl<R: SubCategoryRepository> Clone for SubCategoryService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            categories: Arc::clone(&self.categories),
        }
    }
}
