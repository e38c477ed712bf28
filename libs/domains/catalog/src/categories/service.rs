//! Category Service - Business logic layer

use std::sync::Arc;

use list_query::{ListResult, QuerySpec};
use mongodb::bson::oid::ObjectId;
use tracing::instrument;
use validator::Validate;

use super::models::{Category, CategoryPatch, CreateCategory, UpdateCategory};
use super::repository::CategoryRepository;
use crate::error::CatalogResult;
use crate::storage::{CATEGORY_IMAGES, ImageStorage, ImageUpload};

pub struct CategoryService<R: CategoryRepository> {
    repository: Arc<R>,
    storage: Arc<dyn ImageStorage>,
}

impl<R: CategoryRepository> CategoryService<R> {
    pub fn new(repository: R, storage: Arc<dyn ImageStorage>) -> Self {
        Self::from_shared(Arc::new(repository), storage)
    }

    /// Share one repository between this service and its other readers
    pub fn from_shared(repository: Arc<R>, storage: Arc<dyn ImageStorage>) -> Self {
        Self {
            repository,
            storage,
        }
    }

    pub fn storage(&self) -> &dyn ImageStorage {
        self.storage.as_ref()
    }

    #[instrument(skip(self, spec))]
    pub async fn list(&self, spec: &QuerySpec) -> CatalogResult<ListResult<Category>> {
        self.repository.list(spec).await
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: ObjectId) -> CatalogResult<Category> {
        self.repository.get_by_id(id).await
    }

    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create(&self, input: CreateCategory) -> CatalogResult<Category> {
        input.validate()?;
        self.repository.create(Category::new(input)).await
    }

    #[instrument(skip(self, input))]
    pub async fn update(&self, id: ObjectId, input: UpdateCategory) -> CatalogResult<Category> {
        input.validate()?;
        self.repository
            .update_by_id(id, CategoryPatch::from(input))
            .await
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: ObjectId) -> CatalogResult<()> {
        self.repository.delete_by_id(id).await
    }

    /// Store the upload and point the category at it
    #[instrument(skip(self, upload), fields(content_type = %upload.content_type))]
    pub async fn set_image(&self, id: ObjectId, upload: ImageUpload) -> CatalogResult<Category> {
        upload.check()?;
        // fail before writing a file nobody will reference
        self.repository.get_by_id(id).await?;

        let file = self.storage.store(upload, CATEGORY_IMAGES).await?;
        self.repository
            .update_by_id(id, CategoryPatch::image(file))
            .await
    }
}

impl<R: CategoryRepository> Clone for CategoryService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            storage: Arc::clone(&self.storage),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::categories::repository::MockCategoryRepository;
    use crate::error::CatalogError;
    use crate::storage::MockImageStorage;
    use mockall::predicate::*;

    fn service(repo: MockCategoryRepository, storage: MockImageStorage) -> CategoryService<MockCategoryRepository> {
        CategoryService::new(repo, Arc::new(storage))
    }

    fn shoes() -> Category {
        Category::new(CreateCategory {
            name: "Shoes".to_string(),
        })
    }

    #[tokio::test]
    async fn test_create_slugs_name() {
        let mut repo = MockCategoryRepository::new();
        repo.expect_create()
            .withf(|c| c.name == "Shoes" && c.slug == "shoes")
            .times(1)
            .returning(Ok);

        let created = service(repo, MockImageStorage::new())
            .create(CreateCategory {
                name: "Shoes".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(created.slug, "shoes");
    }

    #[tokio::test]
    async fn test_create_duplicate_is_conflict() {
        let mut repo = MockCategoryRepository::new();
        repo.expect_create().returning(|_| {
            Err(CatalogError::Conflict(
                "Category with this name already exists".to_string(),
            ))
        });

        let err = service(repo, MockImageStorage::new())
            .create(CreateCategory {
                name: "Shoes".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_create_rejects_short_name() {
        let mut repo = MockCategoryRepository::new();
        repo.expect_create().never();

        let err = service(repo, MockImageStorage::new())
            .create(CreateCategory {
                name: "ab".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::Validation(_)));
    }

    #[tokio::test]
    async fn test_update_passes_patch() {
        let category = shoes();
        let id = category.id;

        let mut repo = MockCategoryRepository::new();
        repo.expect_update_by_id()
            .with(
                eq(id),
                eq(CategoryPatch {
                    name: Some("Sneakers".to_string()),
                    image: None,
                }),
            )
            .returning(move |_, patch| {
                let mut updated = category.clone();
                updated.name = patch.name.unwrap();
                Ok(updated)
            });

        let updated = service(repo, MockImageStorage::new())
            .update(
                id,
                UpdateCategory {
                    name: Some("Sneakers".to_string()),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.name, "Sneakers");
    }

    #[tokio::test]
    async fn test_set_image_missing_category_stores_nothing() {
        let mut repo = MockCategoryRepository::new();
        repo.expect_get_by_id()
            .returning(|_| Err(CatalogError::not_found("Category")));
        repo.expect_update_by_id().never();

        let mut storage = MockImageStorage::new();
        storage.expect_store().never();

        let err = service(repo, storage)
            .set_image(
                ObjectId::new(),
                ImageUpload {
                    content_type: "image/png".to_string(),
                    bytes: vec![1, 2, 3],
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Category not found");
    }

    #[tokio::test]
    async fn test_set_image_records_file_name() {
        let category = shoes();
        let id = category.id;
        let found = category.clone();

        let mut repo = MockCategoryRepository::new();
        repo.expect_get_by_id()
            .with(eq(id))
            .returning(move |_| Ok(found.clone()));
        repo.expect_update_by_id()
            .withf(|_, patch| patch.image.as_deref() == Some("categories-1.png"))
            .returning(move |_, patch| {
                let mut updated = category.clone();
                updated.image = patch.image;
                Ok(updated)
            });

        let mut storage = MockImageStorage::new();
        storage
            .expect_store()
            .withf(|_, target| target.dir == "categories")
            .returning(|_, _| Ok("categories-1.png".to_string()));

        let updated = service(repo, storage)
            .set_image(
                id,
                ImageUpload {
                    content_type: "image/png".to_string(),
                    bytes: vec![1, 2, 3],
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.image.as_deref(), Some("categories-1.png"));
    }

    #[tokio::test]
    async fn test_delete_delegates() {
        let id = ObjectId::new();
        let mut repo = MockCategoryRepository::new();
        repo.expect_delete_by_id()
            .with(eq(id))
            .times(1)
            .returning(|_| Ok(()));

        service(repo, MockImageStorage::new())
            .delete(id)
            .await
            .unwrap();
    }
}
