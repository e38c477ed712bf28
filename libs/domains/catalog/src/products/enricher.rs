//! Expands a product's thin references into `{id, name, slug}`.
//!
//! Resolution fans out: the category, every sub-category and the brand are
//! fetched concurrently, and the first failure wins. A dangling reference is
//! reported as `ReferenceNotFound` so callers can tell it apart from the
//! product itself being missing.

use std::collections::HashMap;
use std::sync::Arc;

use futures::future::try_join_all;
use mongodb::bson::oid::ObjectId;
use tracing::instrument;

use super::models::{Product, ProductReferences};
use crate::brands::BrandRepository;
use crate::categories::CategoryRepository;
use crate::error::{CatalogError, CatalogResult};
use crate::reference::EntityRef;
use crate::sub_categories::SubCategoryRepository;

pub struct ReferenceEnricher {
    categories: Arc<dyn CategoryRepository>,
    sub_categories: Arc<dyn SubCategoryRepository>,
    brands: Arc<dyn BrandRepository>,
}

/// References that were looked up and found, in request order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedReferences {
    pub category: Option<EntityRef>,
    pub sub_categories: Vec<EntityRef>,
    pub brand: Option<EntityRef>,
}

impl ReferenceEnricher {
    pub fn new(
        categories: Arc<dyn CategoryRepository>,
        sub_categories: Arc<dyn SubCategoryRepository>,
        brands: Arc<dyn BrandRepository>,
    ) -> Self {
        Self {
            categories,
            sub_categories,
            brands,
        }
    }

    /// Look up every reference in `refs`; absent ones resolve to nothing
    #[instrument(skip(self, refs), fields(sub_categories = refs.sub_categories.len()))]
    pub async fn resolve(&self, refs: &ProductReferences) -> CatalogResult<ResolvedReferences> {
        let (category, sub_categories, brand) = futures::try_join!(
            self.resolve_category(refs.category),
            self.resolve_sub_categories(&refs.sub_categories),
            self.resolve_brand(refs.brand),
        )?;

        Ok(ResolvedReferences {
            category,
            sub_categories,
            brand,
        })
    }

    pub async fn enrich(&self, product: Product) -> CatalogResult<Product> {
        let resolved = self.resolve(&ProductReferences::of(&product)).await?;
        Ok(resolved.apply(product))
    }

    async fn resolve_category(&self, id: Option<ObjectId>) -> CatalogResult<Option<EntityRef>> {
        let Some(id) = id else {
            return Ok(None);
        };
        let category = self
            .categories
            .get_by_id(id)
            .await
            .map_err(|e| dangling(e, || "Category not found".to_string()))?;
        Ok(Some(EntityRef::enriched(id, category.name, category.slug)))
    }

    async fn resolve_sub_categories(&self, ids: &[ObjectId]) -> CatalogResult<Vec<EntityRef>> {
        // try_join_all keeps input order regardless of completion order
        try_join_all(ids.iter().map(|&id| async move {
            let sub_category = self
                .sub_categories
                .get_by_id(id)
                .await
                .map_err(|e| dangling(e, || format!("SubCategory with ID {id} not found")))?;
            Ok::<_, CatalogError>(EntityRef::enriched(
                id,
                sub_category.name,
                sub_category.slug,
            ))
        }))
        .await
    }

    async fn resolve_brand(&self, id: Option<ObjectId>) -> CatalogResult<Option<EntityRef>> {
        let Some(id) = id else {
            return Ok(None);
        };
        let brand = self
            .brands
            .get_by_id(id)
            .await
            .map_err(|e| dangling(e, || "Brand not found".to_string()))?;
        Ok(Some(EntityRef::enriched(id, brand.name, brand.slug)))
    }
}

impl Clone for ReferenceEnricher {
    fn clone(&self) -> Self {
        Self {
            categories: Arc::clone(&self.categories),
            sub_categories: Arc::clone(&self.sub_categories),
            brands: Arc::clone(&self.brands),
        }
    }
}

impl ResolvedReferences {
    /// Swap each thin reference on `product` for its resolved form.
    ///
    /// Matching is by id, so a reference that was not part of this
    /// resolution stays as it was.
    pub fn apply(&self, mut product: Product) -> Product {
        product.category = product
            .category
            .map(|thin| pick(self.category.as_ref(), thin));
        product.brand = product.brand.map(|thin| pick(self.brand.as_ref(), thin));

        let by_id: HashMap<ObjectId, &EntityRef> =
            self.sub_categories.iter().map(|r| (r.id, r)).collect();
        product.sub_categories = product
            .sub_categories
            .into_iter()
            .map(|thin| by_id.get(&thin.id).map_or(thin, |r| (*r).clone()))
            .collect();

        product
    }
}

fn pick(resolved: Option<&EntityRef>, thin: EntityRef) -> EntityRef {
    match resolved {
        Some(r) if r.id == thin.id => r.clone(),
        _ => thin,
    }
}

fn dangling(err: CatalogError, message: impl FnOnce() -> String) -> CatalogError {
    match err {
        CatalogError::NotFound(_) => CatalogError::ReferenceNotFound(message()),
        other => other,
    }
}
