//! Catalog API routes
//!
//! Builds the four catalog resources over one set of repositories. The
//! category repository is shared: sub-categories check parents against it
//! and products resolve their references through it.

use std::sync::Arc;

use axum::Router;
use domain_catalog::{
    BrandService, CatalogResult, CategoryService, ImageStorage, MongoBrandRepository,
    MongoCategoryRepository, MongoProductRepository, MongoSubCategoryRepository,
    ProductService, ReferenceEnricher, SubCategoryService, brands, categories, products,
    sub_categories,
};
use mongodb::Database;
use tracing::info;

use crate::state::AppState;

pub struct Repositories {
    categories: Arc<MongoCategoryRepository>,
    sub_categories: Arc<MongoSubCategoryRepository>,
    brands: Arc<MongoBrandRepository>,
    products: MongoProductRepository,
}

impl Repositories {
    pub fn new(db: &Database) -> Self {
        Self {
            categories: Arc::new(MongoCategoryRepository::new(db)),
            sub_categories: Arc::new(MongoSubCategoryRepository::new(db)),
            brands: Arc::new(MongoBrandRepository::new(db)),
            products: MongoProductRepository::new(db),
        }
    }

    pub async fn init_indexes(&self) -> CatalogResult<()> {
        self.categories.init_indexes().await?;
        self.sub_categories.init_indexes().await?;
        self.brands.init_indexes().await?;
        self.products.init_indexes().await?;
        Ok(())
    }
}

/// `/categories`, `/subcategories`, `/brands` and `/products`
pub fn router(state: &AppState) -> Router {
    let repos = Repositories::new(&state.db);
    let storage: Arc<dyn ImageStorage> = state.storage.clone();

    let category_service = CategoryService::from_shared(repos.categories.clone(), storage.clone());
    let sub_category_service =
        SubCategoryService::from_shared(repos.sub_categories.clone(), repos.categories.clone());
    let brand_service = BrandService::from_shared(repos.brands.clone(), storage.clone());

    let enricher = ReferenceEnricher::new(
        repos.categories.clone(),
        repos.sub_categories.clone(),
        repos.brands.clone(),
    );
    let product_service = ProductService::new(repos.products, enricher, storage);

    let category_routes = categories::handlers::router(category_service)
        .merge(sub_categories::handlers::category_router(sub_category_service.clone()));

    Router::new()
        .nest("/categories", category_routes)
        .nest(
            "/subcategories",
            sub_categories::handlers::router(sub_category_service),
        )
        .nest("/brands", brands::handlers::router(brand_service))
        .nest("/products", products::handlers::router(product_service))
}

/// Create every catalog index; safe to run on each start
pub async fn init_indexes(db: &Database) -> eyre::Result<()> {
    Repositories::new(db)
        .init_indexes()
        .await
        .map_err(|e| eyre::eyre!("Failed to create catalog indexes: {}", e))?;
    info!("Catalog collection indexes created");
    Ok(())
}
