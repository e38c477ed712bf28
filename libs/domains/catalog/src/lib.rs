//! Catalog Domain
//!
//! Categories, sub-categories, brands and products stored in MongoDB, each
//! exposed as a REST resource with paginated, searchable listing.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints, multipart image uploads
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐     ┌───────────────────┐
//! │   Service   │ ──► │ ReferenceEnricher │  ← products only
//! └──────┬──────┘     └─────────┬─────────┘
//!        │                      │
//! ┌──────▼──────────────────────▼──┐
//! │ Repository (trait + MongoDB)   │  ← DocumentStore + list_query
//! └──────┬─────────────────────────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Entities, documents, DTOs
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use domain_catalog::{
//!     CategoryService, LocalImageStorage, MongoCategoryRepository, categories,
//! };
//! use mongodb::Client;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::with_uri_str("mongodb://localhost:27017").await?;
//! let db = client.database("catalog");
//!
//! let storage = Arc::new(LocalImageStorage::new("uploads", "http://localhost:8080"));
//! let repository = MongoCategoryRepository::new(&db);
//! repository.init_indexes().await?;
//!
//! let router = categories::handlers::router(CategoryService::new(repository, storage));
//! # Ok(())
//! # }
//! ```

pub mod brands;
pub mod categories;
pub mod error;
pub mod products;
pub mod reference;
pub mod slug;
pub mod storage;
pub mod store;
pub mod sub_categories;
pub mod timestamps;
pub mod upload;

// Re-export commonly used types
pub use brands::{BrandRepository, BrandService, MongoBrandRepository};
pub use categories::{CategoryRepository, CategoryService, MongoCategoryRepository};
pub use error::{CatalogError, CatalogResult};
pub use products::{MongoProductRepository, ProductRepository, ProductService, ReferenceEnricher};
pub use reference::EntityRef;
pub use storage::{ImageStorage, LocalImageStorage};
pub use sub_categories::{MongoSubCategoryRepository, SubCategoryRepository, SubCategoryService};
