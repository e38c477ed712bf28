//! Products: the sellable items, pointing at a category, any number of its
//! sub-categories, and optionally a brand.

pub mod enricher;
pub mod handlers;
pub mod models;
pub mod mongodb;
pub mod repository;
pub mod service;

pub use enricher::{ReferenceEnricher, ResolvedReferences};
pub use handlers::ApiDoc;
pub use models::{
    CreateProduct, Product, ProductPatch, ProductReferences, ProductResponse, UpdateProduct,
};
pub use mongodb::MongoProductRepository;
pub use repository::ProductRepository;
pub use service::ProductService;
