//! Categories: top-level grouping with an optional image.

pub mod handlers;
pub mod models;
pub mod mongodb;
pub mod repository;
pub mod service;

pub use handlers::ApiDoc;
pub use models::{Category, CategoryPatch, CategoryResponse, CreateCategory, UpdateCategory};
pub use mongodb::MongoCategoryRepository;
pub use repository::CategoryRepository;
pub use service::CategoryService;
