//! Sub-categories: named groupings that belong to one category.

pub mod handlers;
pub mod models;
pub mod mongodb;
pub mod repository;
pub mod service;

pub use handlers::ApiDoc;
pub use models::{
    CreateSubCategory, SubCategory, SubCategoryPatch, SubCategoryResponse, UpdateSubCategory,
};
pub use mongodb::MongoSubCategoryRepository;
pub use repository::SubCategoryRepository;
pub use service::SubCategoryService;
