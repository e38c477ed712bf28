//! Brands: manufacturers a product may name, each with an optional logo.

pub mod handlers;
pub mod models;
pub mod mongodb;
pub mod repository;
pub mod service;

pub use handlers::ApiDoc;
pub use models::{Brand, BrandPatch, BrandResponse, CreateBrand, UpdateBrand};
pub use mongodb::MongoBrandRepository;
pub use repository::BrandRepository;
pub use service::BrandService;
