use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    /// A product points at a category, sub-category or brand that is gone
    #[error("{0}")]
    ReferenceNotFound(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Invalid MongoDB ID: {0}")]
    InvalidId(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Database error: {0}")]
    Database(#[from] mongodb::error::Error),
}

pub type CatalogResult<T> = Result<T, CatalogError>;

impl CatalogError {
    pub fn not_found(label: &str) -> Self {
        CatalogError::NotFound(format!("{label} not found"))
    }
}

/// Convert CatalogError to AppError for standardized error responses
impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::NotFound(msg) => AppError::NotFound(msg),
            CatalogError::ReferenceNotFound(msg) => AppError::NotFound(msg),
            CatalogError::Conflict(msg) => AppError::Conflict(msg),
            CatalogError::Validation(msg) => AppError::BadRequest(msg),
            CatalogError::InvalidId(raw) => AppError::InvalidObjectId(raw),
            CatalogError::Storage(msg) => AppError::InternalServerError(msg),
            CatalogError::Database(e) => AppError::Database(e),
        }
    }
}

impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

impl From<validator::ValidationErrors> for CatalogError {
    fn from(err: validator::ValidationErrors) -> Self {
        CatalogError::Validation(err.to_string())
    }
}
