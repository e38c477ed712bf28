//! OpenAPI documentation configuration

use utoipa::OpenApi;

/// Combined OpenAPI documentation for all APIs
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Catalog API",
        version = "0.1.0",
        description = "REST API for categories, sub-categories, brands and products",
        license(name = "MIT")
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server")
    ),
    nest(
        (path = "/api/categories", api = domain_catalog::categories::ApiDoc),
        (path = "/api", api = domain_catalog::sub_categories::ApiDoc),
        (path = "/api/brands", api = domain_catalog::brands::ApiDoc),
        (path = "/api/products", api = domain_catalog::products::ApiDoc)
    ),
    tags(
        (name = "Categories", description = "Category management endpoints"),
        (name = "SubCategories", description = "Sub-category management endpoints"),
        (name = "Brands", description = "Brand management endpoints"),
        (name = "Products", description = "Product management endpoints")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_resource_documented() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&str> = doc.paths.paths.keys().map(String::as_str).collect();

        for expected in [
            "/api/categories",
            "/api/categories/{id}",
            "/api/categories/{id}/image",
            "/api/categories/{id}/subcategories",
            "/api/subcategories",
            "/api/subcategories/{id}",
            "/api/brands/{id}/image",
            "/api/products",
            "/api/products/{id}/image-cover",
        ] {
            assert!(paths.contains(&expected), "missing {expected} in {paths:?}");
        }
    }
}
