//! HTTP handlers for Products API

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Multipart, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, put},
};
use axum_helpers::{
    ObjectIdPath, ValidatedJson, ValidatedQuery,
    errors::responses::{
        BadRequestObjectIdResponse, BadRequestValidationResponse, ConflictResponse,
        InternalServerErrorResponse, NotFoundResponse, UploadRejectedResponse,
    },
};
use list_query::{ListResponse, QuerySpec};
use utoipa::OpenApi;

use super::models::{CreateProduct, ProductResponse, UpdateProduct};
use super::repository::ProductRepository;
use super::service::ProductService;
use crate::error::CatalogResult;
use crate::reference::EntityRefResponse;
use crate::upload;

#[derive(OpenApi)]
#[openapi(
    paths(
        list_products,
        create_product,
        get_product,
        update_product,
        delete_product,
        upload_product_image_cover,
    ),
    components(
        schemas(ProductResponse, EntityRefResponse, CreateProduct, UpdateProduct),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestObjectIdResponse,
            ConflictResponse,
            UploadRejectedResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Products", description = "Product management endpoints")
    )
)]
pub struct ApiDoc;

/// Routes relative to `/products`
pub fn router<R: ProductRepository + 'static>(service: ProductService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_products).post(create_product))
        .route(
            "/{id}",
            get(get_product)
                .put(update_product)
                .delete(delete_product),
        )
        .route(
            "/{id}/image-cover",
            put(upload_product_image_cover).layer(upload::body_limit()),
        )
        .with_state(shared_service)
}

/// List products
///
/// `keyword` matches title or description.
#[utoipa::path(
    get,
    path = "",
    tag = "Products",
    params(QuerySpec),
    responses(
        (status = 200, description = "One page of products", body = ListResponse<ProductResponse>),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, description = "A product points at a missing category, sub-category or brand"),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_products<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    ValidatedQuery(spec): ValidatedQuery<QuerySpec>,
) -> CatalogResult<Json<ListResponse<ProductResponse>>> {
    let page = service.list(&spec).await?;
    let page = page.map(|product| ProductResponse::new(product, service.storage()));
    Ok(Json(page.into()))
}

/// Create a product
#[utoipa::path(
    post,
    path = "",
    tag = "Products",
    request_body = CreateProduct,
    responses(
        (status = 201, description = "Product created", body = ProductResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, description = "Referenced category, sub-category or brand not found"),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    ValidatedJson(input): ValidatedJson<CreateProduct>,
) -> CatalogResult<impl IntoResponse> {
    let product = service.create(input).await?;
    Ok((
        StatusCode::CREATED,
        Json(ProductResponse::new(product, service.storage())),
    ))
}

/// Get a product by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Products",
    params(("id" = String, Path, description = "Product ObjectId")),
    responses(
        (status = 200, description = "Product found", body = ProductResponse),
        (status = 400, response = BadRequestObjectIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    ObjectIdPath(id): ObjectIdPath,
) -> CatalogResult<Json<ProductResponse>> {
    let product = service.get(id).await?;
    Ok(Json(ProductResponse::new(product, service.storage())))
}

/// Update a product
#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Products",
    params(("id" = String, Path, description = "Product ObjectId")),
    request_body = UpdateProduct,
    responses(
        (status = 200, description = "Product updated", body = ProductResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    ObjectIdPath(id): ObjectIdPath,
    ValidatedJson(input): ValidatedJson<UpdateProduct>,
) -> CatalogResult<Json<ProductResponse>> {
    let product = service.update(id, input).await?;
    Ok(Json(ProductResponse::new(product, service.storage())))
}

/// Delete a product
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Products",
    params(("id" = String, Path, description = "Product ObjectId")),
    responses(
        (status = 204, description = "Product deleted (or already absent)"),
        (status = 400, response = BadRequestObjectIdResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    ObjectIdPath(id): ObjectIdPath,
) -> CatalogResult<StatusCode> {
    service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Upload the product cover image (multipart field `image`)
#[utoipa::path(
    put,
    path = "/{id}/image-cover",
    tag = "Products",
    params(("id" = String, Path, description = "Product ObjectId")),
    request_body(content_type = "multipart/form-data", description = "`image`: jpeg, png or webp up to 2 MB"),
    responses(
        (status = 200, description = "Cover stored", body = ProductResponse),
        (status = 400, response = UploadRejectedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn upload_product_image_cover<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    ObjectIdPath(id): ObjectIdPath,
    multipart: Multipart,
) -> CatalogResult<Json<ProductResponse>> {
    let upload = upload::read_image(multipart).await?;
    let product = service.set_image_cover(id, upload).await?;
    Ok(Json(ProductResponse::new(product, service.storage())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brands::repository::MockBrandRepository;
    use crate::categories::repository::MockCategoryRepository;
    use crate::categories::{Category, CreateCategory};
    use crate::error::CatalogError;
    use crate::products::enricher::ReferenceEnricher;
    use crate::products::models::fixtures;
    use crate::products::repository::MockProductRepository;
    use crate::storage::MockImageStorage;
    use crate::sub_categories::repository::MockSubCategoryRepository;
    use crate::upload::test_support::multipart_request;
    use axum::body::Body;
    use axum::http::{Request, header};
    use http_body_util::BodyExt;
    use list_query::{ListResult, Pagination};
    use mongodb::bson::oid::ObjectId;
    use tower::ServiceExt;

    fn app_with(
        repo: MockProductRepository,
        categories: MockCategoryRepository,
        storage: MockImageStorage,
    ) -> Router {
        let enricher = ReferenceEnricher::new(
            Arc::new(categories),
            Arc::new(MockSubCategoryRepository::new()),
            Arc::new(MockBrandRepository::new()),
        );
        router(ProductService::new(repo, enricher, Arc::new(storage)))
    }

    /// Storage that only formats URLs
    fn url_storage() -> MockImageStorage {
        let mut storage = MockImageStorage::new();
        storage
            .expect_public_url()
            .returning(|dir, file| format!("http://media.test/uploads/{dir}/{file}"));
        storage
    }

    fn known_category(category: Category) -> MockCategoryRepository {
        let mut categories = MockCategoryRepository::new();
        categories
            .expect_get_by_id()
            .returning(move |_| Ok(category.clone()));
        categories
    }

    fn shoes() -> Category {
        Category::new(CreateCategory {
            name: "Shoes".to_string(),
        })
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_create_embeds_category() {
        let category = shoes();
        let category_id = category.id;
        let mut repo = MockProductRepository::new();
        repo.expect_create().returning(Ok);

        let body = serde_json::json!({
            "title": "Red Running Shoe",
            "description": "Lightweight trainer with a breathable mesh upper",
            "quantity": 12,
            "price": 89.9,
            "category": category_id.to_hex(),
        });
        let response = app_with(repo, known_category(category), url_storage())
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let json = json_body(response).await;
        assert_eq!(json["slug"], "red-running-shoe");
        assert_eq!(json["sold"], 0);
        assert_eq!(json["category"]["id"], category_id.to_hex());
        assert_eq!(json["category"]["name"], "Shoes");
        assert_eq!(json["category"]["slug"], "shoes");
        assert_eq!(json["subCategories"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_create_with_unknown_category_is_404() {
        let mut categories = MockCategoryRepository::new();
        categories
            .expect_get_by_id()
            .returning(|_| Err(CatalogError::not_found("Category")));
        let mut repo = MockProductRepository::new();
        repo.expect_create().never();

        let body = serde_json::json!({
            "title": "Red Running Shoe",
            "description": "Lightweight trainer with a breathable mesh upper",
            "quantity": 1,
            "price": 10.0,
            "category": ObjectId::new().to_hex(),
        });
        let response = app_with(repo, categories, MockImageStorage::new())
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let json = json_body(response).await;
        assert_eq!(json["message"], "Category not found");
    }

    #[tokio::test]
    async fn test_create_malformed_category_is_400() {
        let mut repo = MockProductRepository::new();
        repo.expect_create().never();

        let body = serde_json::json!({
            "title": "Red Running Shoe",
            "description": "Lightweight trainer with a breathable mesh upper",
            "quantity": 1,
            "price": 10.0,
            "category": "not-an-id",
        });
        let response = app_with(repo, MockCategoryRepository::new(), MockImageStorage::new())
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = json_body(response).await;
        assert_eq!(json["details"]["category"][0]["message"], "Invalid MongoDB ID");
    }

    #[tokio::test]
    async fn test_list_keyword_and_enriched_page() {
        let category = shoes();
        let category_id = category.id;
        let mut repo = MockProductRepository::new();
        repo.expect_list()
            .withf(|spec| spec.keyword() == Some("red") && spec.sort_keys() == vec![("price", -1)])
            .returning(move |_| {
                let mut product = fixtures::product(category_id, &[], None);
                product.image_cover = Some("products-cover.jpeg".to_string());
                let (_, pagination) = Pagination::compute(1, 50, 1);
                Ok(ListResult::new(vec![product], pagination))
            });

        let response = app_with(repo, known_category(category), url_storage())
            .oneshot(
                Request::builder()
                    .uri("/?keyword=red&sort=-price")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["results"], 1);
        assert_eq!(json["data"][0]["category"]["name"], "Shoes");
        assert_eq!(
            json["data"][0]["imageCover"],
            "http://media.test/uploads/products/products-cover.jpeg"
        );
    }

    #[tokio::test]
    async fn test_get_missing_product_is_404() {
        let mut repo = MockProductRepository::new();
        repo.expect_get_by_id()
            .returning(|_| Err(CatalogError::not_found("Product")));

        let response = app_with(repo, MockCategoryRepository::new(), MockImageStorage::new())
            .oneshot(
                Request::builder()
                    .uri(format!("/{}", ObjectId::new()))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let json = json_body(response).await;
        assert_eq!(json["message"], "Product not found");
    }

    #[tokio::test]
    async fn test_delete_is_204() {
        let mut repo = MockProductRepository::new();
        repo.expect_delete_by_id().times(1).returning(|_| Ok(()));

        let response = app_with(repo, MockCategoryRepository::new(), MockImageStorage::new())
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri(format!("/{}", ObjectId::new()))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_upload_cover_stores_under_products() {
        let category = shoes();
        let stored = fixtures::product(category.id, &[], None);
        let id = stored.id;

        let mut repo = MockProductRepository::new();
        let existing = stored.clone();
        repo.expect_get_by_id()
            .returning(move |_| Ok(existing.clone()));
        repo.expect_update_by_id()
            .withf(|_, patch| patch.image_cover.as_deref() == Some("products-new.webp"))
            .returning(move |_, patch| {
                let mut updated = stored.clone();
                updated.image_cover = patch.image_cover;
                Ok(updated)
            });

        let mut storage = url_storage();
        storage
            .expect_store()
            .withf(|upload, target| {
                upload.content_type == "image/webp" && target.dir == "products"
            })
            .returning(|_, _| Ok("products-new.webp".to_string()));

        let response = app_with(repo, known_category(category), storage)
            .oneshot(multipart_request(
                &format!("/{id}/image-cover"),
                "image",
                "image/webp",
                b"RIFF0000WEBP",
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(
            json["imageCover"],
            "http://media.test/uploads/products/products-new.webp"
        );
    }
}
