//! HTTP handlers for Categories API

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

use super::models::{CategoryResponse, CreateCategory, UpdateCategory};
use super::repository::CategoryRepository;
use super::service::CategoryService;
use crate::error::CatalogResult;
use crate::upload;

#[derive(OpenApi)]
#[openapi(
    paths(
        list_categories,
        create_category,
        get_category,
        update_category,
        delete_category,
        upload_category_image,
    ),
    components(
        schemas(CategoryResponse, CreateCategory, UpdateCategory),
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
        (name = "Categories", description = "Category management endpoints")
    )
)]
pub struct ApiDoc;

/// Routes relative to `/categories`
pub fn router<R: CategoryRepository + 'static>(service: CategoryService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_categories).post(create_category))
        .route(
            "/{id}",
            get(get_category)
                .put(update_category)
                .delete(delete_category),
        )
        .route(
            "/{id}/image",
            put(upload_category_image).layer(upload::body_limit()),
        )
        .with_state(shared_service)
}

/// List categories
#[utoipa::path(
    get,
    path = "",
    tag = "Categories",
    params(QuerySpec),
    responses(
        (status = 200, description = "One page of categories", body = ListResponse<CategoryResponse>),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_categories<R: CategoryRepository>(
    State(service): State<Arc<CategoryService<R>>>,
    ValidatedQuery(spec): ValidatedQuery<QuerySpec>,
) -> CatalogResult<Json<ListResponse<CategoryResponse>>> {
    let page = service.list(&spec).await?;
    let page = page.map(|category| CategoryResponse::new(category, service.storage()));
    Ok(Json(page.into()))
}

/// Create a category
#[utoipa::path(
    post,
    path = "",
    tag = "Categories",
    request_body = CreateCategory,
    responses(
        (status = 201, description = "Category created", body = CategoryResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_category<R: CategoryRepository>(
    State(service): State<Arc<CategoryService<R>>>,
    ValidatedJson(input): ValidatedJson<CreateCategory>,
) -> CatalogResult<impl IntoResponse> {
    let category = service.create(input).await?;
    Ok((
        StatusCode::CREATED,
        Json(CategoryResponse::new(category, service.storage())),
    ))
}

/// Get a category by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Categories",
    params(("id" = String, Path, description = "Category ObjectId")),
    responses(
        (status = 200, description = "Category found", body = CategoryResponse),
        (status = 400, response = BadRequestObjectIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_category<R: CategoryRepository>(
    State(service): State<Arc<CategoryService<R>>>,
    ObjectIdPath(id): ObjectIdPath,
) -> CatalogResult<Json<CategoryResponse>> {
    let category = service.get(id).await?;
    Ok(Json(CategoryResponse::new(category, service.storage())))
}

/// Update a category
#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Categories",
    params(("id" = String, Path, description = "Category ObjectId")),
    request_body = UpdateCategory,
    responses(
        (status = 200, description = "Category updated", body = CategoryResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_category<R: CategoryRepository>(
    State(service): State<Arc<CategoryService<R>>>,
    ObjectIdPath(id): ObjectIdPath,
    ValidatedJson(input): ValidatedJson<UpdateCategory>,
) -> CatalogResult<Json<CategoryResponse>> {
    let category = service.update(id, input).await?;
    Ok(Json(CategoryResponse::new(category, service.storage())))
}

/// Delete a category
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Categories",
    params(("id" = String, Path, description = "Category ObjectId")),
    responses(
        (status = 204, description = "Category deleted (or already absent)"),
        (status = 400, response = BadRequestObjectIdResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_category<R: CategoryRepository>(
    State(service): State<Arc<CategoryService<R>>>,
    ObjectIdPath(id): ObjectIdPath,
) -> CatalogResult<StatusCode> {
    service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Upload the category image (multipart field `image`)
#[utoipa::path(
    put,
    path = "/{id}/image",
    tag = "Categories",
    params(("id" = String, Path, description = "Category ObjectId")),
    request_body(content_type = "multipart/form-data", description = "`image`: jpeg, png or webp up to 2 MB"),
    responses(
        (status = 200, description = "Image stored", body = CategoryResponse),
        (status = 400, response = UploadRejectedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn upload_category_image<R: CategoryRepository>(
    State(service): State<Arc<CategoryService<R>>>,
    ObjectIdPath(id): ObjectIdPath,
    multipart: Multipart,
) -> CatalogResult<Json<CategoryResponse>> {
    let upload = upload::read_image(multipart).await?;
    let category = service.set_image(id, upload).await?;
    Ok(Json(CategoryResponse::new(category, service.storage())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::categories::models::Category;
    use crate::categories::repository::MockCategoryRepository;
    use crate::error::CatalogError;
    use crate::storage::{LocalImageStorage, MockImageStorage};
    use crate::upload::test_support::multipart_request;
    use axum::body::Body;
    use axum::http::{Request, header};
    use http_body_util::BodyExt;
    use list_query::{ListResult, Pagination};
    use mongodb::bson::oid::ObjectId;
    use tower::ServiceExt;

    fn app(repo: MockCategoryRepository) -> Router {
        let storage = LocalImageStorage::new("uploads", "http://media.test");
        router(CategoryService::new(repo, Arc::new(storage)))
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn category(name: &str) -> Category {
        Category::new(CreateCategory {
            name: name.to_string(),
        })
    }

    #[tokio::test]
    async fn test_list_wraps_page() {
        let mut repo = MockCategoryRepository::new();
        repo.expect_list()
            .withf(|spec| spec.page() == 3 && spec.limit() == 50)
            .returning(|_| {
                let (_, pagination) = Pagination::compute(3, 50, 125);
                let mut shoes = category("Shoes");
                shoes.image = Some("categories-1.png".to_string());
                Ok(ListResult::new(vec![shoes, category("Bags")], pagination))
            });

        let response = app(repo)
            .oneshot(
                Request::builder()
                    .uri("/?page=3&limit=50")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["results"], 2);
        assert_eq!(json["paginationResult"]["numberOfPages"], 3);
        assert_eq!(json["paginationResult"]["prevPage"], 2);
        assert!(json["paginationResult"].get("nextPage").is_none());
        assert_eq!(json["data"][0]["slug"], "shoes");
        assert_eq!(
            json["data"][0]["image"],
            "http://media.test/uploads/categories/categories-1.png"
        );
        assert!(json["data"][1].get("image").is_none());
    }

    #[tokio::test]
    async fn test_list_rejects_bad_limit() {
        let mut repo = MockCategoryRepository::new();
        repo.expect_list().never();

        let response = app(repo)
            .oneshot(
                Request::builder()
                    .uri("/?limit=500")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = json_body(response).await;
        assert_eq!(json["error"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_create_returns_201() {
        let mut repo = MockCategoryRepository::new();
        repo.expect_create().returning(Ok);

        let response = app(repo)
            .oneshot(json_request("POST", "/", serde_json::json!({ "name": "Shoes" })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let json = json_body(response).await;
        assert_eq!(json["name"], "Shoes");
        assert_eq!(json["slug"], "shoes");
        assert_eq!(json["id"].as_str().unwrap().len(), 24);
        assert!(json.get("createdAt").is_none());
    }

    #[tokio::test]
    async fn test_create_conflict_is_409() {
        let mut repo = MockCategoryRepository::new();
        repo.expect_create().returning(|_| {
            Err(CatalogError::Conflict(
                "Category with this name already exists".to_string(),
            ))
        });

        let response = app(repo)
            .oneshot(json_request("POST", "/", serde_json::json!({ "name": "Shoes" })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CONFLICT);
        let json = json_body(response).await;
        assert_eq!(json["message"], "Category with this name already exists");
    }

    #[tokio::test]
    async fn test_create_short_name_is_400() {
        let mut repo = MockCategoryRepository::new();
        repo.expect_create().never();

        let response = app(repo)
            .oneshot(json_request("POST", "/", serde_json::json!({ "name": "ab" })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = json_body(response).await;
        assert_eq!(json["details"]["name"][0]["code"], "length");
    }

    #[tokio::test]
    async fn test_get_invalid_id_is_400() {
        let mut repo = MockCategoryRepository::new();
        repo.expect_get_by_id().never();

        let response = app(repo)
            .oneshot(Request::builder().uri("/123").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = json_body(response).await;
        assert_eq!(json["message"], "Invalid MongoDB ID");
    }

    #[tokio::test]
    async fn test_get_missing_is_404() {
        let mut repo = MockCategoryRepository::new();
        repo.expect_get_by_id()
            .returning(|_| Err(CatalogError::not_found("Category")));

        let response = app(repo)
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
        assert_eq!(json["message"], "Category not found");
    }

    #[tokio::test]
    async fn test_update_missing_is_404() {
        let mut repo = MockCategoryRepository::new();
        repo.expect_update_by_id().returning(|_, _| {
            Err(CatalogError::NotFound(
                "Category ID not found, failed to update".to_string(),
            ))
        });

        let response = app(repo)
            .oneshot(json_request(
                "PUT",
                &format!("/{}", ObjectId::new()),
                serde_json::json!({ "name": "Sneakers" }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_is_204() {
        let mut repo = MockCategoryRepository::new();
        repo.expect_delete_by_id().times(1).returning(|_| Ok(()));

        let response = app(repo)
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
    async fn test_upload_rejects_gif() {
        let mut repo = MockCategoryRepository::new();
        repo.expect_get_by_id().never();

        let response = app(repo)
            .oneshot(multipart_request(
                &format!("/{}/image", ObjectId::new()),
                "image",
                "image/gif",
                b"GIF89a",
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = json_body(response).await;
        assert!(
            json["message"]
                .as_str()
                .unwrap()
                .starts_with("Invalid file type: image/gif")
        );
    }

    #[tokio::test]
    async fn test_upload_without_image_field() {
        let mut repo = MockCategoryRepository::new();
        repo.expect_get_by_id().never();

        let response = app(repo)
            .oneshot(multipart_request(
                &format!("/{}/image", ObjectId::new()),
                "file",
                "image/png",
                b"png",
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = json_body(response).await;
        assert_eq!(json["message"], "File is required");
    }

    #[tokio::test]
    async fn test_upload_stores_and_returns_url() {
        let existing = category("Shoes");
        let id = existing.id;
        let found = existing.clone();

        let mut repo = MockCategoryRepository::new();
        repo.expect_get_by_id().returning(move |_| Ok(found.clone()));
        repo.expect_update_by_id().returning(move |_, patch| {
            let mut updated = existing.clone();
            updated.image = patch.image;
            Ok(updated)
        });

        let mut storage = MockImageStorage::new();
        storage
            .expect_store()
            .returning(|_, _| Ok("categories-abc.png".to_string()));
        storage
            .expect_public_url()
            .returning(|dir, file| format!("http://media.test/uploads/{dir}/{file}"));

        let response = router(CategoryService::new(repo, Arc::new(storage)))
            .oneshot(multipart_request(
                &format!("/{id}/image"),
                "image",
                "image/png",
                b"\x89PNG",
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(
            json["image"],
            "http://media.test/uploads/categories/categories-abc.png"
        );
    }
}
