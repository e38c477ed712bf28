//! HTTP handlers for SubCategories API
//!
//! Served in two places: `/subcategories` and, scoped to one category,
//! `/categories/{id}/subcategories`. The OpenAPI paths are relative to the
//! API root for that reason.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use axum_helpers::{
    ObjectIdPath, ValidatedJson, ValidatedQuery,
    errors::responses::{
        BadRequestObjectIdResponse, BadRequestValidationResponse, ConflictResponse,
        InternalServerErrorResponse, NotFoundResponse,
    },
};
use list_query::{ListResponse, QuerySpec};
use utoipa::OpenApi;

use super::models::{CreateSubCategory, SubCategoryResponse, UpdateSubCategory};
use super::repository::SubCategoryRepository;
use super::service::SubCategoryService;
use crate::error::CatalogResult;

#[derive(OpenApi)]
#[openapi(
    paths(
        list_sub_categories,
        create_sub_category,
        get_sub_category,
        update_sub_category,
        delete_sub_category,
        list_category_sub_categories,
        create_category_sub_category,
    ),
    components(
        schemas(SubCategoryResponse, CreateSubCategory, UpdateSubCategory),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestObjectIdResponse,
            ConflictResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "SubCategories", description = "Sub-category management endpoints")
    )
)]
pub struct ApiDoc;

/// Routes relative to `/subcategories`
pub fn router<R: SubCategoryRepository + 'static>(service: SubCategoryService<R>) -> Router {
    Router::new()
        .route("/", get(list_sub_categories).post(create_sub_category))
        .route(
            "/{id}",
            get(get_sub_category)
                .put(update_sub_category)
                .delete(delete_sub_category),
        )
        .with_state(Arc::new(service))
}

/// Routes relative to `/categories`, for merging into the categories router
pub fn category_router<R: SubCategoryRepository + 'static>(
    service: SubCategoryService<R>,
) -> Router {
    Router::new()
        .route(
            "/{id}/subcategories",
            get(list_category_sub_categories).post(create_category_sub_category),
        )
        .with_state(Arc::new(service))
}

/// List sub-categories
#[utoipa::path(
    get,
    path = "/subcategories",
    tag = "SubCategories",
    params(QuerySpec),
    responses(
        (status = 200, description = "One page of sub-categories", body = ListResponse<SubCategoryResponse>),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_sub_categories<R: SubCategoryRepository>(
    State(service): State<Arc<SubCategoryService<R>>>,
    ValidatedQuery(spec): ValidatedQuery<QuerySpec>,
) -> CatalogResult<Json<ListResponse<SubCategoryResponse>>> {
    let page = service.list(&spec, None).await?;
    Ok(Json(page.map(SubCategoryResponse::from).into()))
}

/// Create a sub-category; the body must name its category
#[utoipa::path(
    post,
    path = "/subcategories",
    tag = "SubCategories",
    request_body = CreateSubCategory,
    responses(
        (status = 201, description = "Sub-category created", body = SubCategoryResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_sub_category<R: SubCategoryRepository>(
    State(service): State<Arc<SubCategoryService<R>>>,
    ValidatedJson(input): ValidatedJson<CreateSubCategory>,
) -> CatalogResult<impl IntoResponse> {
    let sub_category = service.create(input, None).await?;
    Ok((
        StatusCode::CREATED,
        Json(SubCategoryResponse::from(sub_category)),
    ))
}

/// Get a sub-category by ID
#[utoipa::path(
    get,
    path = "/subcategories/{id}",
    tag = "SubCategories",
    params(("id" = String, Path, description = "SubCategory ObjectId")),
    responses(
        (status = 200, description = "Sub-category found", body = SubCategoryResponse),
        (status = 400, response = BadRequestObjectIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_sub_category<R: SubCategoryRepository>(
    State(service): State<Arc<SubCategoryService<R>>>,
    ObjectIdPath(id): ObjectIdPath,
) -> CatalogResult<Json<SubCategoryResponse>> {
    Ok(Json(service.get(id).await?.into()))
}

/// Update a sub-category
#[utoipa::path(
    put,
    path = "/subcategories/{id}",
    tag = "SubCategories",
    params(("id" = String, Path, description = "SubCategory ObjectId")),
    request_body = UpdateSubCategory,
    responses(
        (status = 200, description = "Sub-category updated", body = SubCategoryResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_sub_category<R: SubCategoryRepository>(
    State(service): State<Arc<SubCategoryService<R>>>,
    ObjectIdPath(id): ObjectIdPath,
    ValidatedJson(input): ValidatedJson<UpdateSubCategory>,
) -> CatalogResult<Json<SubCategoryResponse>> {
    Ok(Json(service.update(id, input).await?.into()))
}

/// Delete a sub-category
#[utoipa::path(
    delete,
    path = "/subcategories/{id}",
    tag = "SubCategories",
    params(("id" = String, Path, description = "SubCategory ObjectId")),
    responses(
        (status = 204, description = "Sub-category deleted (or already absent)"),
        (status = 400, response = BadRequestObjectIdResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_sub_category<R: SubCategoryRepository>(
    State(service): State<Arc<SubCategoryService<R>>>,
    ObjectIdPath(id): ObjectIdPath,
) -> CatalogResult<StatusCode> {
    service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// List the sub-categories of one category
#[utoipa::path(
    get,
    path = "/categories/{id}/subcategories",
    tag = "SubCategories",
    params(("id" = String, Path, description = "Category ObjectId"), QuerySpec),
    responses(
        (status = 200, description = "One page of the category's sub-categories", body = ListResponse<SubCategoryResponse>),
        (status = 400, response = BadRequestObjectIdResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_category_sub_categories<R: SubCategoryRepository>(
    State(service): State<Arc<SubCategoryService<R>>>,
    ObjectIdPath(category): ObjectIdPath,
    ValidatedQuery(spec): ValidatedQuery<QuerySpec>,
) -> CatalogResult<Json<ListResponse<SubCategoryResponse>>> {
    let page = service.list(&spec, Some(category)).await?;
    Ok(Json(page.map(SubCategoryResponse::from).into()))
}

/// Create a sub-category under the category in the path
#[utoipa::path(
    post,
    path = "/categories/{id}/subcategories",
    tag = "SubCategories",
    params(("id" = String, Path, description = "Category ObjectId")),
    request_body = CreateSubCategory,
    responses(
        (status = 201, description = "Sub-category created", body = SubCategoryResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_category_sub_category<R: SubCategoryRepository>(
    State(service): State<Arc<SubCategoryService<R>>>,
    ObjectIdPath(category): ObjectIdPath,
    ValidatedJson(input): ValidatedJson<CreateSubCategory>,
) -> CatalogResult<impl IntoResponse> {
    let sub_category = service.create(input, Some(category)).await?;
    Ok((
        StatusCode::CREATED,
        Json(SubCategoryResponse::from(sub_category)),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::categories::repository::MockCategoryRepository;
    use crate::sub_categories::models::SubCategory;
    use crate::sub_categories::repository::MockSubCategoryRepository;
    use axum::body::Body;
    use axum::http::{Request, header};
    use http_body_util::BodyExt;
    use list_query::{ListResult, Pagination};
    use mongodb::bson::oid::ObjectId;
    use tower::ServiceExt;

    fn app(repo: MockSubCategoryRepository, categories: MockCategoryRepository) -> Router {
        let service = SubCategoryService::new(repo, Arc::new(categories));
        Router::new()
            .nest("/subcategories", router(service.clone()))
            .nest("/categories", category_router(service))
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn post(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_nested_list_scopes_to_category() {
        let category = ObjectId::new();
        let mut repo = MockSubCategoryRepository::new();
        repo.expect_list()
            .withf(move |spec, scope| *scope == Some(category) && spec.keyword() == Some("run"))
            .returning(move |_, _| {
                let (_, pagination) = Pagination::compute(1, 50, 1);
                Ok(ListResult::new(
                    vec![SubCategory::new("Running".to_string(), category)],
                    pagination,
                ))
            });

        let response = app(repo, MockCategoryRepository::new())
            .oneshot(
                Request::builder()
                    .uri(format!("/categories/{category}/subcategories?keyword=run"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["results"], 1);
        assert_eq!(json["data"][0]["category"], category.to_hex());
    }

    #[tokio::test]
    async fn test_flat_list_is_unscoped() {
        let mut repo = MockSubCategoryRepository::new();
        repo.expect_list()
            .withf(|_, scope| scope.is_none())
            .returning(|_, _| {
                let (_, pagination) = Pagination::compute(1, 50, 0);
                Ok(ListResult::new(vec![], pagination))
            });

        let response = app(repo, MockCategoryRepository::new())
            .oneshot(
                Request::builder()
                    .uri("/subcategories")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["results"], 0);
        assert_eq!(json["data"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_nested_create_uses_path_category() {
        let category = ObjectId::new();
        let mut categories = MockCategoryRepository::new();
        categories
            .expect_exists_by_id()
            .returning(move |id| Ok(id == category));

        let mut repo = MockSubCategoryRepository::new();
        repo.expect_create().returning(Ok);

        let response = app(repo, categories)
            .oneshot(post(
                &format!("/categories/{category}/subcategories"),
                serde_json::json!({ "name": "Trail Running" }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let json = json_body(response).await;
        assert_eq!(json["slug"], "trail-running");
        assert_eq!(json["category"], category.to_hex());
    }

    #[tokio::test]
    async fn test_create_with_unknown_category_is_404() {
        let mut categories = MockCategoryRepository::new();
        categories.expect_exists_by_id().returning(|_| Ok(false));

        let mut repo = MockSubCategoryRepository::new();
        repo.expect_create().never();

        let response = app(repo, categories)
            .oneshot(post(
                "/subcategories",
                serde_json::json!({ "name": "Boots", "category": ObjectId::new().to_hex() }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let json = json_body(response).await;
        assert_eq!(json["message"], "Category does not exist");
    }

    #[tokio::test]
    async fn test_create_with_malformed_category_is_400() {
        let mut repo = MockSubCategoryRepository::new();
        repo.expect_create().never();

        let response = app(repo, MockCategoryRepository::new())
            .oneshot(post(
                "/subcategories",
                serde_json::json!({ "name": "Boots", "category": "xyz" }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = json_body(response).await;
        assert_eq!(json["details"]["category"][0]["message"], "Invalid MongoDB ID");
    }
}
