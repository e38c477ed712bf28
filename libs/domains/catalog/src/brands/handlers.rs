//! HTTP handlers for Brands API

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

use super::models::{BrandResponse, CreateBrand, UpdateBrand};
use super::repository::BrandRepository;
use super::service::BrandService;
use crate::error::CatalogResult;
use crate::upload;

#[derive(OpenApi)]
#[openapi(
    paths(
        list_brands,
        create_brand,
        get_brand,
        update_brand,
        delete_brand,
        upload_brand_image,
    ),
    components(
        schemas(BrandResponse, CreateBrand, UpdateBrand),
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
        (name = "Brands", description = "Brand management endpoints")
    )
)]
pub struct ApiDoc;

/// Routes relative to `/brands`
pub fn router<R: BrandRepository + 'static>(service: BrandService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_brands).post(create_brand))
        .route(
            "/{id}",
            get(get_brand)
                .put(update_brand)
                .delete(delete_brand),
        )
        .route(
            "/{id}/image",
            put(upload_brand_image).layer(upload::body_limit()),
        )
        .with_state(shared_service)
}

/// List brands
#[utoipa::path(
    get,
    path = "",
    tag = "Brands",
    params(QuerySpec),
    responses(
        (status = 200, description = "One page of brands", body = ListResponse<BrandResponse>),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_brands<R: BrandRepository>(
    State(service): State<Arc<BrandService<R>>>,
    ValidatedQuery(spec): ValidatedQuery<QuerySpec>,
) -> CatalogResult<Json<ListResponse<BrandResponse>>> {
    let page = service.list(&spec).await?;
    let page = page.map(|brand| BrandResponse::new(brand, service.storage()));
    Ok(Json(page.into()))
}

/// Create a brand
#[utoipa::path(
    post,
    path = "",
    tag = "Brands",
    request_body = CreateBrand,
    responses(
        (status = 201, description = "Brand created", body = BrandResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_brand<R: BrandRepository>(
    State(service): State<Arc<BrandService<R>>>,
    ValidatedJson(input): ValidatedJson<CreateBrand>,
) -> CatalogResult<impl IntoResponse> {
    let brand = service.create(input).await?;
    Ok((
        StatusCode::CREATED,
        Json(BrandResponse::new(brand, service.storage())),
    ))
}

/// Get a brand by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Brands",
    params(("id" = String, Path, description = "Brand ObjectId")),
    responses(
        (status = 200, description = "Brand found", body = BrandResponse),
        (status = 400, response = BadRequestObjectIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_brand<R: BrandRepository>(
    State(service): State<Arc<BrandService<R>>>,
    ObjectIdPath(id): ObjectIdPath,
) -> CatalogResult<Json<BrandResponse>> {
    let brand = service.get(id).await?;
    Ok(Json(BrandResponse::new(brand, service.storage())))
}

/// Update a brand
#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Brands",
    params(("id" = String, Path, description = "Brand ObjectId")),
    request_body = UpdateBrand,
    responses(
        (status = 200, description = "Brand updated", body = BrandResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_brand<R: BrandRepository>(
    State(service): State<Arc<BrandService<R>>>,
    ObjectIdPath(id): ObjectIdPath,
    ValidatedJson(input): ValidatedJson<UpdateBrand>,
) -> CatalogResult<Json<BrandResponse>> {
    let brand = service.update(id, input).await?;
    Ok(Json(BrandResponse::new(brand, service.storage())))
}

/// Delete a brand
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Brands",
    params(("id" = String, Path, description = "Brand ObjectId")),
    responses(
        (status = 204, description = "Brand deleted (or already absent)"),
        (status = 400, response = BadRequestObjectIdResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_brand<R: BrandRepository>(
    State(service): State<Arc<BrandService<R>>>,
    ObjectIdPath(id): ObjectIdPath,
) -> CatalogResult<StatusCode> {
    service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Upload the brand image (multipart field `image`)
#[utoipa::path(
    put,
    path = "/{id}/image",
    tag = "Brands",
    params(("id" = String, Path, description = "Brand ObjectId")),
    request_body(content_type = "multipart/form-data", description = "`image`: jpeg, png or webp up to 2 MB"),
    responses(
        (status = 200, description = "Image stored", body = BrandResponse),
        (status = 400, response = UploadRejectedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn upload_brand_image<R: BrandRepository>(
    State(service): State<Arc<BrandService<R>>>,
    ObjectIdPath(id): ObjectIdPath,
    multipart: Multipart,
) -> CatalogResult<Json<BrandResponse>> {
    let upload = upload::read_image(multipart).await?;
    let brand = service.set_image(id, upload).await?;
    Ok(Json(BrandResponse::new(brand, service.storage())))
}
