//! HTTP handlers for the product catalog

use axum::{
    extract::{
        multipart::{Multipart, MultipartRejection},
        DefaultBodyLimit, State,
    },
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use axum_helpers::{
    errors::responses::{
        BadRequestPayloadResponse, BadRequestUuidResponse, BadRequestValidationResponse,
        NotFoundResponse, PayloadTooLargeResponse, UnauthorizedResponse, UpstreamErrorResponse,
    },
    CurrentUser, UuidPath, ValidatedQuery,
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::{ProductError, ProductResult};
use crate::images::ImageUpload;
use crate::models::{
    DeletedProduct, Product, ProductFields, ProductListQuery, ProductMultipart, ProductPage,
};
use crate::repository::ProductRepository;
use crate::service::ProductService;
use crate::upload::decode_product_form;

/// OpenAPI documentation for the product routes
#[derive(OpenApi)]
#[openapi(
    paths(
        list_products,
        create_product,
        get_product,
        update_product,
        delete_product,
    ),
    components(
        schemas(Product, ProductPage, DeletedProduct, ProductMultipart),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestUuidResponse,
            BadRequestPayloadResponse,
            PayloadTooLargeResponse,
            UnauthorizedResponse,
            UpstreamErrorResponse
        )
    ),
    tags(
        (name = "Products", description = "Product catalog endpoints")
    )
)]
pub struct ApiDoc;

/// Product routes. Reads are public; create, update and delete need a
/// session (see [`CurrentUser`]).
pub fn router<R: ProductRepository + 'static>(service: ProductService<R>) -> Router {
    let body_limit = service.upload_limits().body_limit();
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_products).post(create_product))
        .route(
            "/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(shared_service)
}

/// Reads and coerces a product form, honouring the service's upload limits.
async fn read_form<R: ProductRepository>(
    service: &ProductService<R>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ProductResult<(ProductFields, Option<ImageUpload>)> {
    let multipart = multipart.map_err(|rejection| ProductError::Payload(rejection.body_text()))?;
    decode_product_form(multipart, service.upload_limits())
        .await?
        .into_parts()
}

/// List products matching a name search and price range, newest first
#[utoipa::path(
    get,
    path = "",
    tag = "Products",
    params(ProductListQuery),
    responses(
        (status = 200, description = "One page of products and the total match count", body = ProductPage),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = UpstreamErrorResponse)
    )
)]
async fn list_products<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    ValidatedQuery(query): ValidatedQuery<ProductListQuery>,
) -> ProductResult<Json<ProductPage>> {
    let page = service.list_products(&query).await?;
    Ok(Json(page))
}

/// Create a product, uploading its image first when one is attached
#[utoipa::path(
    post,
    path = "",
    tag = "Products",
    request_body(content = ProductMultipart, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Product created", body = Product),
        (status = 400, response = BadRequestPayloadResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 413, response = PayloadTooLargeResponse),
        (status = 500, response = UpstreamErrorResponse)
    ),
    security(("session" = []))
)]
async fn create_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    CurrentUser(user): CurrentUser,
    multipart: Result<Multipart, MultipartRejection>,
) -> ProductResult<impl IntoResponse> {
    let (fields, image) = read_form(&service, multipart).await?;
    let product = service.create_product(fields, image).await?;
    tracing::debug!(user_id = %user.sub, product_id = %product.id, "Product created by user");
    Ok((StatusCode::CREATED, Json(product)))
}

/// Get a product by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Products",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product found", body = Product),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = UpstreamErrorResponse)
    )
)]
async fn get_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    UuidPath(id): UuidPath,
) -> ProductResult<Json<Product>> {
    let product = service.get_product(id).await?;
    Ok(Json(product))
}

/// Replace a product's fields; the image changes only when a new file is sent
#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Products",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    request_body(content = ProductMultipart, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Product updated", body = Product),
        (status = 400, response = BadRequestPayloadResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 413, response = PayloadTooLargeResponse),
        (status = 500, response = UpstreamErrorResponse)
    ),
    security(("session" = []))
)]
async fn update_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    CurrentUser(_user): CurrentUser,
    UuidPath(id): UuidPath,
    multipart: Result<Multipart, MultipartRejection>,
) -> ProductResult<Json<Product>> {
    let (fields, image) = read_form(&service, multipart).await?;
    let product = service.update_product(id, fields, image).await?;
    Ok(Json(product))
}

/// Delete a product
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Products",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product deleted", body = DeletedProduct),
        (status = 400, response = BadRequestUuidResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = UpstreamErrorResponse)
    ),
    security(("session" = []))
)]
async fn delete_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    CurrentUser(_user): CurrentUser,
    UuidPath(id): UuidPath,
) -> ProductResult<Json<DeletedProduct>> {
    service.delete_product(id).await?;
    Ok(Json(DeletedProduct { id, deleted: true }))
}
