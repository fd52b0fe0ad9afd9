use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::products::{BrandList, CategoryList, ProductList},
    error::AppResult,
    extract::ApiQuery,
    models::Product,
    response::ApiResponse,
    routes::params::ProductQuery,
    services::product_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products))
        .route("/{id}", get(get_product))
}

pub fn catalog_router() -> Router<AppState> {
    Router::new()
        .route("/categories", get(list_categories))
        .route("/brands", get(list_brands))
}

#[utoipa::path(
    get,
    path = "/api/products",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("category" = Option<String>, Query, description = "domestic, industrial, refill, rental, installation or emergency"),
        ("brand" = Option<String>, Query, description = "Exact brand"),
        ("search" = Option<String>, Query, description = "Substring of name, brand or description"),
        ("min_price" = Option<i64>, Query, description = "Minimum price in XAF"),
        ("max_price" = Option<i64>, Query, description = "Maximum price in XAF"),
        ("sort" = Option<String>, Query, description = "Sort field, prefix with - for descending. Default name")
    ),
    responses(
        (status = 200, description = "List products", body = ApiResponse<ProductList>),
        (status = 400, description = "Invalid filter or sort field")
    ),
    tag = "Products"
)]
pub async fn list_products(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ProductQuery>,
) -> AppResult<Json<ApiResponse<ProductList>>> {
    let resp = product_service::list_products(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/products/{id}",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Get product", body = ApiResponse<Product>),
        (status = 404, description = "Product not found"),
    ),
    tag = "Products"
)]
pub async fn get_product(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let resp = product_service::get_product(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/categories",
    responses(
        (status = 200, description = "Product categories with display labels", body = ApiResponse<CategoryList>)
    ),
    tag = "Products"
)]
pub async fn list_categories() -> Json<ApiResponse<CategoryList>> {
    Json(product_service::list_categories())
}

#[utoipa::path(
    get,
    path = "/api/brands",
    responses(
        (status = 200, description = "Distinct brands, sorted", body = ApiResponse<BrandList>)
    ),
    tag = "Products"
)]
pub async fn list_brands(State(state): State<AppState>) -> AppResult<Json<ApiResponse<BrandList>>> {
    let resp = product_service::list_brands(&state).await?;
    Ok(Json(resp))
}
