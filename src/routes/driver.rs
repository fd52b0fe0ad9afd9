use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, put},
};
use uuid::Uuid;

use crate::{
    domain::stats::DriverStats,
    dto::{
        driver::{DriverOrders, FailureReasonList},
        orders::UpdateOrderStatusRequest,
    },
    error::AppResult,
    extract::{ApiJson, ApiQuery},
    middleware::auth::{AuthUser, ensure_driver},
    models::{Order, OrderWithCustomer},
    response::ApiResponse,
    routes::params::StatusFilter,
    services::{driver_service, order_lifecycle},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/stats", get(stats))
        .route("/orders", get(list_orders))
        .route("/orders/{id}", get(get_order))
        .route("/orders/{id}/status", put(update_order_status))
        .route("/failure-reasons", get(failure_reasons))
}

#[utoipa::path(
    get,
    path = "/api/driver/stats",
    responses(
        (status = 200, description = "Counters over orders assigned to the caller", body = ApiResponse<DriverStats>),
        (status = 403, description = "Driver role required")
    ),
    security(("bearer_auth" = [])),
    tag = "Driver"
)]
pub async fn stats(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<DriverStats>>> {
    let resp = driver_service::stats(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/driver/orders",
    params(
        ("status" = Option<String>, Query, description = "Filter by status")
    ),
    responses(
        (status = 200, description = "Assigned orders and stats", body = ApiResponse<DriverOrders>),
        (status = 403, description = "Driver role required")
    ),
    security(("bearer_auth" = [])),
    tag = "Driver"
)]
pub async fn list_orders(
    State(state): State<AppState>,
    user: AuthUser,
    ApiQuery(filter): ApiQuery<StatusFilter>,
) -> AppResult<Json<ApiResponse<DriverOrders>>> {
    let resp = driver_service::list_orders(&state, &user, filter).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/driver/orders/{id}",
    params(("id" = Uuid, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Assigned order with customer contact", body = ApiResponse<OrderWithCustomer>),
        (status = 404, description = "Not found or not assigned to the caller")
    ),
    security(("bearer_auth" = [])),
    tag = "Driver"
)]
pub async fn get_order(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<OrderWithCustomer>>> {
    let resp = driver_service::get_order(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/driver/orders/{id}/status",
    params(("id" = Uuid, Path, description = "Order ID")),
    request_body = UpdateOrderStatusRequest,
    responses(
        (status = 200, description = "Status advanced", body = ApiResponse<Order>),
        (status = 400, description = "Invalid transition or missing failure reason"),
        (status = 404, description = "Not found or not assigned to the caller"),
        (status = 409, description = "Order changed concurrently")
    ),
    security(("bearer_auth" = [])),
    tag = "Driver"
)]
pub async fn update_order_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    ApiJson(payload): ApiJson<UpdateOrderStatusRequest>,
) -> AppResult<Json<ApiResponse<Order>>> {
    ensure_driver(&user)?;
    let resp = order_lifecycle::transition_status(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/driver/failure-reasons",
    responses(
        (status = 200, description = "Reason codes with French and English labels", body = ApiResponse<FailureReasonList>)
    ),
    security(("bearer_auth" = [])),
    tag = "Driver"
)]
pub async fn failure_reasons(user: AuthUser) -> AppResult<Json<ApiResponse<FailureReasonList>>> {
    let resp = driver_service::failure_reasons(&user)?;
    Ok(Json(resp))
}
