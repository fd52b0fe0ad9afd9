use sea_orm::{ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, QuerySelect};
use uuid::Uuid;

use crate::{
    domain::{failure_reason, order_status::OrderStatus, stats::DriverStats},
    dto::driver::{DriverOrders, FailureReasonList},
    entity::{Orders, orders::Column as OrderCol},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_driver},
    models::OrderWithCustomer,
    response::{ApiResponse, Meta},
    routes::params::StatusFilter,
    services::admin_service::with_customers,
    state::AppState,
};

async fn load_stats(state: &AppState, driver_id: Uuid) -> AppResult<DriverStats> {
    let rows: Vec<(OrderStatus, i64)> = Orders::find()
        .select_only()
        .column(OrderCol::Status)
        .column(OrderCol::Total)
        .filter(OrderCol::DriverId.eq(driver_id))
        .into_tuple()
        .all(&state.orm)
        .await?;
    Ok(DriverStats::from_orders(rows))
}

pub async fn stats(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<DriverStats>> {
    ensure_driver(user)?;
    let stats = load_stats(state, user.user_id).await?;
    Ok(ApiResponse::success("Driver stats", stats, Some(Meta::empty())))
}

pub async fn list_orders(
    state: &AppState,
    user: &AuthUser,
    filter: StatusFilter,
) -> AppResult<ApiResponse<DriverOrders>> {
    ensure_driver(user)?;

    let mut condition = Condition::all().add(OrderCol::DriverId.eq(user.user_id));
    if let Some(status) = filter.status {
        condition = condition.add(OrderCol::Status.eq(status));
    }
    let orders = Orders::find()
        .filter(condition)
        .order_by_desc(OrderCol::CreatedAt)
        .all(&state.orm)
        .await?;

    let data = DriverOrders {
        orders: with_customers(&state.orm, orders).await?,
        stats: load_stats(state, user.user_id).await?,
    };
    Ok(ApiResponse::success("Driver orders", data, Some(Meta::empty())))
}

/// Orders assigned to someone else are indistinguishable from missing ones.
pub async fn get_order(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<OrderWithCustomer>> {
    ensure_driver(user)?;
    let order = Orders::find()
        .filter(OrderCol::Id.eq(id))
        .filter(OrderCol::DriverId.eq(user.user_id))
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound("Order"))?;

    let data = with_customers(&state.orm, vec![order])
        .await?
        .pop()
        .ok_or(AppError::NotFound("Order"))?;
    Ok(ApiResponse::success("Order", data, Some(Meta::empty())))
}

pub fn failure_reasons(user: &AuthUser) -> AppResult<ApiResponse<FailureReasonList>> {
    ensure_driver(user)?;
    Ok(ApiResponse::success(
        "Failure reasons",
        FailureReasonList {
            reasons: failure_reason::catalog(),
        },
        Some(Meta::empty()),
    ))
}
