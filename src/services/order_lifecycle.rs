//! Status transitions and driver assignment for existing orders.
//!
//! Both writes are single conditional UPDATEs: the row only changes if it is
//! still in the state the decision was made against. Losing that race is
//! reported as a conflict rather than overwriting the other writer.

use chrono::Utc;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use crate::{
    audit::record,
    domain::{
        order_status::{self, Actor, OrderStatus},
        policy::{UserRole, transition_actor},
    },
    dto::orders::{AssignDriverRequest, UpdateOrderStatusRequest},
    entity::{
        Orders, Users,
        orders::{ActiveModel as OrderActive, Column as OrderCol},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::Order,
    response::{ApiResponse, Meta},
    state::AppState,
};

const OPEN_STATUSES: [OrderStatus; 3] = [
    OrderStatus::EnAttente,
    OrderStatus::EnPreparation,
    OrderStatus::EnLivraison,
];

fn lost_race() -> AppError {
    AppError::Conflict("Order was changed by another request, reload and retry".into())
}

/// Move an order one step along its lifecycle.
///
/// Admins may act on any order. Drivers may only act on orders currently
/// assigned to them; any other order is reported as not found.
pub async fn transition_status(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateOrderStatusRequest,
) -> AppResult<ApiResponse<Order>> {
    let order = Orders::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound("Order"))?;

    let actor = transition_actor(user.role, user.user_id, order.driver_id)
        .ok_or(AppError::NotFound("Order"))?;

    let change = order_status::plan_transition(
        actor,
        order.status,
        payload.status,
        payload.failure_reason,
        payload.failure_details,
    )?;

    let mut update = Orders::update_many()
        .set(OrderActive {
            status: Set(change.to),
            failure_reason: Set(change.failure_reason),
            failure_details: Set(change.failure_details.clone()),
            updated_at: Set(Utc::now().into()),
            ..Default::default()
        })
        .filter(OrderCol::Id.eq(id))
        .filter(OrderCol::Status.eq(change.from));
    if actor == Actor::AssignedDriver {
        update = update.filter(OrderCol::DriverId.eq(user.user_id));
    }

    let updated = update
        .exec_with_returning(&state.orm)
        .await?
        .into_iter()
        .next()
        .ok_or_else(lost_race)?;

    tracing::info!(
        order_id = %id,
        from = %change.from,
        to = %change.to,
        actor = ?actor,
        "order status changed"
    );
    record(
        &state.orm,
        Some(user.user_id),
        "order_status_update",
        "orders",
        serde_json::json!({
            "order_id": id,
            "from": change.from,
            "to": change.to,
            "failure_reason": change.failure_reason,
        }),
    )
    .await;

    Ok(ApiResponse::success(
        "Order status updated",
        Order::from(updated),
        Some(Meta::empty()),
    ))
}

/// Assign, reassign or (with `driver_id: null`) clear an order's driver.
pub async fn assign_driver(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: AssignDriverRequest,
) -> AppResult<ApiResponse<Order>> {
    ensure_admin(user)?;

    let order = Orders::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound("Order"))?;
    order_status::ensure_assignable(order.status)?;

    let driver = match payload.driver_id {
        Some(driver_id) => {
            let driver = Users::find_by_id(driver_id)
                .one(&state.orm)
                .await?
                .ok_or(AppError::NotFound("Driver"))?;
            if driver.role != UserRole::Driver {
                return Err(AppError::BadRequest(
                    "Only users with the driver role can be assigned".into(),
                ));
            }
            Some(driver)
        }
        None => None,
    };

    let updated = Orders::update_many()
        .set(OrderActive {
            driver_id: Set(driver.as_ref().map(|d| d.id)),
            driver_name: Set(driver.as_ref().map(|d| d.name.clone())),
            updated_at: Set(Utc::now().into()),
            ..Default::default()
        })
        .filter(OrderCol::Id.eq(id))
        .filter(OrderCol::Status.is_in(OPEN_STATUSES))
        .exec_with_returning(&state.orm)
        .await?
        .into_iter()
        .next()
        .ok_or_else(lost_race)?;

    match &driver {
        Some(d) => tracing::info!(order_id = %id, driver_id = %d.id, "driver assigned"),
        None => tracing::info!(order_id = %id, "driver unassigned"),
    }
    record(
        &state.orm,
        Some(user.user_id),
        "order_assign_driver",
        "orders",
        serde_json::json!({ "order_id": id, "driver_id": payload.driver_id }),
    )
    .await;

    let message = if driver.is_some() {
        "Driver assigned"
    } else {
        "Driver unassigned"
    };
    Ok(ApiResponse::success(
        message,
        Order::from(updated),
        Some(Meta::empty()),
    ))
}
