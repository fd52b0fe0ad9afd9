use std::collections::HashMap;

use sea_orm::{
    ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, sea_query::Expr,
};
use uuid::Uuid;

use crate::{
    domain::{order_status::OrderStatus, policy::UserRole, stats::OrderStatusCounts},
    dto::{
        admin::{AdminStats, DriverList, UserList},
        orders::CustomerOrderList,
    },
    entity::{
        Orders, Products, Users,
        orders::{Column as OrderCol, Model as OrderModel},
        users::Column as UserCol,
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::{Order, OrderWithCustomer, User, UserSummary},
    response::{ApiResponse, Meta},
    routes::params::{OrderListQuery, UserListQuery},
    state::AppState,
};

/// Attach each order's customer, loading all of them in one query.
pub(crate) async fn with_customers<C: ConnectionTrait>(
    conn: &C,
    orders: Vec<OrderModel>,
) -> AppResult<Vec<OrderWithCustomer>> {
    let mut ids: Vec<Uuid> = orders.iter().map(|o| o.user_id).collect();
    ids.sort_unstable();
    ids.dedup();

    let customers: HashMap<Uuid, UserSummary> = if ids.is_empty() {
        HashMap::new()
    } else {
        Users::find()
            .filter(UserCol::Id.is_in(ids))
            .all(conn)
            .await?
            .into_iter()
            .map(|u| (u.id, UserSummary::from(u)))
            .collect()
    };

    Ok(orders
        .into_iter()
        .map(|order| {
            let customer = customers.get(&order.user_id).cloned();
            OrderWithCustomer {
                order: Order::from(order),
                customer,
            }
        })
        .collect())
}

pub async fn list_all_orders(
    state: &AppState,
    user: &AuthUser,
    query: OrderListQuery,
) -> AppResult<ApiResponse<CustomerOrderList>> {
    ensure_admin(user)?;
    let (page, limit, offset) = query.pagination().normalize();

    let mut condition = Condition::all();
    if let Some(status) = query.status {
        condition = condition.add(OrderCol::Status.eq(status));
    }

    let finder = Orders::find()
        .filter(condition)
        .order_by_desc(OrderCol::CreatedAt);

    let total = finder.clone().count(&state.orm).await? as i64;

    let orders = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?;
    let items = with_customers(&state.orm, orders).await?;

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success("Orders", CustomerOrderList { items }, Some(meta)))
}

pub async fn get_order_admin(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<OrderWithCustomer>> {
    ensure_admin(user)?;
    let order = Orders::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound("Order"))?;

    let data = with_customers(&state.orm, vec![order])
        .await?
        .pop()
        .ok_or(AppError::NotFound("Order"))?;
    Ok(ApiResponse::success("Order found", data, Some(Meta::empty())))
}

pub async fn list_users(
    state: &AppState,
    user: &AuthUser,
    query: UserListQuery,
) -> AppResult<ApiResponse<UserList>> {
    ensure_admin(user)?;
    let (page, limit, offset) = query.pagination().normalize();

    let mut finder = Users::find().order_by_desc(UserCol::CreatedAt);
    if let Some(role) = query.role {
        finder = finder.filter(UserCol::Role.eq(role));
    }

    let total = finder.clone().count(&state.orm).await? as i64;
    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(User::from)
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success("Users", UserList { items }, Some(meta)))
}

pub async fn list_drivers(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<DriverList>> {
    ensure_admin(user)?;
    let drivers: Vec<UserSummary> = Users::find()
        .filter(UserCol::Role.eq(UserRole::Driver))
        .order_by_asc(UserCol::Name)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(UserSummary::from)
        .collect();

    let total = drivers.len();
    Ok(ApiResponse::success(
        "Drivers",
        DriverList { drivers, total },
        Some(Meta::empty()),
    ))
}

pub async fn stats(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<AdminStats>> {
    ensure_admin(user)?;

    let per_status: Vec<(OrderStatus, i64)> = Orders::find()
        .select_only()
        .column(OrderCol::Status)
        .column_as(Expr::col(OrderCol::Id).count(), "count")
        .group_by(OrderCol::Status)
        .into_tuple()
        .all(&state.orm)
        .await?;

    let revenue: Option<i64> = Orders::find()
        .select_only()
        .column_as(Expr::cust("COALESCE(SUM(total), 0)::BIGINT"), "revenue")
        .filter(OrderCol::Status.eq(OrderStatus::Livree))
        .into_tuple()
        .one(&state.orm)
        .await?;

    let users = Users::find().count(&state.orm).await? as i64;
    let products = Products::find().count(&state.orm).await? as i64;

    let data = AdminStats {
        orders: OrderStatusCounts::from_counts(per_status),
        users,
        products,
        revenue: revenue.unwrap_or(0),
    };
    Ok(ApiResponse::success("Stats", data, Some(Meta::empty())))
}
