use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, ModelTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait, sea_query::Expr,
};
use uuid::Uuid;

use crate::{
    audit::record,
    domain::{order_status::OrderStatus, pricing::Totals},
    dto::orders::{CheckoutRequest, CheckoutResponse, OrderList},
    entity::{
        Orders, Products,
        orders::{ActiveModel as OrderActive, Column as OrderCol},
        products::Column as ProdCol,
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::Order,
    response::{ApiResponse, Meta},
    routes::params::OrderListQuery,
    services::cart_service::lock_cart,
    state::AppState,
};

pub async fn list_orders(
    state: &AppState,
    user: &AuthUser,
    query: OrderListQuery,
) -> AppResult<ApiResponse<OrderList>> {
    let (page, limit, offset) = query.pagination().normalize();
    let mut condition = Condition::all().add(OrderCol::UserId.eq(user.user_id));
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
        .await?
        .into_iter()
        .map(Order::from)
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success(
        "Ok",
        OrderList { items: orders },
        Some(meta),
    ))
}

/// Turn the caller's cart into an order.
///
/// Order insert, stock decrements and cart removal commit together. A line
/// whose product no longer has enough stock aborts the whole checkout.
pub async fn checkout(
    state: &AppState,
    user: &AuthUser,
    payload: CheckoutRequest,
) -> AppResult<ApiResponse<CheckoutResponse>> {
    let delivery_address = payload.delivery_address.trim().to_string();
    let phone = payload.phone.trim().to_string();
    if delivery_address.is_empty() {
        return Err(AppError::BadRequest("Delivery address is required".into()));
    }
    if phone.is_empty() {
        return Err(AppError::BadRequest("Phone is required".into()));
    }

    let txn = state.orm.begin().await?;

    let cart = match lock_cart(&txn, user.user_id).await? {
        Some(cart) if !cart.items.is_empty() => cart,
        _ => return Err(AppError::BadRequest("Cart is empty".into())),
    };

    for line in cart.items.iter() {
        if line.quantity <= 0 {
            return Err(AppError::BadRequest("Cart has invalid quantity".into()));
        }
        let result = Products::update_many()
            .col_expr(ProdCol::Stock, Expr::col(ProdCol::Stock).sub(line.quantity))
            .filter(ProdCol::Id.eq(line.product_id))
            .filter(ProdCol::Stock.gte(line.quantity))
            .exec(&txn)
            .await?;
        if result.rows_affected == 0 {
            let exists = Products::find_by_id(line.product_id).one(&txn).await?.is_some();
            return Err(AppError::BadRequest(if exists {
                format!("Insufficient stock for {}", line.product_name)
            } else {
                format!("{} is no longer available", line.product_name)
            }));
        }
    }

    let totals = Totals::for_lines(&cart.items)?;
    let now = Utc::now();
    let order = OrderActive {
        id: Set(Uuid::new_v4()),
        user_id: Set(user.user_id),
        items: Set(cart.items.clone()),
        subtotal: Set(totals.subtotal),
        delivery_fee: Set(totals.delivery_fee),
        total: Set(totals.total),
        delivery_address: Set(delivery_address),
        phone: Set(phone),
        payment_method: Set(payload.payment_method),
        status: Set(OrderStatus::EnAttente),
        driver_id: Set(None),
        driver_name: Set(None),
        failure_reason: Set(None),
        failure_details: Set(None),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    }
    .insert(&txn)
    .await?;

    cart.delete(&txn).await?;

    txn.commit().await?;

    tracing::info!(
        order_id = %order.id,
        user_id = %user.user_id,
        total = order.total,
        "order created"
    );
    record(
        &state.orm,
        Some(user.user_id),
        "cart_checkout",
        "orders",
        serde_json::json!({ "order_id": order.id, "total": order.total }),
    )
    .await;

    Ok(ApiResponse::success(
        "Order created successfully",
        CheckoutResponse {
            order_id: order.id,
            total: order.total,
        },
        Some(Meta::empty()),
    ))
}

/// Another customer's order looks exactly like a missing one.
pub async fn get_order(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<Order>> {
    let order = Orders::find()
        .filter(
            Condition::all()
                .add(OrderCol::UserId.eq(user.user_id))
                .add(OrderCol::Id.eq(id)),
        )
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound("Order"))?;

    Ok(ApiResponse::success(
        "OK",
        Order::from(order),
        Some(Meta::empty()),
    ))
}
