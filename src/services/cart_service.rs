use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QuerySelect, Set,
    TransactionTrait,
    sea_query::{LockType, OnConflict},
};
use uuid::Uuid;

use crate::{
    domain::{
        cart_lines::{LineItem, LineItems},
        catalog::ProductSize,
        pricing::Totals,
    },
    dto::cart::{AddToCartRequest, UpdateCartItemRequest},
    entity::{
        Carts, Products,
        carts::{self, Column as CartCol},
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::CartView,
    response::{ApiResponse, Empty, Meta},
    state::AppState,
};

/// Row-lock the caller's cart for the rest of the transaction.
pub(crate) async fn lock_cart<C: ConnectionTrait>(
    conn: &C,
    user_id: Uuid,
) -> AppResult<Option<carts::Model>> {
    let cart = Carts::find()
        .filter(CartCol::UserId.eq(user_id))
        .lock(LockType::Update)
        .one(conn)
        .await?;
    Ok(cart)
}

async fn lock_or_create_cart<C: ConnectionTrait>(conn: &C, user_id: Uuid) -> AppResult<carts::Model> {
    Carts::insert(carts::ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        items: Set(LineItems::default()),
        updated_at: Set(Utc::now().into()),
    })
    .on_conflict(OnConflict::column(CartCol::UserId).do_nothing().to_owned())
    .exec_without_returning(conn)
    .await?;

    lock_cart(conn, user_id)
        .await?
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("cart vanished after upsert")))
}

async fn save_lines<C: ConnectionTrait>(
    conn: &C,
    cart: carts::Model,
    items: LineItems,
) -> AppResult<carts::Model> {
    let mut active: carts::ActiveModel = cart.into();
    active.items = Set(items);
    active.updated_at = Set(Utc::now().into());
    Ok(active.update(conn).await?)
}

pub async fn get_cart(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<CartView>> {
    let cart = Carts::find()
        .filter(CartCol::UserId.eq(user.user_id))
        .one(&state.orm)
        .await?;
    let view = match cart {
        Some(cart) => CartView::try_from(cart)?,
        None => CartView::empty(),
    };
    Ok(ApiResponse::success("Cart", view, Some(Meta::empty())))
}

pub async fn add_to_cart(
    state: &AppState,
    user: &AuthUser,
    payload: AddToCartRequest,
) -> AppResult<ApiResponse<CartView>> {
    if payload.quantity <= 0 {
        return Err(AppError::BadRequest("Quantity must be positive".into()));
    }

    let product = Products::find_by_id(payload.product_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound("Product"))?;

    let txn = state.orm.begin().await?;
    let cart = lock_or_create_cart(&txn, user.user_id).await?;

    let mut items = cart.items.clone();
    items.add(LineItem {
        product_id: product.id,
        product_name: product.name,
        product_image: product.image_url,
        quantity: payload.quantity,
        size: payload.size,
        price: product.price,
    })?;
    Totals::for_lines(&items)?;
    let cart = save_lines(&txn, cart, items).await?;
    txn.commit().await?;

    Ok(ApiResponse::success(
        "Item added to cart",
        CartView::try_from(cart)?,
        Some(Meta::empty()),
    ))
}

pub async fn update_item(
    state: &AppState,
    user: &AuthUser,
    product_id: Uuid,
    payload: UpdateCartItemRequest,
) -> AppResult<ApiResponse<CartView>> {
    let txn = state.orm.begin().await?;
    let cart = lock_cart(&txn, user.user_id)
        .await?
        .ok_or(AppError::NotFound("Cart"))?;

    let mut items = cart.items.clone();
    items.set_quantity(product_id, payload.size, payload.quantity)?;
    Totals::for_lines(&items)?;
    let cart = save_lines(&txn, cart, items).await?;
    txn.commit().await?;

    Ok(ApiResponse::success(
        "Cart updated",
        CartView::try_from(cart)?,
        Some(Meta::empty()),
    ))
}

pub async fn remove_item(
    state: &AppState,
    user: &AuthUser,
    product_id: Uuid,
    size: ProductSize,
) -> AppResult<ApiResponse<CartView>> {
    let txn = state.orm.begin().await?;
    let cart = lock_cart(&txn, user.user_id)
        .await?
        .ok_or(AppError::NotFound("Cart"))?;

    let mut items = cart.items.clone();
    items.remove(product_id, size)?;
    let cart = save_lines(&txn, cart, items).await?;
    txn.commit().await?;

    Ok(ApiResponse::success(
        "Item removed from cart",
        CartView::try_from(cart)?,
        Some(Meta::empty()),
    ))
}

/// Drops the whole cart row, not just its lines.
pub async fn clear_cart(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<Empty>> {
    Carts::delete_many()
        .filter(CartCol::UserId.eq(user.user_id))
        .exec(&state.orm)
        .await?;
    Ok(ApiResponse::message("Cart cleared"))
}
