//! Address book. Each user has at most one default address: the first
//! address becomes the default, and removing the default promotes the most
//! recent remaining one.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
    sea_query::{Expr, LockType},
};
use uuid::Uuid;

use crate::{
    audit::record,
    dto::addresses::{AddressList, CreateAddressRequest, UpdateAddressRequest},
    entity::{
        Addresses,
        addresses::{self, ActiveModel, Column},
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::Address,
    response::{ApiResponse, Empty, Meta},
    state::AppState,
};

async fn find_owned<C: ConnectionTrait>(
    conn: &C,
    user_id: Uuid,
    id: Uuid,
    lock: bool,
) -> AppResult<addresses::Model> {
    let mut finder = Addresses::find()
        .filter(Column::Id.eq(id))
        .filter(Column::UserId.eq(user_id));
    if lock {
        finder = finder.lock(LockType::Update);
    }
    finder.one(conn).await?.ok_or(AppError::NotFound("Address"))
}

/// Clear the default flag on every address of `user_id` except `keep`.
async fn unset_other_defaults<C: ConnectionTrait>(
    conn: &C,
    user_id: Uuid,
    keep: Option<Uuid>,
) -> AppResult<()> {
    let mut update = Addresses::update_many()
        .col_expr(Column::IsDefault, Expr::value(false))
        .filter(Column::UserId.eq(user_id))
        .filter(Column::IsDefault.eq(true));
    if let Some(keep) = keep {
        update = update.filter(Column::Id.ne(keep));
    }
    update.exec(conn).await?;
    Ok(())
}

fn required(field: &str, value: String) -> AppResult<String> {
    let value = value.trim().to_string();
    if value.is_empty() {
        return Err(AppError::BadRequest(format!("{field} must not be empty")));
    }
    Ok(value)
}

async fn audit(state: &AppState, user: &AuthUser, action: &str, id: Uuid) {
    record(
        &state.orm,
        Some(user.user_id),
        action,
        "addresses",
        serde_json::json!({ "address_id": id }),
    )
    .await;
}

pub async fn list_addresses(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<AddressList>> {
    let items: Vec<Address> = Addresses::find()
        .filter(Column::UserId.eq(user.user_id))
        .order_by_desc(Column::IsDefault)
        .order_by_desc(Column::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Address::from)
        .collect();

    Ok(ApiResponse::success(
        "Addresses",
        AddressList { items },
        Some(Meta::empty()),
    ))
}

pub async fn create_address(
    state: &AppState,
    user: &AuthUser,
    payload: CreateAddressRequest,
) -> AppResult<ApiResponse<Address>> {
    payload.validate()?;

    let txn = state.orm.begin().await?;
    let existing = Addresses::find()
        .filter(Column::UserId.eq(user.user_id))
        .count(&txn)
        .await?;
    let is_default = payload.is_default || existing == 0;
    if is_default {
        unset_other_defaults(&txn, user.user_id, None).await?;
    }

    let address = ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(user.user_id),
        name: Set(payload.name.trim().to_string()),
        city: Set(payload.city.trim().to_string()),
        quartier: Set(payload.quartier.trim().to_string()),
        description: Set(payload.description),
        phone: Set(payload.phone),
        is_default: Set(is_default),
        created_at: Set(Utc::now().into()),
    }
    .insert(&txn)
    .await?;
    txn.commit().await?;

    audit(state, user, "address_create", address.id).await;
    Ok(ApiResponse::success(
        "Address created successfully",
        Address::from(address),
        Some(Meta::empty()),
    ))
}

pub async fn get_address(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<Address>> {
    let address = find_owned(&state.orm, user.user_id, id, false).await?;
    Ok(ApiResponse::success(
        "Address",
        Address::from(address),
        Some(Meta::empty()),
    ))
}

pub async fn update_address(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateAddressRequest,
) -> AppResult<ApiResponse<Address>> {
    let txn = state.orm.begin().await?;
    let existing = find_owned(&txn, user.user_id, id, true).await?;

    if payload.is_default == Some(false) && existing.is_default {
        return Err(AppError::BadRequest(
            "The default address cannot be unset; set another address as default instead".into(),
        ));
    }
    let make_default = payload.is_default == Some(true) && !existing.is_default;
    if make_default {
        unset_other_defaults(&txn, user.user_id, Some(id)).await?;
    }

    let unchanged = existing.clone();
    let mut active: ActiveModel = existing.into();
    if let Some(name) = payload.name {
        active.name = Set(required("name", name)?);
    }
    if let Some(city) = payload.city {
        active.city = Set(required("city", city)?);
    }
    if let Some(quartier) = payload.quartier {
        active.quartier = Set(required("quartier", quartier)?);
    }
    if let Some(description) = payload.description {
        active.description = Set(Some(description));
    }
    if let Some(phone) = payload.phone {
        active.phone = Set(Some(phone));
    }
    if make_default {
        active.is_default = Set(true);
    }

    let address = if active.is_changed() {
        active.update(&txn).await?
    } else {
        unchanged
    };
    txn.commit().await?;

    audit(state, user, "address_update", id).await;
    Ok(ApiResponse::success(
        "Address updated",
        Address::from(address),
        Some(Meta::empty()),
    ))
}

pub async fn delete_address(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<Empty>> {
    let txn = state.orm.begin().await?;
    let existing = find_owned(&txn, user.user_id, id, true).await?;
    let was_default = existing.is_default;
    existing.delete(&txn).await?;

    if was_default {
        let next = Addresses::find()
            .filter(Column::UserId.eq(user.user_id))
            .order_by_desc(Column::CreatedAt)
            .one(&txn)
            .await?;
        if let Some(next) = next {
            let mut active: ActiveModel = next.into();
            active.is_default = Set(true);
            active.update(&txn).await?;
        }
    }
    txn.commit().await?;

    audit(state, user, "address_delete", id).await;
    Ok(ApiResponse::message("Address deleted successfully"))
}

pub async fn set_default(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<Address>> {
    let txn = state.orm.begin().await?;
    let existing = find_owned(&txn, user.user_id, id, true).await?;
    unset_other_defaults(&txn, user.user_id, Some(id)).await?;

    let address = if existing.is_default {
        existing
    } else {
        let mut active: ActiveModel = existing.into();
        active.is_default = Set(true);
        active.update(&txn).await?
    };
    txn.commit().await?;

    audit(state, user, "address_set_default", id).await;
    Ok(ApiResponse::success(
        "Address set as default",
        Address::from(address),
        Some(Meta::empty()),
    ))
}
