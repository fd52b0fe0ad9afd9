use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    domain::{
        cart_lines::{LineError, LineItem},
        catalog::{ProductCategory, ProductSize},
        failure_reason::FailureReason,
        order_status::OrderStatus,
        policy::UserRole,
        pricing::Totals,
    },
    entity::{addresses, carts, orders, products, users},
};

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(2))")]
#[serde(rename_all = "snake_case")]
pub enum Language {
    #[default]
    #[sea_orm(string_value = "en")]
    En,
    #[sea_orm(string_value = "fr")]
    Fr,
}

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    #[default]
    #[sea_orm(string_value = "cash")]
    Cash,
    #[sea_orm(string_value = "mobile_money")]
    MobileMoney,
}

/// Public view of an account. The password hash never leaves the entity.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub address: Option<String>,
    pub state: Option<String>,
    pub language: Language,
    pub created_at: DateTime<Utc>,
}

impl From<users::Model> for User {
    fn from(model: users::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            email: model.email,
            role: model.role,
            address: model.address,
            state: model.state,
            language: model.language,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

/// Customer or driver contact attached to order views.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

impl From<users::Model> for UserSummary {
    fn from(model: users::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            email: model.email,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub brand: String,
    pub category: ProductCategory,
    pub size: ProductSize,
    pub capacity: String,
    pub price: i64,
    pub stock: i32,
    pub image_url: String,
    pub description: String,
    pub rating: f64,
    pub delivery_time: String,
    pub created_at: DateTime<Utc>,
}

impl From<products::Model> for Product {
    fn from(model: products::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            brand: model.brand,
            category: model.category,
            size: model.size,
            capacity: model.capacity,
            price: model.price,
            stock: model.stock,
            image_url: model.image_url,
            description: model.description,
            rating: model.rating,
            delivery_time: model.delivery_time,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

/// A cart priced with the same rule checkout uses.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CartView {
    /// `None` until the first item is added.
    pub id: Option<Uuid>,
    pub items: Vec<LineItem>,
    pub subtotal: i64,
    pub delivery_fee: i64,
    pub total: i64,
}

impl CartView {
    pub fn empty() -> Self {
        Self {
            id: None,
            items: Vec::new(),
            subtotal: 0,
            delivery_fee: 0,
            total: 0,
        }
    }
}

impl TryFrom<carts::Model> for CartView {
    type Error = LineError;

    fn try_from(model: carts::Model) -> Result<Self, Self::Error> {
        if model.items.is_empty() {
            return Ok(Self {
                id: Some(model.id),
                ..Self::empty()
            });
        }
        let Totals {
            subtotal,
            delivery_fee,
            total,
        } = Totals::for_lines(&model.items)?;
        Ok(Self {
            id: Some(model.id),
            items: model.items.into_vec(),
            subtotal,
            delivery_fee,
            total,
        })
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Order {
    pub id: Uuid,
    pub user_id: Uuid,
    pub items: Vec<LineItem>,
    pub subtotal: i64,
    pub delivery_fee: i64,
    pub total: i64,
    pub delivery_address: String,
    pub phone: String,
    pub payment_method: PaymentMethod,
    pub status: OrderStatus,
    pub driver_id: Option<Uuid>,
    pub driver_name: Option<String>,
    pub failure_reason: Option<FailureReason>,
    pub failure_details: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<orders::Model> for Order {
    fn from(model: orders::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            items: model.items.into_vec(),
            subtotal: model.subtotal,
            delivery_fee: model.delivery_fee,
            total: model.total,
            delivery_address: model.delivery_address,
            phone: model.phone,
            payment_method: model.payment_method,
            status: model.status,
            driver_id: model.driver_id,
            driver_name: model.driver_name,
            failure_reason: model.failure_reason,
            failure_details: model.failure_details,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

/// Order as seen by admins and drivers, with the customer's contact.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct OrderWithCustomer {
    #[serde(flatten)]
    pub order: Order,
    pub customer: Option<UserSummary>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Address {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub city: String,
    pub quartier: String,
    pub description: Option<String>,
    pub phone: Option<String>,
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
}

impl From<addresses::Model> for Address {
    fn from(model: addresses::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            name: model.name,
            city: model.city,
            quartier: model.quartier,
            description: model.description,
            phone: model.phone,
            is_default: model.is_default,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}
