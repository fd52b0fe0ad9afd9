use sea_orm::entity::prelude::*;

use crate::{
    domain::{cart_lines::LineItems, failure_reason::FailureReason, order_status::OrderStatus},
    models::PaymentMethod,
};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    #[sea_orm(column_type = "JsonBinary")]
    pub items: LineItems,
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
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    Users,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
