use sea_orm::entity::prelude::*;

use crate::domain::catalog::{ProductCategory, ProductSize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
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
    #[sea_orm(column_type = "Double")]
    pub rating: f64,
    pub delivery_time: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
