use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::catalog::ProductSize;

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddToCartRequest {
    pub product_id: Uuid,
    /// 1 to 1000; merged lines are capped at 1000 as well.
    pub quantity: i32,
    #[serde(default)]
    pub size: ProductSize,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateCartItemRequest {
    /// Zero or less removes the line; at most 1000.
    pub quantity: i32,
    #[serde(default)]
    pub size: ProductSize,
}

#[derive(Debug, Deserialize)]
pub struct RemoveCartItemQuery {
    #[serde(default)]
    pub size: ProductSize,
}
