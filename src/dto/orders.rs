use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    domain::{failure_reason::FailureReason, order_status::OrderStatus},
    models::{Order, OrderWithCustomer, PaymentMethod},
};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CheckoutRequest {
    pub delivery_address: String,
    pub phone: String,
    #[serde(default)]
    pub payment_method: PaymentMethod,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CheckoutResponse {
    pub order_id: Uuid,
    pub total: i64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct OrderList {
    #[schema(value_type = Vec<Order>)]
    pub items: Vec<Order>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct CustomerOrderList {
    #[schema(value_type = Vec<OrderWithCustomer>)]
    pub items: Vec<OrderWithCustomer>,
}

/// Shared by the admin and driver status endpoints.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateOrderStatusRequest {
    pub status: OrderStatus,
    pub failure_reason: Option<FailureReason>,
    pub failure_details: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AssignDriverRequest {
    /// `null` clears the assignment.
    pub driver_id: Option<Uuid>,
}
