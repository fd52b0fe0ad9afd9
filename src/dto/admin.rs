use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    domain::stats::OrderStatusCounts,
    models::{User, UserSummary},
};

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct UserList {
    #[schema(value_type = Vec<User>)]
    pub items: Vec<User>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DriverList {
    pub drivers: Vec<UserSummary>,
    pub total: usize,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AdminStats {
    pub orders: OrderStatusCounts,
    pub users: i64,
    pub products: i64,
    /// Sum of totals over delivered orders, in XAF.
    pub revenue: i64,
}
