use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    domain::{failure_reason::FailureReasonInfo, stats::DriverStats},
    models::OrderWithCustomer,
};

#[derive(Debug, Serialize, ToSchema)]
pub struct DriverOrders {
    pub orders: Vec<OrderWithCustomer>,
    pub stats: DriverStats,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FailureReasonList {
    pub reasons: Vec<FailureReasonInfo>,
}
