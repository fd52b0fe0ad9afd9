//! Pure business rules. Nothing in here touches the database or HTTP.

pub mod cart_lines;
pub mod catalog;
pub mod failure_reason;
pub mod order_status;
pub mod policy;
pub mod pricing;
pub mod stats;
