use serde::Serialize;
use utoipa::ToSchema;

use super::order_status::OrderStatus;

/// Order counts per status for the admin dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct OrderStatusCounts {
    pub total: i64,
    pub pending: i64,
    pub preparing: i64,
    pub delivering: i64,
    pub delivered: i64,
    pub cancelled: i64,
    pub failed: i64,
}

impl OrderStatusCounts {
    pub fn from_counts(rows: impl IntoIterator<Item = (OrderStatus, i64)>) -> Self {
        let mut counts = Self::default();
        for (status, count) in rows {
            counts.total += count;
            let slot = match status {
                OrderStatus::EnAttente => &mut counts.pending,
                OrderStatus::EnPreparation => &mut counts.preparing,
                OrderStatus::EnLivraison => &mut counts.delivering,
                OrderStatus::Livree => &mut counts.delivered,
                OrderStatus::Annulee => &mut counts.cancelled,
                OrderStatus::Echouee => &mut counts.failed,
            };
            *slot += count;
        }
        counts
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct DriverStats {
    pub total_assigned: i64,
    pub delivered: i64,
    pub failed: i64,
    /// Assigned orders not yet in a terminal state.
    pub in_progress: i64,
    pub total_delivered_value: i64,
}

impl DriverStats {
    /// Fold `(status, order total)` pairs for every order assigned to a driver.
    pub fn from_orders(orders: impl IntoIterator<Item = (OrderStatus, i64)>) -> Self {
        let mut stats = Self::default();
        for (status, total) in orders {
            stats.total_assigned += 1;
            match status {
                OrderStatus::Livree => {
                    stats.delivered += 1;
                    stats.total_delivered_value += total;
                }
                OrderStatus::Echouee => stats.failed += 1,
                s if !s.is_terminal() => stats.in_progress += 1,
                _ => {}
            }
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_counts_bucket_and_total() {
        let counts = OrderStatusCounts::from_counts([
            (OrderStatus::EnAttente, 3),
            (OrderStatus::Livree, 5),
            (OrderStatus::Echouee, 1),
            (OrderStatus::Annulee, 2),
        ]);
        assert_eq!(counts.total, 11);
        assert_eq!(counts.pending, 3);
        assert_eq!(counts.delivered, 5);
        assert_eq!(counts.failed, 1);
        assert_eq!(counts.cancelled, 2);
        assert_eq!(counts.preparing, 0);
    }

    #[test]
    fn driver_stats_only_value_delivered_orders() {
        let stats = DriverStats::from_orders([
            (OrderStatus::Livree, 21_500),
            (OrderStatus::Livree, 36_000),
            (OrderStatus::Echouee, 10_000),
            (OrderStatus::EnLivraison, 18_000),
            (OrderStatus::EnAttente, 9_500),
            (OrderStatus::Annulee, 4_000),
        ]);
        assert_eq!(stats.total_assigned, 6);
        assert_eq!(stats.delivered, 2);
        assert_eq!(stats.failed, 1);
        assert_eq!(stats.in_progress, 2);
        assert_eq!(stats.total_delivered_value, 57_500);
    }

    #[test]
    fn no_orders_means_zeroes() {
        assert_eq!(DriverStats::from_orders([]), DriverStats::default());
    }
}
