use serde::Serialize;
use utoipa::ToSchema;

use super::cart_lines::{LineError, LineItems};

/// Orders at or above this subtotal (XAF) ship for free.
pub const FREE_DELIVERY_THRESHOLD: i64 = 20_000;
/// Flat delivery fee (XAF) below the threshold.
pub const DELIVERY_FEE: i64 = 3_500;

pub fn delivery_fee_for(subtotal: i64) -> i64 {
    if subtotal >= FREE_DELIVERY_THRESHOLD {
        0
    } else {
        DELIVERY_FEE
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct Totals {
    pub subtotal: i64,
    pub delivery_fee: i64,
    pub total: i64,
}

impl Totals {
    pub fn from_subtotal(subtotal: i64) -> Self {
        let delivery_fee = delivery_fee_for(subtotal);
        Self {
            subtotal,
            delivery_fee,
            total: subtotal + delivery_fee,
        }
    }

    pub fn for_lines(lines: &LineItems) -> Result<Self, LineError> {
        let subtotal = lines.subtotal()?;
        subtotal
            .checked_add(DELIVERY_FEE)
            .ok_or(LineError::Overflow)?;
        Ok(Self::from_subtotal(subtotal))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn below_threshold_pays_flat_fee() {
        let totals = Totals::from_subtotal(18_000);
        assert_eq!(totals.delivery_fee, DELIVERY_FEE);
        assert_eq!(totals.total, 21_500);
    }

    #[test]
    fn threshold_itself_is_free() {
        let totals = Totals::from_subtotal(FREE_DELIVERY_THRESHOLD);
        assert_eq!(totals.delivery_fee, 0);
        assert_eq!(totals.total, FREE_DELIVERY_THRESHOLD);
        assert_eq!(delivery_fee_for(FREE_DELIVERY_THRESHOLD - 1), DELIVERY_FEE);
    }

    #[test]
    fn total_is_always_subtotal_plus_fee() {
        for subtotal in [0, 1, 9_500, 19_999, 20_000, 20_001, 250_000] {
            let t = Totals::from_subtotal(subtotal);
            assert_eq!(t.total, t.subtotal + t.delivery_fee);
            assert_eq!(t.delivery_fee == 0, t.subtotal >= FREE_DELIVERY_THRESHOLD);
        }
    }

    #[test]
    fn empty_cart_still_quotes_delivery() {
        let totals = Totals::for_lines(&LineItems::default()).unwrap();
        assert_eq!(totals.subtotal, 0);
        assert_eq!(totals.total, DELIVERY_FEE);
    }
}
