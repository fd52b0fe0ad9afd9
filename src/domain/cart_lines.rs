//! Line items shared by carts and orders.
//!
//! A line is keyed by `(product_id, size)` and carries a snapshot of the
//! product's name, image and unit price taken when it was first added.

use sea_orm::FromJsonQueryResult;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

use super::catalog::ProductSize;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct LineItem {
    pub product_id: Uuid,
    pub product_name: String,
    pub product_image: String,
    pub quantity: i32,
    pub size: ProductSize,
    /// Unit price in XAF at the time the line was created.
    pub price: i64,
}

/// Largest quantity a single cart or order line may hold.
pub const MAX_LINE_QUANTITY: i32 = 1_000;

impl LineItem {
    /// `None` when `price * quantity` does not fit in an `i64`.
    pub fn line_total(&self) -> Option<i64> {
        self.price.checked_mul(i64::from(self.quantity))
    }

    fn matches(&self, product_id: Uuid, size: ProductSize) -> bool {
        self.product_id == product_id && self.size == size
    }
}

/// Ordered line items, stored as a single JSON document column.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
#[serde(transparent)]
pub struct LineItems(pub Vec<LineItem>);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LineError {
    #[error("Item not found in cart")]
    NotFound,

    #[error("Quantity per item cannot exceed {MAX_LINE_QUANTITY}")]
    QuantityLimit,

    #[error("Cart total is too large")]
    Overflow,
}

impl LineItems {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LineItem> {
        self.0.iter()
    }

    pub fn into_vec(self) -> Vec<LineItem> {
        self.0
    }

    /// Sum of `price * quantity` over every line.
    pub fn subtotal(&self) -> Result<i64, LineError> {
        self.0.iter().try_fold(0i64, |acc, line| {
            line.line_total()
                .and_then(|total| acc.checked_add(total))
                .ok_or(LineError::Overflow)
        })
    }

    /// Add a line, merging into an existing `(product_id, size)` line if present.
    /// The existing snapshot is kept; only the quantity grows.
    /// A merge that would push the line past [`MAX_LINE_QUANTITY`] is rejected.
    pub fn add(&mut self, line: LineItem) -> Result<(), LineError> {
        match self
            .0
            .iter_mut()
            .find(|existing| existing.matches(line.product_id, line.size))
        {
            Some(existing) => {
                existing.quantity = checked_quantity(existing.quantity.checked_add(line.quantity))?;
            }
            None => {
                checked_quantity(Some(line.quantity))?;
                self.0.push(line);
            }
        }
        Ok(())
    }

    /// Set a line's quantity exactly; zero or less removes it.
    pub fn set_quantity(
        &mut self,
        product_id: Uuid,
        size: ProductSize,
        quantity: i32,
    ) -> Result<(), LineError> {
        let index = self
            .0
            .iter()
            .position(|line| line.matches(product_id, size))
            .ok_or(LineError::NotFound)?;
        if quantity <= 0 {
            self.0.remove(index);
        } else {
            self.0[index].quantity = checked_quantity(Some(quantity))?;
        }
        Ok(())
    }

    pub fn remove(&mut self, product_id: Uuid, size: ProductSize) -> Result<(), LineError> {
        let before = self.0.len();
        self.0.retain(|line| !line.matches(product_id, size));
        if self.0.len() == before {
            return Err(LineError::NotFound);
        }
        Ok(())
    }
}

fn checked_quantity(quantity: Option<i32>) -> Result<i32, LineError> {
    quantity
        .filter(|q| *q <= MAX_LINE_QUANTITY)
        .ok_or(LineError::QuantityLimit)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(product_id: Uuid, size: ProductSize, quantity: i32, price: i64) -> LineItem {
        LineItem {
            product_id,
            product_name: "Total Gas Cylinder".into(),
            product_image: "https://img.example/total.png".into(),
            quantity,
            size,
            price,
        }
    }

    #[test]
    fn adding_same_product_and_size_merges() {
        let id = Uuid::new_v4();
        let mut items = LineItems::default();
        items.add(line(id, ProductSize::Medium, 1, 18_000)).unwrap();
        items.add(line(id, ProductSize::Medium, 2, 18_000)).unwrap();

        assert_eq!(items.len(), 1);
        assert_eq!(items.0[0].quantity, 3);
    }

    #[test]
    fn merge_keeps_the_original_price_snapshot() {
        let id = Uuid::new_v4();
        let mut items = LineItems::default();
        items.add(line(id, ProductSize::Small, 1, 10_000)).unwrap();
        items.add(line(id, ProductSize::Small, 1, 12_000)).unwrap();

        assert_eq!(items.0[0].price, 10_000);
        assert_eq!(items.subtotal(), Ok(20_000));
    }

    #[test]
    fn different_sizes_are_separate_lines() {
        let id = Uuid::new_v4();
        let mut items = LineItems::default();
        items.add(line(id, ProductSize::Small, 1, 10_000)).unwrap();
        items.add(line(id, ProductSize::Large, 1, 23_000)).unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(items.subtotal(), Ok(33_000));
    }

    #[test]
    fn set_quantity_sets_exactly() {
        let id = Uuid::new_v4();
        let mut items = LineItems(vec![line(id, ProductSize::Medium, 4, 1_000)]);
        items.set_quantity(id, ProductSize::Medium, 2).unwrap();
        assert_eq!(items.0[0].quantity, 2);
    }

    #[test]
    fn set_quantity_zero_or_negative_removes() {
        let id = Uuid::new_v4();
        let mut items = LineItems(vec![line(id, ProductSize::Medium, 4, 1_000)]);
        items.set_quantity(id, ProductSize::Medium, 0).unwrap();
        assert!(items.is_empty());

        let mut items = LineItems(vec![line(id, ProductSize::Medium, 4, 1_000)]);
        items.set_quantity(id, ProductSize::Medium, -3).unwrap();
        assert!(items.is_empty());
    }

    #[test]
    fn set_quantity_on_missing_line_fails() {
        let id = Uuid::new_v4();
        let mut items = LineItems(vec![line(id, ProductSize::Medium, 1, 1_000)]);
        assert_eq!(
            items.set_quantity(id, ProductSize::Large, 1),
            Err(LineError::NotFound)
        );
        assert_eq!(
            items.set_quantity(Uuid::new_v4(), ProductSize::Medium, 1),
            Err(LineError::NotFound)
        );
    }

    #[test]
    fn remove_only_touches_the_matching_size() {
        let id = Uuid::new_v4();
        let mut items = LineItems::default();
        items.add(line(id, ProductSize::Small, 1, 10_000)).unwrap();
        items.add(line(id, ProductSize::Medium, 1, 18_000)).unwrap();

        items.remove(id, ProductSize::Small).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items.0[0].size, ProductSize::Medium);
        assert_eq!(items.remove(id, ProductSize::Small), Err(LineError::NotFound));
    }

    #[test]
    fn stored_as_a_plain_json_array() {
        let id = Uuid::new_v4();
        let items = LineItems(vec![line(id, ProductSize::Large, 2, 23_000)]);
        let value = serde_json::to_value(&items).unwrap();
        assert!(value.is_array());
        assert_eq!(value[0]["size"], "large");
        assert_eq!(value[0]["quantity"], 2);
    }

    #[test]
    fn merge_past_the_line_cap_is_rejected() {
        let id = Uuid::new_v4();
        let mut items = LineItems::default();
        items.add(line(id, ProductSize::Medium, MAX_LINE_QUANTITY - 1, 6_500)).unwrap();
        assert_eq!(
            items.add(line(id, ProductSize::Medium, 2, 6_500)),
            Err(LineError::QuantityLimit)
        );
        assert_eq!(items.0[0].quantity, MAX_LINE_QUANTITY - 1);

        items.add(line(id, ProductSize::Medium, 1, 6_500)).unwrap();
        assert_eq!(items.0[0].quantity, MAX_LINE_QUANTITY);
    }

    #[test]
    fn oversized_new_line_is_rejected() {
        let mut items = LineItems::default();
        assert_eq!(
            items.add(line(Uuid::new_v4(), ProductSize::Small, i32::MAX, 1)),
            Err(LineError::QuantityLimit)
        );
        assert!(items.is_empty());
    }

    #[test]
    fn set_quantity_respects_the_line_cap() {
        let id = Uuid::new_v4();
        let mut items = LineItems(vec![line(id, ProductSize::Medium, 1, 1_000)]);
        assert_eq!(
            items.set_quantity(id, ProductSize::Medium, MAX_LINE_QUANTITY + 1),
            Err(LineError::QuantityLimit)
        );
        assert_eq!(items.0[0].quantity, 1);
    }

    #[test]
    fn huge_totals_report_overflow_instead_of_panicking() {
        let items = LineItems(vec![line(
            Uuid::new_v4(),
            ProductSize::Large,
            i32::MAX,
            5_000_000_000,
        )]);
        assert_eq!(items.subtotal(), Err(LineError::Overflow));

        let items = LineItems(vec![
            line(Uuid::new_v4(), ProductSize::Small, 1, i64::MAX),
            line(Uuid::new_v4(), ProductSize::Large, 1, 1),
        ]);
        assert_eq!(items.subtotal(), Err(LineError::Overflow));
    }
}
