//! Order line items.

use common::{Money, MoneyError, OrderItemId, ProductId};
use serde::{Deserialize, Serialize};

use super::OrderError;

/// A line of an order.
///
/// Name and unit price are snapshots taken when the line was added, so a
/// later price change in the store never alters an existing order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    id: OrderItemId,
    product_id: ProductId,
    name: String,
    quantity: u32,
    unit_price: Money,
}

impl OrderItem {
    pub fn new(
        product_id: ProductId,
        name: impl Into<String>,
        quantity: u32,
        unit_price: Money,
    ) -> Result<Self, OrderError> {
        if quantity == 0 {
            return Err(OrderError::InvalidQuantity { quantity });
        }

        let item = Self {
            id: OrderItemId::new(),
            product_id,
            name: name.into(),
            quantity,
            unit_price,
        };
        item.total()?;
        Ok(item)
    }

    /// Returns unit price times quantity.
    pub fn total(&self) -> Result<Money, MoneyError> {
        self.unit_price.multiply(self.quantity)
    }

    pub(crate) fn with_quantity(&self, quantity: u32) -> Result<Self, OrderError> {
        if quantity == 0 {
            return Err(OrderError::InvalidQuantity { quantity });
        }
        let item = Self {
            quantity,
            ..self.clone()
        };
        item.total()?;
        Ok(item)
    }

    pub fn id(&self) -> OrderItemId {
        self.id
    }

    pub fn product_id(&self) -> ProductId {
        self.product_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn unit_price(&self) -> &Money {
        &self.unit_price
    }

    /// Returns the immutable copy carried by events.
    pub fn snapshot(&self) -> Result<OrderItemSnapshot, MoneyError> {
        Ok(OrderItemSnapshot {
            product_id: self.product_id,
            name: self.name.clone(),
            quantity: self.quantity,
            unit_price: self.unit_price.clone(),
            total: self.total()?,
        })
    }
}

/// Immutable view of an order line at the time an event was raised.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItemSnapshot {
    pub product_id: ProductId,
    pub name: String,
    pub quantity: u32,
    pub unit_price: Money,
    pub total: Money,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usd(amount: i64) -> Money {
        Money::new(amount, "USD").unwrap()
    }

    #[test]
    fn test_item_total() {
        let item = OrderItem::new(ProductId::new(), "Lemonade", 3, usd(299)).unwrap();
        assert_eq!(item.total().unwrap(), usd(897));
    }

    #[test]
    fn test_zero_quantity_rejected() {
        let err = OrderItem::new(ProductId::new(), "Lemonade", 0, usd(299)).unwrap_err();
        assert_eq!(err, OrderError::InvalidQuantity { quantity: 0 });
    }

    #[test]
    fn test_overflowing_total_rejected() {
        let huge = Money::new(i64::MAX, "USD").unwrap();
        assert!(matches!(
            OrderItem::new(ProductId::new(), "Lemonade", 2, huge),
            Err(OrderError::Money(MoneyError::Overflow))
        ));
    }

    #[test]
    fn test_with_quantity_keeps_identity_and_price() {
        let item = OrderItem::new(ProductId::new(), "Lemonade", 1, usd(299)).unwrap();
        let bigger = item.with_quantity(4).unwrap();
        assert_eq!(bigger.id(), item.id());
        assert_eq!(bigger.unit_price(), item.unit_price());
        assert_eq!(bigger.quantity(), 4);
    }

    #[test]
    fn test_snapshot() {
        let item = OrderItem::new(ProductId::new(), "Lemonade", 2, usd(349)).unwrap();
        let snapshot = item.snapshot().unwrap();
        assert_eq!(snapshot.product_id, item.product_id());
        assert_eq!(snapshot.total, usd(698));
    }
}
