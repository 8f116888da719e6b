//! Order aggregate implementation.

use chrono::{DateTime, Utc};
use common::{CustomerId, Money, OrderId, OrderItemId, ProductId, StoreId};
use serde::{Deserialize, Serialize};

use crate::aggregate::{Aggregate, EventBuffer};

use super::{
    OrderError, OrderEvent, OrderItem, OrderItemSnapshot, OrderStatus,
    events::{
        OrderCancelledData, OrderCompletedData, OrderConfirmedData, OrderCreatedData,
        OrderPreparationStartedData, OrderReadyData,
    },
};

/// Order aggregate root.
///
/// Represents an order in the system with its full lifecycle from placement
/// to completion or cancellation. The total always equals the sum of the item
/// totals, and items can only change while the order is pending.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    id: OrderId,
    customer_id: CustomerId,
    store_id: StoreId,

    /// Lines in the order they were first added.
    items: Vec<OrderItem>,

    status: OrderStatus,
    total_amount: Money,
    placed_at: DateTime<Utc>,

    /// Set once the order is cancelled.
    cancellation_reason: Option<String>,

    #[serde(skip)]
    events: EventBuffer,
}

impl Aggregate for Order {
    type Id = OrderId;

    fn aggregate_type() -> &'static str {
        "Order"
    }

    fn id(&self) -> OrderId {
        self.id
    }

    fn event_buffer(&self) -> &EventBuffer {
        &self.events
    }

    fn event_buffer_mut(&mut self) -> &mut EventBuffer {
        &mut self.events
    }
}

impl Order {
    /// Places a new, empty order priced in `currency`.
    pub fn new(
        customer_id: CustomerId,
        store_id: StoreId,
        currency: &str,
    ) -> Result<Self, OrderError> {
        let total_amount = Money::zero(currency)?;
        let placed_at = Utc::now();

        let mut order = Self {
            id: OrderId::new(),
            customer_id,
            store_id,
            items: Vec::new(),
            status: OrderStatus::Pending,
            total_amount,
            placed_at,
            cancellation_reason: None,
            events: EventBuffer::new(),
        };

        order.raise(OrderEvent::OrderCreated(OrderCreatedData {
            order_id: order.id,
            customer_id,
            store_id,
            placed_at,
        }));

        Ok(order)
    }

    // =========================================================================
    // Items
    // =========================================================================

    /// Adds a line, or increases the quantity of the existing line for the
    /// same product. Returns the id of the affected line.
    pub fn add_item(
        &mut self,
        product_id: ProductId,
        name: &str,
        quantity: u32,
        unit_price: Money,
    ) -> Result<OrderItemId, OrderError> {
        self.ensure_items_modifiable()?;
        if quantity == 0 {
            return Err(OrderError::InvalidQuantity { quantity });
        }

        let mut items = self.items.clone();
        let item_id = match items.iter_mut().find(|i| i.product_id() == product_id) {
            Some(existing) => {
                let merged = existing
                    .quantity()
                    .checked_add(quantity)
                    .ok_or(OrderError::InvalidQuantity { quantity })?;
                *existing = existing.with_quantity(merged)?;
                existing.id()
            }
            None => {
                let item = OrderItem::new(product_id, name, quantity, unit_price)?;
                let id = item.id();
                items.push(item);
                id
            }
        };

        self.total_amount = self.sum_items(&items)?;
        self.items = items;
        Ok(item_id)
    }

    /// Removes a line.
    pub fn remove_item(&mut self, item_id: OrderItemId) -> Result<(), OrderError> {
        self.ensure_items_modifiable()?;

        let position = self
            .items
            .iter()
            .position(|i| i.id() == item_id)
            .ok_or(OrderError::ItemNotFound { item_id })?;

        let mut items = self.items.clone();
        items.remove(position);
        self.total_amount = self.sum_items(&items)?;
        self.items = items;
        Ok(())
    }

    fn ensure_items_modifiable(&self) -> Result<(), OrderError> {
        if !self.status.can_modify_items() {
            return Err(OrderError::ItemsLocked {
                status: self.status,
            });
        }
        Ok(())
    }

    fn sum_items(&self, items: &[OrderItem]) -> Result<Money, OrderError> {
        let mut total = Money::zero(self.total_amount.currency())?;
        for item in items {
            total = total.checked_add(&item.total()?)?;
        }
        Ok(total)
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Confirms a pending order that has at least one item.
    pub fn confirm(&mut self) -> Result<(), OrderError> {
        self.ensure_transition(OrderStatus::Confirmed)?;
        if self.items.is_empty() {
            return Err(OrderError::NoItems);
        }
        let items = self.item_snapshots()?;

        self.status = OrderStatus::Confirmed;
        self.raise(OrderEvent::OrderConfirmed(OrderConfirmedData {
            order_id: self.id,
            customer_id: self.customer_id,
            store_id: self.store_id,
            total_amount: self.total_amount.clone(),
            items,
        }));
        Ok(())
    }

    /// Cancels the order. Allowed while pending, confirmed or preparing.
    pub fn cancel(&mut self, reason: &str) -> Result<(), OrderError> {
        self.ensure_transition(OrderStatus::Cancelled)?;

        let previous_status = self.status;
        self.status = OrderStatus::Cancelled;
        self.cancellation_reason = Some(reason.to_string());
        self.raise(OrderEvent::OrderCancelled(OrderCancelledData {
            order_id: self.id,
            customer_id: self.customer_id,
            store_id: self.store_id,
            reason: reason.to_string(),
            previous_status,
        }));
        Ok(())
    }

    pub fn start_preparing(&mut self) -> Result<(), OrderError> {
        self.ensure_transition(OrderStatus::Preparing)?;

        self.status = OrderStatus::Preparing;
        self.raise(OrderEvent::OrderPreparationStarted(
            OrderPreparationStartedData {
                order_id: self.id,
                store_id: self.store_id,
            },
        ));
        Ok(())
    }

    pub fn mark_ready(&mut self) -> Result<(), OrderError> {
        self.ensure_transition(OrderStatus::Ready)?;

        self.status = OrderStatus::Ready;
        self.raise(OrderEvent::OrderReady(OrderReadyData {
            order_id: self.id,
            customer_id: self.customer_id,
        }));
        Ok(())
    }

    pub fn complete(&mut self) -> Result<(), OrderError> {
        self.ensure_transition(OrderStatus::Completed)?;

        self.status = OrderStatus::Completed;
        self.raise(OrderEvent::OrderCompleted(OrderCompletedData {
            order_id: self.id,
            customer_id: self.customer_id,
            total_amount: self.total_amount.clone(),
            completed_at: Utc::now(),
        }));
        Ok(())
    }

    fn ensure_transition(&self, to: OrderStatus) -> Result<(), OrderError> {
        if !self.status.can_transition_to(to) {
            return Err(OrderError::InvalidTransition {
                from: self.status,
                to,
            });
        }
        Ok(())
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn customer_id(&self) -> CustomerId {
        self.customer_id
    }

    pub fn store_id(&self) -> StoreId {
        self.store_id
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn total_amount(&self) -> &Money {
        &self.total_amount
    }

    pub fn currency(&self) -> &str {
        self.total_amount.currency()
    }

    pub fn placed_at(&self) -> DateTime<Utc> {
        self.placed_at
    }

    pub fn cancellation_reason(&self) -> Option<&str> {
        self.cancellation_reason.as_deref()
    }

    /// Returns the lines in insertion order.
    pub fn items(&self) -> &[OrderItem] {
        &self.items
    }

    pub fn item(&self, item_id: OrderItemId) -> Option<&OrderItem> {
        self.items.iter().find(|i| i.id() == item_id)
    }

    pub fn item_for_product(&self, product_id: ProductId) -> Option<&OrderItem> {
        self.items.iter().find(|i| i.product_id() == product_id)
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn total_quantity(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity())).sum()
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    pub fn item_snapshots(&self) -> Result<Vec<OrderItemSnapshot>, OrderError> {
        self.items
            .iter()
            .map(|i| i.snapshot().map_err(OrderError::from))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usd(amount: i64) -> Money {
        Money::new(amount, "USD").unwrap()
    }

    fn new_order() -> Order {
        let mut order = Order::new(CustomerId::new(), StoreId::new(), "USD").unwrap();
        order.pull_events();
        order
    }

    fn confirmed_order() -> Order {
        let mut order = new_order();
        order
            .add_item(ProductId::new(), "Classic Lemonade", 5, usd(299))
            .unwrap();
        order.confirm().unwrap();
        order.pull_events();
        order
    }

    #[test]
    fn test_new_order_is_pending_and_empty() {
        let mut order = Order::new(CustomerId::new(), StoreId::new(), "usd").unwrap();
        assert_eq!(order.status(), OrderStatus::Pending);
        assert_eq!(order.total_amount(), &usd(0));
        assert_eq!(order.item_count(), 0);

        let events = order.pull_events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_name(), "order.created");
        assert_eq!(events[0].aggregate_id, order.id().to_string());
    }

    #[test]
    fn test_add_item_recomputes_total() {
        let mut order = new_order();
        order.add_item(ProductId::new(), "Classic", 2, usd(299)).unwrap();
        order.add_item(ProductId::new(), "Pink", 1, usd(329)).unwrap();

        assert_eq!(order.item_count(), 2);
        assert_eq!(order.total_amount(), &usd(927));
        assert_eq!(order.items()[0].name(), "Classic");
        assert_eq!(order.items()[1].name(), "Pink");
    }

    #[test]
    fn test_add_same_product_merges_line() {
        let mut order = new_order();
        let product_id = ProductId::new();
        let first = order.add_item(product_id, "Classic", 2, usd(299)).unwrap();
        let second = order.add_item(product_id, "Classic", 3, usd(299)).unwrap();

        assert_eq!(first, second);
        assert_eq!(order.item_count(), 1);
        assert_eq!(order.item(first).unwrap().quantity(), 5);
        assert_eq!(order.total_quantity(), 5);
        assert_eq!(order.total_amount(), &usd(1495));
    }

    #[test]
    fn test_add_item_rejects_zero_quantity() {
        let mut order = new_order();
        let product_id = ProductId::new();
        assert_eq!(
            order.add_item(product_id, "Classic", 0, usd(299)),
            Err(OrderError::InvalidQuantity { quantity: 0 })
        );

        order.add_item(product_id, "Classic", 1, usd(299)).unwrap();
        assert!(order.add_item(product_id, "Classic", 0, usd(299)).is_err());
        assert_eq!(order.total_amount(), &usd(299));
    }

    #[test]
    fn test_add_item_rejects_other_currency() {
        let mut order = new_order();
        let eur = Money::new(100, "EUR").unwrap();
        assert!(matches!(
            order.add_item(ProductId::new(), "Classic", 1, eur),
            Err(OrderError::Money(_))
        ));
        assert_eq!(order.item_count(), 0);
    }

    #[test]
    fn test_remove_item() {
        let mut order = new_order();
        let keep = order.add_item(ProductId::new(), "Classic", 2, usd(299)).unwrap();
        let drop = order.add_item(ProductId::new(), "Pink", 1, usd(329)).unwrap();

        order.remove_item(drop).unwrap();
        assert_eq!(order.item_count(), 1);
        assert!(order.item(keep).is_some());
        assert_eq!(order.total_amount(), &usd(598));

        assert_eq!(
            order.remove_item(drop),
            Err(OrderError::ItemNotFound { item_id: drop })
        );
    }

    #[test]
    fn test_items_locked_after_confirmation() {
        let mut order = confirmed_order();
        let item_id = order.items()[0].id();

        assert_eq!(
            order
                .add_item(ProductId::new(), "Pink", 1, usd(329))
                .unwrap_err()
                .kind(),
            crate::ErrorKind::InvalidTransition
        );
        assert!(matches!(
            order.remove_item(item_id),
            Err(OrderError::ItemsLocked {
                status: OrderStatus::Confirmed
            })
        ));
        assert_eq!(order.total_amount(), &usd(1495));
    }

    #[test]
    fn test_confirm_empty_order_fails() {
        let mut order = new_order();
        assert_eq!(order.confirm(), Err(OrderError::NoItems));
        assert_eq!(order.status(), OrderStatus::Pending);
        assert!(!order.has_pending_events());
    }

    #[test]
    fn test_confirm_carries_snapshot() {
        let mut order = new_order();
        let product_id = ProductId::new();
        order.add_item(product_id, "Classic", 5, usd(299)).unwrap();
        order.confirm().unwrap();

        let events = order.pull_events();
        assert_eq!(events.len(), 1);
        match events[0].payload.as_order() {
            Some(OrderEvent::OrderConfirmed(data)) => {
                assert_eq!(data.customer_id, order.customer_id());
                assert_eq!(data.total_amount, usd(1495));
                assert_eq!(data.items.len(), 1);
                assert_eq!(data.items[0].product_id, product_id);
                assert_eq!(data.items[0].quantity, 5);
                assert_eq!(data.items[0].total, usd(1495));
            }
            other => panic!("unexpected payload: {other:?}"),
        }
    }

    #[test]
    fn test_confirm_twice_fails() {
        let mut order = confirmed_order();
        assert_eq!(
            order.confirm(),
            Err(OrderError::InvalidTransition {
                from: OrderStatus::Confirmed,
                to: OrderStatus::Confirmed,
            })
        );
    }

    #[test]
    fn test_full_lifecycle() {
        let mut order = confirmed_order();
        order.start_preparing().unwrap();
        order.mark_ready().unwrap();
        order.complete().unwrap();

        assert_eq!(order.status(), OrderStatus::Completed);
        assert!(order.is_terminal());

        let names: Vec<_> = order
            .pull_events()
            .iter()
            .map(|e| e.event_name())
            .collect();
        assert_eq!(
            names,
            vec!["order.preparation_started", "order.ready", "order.completed"]
        );
    }

    #[test]
    fn test_cannot_skip_states() {
        let mut order = confirmed_order();
        assert!(order.mark_ready().is_err());
        assert!(order.complete().is_err());

        let mut pending = new_order();
        assert!(pending.start_preparing().is_err());
        assert_eq!(pending.status(), OrderStatus::Pending);
    }

    #[test]
    fn test_cancel_records_reason_and_previous_status() {
        let mut order = confirmed_order();
        order.cancel("customer changed their mind").unwrap();

        assert_eq!(order.status(), OrderStatus::Cancelled);
        assert_eq!(
            order.cancellation_reason(),
            Some("customer changed their mind")
        );

        let events = order.pull_events();
        match events[0].payload.as_order() {
            Some(OrderEvent::OrderCancelled(data)) => {
                assert_eq!(data.previous_status, OrderStatus::Confirmed);
                assert_eq!(data.reason, "customer changed their mind");
            }
            other => panic!("unexpected payload: {other:?}"),
        }
    }

    #[test]
    fn test_terminal_orders_reject_everything() {
        let mut cancelled = confirmed_order();
        cancelled.cancel("no longer needed").unwrap();
        assert!(cancelled.cancel("again").is_err());
        assert!(cancelled.start_preparing().is_err());
        assert!(cancelled.confirm().is_err());

        let mut completed = confirmed_order();
        completed.start_preparing().unwrap();
        completed.mark_ready().unwrap();
        completed.complete().unwrap();
        assert!(completed.cancel("too late").is_err());
        assert_eq!(completed.status(), OrderStatus::Completed);
    }

    #[test]
    fn test_ready_orders_cannot_be_cancelled() {
        let mut order = confirmed_order();
        order.start_preparing().unwrap();
        order.mark_ready().unwrap();
        assert_eq!(
            order.cancel("late").unwrap_err(),
            OrderError::InvalidTransition {
                from: OrderStatus::Ready,
                to: OrderStatus::Cancelled,
            }
        );
    }
}
