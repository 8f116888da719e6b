//! Loyalty point accrual from confirmed orders.

use std::sync::Arc;

use async_trait::async_trait;
use domain::order::events::ORDER_CONFIRMED;
use domain::{Aggregate, DomainEvent, Money, OrderEvent, Result};
use event_bus::{EventDispatcher, EventHandler};
use repository::CustomerRepository;

/// One point per whole currency unit of the order total.
pub fn points_for(total: &Money) -> u32 {
    u32::try_from(total.major_units()).unwrap_or(u32::MAX)
}

/// Credits loyalty points when an order is confirmed.
///
/// Runs outside the order's transaction. If the customer cannot be loaded or
/// saved the points are lost; the event is not redelivered. Accrual is
/// commutative, so confirmations may arrive in any order.
pub struct LoyaltyPointsHandler<C> {
    customers: C,
}

impl<C: CustomerRepository> LoyaltyPointsHandler<C> {
    pub fn new(customers: C) -> Self {
        Self { customers }
    }
}

#[async_trait]
impl<C: CustomerRepository> EventHandler for LoyaltyPointsHandler<C> {
    fn name(&self) -> &'static str {
        "loyalty_points"
    }

    async fn handle(&self, event: &DomainEvent) -> Result<()> {
        let Some(OrderEvent::OrderConfirmed(data)) = event.payload.as_order() else {
            tracing::debug!(event_name = event.event_name(), "Ignoring event");
            return Ok(());
        };

        let points = points_for(&data.total_amount);
        if points == 0 {
            tracing::debug!(order_id = %data.order_id, "Order total below one point");
            return Ok(());
        }

        let _customer_lock = self.customers.lock(data.customer_id).await;
        let mut customer = self.customers.find_by_id(data.customer_id).await?;
        customer.add_loyalty_points(points)?;
        self.customers.save(&customer).await?;
        customer.pull_events();

        metrics::counter!("loyalty_points_awarded_total").increment(u64::from(points));
        tracing::info!(
            customer_id = %data.customer_id,
            order_id = %data.order_id,
            points,
            total_points = customer.loyalty_points(),
            tier = %customer.tier(),
            "Loyalty points awarded"
        );
        Ok(())
    }
}

/// Subscribes the handlers every deployment runs.
pub async fn subscribe_default_handlers<C>(dispatcher: &EventDispatcher, customers: C)
where
    C: CustomerRepository + 'static,
{
    dispatcher
        .subscribe(
            ORDER_CONFIRMED,
            Arc::new(LoyaltyPointsHandler::new(customers)),
        )
        .await;
}
