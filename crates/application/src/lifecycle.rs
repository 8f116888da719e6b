//! Forward progression of confirmed orders.

use common::OrderId;
use domain::{Aggregate, Order, Result};
use event_bus::EventPublisher;
use repository::{OrderRepository, UnitOfWork, UnitOfWorkFactory};

use crate::commands::OrderTransition;
use crate::transaction::{finish, publish_committed};

/// Moves orders through Preparing, Ready and Completed.
pub struct OrderLifecycleHandler<F, P> {
    uow_factory: F,
    publisher: P,
}

impl<F, P> OrderLifecycleHandler<F, P>
where
    F: UnitOfWorkFactory,
    P: EventPublisher,
{
    pub fn new(uow_factory: F, publisher: P) -> Self {
        Self {
            uow_factory,
            publisher,
        }
    }

    #[tracing::instrument(skip(self))]
    pub async fn handle(&self, order_id: OrderId, transition: OrderTransition) -> Result<Order> {
        let uow = self.uow_factory.create();
        uow.begin()?;
        let advanced = self.advance(&uow, order_id, transition).await;
        let mut order = finish(&uow, advanced)?;

        publish_committed(&self.publisher, order.pull_events()).await;

        metrics::counter!("order_transitions_total", "transition" => transition.as_str())
            .increment(1);
        tracing::info!(status = %order.status(), "Order advanced");
        Ok(order)
    }

    pub async fn start_preparing(&self, order_id: OrderId) -> Result<Order> {
        self.handle(order_id, OrderTransition::StartPreparing).await
    }

    pub async fn mark_ready(&self, order_id: OrderId) -> Result<Order> {
        self.handle(order_id, OrderTransition::MarkReady).await
    }

    pub async fn complete(&self, order_id: OrderId) -> Result<Order> {
        self.handle(order_id, OrderTransition::Complete).await
    }

    async fn advance(
        &self,
        uow: &F::Uow,
        order_id: OrderId,
        transition: OrderTransition,
    ) -> Result<Order> {
        let _order_lock = uow.orders().lock(order_id).await;
        let mut order = uow.orders().find_by_id(order_id).await?;

        match transition {
            OrderTransition::StartPreparing => order.start_preparing()?,
            OrderTransition::MarkReady => order.mark_ready()?,
            OrderTransition::Complete => order.complete()?,
        }

        uow.orders().save(&order).await?;
        Ok(order)
    }
}
