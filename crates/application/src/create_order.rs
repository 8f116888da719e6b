//! Order creation: reserve stock, then confirm.

use std::time::Instant;

use domain::{Aggregate, CustomerError, DomainError, Order, Result, Store};
use event_bus::EventPublisher;
use repository::{
    CustomerRepository, OrderRepository, StoreRepository, UnitOfWork, UnitOfWorkFactory,
};

use crate::commands::CreateOrder;
use crate::transaction::{finish, publish_committed};

/// Places orders.
///
/// Stock is reserved line by line, in request order, while the store is
/// locked. The first failing line aborts the whole command: nothing is
/// saved, so no partial reservation survives. The store is written before
/// the order, so a failed order write can at worst strand a reservation but
/// never leaves a confirmed order without stock behind it. Events are
/// published only after the commit.
pub struct CreateOrderHandler<F, P> {
    uow_factory: F,
    publisher: P,
}

impl<F, P> CreateOrderHandler<F, P>
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

    /// Places and confirms an order, returning its committed state.
    #[tracing::instrument(
        skip(self, cmd),
        fields(customer_id = %cmd.customer_id, store_id = %cmd.store_id, lines = cmd.items.len())
    )]
    pub async fn handle(&self, cmd: CreateOrder) -> Result<Order> {
        let start = Instant::now();

        let result = match validate(&cmd) {
            Ok(()) => {
                let uow = self.uow_factory.create();
                uow.begin()?;
                let placed = self.place(&uow, &cmd).await;
                finish(&uow, placed)
            }
            Err(e) => Err(e),
        };

        match result {
            Ok((mut order, mut store)) => {
                let mut events = order.pull_events();
                events.extend(store.pull_events());
                publish_committed(&self.publisher, events).await;

                metrics::counter!("orders_created_total").increment(1);
                metrics::histogram!("order_creation_duration_seconds")
                    .record(start.elapsed().as_secs_f64());
                tracing::info!(
                    order_id = %order.id(),
                    total = %order.total_amount(),
                    "Order created"
                );
                Ok(order)
            }
            Err(e) => {
                metrics::counter!("orders_rejected_total", "reason" => e.kind().as_str())
                    .increment(1);
                tracing::warn!(error = %e, "Order rejected");
                Err(e)
            }
        }
    }

    async fn place(&self, uow: &F::Uow, cmd: &CreateOrder) -> Result<(Order, Store)> {
        let customer = uow.customers().find_by_id(cmd.customer_id).await?;
        if !customer.is_active() {
            return Err(CustomerError::Inactive {
                customer_id: cmd.customer_id,
            }
            .into());
        }

        let _store_lock = uow.stores().lock(cmd.store_id).await;
        let mut store = uow.stores().find_by_id(cmd.store_id).await?;
        let mut order = Order::new(cmd.customer_id, store.id(), store.currency())?;

        for line in &cmd.items {
            let product = store.active_product(line.product_id)?.clone();
            store.reserve_inventory(line.product_id, line.quantity)?;
            order.add_item(
                product.id(),
                product.name().as_str(),
                line.quantity,
                product.price().clone(),
            )?;
            tracing::debug!(
                product_id = %line.product_id,
                quantity = line.quantity,
                "Stock reserved"
            );
        }

        order.confirm()?;

        // The reservation must be durable before a confirmed order exists.
        uow.stores().save(&store).await?;
        uow.orders().save(&order).await?;
        Ok((order, store))
    }
}

fn validate(cmd: &CreateOrder) -> Result<()> {
    if cmd.items.is_empty() {
        return Err(DomainError::Validation(
            "order must contain at least one item".to_string(),
        ));
    }
    if let Some(line) = cmd.items.iter().find(|l| l.quantity == 0) {
        return Err(DomainError::Validation(format!(
            "quantity for product {} must be greater than 0",
            line.product_id
        )));
    }
    Ok(())
}
