//! Order cancellation with inventory compensation.

use common::ProductId;
use domain::{Aggregate, DomainEvent, Order, Result};
use event_bus::EventPublisher;
use repository::{OrderRepository, StoreRepository, UnitOfWork, UnitOfWorkFactory};

use crate::commands::CancelOrder;
use crate::transaction::{finish, publish_committed};

/// Stock put back into the store for one order line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleasedItem {
    pub product_id: ProductId,
    pub quantity: u32,
}

/// An order line whose stock could not be put back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedRelease {
    pub product_id: ProductId,
    pub quantity: u32,
    pub error: String,
}

/// Result of a cancellation.
#[derive(Debug, Clone)]
pub struct CancellationOutcome {
    /// The cancelled order as committed.
    pub order: Order,
    pub released: Vec<ReleasedItem>,

    /// Lines left for manual reconciliation. The order is cancelled
    /// regardless.
    pub failed_releases: Vec<FailedRelease>,
}

impl CancellationOutcome {
    /// Returns true if every reserved line went back into stock.
    pub fn fully_compensated(&self) -> bool {
        self.failed_releases.is_empty()
    }
}

/// Cancels orders.
///
/// If the order had been confirmed, its reserved quantities go back into the
/// store through the ordinary add-inventory path. A line that cannot be
/// released is recorded and the remaining lines are still processed; the
/// cancellation itself always stands. The cancelled order is saved before
/// any stock is released. Locks are taken order first, then store.
pub struct CancelOrderHandler<F, P> {
    uow_factory: F,
    publisher: P,
}

impl<F, P> CancelOrderHandler<F, P>
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

    #[tracing::instrument(skip(self, cmd), fields(order_id = %cmd.order_id))]
    pub async fn handle(&self, cmd: CancelOrder) -> Result<CancellationOutcome> {
        let uow = self.uow_factory.create();
        uow.begin()?;
        let cancelled = self.cancel(&uow, &cmd).await;
        let (outcome, events) = finish(&uow, cancelled)?;

        publish_committed(&self.publisher, events).await;

        metrics::counter!("orders_cancelled_total").increment(1);
        if outcome.fully_compensated() {
            tracing::info!(
                released = outcome.released.len(),
                reason = %cmd.reason,
                "Order cancelled"
            );
        } else {
            tracing::warn!(
                released = outcome.released.len(),
                failed = outcome.failed_releases.len(),
                reason = %cmd.reason,
                "Order cancelled with unreleased stock"
            );
        }
        Ok(outcome)
    }

    async fn cancel(
        &self,
        uow: &F::Uow,
        cmd: &CancelOrder,
    ) -> Result<(CancellationOutcome, Vec<DomainEvent>)> {
        let _order_lock = uow.orders().lock(cmd.order_id).await;
        let mut order = uow.orders().find_by_id(cmd.order_id).await?;

        let held_stock = order.status().holds_reservation();
        order.cancel(&cmd.reason)?;

        // Persisted before any stock moves: a retry after a failed write
        // finds the order still cancellable and nothing released twice.
        uow.orders().save(&order).await?;

        let mut released = Vec::new();
        let mut failed_releases = Vec::new();
        let mut store_events = Vec::new();

        if held_stock {
            let _store_lock = uow.stores().lock(order.store_id()).await;
            match uow.stores().find_by_id(order.store_id()).await {
                Ok(mut store) => {
                    for item in order.items() {
                        match store.add_inventory(item.product_id(), item.quantity()) {
                            Ok(()) => released.push(ReleasedItem {
                                product_id: item.product_id(),
                                quantity: item.quantity(),
                            }),
                            Err(e) => failed_releases.push(release_failed(
                                item.product_id(),
                                item.quantity(),
                                e.to_string(),
                            )),
                        }
                    }

                    match uow.stores().save(&store).await {
                        Ok(()) => store_events = store.pull_events(),
                        Err(e) => {
                            let error = e.to_string();
                            failed_releases.extend(released.drain(..).map(|r| {
                                release_failed(r.product_id, r.quantity, error.clone())
                            }));
                        }
                    }
                }
                Err(e) => {
                    let error = e.to_string();
                    failed_releases.extend(
                        order
                            .items()
                            .iter()
                            .map(|i| release_failed(i.product_id(), i.quantity(), error.clone())),
                    );
                }
            }
        }

        let mut events = order.pull_events();
        events.extend(store_events);
        Ok((
            CancellationOutcome {
                order,
                released,
                failed_releases,
            },
            events,
        ))
    }
}

fn release_failed(product_id: ProductId, quantity: u32, error: String) -> FailedRelease {
    tracing::warn!(%product_id, quantity, error = %error, "Failed to release reserved stock");
    metrics::counter!("inventory_release_failures_total").increment(1);
    FailedRelease {
        product_id,
        quantity,
        error,
    }
}
