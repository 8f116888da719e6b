//! Handler and publisher contracts.

use std::sync::Arc;

use async_trait::async_trait;
use domain::{DomainEvent, Result};

/// Reacts to one kind of domain event.
#[async_trait]
pub trait EventHandler: Send + Sync {
    /// Returns the name used in logs and metrics.
    fn name(&self) -> &'static str;

    /// Handles a single event.
    async fn handle(&self, event: &DomainEvent) -> Result<()>;
}

/// Accepts committed domain events for delivery.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Hands the events over for delivery and returns without waiting for
    /// any handler.
    async fn publish(&self, events: Vec<DomainEvent>) -> Result<()>;
}

#[async_trait]
impl<P: EventPublisher + ?Sized> EventPublisher for Arc<P> {
    async fn publish(&self, events: Vec<DomainEvent>) -> Result<()> {
        (**self).publish(events).await
    }
}
