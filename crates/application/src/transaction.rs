//! Commit-then-publish helpers shared by the handlers.

use domain::{DomainEvent, Result};
use event_bus::EventPublisher;
use repository::UnitOfWork;

/// Commits the unit if the work succeeded, rolls it back otherwise.
pub(crate) fn finish<U: UnitOfWork, T>(uow: &U, outcome: Result<T>) -> Result<T> {
    match outcome {
        Ok(value) => {
            uow.commit()?;
            Ok(value)
        }
        Err(e) => {
            uow.rollback();
            Err(e)
        }
    }
}

/// Hands committed events to the publisher.
///
/// The state change is already durable at this point, so a publishing
/// failure is logged rather than returned.
pub(crate) async fn publish_committed<P: EventPublisher>(publisher: &P, events: Vec<DomainEvent>) {
    if events.is_empty() {
        return;
    }
    let count = events.len();
    if let Err(e) = publisher.publish(events).await {
        tracing::error!(error = %e, count, "Failed to publish committed events");
    }
}
