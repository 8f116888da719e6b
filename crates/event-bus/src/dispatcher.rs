//! Name-keyed event dispatcher.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;

use async_trait::async_trait;
use domain::{DomainEvent, Result};
use tokio::sync::RwLock;
use tokio::task::{JoinError, JoinSet};
use tracing::Instrument;

use crate::handler::{EventHandler, EventPublisher};

/// Routes events to the handlers subscribed under their name.
///
/// Every (event, handler) pair runs on its own tokio task, so a slow or
/// failing handler never delays the publisher or the other handlers. There
/// is no ordering between handlers and no backpressure.
#[derive(Default)]
pub struct EventDispatcher {
    handlers: RwLock<HashMap<String, Vec<Arc<dyn EventHandler>>>>,
    in_flight: Mutex<JoinSet<()>>,
}

impl EventDispatcher {
    /// Creates a dispatcher with no subscriptions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a handler under an event name. Several handlers may share a
    /// name; each receives every matching event.
    pub async fn subscribe(&self, event_name: &str, handler: Arc<dyn EventHandler>) {
        tracing::info!(event_name, handler = handler.name(), "Handler subscribed");
        self.handlers
            .write()
            .await
            .entry(event_name.to_string())
            .or_default()
            .push(handler);
    }

    /// Returns the number of handlers subscribed under a name.
    pub async fn handler_count(&self, event_name: &str) -> usize {
        self.handlers
            .read()
            .await
            .get(event_name)
            .map_or(0, Vec::len)
    }

    /// Returns the number of handler tasks not yet reaped.
    pub fn in_flight(&self) -> usize {
        self.lock_in_flight().len()
    }

    /// Waits until every handler task spawned so far, and any they spawn in
    /// turn, has finished.
    pub async fn wait_idle(&self) {
        loop {
            let mut tasks = std::mem::take(&mut *self.lock_in_flight());
            if tasks.is_empty() {
                return;
            }
            while let Some(result) = tasks.join_next().await {
                log_join_result(result);
            }
        }
    }

    fn lock_in_flight(&self) -> std::sync::MutexGuard<'_, JoinSet<()>> {
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn spawn(&self, handler: Arc<dyn EventHandler>, event: Arc<DomainEvent>) {
        let span = tracing::info_span!(
            "event_handler",
            handler = handler.name(),
            event_name = event.event_name(),
            event_id = %event.event_id,
        );

        let task = async move {
            let start = Instant::now();
            match handler.handle(&event).await {
                Ok(()) => {
                    tracing::debug!("Event handled");
                }
                Err(e) => {
                    tracing::error!(error = %e, "Event handler failed");
                    metrics::counter!("event_handler_failures_total", "handler" => handler.name())
                        .increment(1);
                }
            }
            metrics::histogram!("event_handler_duration_seconds", "handler" => handler.name())
                .record(start.elapsed().as_secs_f64());
        }
        .instrument(span);

        let mut tasks = self.lock_in_flight();
        while let Some(result) = tasks.try_join_next() {
            log_join_result(result);
        }
        tasks.spawn(task);
    }
}

fn log_join_result(result: std::result::Result<(), JoinError>) {
    if let Err(e) = result {
        tracing::error!(error = %e, "Event handler task panicked");
        metrics::counter!("event_handler_failures_total", "handler" => "panicked").increment(1);
    }
}

#[async_trait]
impl EventPublisher for EventDispatcher {
    #[tracing::instrument(skip(self, events), fields(count = events.len()))]
    async fn publish(&self, events: Vec<DomainEvent>) -> Result<()> {
        let handlers = self.handlers.read().await;

        for event in events {
            let name = event.event_name();
            metrics::counter!("events_published_total", "event" => name).increment(1);

            let Some(subscribed) = handlers.get(name) else {
                tracing::trace!(event_name = name, "No handlers subscribed");
                continue;
            };

            let event = Arc::new(event);
            for handler in subscribed {
                self.spawn(Arc::clone(handler), Arc::clone(&event));
            }
        }

        Ok(())
    }
}
