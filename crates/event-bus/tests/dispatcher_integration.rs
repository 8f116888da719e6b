//! Integration tests for the event dispatcher.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use common::{CustomerId, OrderId};
use domain::order::{OrderEvent, OrderReadyData};
use domain::{DomainEvent, EventPayload, Result};
use event_bus::{EventDispatcher, EventHandler, EventPublisher};
use tokio::sync::Notify;

fn order_ready() -> DomainEvent {
    let order_id = OrderId::new();
    DomainEvent::new(
        "Order",
        order_id.to_string(),
        EventPayload::Order(OrderEvent::OrderReady(OrderReadyData {
            order_id,
            customer_id: CustomerId::new(),
        })),
    )
}

/// Blocks until the gate opens.
struct Gated {
    gate: Arc<Notify>,
    done: Arc<AtomicUsize>,
}

#[async_trait]
impl EventHandler for Gated {
    fn name(&self) -> &'static str {
        "gated"
    }

    async fn handle(&self, _event: &DomainEvent) -> Result<()> {
        self.gate.notified().await;
        self.done.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

struct Panicking;

#[async_trait]
impl EventHandler for Panicking {
    fn name(&self) -> &'static str {
        "panicking"
    }

    async fn handle(&self, _event: &DomainEvent) -> Result<()> {
        panic!("handler bug");
    }
}

struct Counting(Arc<AtomicUsize>);

#[async_trait]
impl EventHandler for Counting {
    fn name(&self) -> &'static str {
        "counting"
    }

    async fn handle(&self, _event: &DomainEvent) -> Result<()> {
        self.0.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn publish_does_not_wait_for_slow_handlers() {
    let dispatcher = EventDispatcher::new();
    let gate = Arc::new(Notify::new());
    let done = Arc::new(AtomicUsize::new(0));
    dispatcher
        .subscribe(
            "order.ready",
            Arc::new(Gated {
                gate: Arc::clone(&gate),
                done: Arc::clone(&done),
            }),
        )
        .await;

    tokio::time::timeout(Duration::from_secs(1), dispatcher.publish(vec![order_ready()]))
        .await
        .expect("publish must not block on handlers")
        .unwrap();
    assert_eq!(done.load(Ordering::SeqCst), 0);

    gate.notify_one();
    dispatcher.wait_idle().await;
    assert_eq!(done.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn panicking_handler_does_not_affect_others() {
    let dispatcher = Arc::new(EventDispatcher::new());
    let calls = Arc::new(AtomicUsize::new(0));
    dispatcher.subscribe("order.ready", Arc::new(Panicking)).await;
    dispatcher
        .subscribe("order.ready", Arc::new(Counting(Arc::clone(&calls))))
        .await;

    let publisher: Arc<dyn EventPublisher> = dispatcher.clone();
    publisher.publish(vec![order_ready()]).await.unwrap();
    dispatcher.wait_idle().await;

    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn handlers_only_see_their_event_name() {
    let dispatcher = EventDispatcher::new();
    let calls = Arc::new(AtomicUsize::new(0));
    dispatcher
        .subscribe("order.confirmed", Arc::new(Counting(Arc::clone(&calls))))
        .await;

    dispatcher
        .publish(vec![order_ready(), order_ready()])
        .await
        .unwrap();
    dispatcher.wait_idle().await;

    assert_eq!(calls.load(Ordering::SeqCst), 0);
}
