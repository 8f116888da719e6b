//! Prometheus exposition and metric descriptions.

use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use metrics::{Unit, describe_counter, describe_histogram};
use metrics_exporter_prometheus::PrometheusHandle;

const CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Registers help text for the metrics recorded by the command handlers and
/// the dispatcher. Call once after installing the recorder.
pub fn describe() {
    describe_counter!("orders_created_total", "Orders confirmed with stock reserved");
    describe_counter!("orders_rejected_total", "Order creations that failed, by reason");
    describe_counter!("orders_cancelled_total", "Orders cancelled");
    describe_counter!(
        "inventory_release_failures_total",
        "Order lines whose stock could not be released on cancellation"
    );
    describe_counter!("order_transitions_total", "Lifecycle transitions, by transition");
    describe_histogram!(
        "order_creation_duration_seconds",
        Unit::Seconds,
        "Time to reserve stock and confirm an order"
    );
    describe_counter!("events_published_total", "Domain events handed to the dispatcher");
    describe_counter!(
        "event_handler_failures_total",
        "Event handler invocations that failed or panicked"
    );
    describe_histogram!(
        "event_handler_duration_seconds",
        Unit::Seconds,
        "Time spent in one event handler invocation"
    );
    describe_counter!("loyalty_points_awarded_total", "Loyalty points credited");
}

/// GET /metrics
pub async fn get(State(handle): State<PrometheusHandle>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, CONTENT_TYPE)],
        handle.render(),
    )
}
