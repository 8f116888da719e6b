//! In-process event bus.
//!
//! Orchestrators hand committed domain events to an [`EventPublisher`]; the
//! [`EventDispatcher`] routes each one by name to every subscribed
//! [`EventHandler`] on its own task. Delivery is at-most-once and
//! best-effort: handler failures are logged and counted, never retried and
//! never reported back to the publisher.

pub mod dispatcher;
pub mod handler;

pub use dispatcher::EventDispatcher;
pub use handler::{EventHandler, EventPublisher};
