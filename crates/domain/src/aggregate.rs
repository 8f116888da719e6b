//! Aggregate root base: event accumulation shared by every aggregate.

use crate::event::{DomainEvent, EventPayload};

/// Buffer of domain events raised by an aggregate and not yet dispatched.
///
/// Events stay here until an orchestrator drains them with
/// [`Aggregate::pull_events`] after a successful commit.
#[derive(Debug, Clone, Default)]
pub struct EventBuffer {
    events: Vec<DomainEvent>,
}

impl EventBuffer {
    /// Creates an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an event.
    pub fn raise(&mut self, event: DomainEvent) {
        self.events.push(event);
    }

    /// Returns every buffered event and leaves the buffer empty.
    pub fn pull(&mut self) -> Vec<DomainEvent> {
        std::mem::take(&mut self.events)
    }

    /// Drops every buffered event.
    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Returns the buffered events without draining them.
    pub fn pending(&self) -> &[DomainEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// Trait for aggregate roots.
///
/// An aggregate is a cluster of domain objects treated as one consistency and
/// persistence unit. Aggregates never hold references into each other; they
/// refer to one another by identifier only.
///
/// State-changing methods validate their invariants first and only then
/// mutate and [`raise`](Aggregate::raise) an event, so a failed call leaves
/// the aggregate untouched.
pub trait Aggregate: Send + Sync {
    /// The identifier type of this aggregate.
    type Id: std::fmt::Display + Copy;

    /// Returns the aggregate type name carried by every raised event.
    fn aggregate_type() -> &'static str;

    /// Returns the aggregate's identifier.
    fn id(&self) -> Self::Id;

    /// Returns the buffer of undispatched events.
    fn event_buffer(&self) -> &EventBuffer;

    /// Returns the buffer of undispatched events for mutation.
    fn event_buffer_mut(&mut self) -> &mut EventBuffer;

    /// Wraps a payload in an event envelope and buffers it.
    fn raise(&mut self, payload: impl Into<EventPayload>)
    where
        Self: Sized,
    {
        let event = DomainEvent::new(
            Self::aggregate_type(),
            self.id().to_string(),
            payload.into(),
        );
        self.event_buffer_mut().raise(event);
    }

    /// Drains the buffered events.
    fn pull_events(&mut self) -> Vec<DomainEvent> {
        self.event_buffer_mut().pull()
    }

    /// Returns the buffered events without draining them.
    fn pending_events(&self) -> &[DomainEvent] {
        self.event_buffer().pending()
    }

    /// Returns true if events are waiting to be dispatched.
    fn has_pending_events(&self) -> bool {
        !self.event_buffer().is_empty()
    }
}
