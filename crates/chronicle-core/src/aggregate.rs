//! Aggregate root abstraction.

use uuid::Uuid;

use crate::event::DomainEvent;

/// Trait for aggregate roots that reconstitute from event history.
///
/// Command methods record an event and mutate state immediately, so a
/// sequence of commands can run against one loaded instance before it is
/// saved. `apply` is reserved for replaying persisted history and advances
/// the committed version.
pub trait AggregateRoot: Send + Sync {
    /// The event type this aggregate produces and consumes.
    type Event: DomainEvent;

    /// Returns the aggregate identifier.
    fn aggregate_id(&self) -> Uuid;

    /// Returns the committed version (number of persisted events applied).
    fn version(&self) -> i64;

    /// Apply a persisted event to mutate internal state (used during reconstitution).
    fn apply(&mut self, event: &Self::Event);

    /// Returns uncommitted events produced by command handling.
    fn uncommitted_events(&self) -> &[Self::Event];

    /// Folds the uncommitted events into the committed version after persistence.
    fn mark_committed(&mut self);
}
