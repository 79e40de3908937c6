//! Event repository abstraction.

use async_trait::async_trait;
use uuid::Uuid;

use crate::aggregate::AggregateRoot;
use crate::error::DomainError;
use crate::event::{DomainEvent, Envelope, EventKind};

/// Stored representation of a domain event.
#[derive(Debug, Clone)]
pub struct StoredEvent {
    /// Unique event identifier.
    pub event_id: Uuid,
    /// Aggregate this event belongs to.
    pub aggregate_id: Uuid,
    /// Event type name for deserialization routing.
    pub event_type: String,
    /// Serialized event payload.
    pub payload: serde_json::Value,
    /// Sequence number within the aggregate stream.
    pub sequence_number: i64,
    /// Correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Causation ID linking to the causing event/command.
    pub causation_id: Uuid,
    /// Timestamp of event creation.
    pub occurred_at: chrono::DateTime<chrono::Utc>,
}

/// Repository trait for loading and appending domain events.
#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Load all events for a given aggregate, ordered by sequence number.
    async fn load_events(&self, aggregate_id: Uuid) -> Result<Vec<StoredEvent>, DomainError>;

    /// Append new events to an aggregate stream with optimistic concurrency.
    /// `expected_version` is the last known sequence number.
    async fn append_events(
        &self,
        aggregate_id: Uuid,
        expected_version: i64,
        events: &[StoredEvent],
    ) -> Result<(), DomainError>;
}

/// Replays stored history onto a freshly constructed aggregate.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if event deserialization fails.
pub fn replay<A, K>(mut aggregate: A, history: &[StoredEvent]) -> Result<A, DomainError>
where
    A: AggregateRoot<Event = Envelope<K>>,
    K: EventKind,
{
    for stored in history {
        let event = Envelope::<K>::from_stored(stored)?;
        aggregate.apply(&event);
    }
    Ok(aggregate)
}

/// Persists an aggregate's uncommitted events and folds them into its
/// committed version. Returns the stored events (empty when nothing changed).
///
/// # Errors
///
/// Returns `DomainError` if appending fails, including concurrency conflicts.
pub async fn save<A>(
    repo: &dyn EventRepository,
    aggregate: &mut A,
) -> Result<Vec<StoredEvent>, DomainError>
where
    A: AggregateRoot,
{
    let stored: Vec<StoredEvent> = aggregate
        .uncommitted_events()
        .iter()
        .map(DomainEvent::to_stored)
        .collect();
    if stored.is_empty() {
        return Ok(stored);
    }

    repo.append_events(aggregate.aggregate_id(), aggregate.version(), &stored)
        .await?;
    aggregate.mark_committed();

    Ok(stored)
}
