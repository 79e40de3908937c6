//! Domain event abstractions.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::clock::Clock;
use crate::error::DomainError;
use crate::ids::IdSource;
use crate::repository::StoredEvent;

/// Metadata attached to every domain event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventMetadata {
    /// Unique event identifier.
    pub event_id: Uuid,
    /// Type name for deserialization routing.
    pub event_type: String,
    /// Aggregate/stream this event belongs to.
    pub aggregate_id: Uuid,
    /// Monotonically increasing version within the aggregate stream.
    pub sequence_number: i64,
    /// Correlation ID for tracing a command through its effects.
    pub correlation_id: Uuid,
    /// Causation ID linking this event to the event/command that caused it.
    pub causation_id: Uuid,
    /// Timestamp of event creation.
    pub occurred_at: DateTime<Utc>,
}

/// Trait that all domain events implement.
pub trait DomainEvent: Send + Sync + std::fmt::Debug {
    /// Returns the event type name (used for serialization routing).
    fn event_type(&self) -> &'static str;

    /// Serializes the event payload to JSON.
    fn to_payload(&self) -> serde_json::Value;

    /// Returns the metadata for this event.
    fn metadata(&self) -> &EventMetadata;

    /// Converts the event into its stored representation.
    fn to_stored(&self) -> StoredEvent {
        let meta = self.metadata();
        StoredEvent {
            event_id: meta.event_id,
            aggregate_id: meta.aggregate_id,
            event_type: self.event_type().to_owned(),
            payload: self.to_payload(),
            sequence_number: meta.sequence_number,
            correlation_id: meta.correlation_id,
            causation_id: meta.causation_id,
            occurred_at: meta.occurred_at,
        }
    }
}

/// Payload enum of one bounded context's events.
pub trait EventKind:
    Serialize + DeserializeOwned + Clone + std::fmt::Debug + Send + Sync
{
    /// Returns the dotted event type name, e.g. `scene.finalized`.
    fn event_type(&self) -> &'static str;
}

/// Everything needed to stamp metadata onto a new event.
#[derive(Clone, Copy)]
pub struct Stamp<'a> {
    /// Correlation ID of the command being handled.
    pub correlation_id: Uuid,
    /// Source of `occurred_at`.
    pub clock: &'a dyn Clock,
    /// Source of event ids.
    pub ids: &'a dyn IdSource,
}

impl std::fmt::Debug for Stamp<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stamp")
            .field("correlation_id", &self.correlation_id)
            .finish_non_exhaustive()
    }
}

/// Domain event envelope: metadata plus a context-specific payload.
#[derive(Debug, Clone)]
pub struct Envelope<K> {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// Event-specific payload.
    pub kind: K,
}

impl<K: EventKind> Envelope<K> {
    /// Wraps `kind` in freshly stamped metadata.
    pub fn new(aggregate_id: Uuid, sequence_number: i64, stamp: &Stamp<'_>, kind: K) -> Self {
        Self {
            metadata: EventMetadata {
                event_id: stamp.ids.next_id(),
                event_type: kind.event_type().to_owned(),
                aggregate_id,
                sequence_number,
                correlation_id: stamp.correlation_id,
                causation_id: stamp.correlation_id,
                occurred_at: stamp.clock.now(),
            },
            kind,
        }
    }

    /// Rebuilds an envelope from its stored representation.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the payload does not
    /// deserialize into `K`.
    pub fn from_stored(stored: &StoredEvent) -> Result<Self, DomainError> {
        let kind: K = serde_json::from_value(stored.payload.clone()).map_err(|e| {
            DomainError::Infrastructure(format!(
                "event deserialization failed for {}: {e}",
                stored.event_type
            ))
        })?;
        Ok(Self {
            metadata: EventMetadata {
                event_id: stored.event_id,
                event_type: stored.event_type.clone(),
                aggregate_id: stored.aggregate_id,
                sequence_number: stored.sequence_number,
                correlation_id: stored.correlation_id,
                causation_id: stored.causation_id,
                occurred_at: stored.occurred_at,
            },
            kind,
        })
    }
}

impl<K: EventKind> DomainEvent for Envelope<K> {
    fn event_type(&self) -> &'static str {
        self.kind.event_type()
    }

    fn to_payload(&self) -> serde_json::Value {
        // Serialization of derived Serialize types to Value is infallible.
        serde_json::to_value(&self.kind).expect("event payload serialization is infallible")
    }

    fn metadata(&self) -> &EventMetadata {
        &self.metadata
    }
}
