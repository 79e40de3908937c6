//! Domain error types.

use thiserror::Error;
use uuid::Uuid;

/// Top-level domain error type.
#[derive(Debug, Error)]
pub enum DomainError {
    /// An aggregate was not found.
    #[error("aggregate not found: {0}")]
    AggregateNotFound(Uuid),

    /// Optimistic concurrency conflict.
    #[error("concurrency conflict on aggregate {aggregate_id}: expected version {expected}, found {actual}")]
    ConcurrencyConflict {
        /// The aggregate that had the conflict.
        aggregate_id: Uuid,
        /// The expected version.
        expected: i64,
        /// The actual version found.
        actual: i64,
    },

    /// A validation error in domain logic.
    #[error("validation error: {0}")]
    Validation(String),

    /// An infrastructure/persistence error.
    #[error("infrastructure error: {0}")]
    Infrastructure(String),

    /// No template with the given id is loaded.
    #[error("template not found: {0}")]
    TemplateNotFound(String),

    /// Broken campaign content: missing fallback choice, unmapped archetype,
    /// missing chain marker, malformed package.
    #[error("content defect: {0}")]
    ContentDefect(String),

    /// A mandatory placement filter matched no live world entity.
    #[error("unresolved placement: {0}")]
    Unresolved(String),
}

impl DomainError {
    /// Returns `true` for errors caused by authored or generated content
    /// rather than by the caller or the infrastructure.
    #[must_use]
    pub fn is_content_failure(&self) -> bool {
        matches!(self, Self::ContentDefect(_) | Self::Unresolved(_))
    }
}
