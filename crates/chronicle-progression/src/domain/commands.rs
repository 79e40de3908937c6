//! Commands for the Progression context.

use uuid::Uuid;

use super::events::CompletionRecorded;

/// Command to begin a player's story.
#[derive(Debug, Clone)]
pub struct StartProgress {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The player whose story begins.
    pub player_id: Uuid,
}

/// Command to record a completed main-story scene.
#[derive(Debug, Clone)]
pub struct RecordCompletion {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The player whose progress advances.
    pub player_id: Uuid,
    /// What was completed.
    pub completion: CompletionRecorded,
}
