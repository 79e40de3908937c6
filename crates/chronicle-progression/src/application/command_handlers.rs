//! Command handlers for the Progression context.
//!
//! Each handler loads the player's `StoryProgress`, runs one command against
//! it and persists the resulting events.

use chronicle_core::clock::Clock;
use chronicle_core::error::DomainError;
use chronicle_core::event::Stamp;
use chronicle_core::ids::IdSource;
use chronicle_core::repository::{EventRepository, StoredEvent, replay, save};
use tracing::info;
use uuid::Uuid;

use crate::domain::commands::{RecordCompletion, StartProgress};
use crate::domain::progress::StoryProgress;

/// Result of a successfully handled command.
#[derive(Debug)]
pub struct ProgressCommandResult {
    /// The player whose progress changed.
    pub aggregate_id: Uuid,
    /// The stored events produced and persisted.
    pub stored_events: Vec<StoredEvent>,
}

/// Reconstitutes a player's progress; unstarted when no history exists.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if loading or event
/// deserialization fails.
pub async fn load_progress(
    player_id: Uuid,
    repo: &dyn EventRepository,
) -> Result<StoryProgress, DomainError> {
    let history = repo.load_events(player_id).await?;
    replay(StoryProgress::new(player_id), &history)
}

/// Reconstitutes a player's progress, requiring that the story started.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` if the player has no history.
pub async fn require_progress(
    player_id: Uuid,
    repo: &dyn EventRepository,
) -> Result<StoryProgress, DomainError> {
    let progress = load_progress(player_id, repo).await?;
    if progress.is_started() {
        Ok(progress)
    } else {
        Err(DomainError::AggregateNotFound(player_id))
    }
}

/// Handles the `StartProgress` command.
///
/// # Errors
///
/// Returns `DomainError::Validation` if the story already started, or an
/// error from loading or appending events.
pub async fn handle_start_progress(
    command: &StartProgress,
    clock: &dyn Clock,
    ids: &dyn IdSource,
    repo: &dyn EventRepository,
) -> Result<ProgressCommandResult, DomainError> {
    let mut progress = load_progress(command.player_id, repo).await?;
    progress.start(&Stamp {
        correlation_id: command.correlation_id,
        clock,
        ids,
    })?;
    let stored_events = save(repo, &mut progress).await?;

    info!(player_id = %command.player_id, "story progress started");
    Ok(ProgressCommandResult {
        aggregate_id: command.player_id,
        stored_events,
    })
}

/// Handles the `RecordCompletion` command.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` if the story never started,
/// `DomainError::Validation` if the sequence was already recorded, or an
/// error from loading or appending events.
pub async fn handle_record_completion(
    command: &RecordCompletion,
    clock: &dyn Clock,
    ids: &dyn IdSource,
    repo: &dyn EventRepository,
) -> Result<ProgressCommandResult, DomainError> {
    let mut progress = require_progress(command.player_id, repo).await?;
    progress.record_completion(
        command.completion.clone(),
        &Stamp {
            correlation_id: command.correlation_id,
            clock,
            ids,
        },
    )?;
    let stored_events = save(repo, &mut progress).await?;

    info!(
        player_id = %command.player_id,
        sequence = command.completion.sequence,
        category = %command.completion.category,
        "main story completion recorded"
    );
    Ok(ProgressCommandResult {
        aggregate_id: command.player_id,
        stored_events,
    })
}
