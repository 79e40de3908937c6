//! Query handlers for the Progression context.

use chronicle_content::domain::archetypes::{RhythmPattern, SceneArchetype};
use chronicle_content::domain::placement::PersonalityType;
use chronicle_core::error::DomainError;
use chronicle_core::repository::EventRepository;
use serde::Serialize;
use uuid::Uuid;

use crate::application::command_handlers::require_progress;
use crate::domain::progress::CompletedScene;
use crate::domain::rhythm::rhythm_from_history;
use crate::domain::tier::StoryTier;

/// Read-only view of a player's progress.
#[derive(Debug, Serialize)]
pub struct ProgressView {
    pub player_id: Uuid,
    pub current_sequence: u32,
    pub last_completed_sequence: u32,
    pub tier: StoryTier,
    pub narrative_framing: String,
    pub stakes: String,
    pub pursuit_goal: String,
    /// Rhythm the next procedural scene would be selected under.
    pub next_rhythm: RhythmPattern,
    pub completed_scenes: Vec<CompletedScene>,
    pub recent_archetypes: Vec<SceneArchetype>,
    pub recent_regions: Vec<String>,
    pub recent_personality_types: Vec<PersonalityType>,
    pub unlocked_regions: Vec<String>,
    /// Current version (event count).
    pub version: i64,
}

/// Retrieves a player's progress.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` if the story never started.
/// Returns `DomainError::Infrastructure` if event deserialization fails.
pub async fn get_progress(
    player_id: Uuid,
    repo: &dyn EventRepository,
) -> Result<ProgressView, DomainError> {
    let progress = require_progress(player_id, repo).await?;
    let tier = progress.tier();
    Ok(ProgressView {
        player_id,
        current_sequence: progress.current_sequence(),
        last_completed_sequence: progress.last_completed_sequence(),
        tier,
        narrative_framing: tier.narrative_framing().to_owned(),
        stakes: tier.stakes_description().to_owned(),
        pursuit_goal: progress.pursuit_goal().to_owned(),
        next_rhythm: rhythm_from_history(&progress.intensity_history()),
        completed_scenes: progress.completed_scenes().to_vec(),
        recent_archetypes: progress.recent_archetypes(),
        recent_regions: progress.recent_regions(),
        recent_personality_types: progress.recent_personality_types(),
        unlocked_regions: progress.unlocked_regions().iter().cloned().collect(),
        version: progress.version,
    })
}
