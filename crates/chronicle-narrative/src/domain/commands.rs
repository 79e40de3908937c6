//! Commands for the Narrative context.

use chronicle_content::domain::outcomes::SceneSpawnReward;
use chronicle_content::domain::resources::PlayerResources;
use uuid::Uuid;

/// Command to begin a player's story and spawn its starter scenes.
#[derive(Debug, Clone)]
pub struct StartStory {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    pub player_id: Uuid,
    /// Holdings checked against starter spawn conditions.
    pub resources: PlayerResources,
}

/// Command to create a provisional scene from a spawn directive.
#[derive(Debug, Clone)]
pub struct SpawnScene {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    pub player_id: Uuid,
    pub spawn: SceneSpawnReward,
    /// Main-story sequence of the spawning scene, if any.
    pub source_sequence: Option<u32>,
}

/// Command to resolve entities for a provisional scene.
#[derive(Debug, Clone)]
pub struct FinalizeScene {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    pub scene_id: Uuid,
}

/// Command to finalize a scene if needed and narrate its situations.
#[derive(Debug, Clone)]
pub struct ActivateScene {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    pub scene_id: Uuid,
}

/// Command to discard a provisional scene.
#[derive(Debug, Clone)]
pub struct DeleteProvisionalScene {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    pub scene_id: Uuid,
}

/// Command to take a choice in a scene's current situation.
#[derive(Debug, Clone)]
pub struct SelectChoice {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    pub scene_id: Uuid,
    pub choice_id: String,
    /// Outcome of the challenge roll, required for branching choices.
    pub challenge_succeeded: Option<bool>,
    /// The player's holdings before the choice.
    pub resources: PlayerResources,
}
