//! Domain events for the Progression context.

use chronicle_content::domain::archetypes::{
    ArchetypeCategory, ArchetypeIntensity, RhythmPattern, SceneArchetype,
};
use chronicle_content::domain::placement::PersonalityType;
use chronicle_core::event::{Envelope, EventKind};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Emitted when a player's story begins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressStarted {
    /// The player this progress belongs to.
    pub player_id: Uuid,
}

/// Emitted when a main-story scene completes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionRecorded {
    /// The completed scene instance.
    pub scene_id: Uuid,
    /// Template the scene was instantiated from.
    pub template_id: String,
    /// Main-story sequence of the scene.
    pub sequence: u32,
    pub archetype: SceneArchetype,
    pub category: ArchetypeCategory,
    pub intensity: ArchetypeIntensity,
    /// Rhythm the scene was played under.
    pub rhythm: RhythmPattern,
    /// Region of the scene's final situation.
    pub region: Option<String>,
    /// Personality of the final situation's NPC, if one was bound.
    pub personality: Option<PersonalityType>,
}

/// Event payload variants for the Progression context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ProgressEventKind {
    /// The story has started.
    ProgressStarted(ProgressStarted),
    /// A main-story scene has completed.
    CompletionRecorded(CompletionRecorded),
}

impl EventKind for ProgressEventKind {
    fn event_type(&self) -> &'static str {
        match self {
            Self::ProgressStarted(_) => "progress.started",
            Self::CompletionRecorded(_) => "progress.completion_recorded",
        }
    }
}

/// Domain event envelope for the Progression context.
pub type ProgressEvent = Envelope<ProgressEventKind>;
