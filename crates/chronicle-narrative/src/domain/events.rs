//! Domain events for the Narrative context.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use chronicle_content::domain::archetypes::{ArchetypeCategory, RhythmPattern, SceneArchetype};
use chronicle_content::domain::templates::StoryCategory;
use chronicle_core::event::{Envelope, EventKind};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::situation::Situation;

/// Emitted when a provisional scene is created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneCreated {
    pub scene_id: Uuid,
    pub player_id: Uuid,
    pub template_id: String,
    pub situation_count: usize,
    /// Carried verbatim from the spawning reward.
    pub parameters: BTreeMap<String, String>,
    pub main_story_sequence: Option<u32>,
    pub story_category: StoryCategory,
    pub category: Option<ArchetypeCategory>,
    pub archetype: SceneArchetype,
    pub rhythm: RhythmPattern,
    pub expires_on: Option<NaiveDate>,
}

/// Emitted when a scene's situations are materialised.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneFinalized {
    pub scene_id: Uuid,
    /// Every situation, in template order.
    pub situations: Vec<Situation>,
}

/// Emitted when a situation receives its prose.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SituationDescribed {
    pub situation_index: usize,
    pub description: String,
}

/// Emitted when the player commits to a choice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChoiceResolved {
    pub situation_index: usize,
    pub choice_id: String,
    pub challenge_succeeded: Option<bool>,
}

/// Emitted when a situation is finished.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SituationCompleted {
    pub situation_index: usize,
}

/// Emitted when the last situation of a scene is finished.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneCompleted {
    pub scene_id: Uuid,
}

/// Emitted when a provisional scene is thrown away.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneDiscarded {
    pub scene_id: Uuid,
}

/// Event payload variants for the Narrative context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SceneEventKind {
    SceneCreated(SceneCreated),
    SceneFinalized(SceneFinalized),
    SituationDescribed(SituationDescribed),
    ChoiceResolved(ChoiceResolved),
    SituationCompleted(SituationCompleted),
    SceneCompleted(SceneCompleted),
    SceneDiscarded(SceneDiscarded),
}

impl EventKind for SceneEventKind {
    fn event_type(&self) -> &'static str {
        match self {
            Self::SceneCreated(_) => "scene.created",
            Self::SceneFinalized(_) => "scene.finalized",
            Self::SituationDescribed(_) => "scene.situation_described",
            Self::ChoiceResolved(_) => "scene.choice_resolved",
            Self::SituationCompleted(_) => "scene.situation_completed",
            Self::SceneCompleted(_) => "scene.completed",
            Self::SceneDiscarded(_) => "scene.discarded",
        }
    }
}

/// Domain event envelope for the Narrative context.
pub type SceneEvent = Envelope<SceneEventKind>;
