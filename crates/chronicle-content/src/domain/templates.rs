//! Scene, situation and choice templates.

use std::collections::BTreeSet;

use chronicle_core::error::DomainError;
use serde::{Deserialize, Serialize};

use super::archetypes::{ArchetypeCategory, ArchetypeIntensity, RhythmPattern, SceneArchetype};
use super::outcomes::ChoiceConsequence;
use super::placement::PlacementFilter;
use super::requirements::{ChoiceCost, RequirementFormula};
use super::resources::PlayerResources;

/// Which storyline a template belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StoryCategory {
    MainStory,
    SideStory,
    Service,
}

/// Design role of a choice within a situation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChoicePathType {
    Standard,
    Stat,
    Money,
    Challenge,
    /// Guaranteed-accessible: free and requirement-free.
    Fallback,
}

/// Hints handed to the narrative provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NarrativeHints {
    #[serde(default)]
    pub tone: String,
    #[serde(default)]
    pub theme: String,
    #[serde(default)]
    pub context: String,
}

/// Blueprint of one player-selectable option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChoiceTemplate {
    pub id: String,
    pub text: String,
    pub path_type: ChoicePathType,
    #[serde(default)]
    pub requirement: RequirementFormula,
    #[serde(default)]
    pub cost: ChoiceCost,
    #[serde(default)]
    pub consequence: ChoiceConsequence,
}

impl ChoiceTemplate {
    /// Returns `true` if the choice can be taken with zero resources.
    #[must_use]
    pub fn is_accessible_by_default(&self) -> bool {
        self.cost.is_free() && self.requirement.is_empty()
    }
}

/// Blueprint of one situation (beat) within a scene.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SituationTemplate {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub narrative_hints: NarrativeHints,
    /// Overrides the scene filter for location binding.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_filter: Option<PlacementFilter>,
    /// Overrides the scene filter for NPC binding.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub npc_filter: Option<PlacementFilter>,
    pub choices: Vec<ChoiceTemplate>,
}

impl SituationTemplate {
    /// Returns `true` if at least one choice is free and requirement-free.
    #[must_use]
    pub fn has_accessible_choice(&self) -> bool {
        self.choices.iter().any(ChoiceTemplate::is_accessible_by_default)
    }
}

/// Ambient eligibility rules. Reward-chain spawns never consult these.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpawnConditions {
    #[serde(default)]
    pub completed_templates: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_main_story_sequence: Option<u32>,
    #[serde(default)]
    pub required_flags: Vec<String>,
}

impl SpawnConditions {
    /// Returns `true` if a player with this history may see the scene.
    #[must_use]
    pub fn are_met(
        &self,
        completed_templates: &BTreeSet<String>,
        current_sequence: u32,
        resources: &PlayerResources,
    ) -> bool {
        self.completed_templates
            .iter()
            .all(|t| completed_templates.contains(t))
            && self
                .min_main_story_sequence
                .is_none_or(|min| current_sequence >= min)
            && self
                .required_flags
                .iter()
                .all(|f| resources.flags.contains(f))
    }
}

/// A sub-location the scene needs generated alongside it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DependentLocationSpec {
    pub template_id: String,
    pub name_pattern: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// An item the scene needs generated alongside it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DependentItemSpec {
    pub template_id: String,
    pub name: String,
}

/// Immutable blueprint of a scene.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneTemplate {
    pub id: String,
    pub display_name: String,
    pub story_category: StoryCategory,
    pub scene_archetype: SceneArchetype,
    /// Explicit category; derived from the archetype when omitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archetype_category: Option<ArchetypeCategory>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main_story_sequence: Option<u32>,
    pub rhythm_pattern: RhythmPattern,
    #[serde(default)]
    pub placement_filter: PlacementFilter,
    pub situations: Vec<SituationTemplate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spawn_conditions: Option<SpawnConditions>,
    #[serde(default)]
    pub is_starter: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_days: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub narrative_framing: Option<String>,
    #[serde(default)]
    pub dependent_locations: Vec<DependentLocationSpec>,
    #[serde(default)]
    pub dependent_items: Vec<DependentItemSpec>,
}

impl SceneTemplate {
    /// Returns `true` for main-story templates.
    #[must_use]
    pub fn is_main_story(&self) -> bool {
        self.story_category == StoryCategory::MainStory
    }

    /// The archetype category, explicit or derived.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ContentDefect` when the category is omitted and
    /// the archetype has no mapping.
    pub fn category(&self) -> Result<ArchetypeCategory, DomainError> {
        match self.archetype_category {
            Some(category) => Ok(category),
            None => self.scene_archetype.category(),
        }
    }

    /// Intensity recorded when this scene completes.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ContentDefect` for an unmapped archetype.
    pub fn intensity(&self) -> Result<ArchetypeIntensity, DomainError> {
        Ok(self.category()?.intensity())
    }

    /// The last situation, where the chain marker must live.
    #[must_use]
    pub fn terminal_situation(&self) -> Option<&SituationTemplate> {
        self.situations.last()
    }

    /// The filter used to bind a situation's location.
    #[must_use]
    pub fn location_filter_for(&self, situation: &SituationTemplate) -> PlacementFilter {
        situation
            .location_filter
            .clone()
            .unwrap_or_else(|| self.placement_filter.clone())
    }

    /// The filter used to bind a situation's NPC.
    #[must_use]
    pub fn npc_filter_for(&self, situation: &SituationTemplate) -> PlacementFilter {
        situation
            .npc_filter
            .clone()
            .unwrap_or_else(|| self.placement_filter.clone())
    }
}
