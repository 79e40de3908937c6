//! The Template Generator.
//!
//! Writes main-story templates for sequences nobody authored. A generated
//! template is serialised to package JSON and loaded through
//! `TemplateStore::load_template`, the same path authored content takes.

use std::sync::Arc;

use chronicle_content::application::store::TemplateStore;
use chronicle_content::domain::archetypes::{ArchetypeCategory, RhythmPattern};
use chronicle_content::domain::outcomes::{
    ChoiceConsequence, ChoiceReward, Outcome, SceneSpawnReward,
};
use chronicle_content::domain::package::TemplatePackage;
use chronicle_content::domain::placement::{PersonalityType, PlacementFilter};
use chronicle_content::domain::requirements::{ChoiceCost, Requirement, RequirementFormula};
use chronicle_content::domain::templates::{
    ChoicePathType, ChoiceTemplate, SceneTemplate, SituationTemplate, StoryCategory,
};
use chronicle_core::clock::Clock;
use chronicle_core::error::DomainError;
use tracing::info;

use crate::domain::beats::{Beat, beats_for};
use crate::domain::progress::StoryProgress;
use crate::domain::selection::{
    SelectionInputs, generated_rhythm, select_archetype, select_archetype_category,
};
use crate::domain::tier::StoryTier;

/// Location tag every generated scene is placed at.
pub const STORY_LOCATION_TAG: &str = "story_significant";
/// NPC tag every generated scene looks for.
pub const STORY_NPC_TAG: &str = "order_connected";

const BASE_COINS: u32 = 4;

/// Template id of generated main-story sequence `n`.
#[must_use]
pub fn generated_template_id(sequence: u32) -> String {
    format!("a_story_{sequence}")
}

/// Builds and loads procedural main-story templates.
///
/// Generated templates land in the shared store, so every player reaches the
/// same template for a given sequence.
pub struct TemplateGenerator {
    store: Arc<TemplateStore>,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for TemplateGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TemplateGenerator").finish_non_exhaustive()
    }
}

impl TemplateGenerator {
    #[must_use]
    pub fn new(store: Arc<TemplateStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Generates the template for `sequence`, loads it, and returns its id.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ContentDefect` if the built template fails
    /// ingestion, e.g. because `sequence` is already claimed.
    pub fn generate_next_template(
        &self,
        sequence: u32,
        progress: &StoryProgress,
        inputs: &SelectionInputs,
    ) -> Result<String, DomainError> {
        let template = build_template(sequence, progress, inputs);
        let package = TemplatePackage {
            package_id: format!("{}_template", template.id),
            version: None,
            generated_at: Some(self.clock.now()),
            scene_templates: vec![template],
        };
        let json = package.to_json()?;
        let template_id = self.store.load_template(&json)?;

        info!(
            template_id = %template_id,
            sequence,
            category = ?package.scene_templates[0].archetype_category,
            archetype = ?package.scene_templates[0].scene_archetype,
            rhythm = ?package.scene_templates[0].rhythm_pattern,
            "generated main story template"
        );
        Ok(template_id)
    }
}

/// Builds the template for `sequence` without loading it.
#[must_use]
pub fn build_template(
    sequence: u32,
    progress: &StoryProgress,
    inputs: &SelectionInputs,
) -> SceneTemplate {
    let category = select_archetype_category(inputs);
    let archetype = select_archetype(category, &inputs.recent_archetypes);
    let rhythm = generated_rhythm(category, inputs.rhythm_pattern);
    let tier = StoryTier::for_sequence(sequence);

    let beats = beats_for(category);
    let last = beats.len() - 1;
    let situations = beats
        .iter()
        .enumerate()
        .map(|(index, beat)| build_situation(beat, index, index == last, category, rhythm))
        .collect();

    SceneTemplate {
        id: generated_template_id(sequence),
        display_name: format!("The Path Deepens (A{sequence})"),
        story_category: StoryCategory::MainStory,
        scene_archetype: archetype,
        archetype_category: Some(category),
        main_story_sequence: Some(sequence),
        rhythm_pattern: rhythm,
        placement_filter: placement_filter(progress),
        situations,
        spawn_conditions: None,
        is_starter: false,
        expiration_days: None,
        narrative_framing: Some(tier.narrative_framing().to_owned()),
        dependent_locations: vec![],
        dependent_items: vec![],
    }
}

fn placement_filter(progress: &StoryProgress) -> PlacementFilter {
    let recent = progress.recent_personality_types();
    let mut personality_types: Vec<PersonalityType> = PersonalityType::ALL
        .into_iter()
        .filter(|p| !recent.contains(p))
        .collect();
    if personality_types.is_empty() {
        personality_types = PersonalityType::ALL.to_vec();
    }

    PlacementFilter {
        location_tags: vec![STORY_LOCATION_TAG.to_owned()],
        npc_tags: vec![STORY_NPC_TAG.to_owned()],
        personality_types,
        avoid_regions: progress.recent_regions(),
        ..PlacementFilter::default()
    }
}

fn fixed(outcomes: Vec<Outcome>) -> ChoiceConsequence {
    ChoiceConsequence::Fixed {
        reward: ChoiceReward {
            outcomes,
            scenes_to_spawn: vec![],
        },
    }
}

fn branching(on_success: Vec<Outcome>, on_failure: Vec<Outcome>) -> ChoiceConsequence {
    ChoiceConsequence::Branching {
        on_success: ChoiceReward {
            outcomes: on_success,
            scenes_to_spawn: vec![],
        },
        on_failure: ChoiceReward {
            outcomes: on_failure,
            scenes_to_spawn: vec![],
        },
    }
}

fn chain_to_next(consequence: &mut ChoiceConsequence) {
    let rewards: Vec<&mut ChoiceReward> = match consequence {
        ChoiceConsequence::Fixed { reward } => vec![reward],
        ChoiceConsequence::Branching {
            on_success,
            on_failure,
        } => vec![on_success, on_failure],
    };
    for reward in rewards {
        reward
            .scenes_to_spawn
            .push(SceneSpawnReward::next_main_story());
    }
}

#[allow(clippy::cast_possible_truncation)]
fn build_situation(
    beat: &Beat,
    index: usize,
    terminal: bool,
    category: ArchetypeCategory,
    rhythm: RhythmPattern,
) -> SituationTemplate {
    let stat = category.primary_stat();
    let threshold = 2 + index as u32;
    let key = beat.key;

    let (stat_gate, stat_reward) = match rhythm {
        RhythmPattern::Building => (
            RequirementFormula::none(),
            vec![Outcome::GrantStat { stat, amount: 1 }],
        ),
        RhythmPattern::Crisis => (
            RequirementFormula::single(Requirement::MinStat {
                stat,
                value: threshold,
            }),
            vec![Outcome::Resolve { delta: 1 }],
        ),
        RhythmPattern::Mixed => (
            RequirementFormula::single(Requirement::MinStat {
                stat,
                value: threshold,
            }),
            vec![
                Outcome::GrantStat { stat, amount: 1 },
                Outcome::Coins { delta: 2 },
            ],
        ),
    };

    let (money_cost, money_reward) = match rhythm {
        RhythmPattern::Building => (ChoiceCost::free(), vec![Outcome::Coins { delta: 3 }]),
        RhythmPattern::Crisis => (ChoiceCost::coins(BASE_COINS), vec![]),
        RhythmPattern::Mixed => (
            ChoiceCost::coins(BASE_COINS),
            vec![Outcome::GrantStat { stat, amount: 1 }],
        ),
    };

    let challenge = match rhythm {
        RhythmPattern::Building => branching(
            vec![Outcome::GrantStat { stat, amount: 2 }],
            vec![Outcome::Resolve { delta: 1 }],
        ),
        RhythmPattern::Crisis => branching(vec![], vec![Outcome::Health { delta: -2 }]),
        RhythmPattern::Mixed => branching(
            vec![
                Outcome::GrantStat { stat, amount: 1 },
                Outcome::Coins { delta: 3 },
            ],
            vec![Outcome::Health { delta: -1 }],
        ),
    };

    let fallback_reward = match rhythm {
        RhythmPattern::Crisis => vec![
            Outcome::Health { delta: -1 },
            Outcome::Resolve { delta: -1 },
        ],
        RhythmPattern::Building | RhythmPattern::Mixed => vec![],
    };

    let mut choices = vec![
        ChoiceTemplate {
            id: format!("{key}_stat"),
            text: format!("Rely on your {stat:?}"),
            path_type: ChoicePathType::Stat,
            requirement: stat_gate,
            cost: ChoiceCost::free(),
            consequence: fixed(stat_reward),
        },
        ChoiceTemplate {
            id: format!("{key}_money"),
            text: "Pay your way through".to_owned(),
            path_type: ChoicePathType::Money,
            requirement: RequirementFormula::none(),
            cost: money_cost,
            consequence: fixed(money_reward),
        },
        ChoiceTemplate {
            id: format!("{key}_challenge"),
            text: "Take the risk".to_owned(),
            path_type: ChoicePathType::Challenge,
            requirement: RequirementFormula::none(),
            cost: ChoiceCost {
                stamina: 1,
                ..ChoiceCost::free()
            },
            consequence: challenge,
        },
        ChoiceTemplate {
            id: format!("{key}_fallback"),
            text: "Take the slow, safe way".to_owned(),
            path_type: ChoicePathType::Fallback,
            requirement: RequirementFormula::none(),
            cost: ChoiceCost::free(),
            consequence: fixed(fallback_reward),
        },
    ];

    if terminal {
        for choice in &mut choices {
            chain_to_next(&mut choice.consequence);
        }
    }

    SituationTemplate {
        id: key.to_owned(),
        name: beat.name.to_owned(),
        narrative_hints: beat.narrative_hints(),
        location_filter: None,
        npc_filter: None,
        choices,
    }
}
