//! Ingestion-time validation of scene templates.
//!
//! Runs on every template, authored or generated, before it becomes
//! queryable. A template that could soft-lock a player or break the main
//! story chain never enters the store.

use std::collections::HashSet;

use chronicle_core::error::DomainError;

use super::templates::{ChoicePathType, SceneTemplate};

/// Returns every defect found in `template`; empty when it is sound.
#[must_use]
pub fn template_defects(template: &SceneTemplate) -> Vec<String> {
    let mut defects = Vec::new();
    let id = &template.id;

    if template.situations.is_empty() {
        defects.push(format!("{id}: template has no situations"));
    }

    for situation in &template.situations {
        if situation.choices.is_empty() {
            defects.push(format!("{id}/{}: situation has no choices", situation.id));
        }

        let mut seen = HashSet::new();
        for choice in &situation.choices {
            if !seen.insert(choice.id.as_str()) {
                defects.push(format!(
                    "{id}/{}: duplicate choice id {}",
                    situation.id, choice.id
                ));
            }
            if choice.path_type == ChoicePathType::Fallback && !choice.is_accessible_by_default() {
                defects.push(format!(
                    "{id}/{}/{}: fallback choice must be free and requirement-free",
                    situation.id, choice.id
                ));
            }
        }

        if template.is_main_story() && !situation.has_accessible_choice() {
            defects.push(format!(
                "{id}/{}: main story situation has no fallback choice",
                situation.id
            ));
        }
    }

    if template.is_main_story() {
        if template.main_story_sequence.is_none() {
            defects.push(format!("{id}: main story template has no sequence number"));
        }
        if let Err(err) = template.category() {
            defects.push(format!("{id}: {err}"));
        }
        let marker_present = template.terminal_situation().is_some_and(|terminal| {
            terminal
                .choices
                .iter()
                .any(|c| c.consequence.spawns_next_main_story())
        });
        if !marker_present {
            defects.push(format!(
                "{id}: terminal situation never spawns the next main story scene"
            ));
        }
    }

    defects
}

/// Validates a template.
///
/// # Errors
///
/// Returns `DomainError::ContentDefect` listing every defect found.
pub fn validate_template(template: &SceneTemplate) -> Result<(), DomainError> {
    let defects = template_defects(template);
    if defects.is_empty() {
        Ok(())
    } else {
        Err(DomainError::ContentDefect(defects.join("; ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::archetypes::{RhythmPattern, SceneArchetype};
    use crate::domain::outcomes::{ChoiceConsequence, ChoiceReward, SceneSpawnReward};
    use crate::domain::placement::PlacementFilter;
    use crate::domain::requirements::{ChoiceCost, Requirement, RequirementFormula};
    use crate::domain::resources::Stat;
    use crate::domain::templates::{
        ChoiceTemplate, NarrativeHints, SituationTemplate, StoryCategory,
    };

    fn choice(id: &str, path_type: ChoicePathType, spawns_next: bool) -> ChoiceTemplate {
        ChoiceTemplate {
            id: id.into(),
            text: id.into(),
            path_type,
            requirement: RequirementFormula::none(),
            cost: ChoiceCost::free(),
            consequence: ChoiceConsequence::Fixed {
                reward: ChoiceReward {
                    outcomes: vec![],
                    scenes_to_spawn: if spawns_next {
                        vec![SceneSpawnReward::next_main_story()]
                    } else {
                        vec![]
                    },
                },
            },
        }
    }

    fn main_story(choices: Vec<ChoiceTemplate>) -> SceneTemplate {
        SceneTemplate {
            id: "a_story_2".into(),
            display_name: "The Archive".into(),
            story_category: StoryCategory::MainStory,
            scene_archetype: SceneArchetype::DiscoverArtifact,
            archetype_category: None,
            main_story_sequence: Some(2),
            rhythm_pattern: RhythmPattern::Building,
            placement_filter: PlacementFilter::default(),
            situations: vec![SituationTemplate {
                id: "s1".into(),
                name: "Stacks".into(),
                narrative_hints: NarrativeHints::default(),
                location_filter: None,
                npc_filter: None,
                choices,
            }],
            spawn_conditions: None,
            is_starter: false,
            expiration_days: None,
            narrative_framing: None,
            dependent_locations: vec![],
            dependent_items: vec![],
        }
    }

    #[test]
    fn test_sound_main_story_template_passes() {
        let template = main_story(vec![choice("leave", ChoicePathType::Fallback, true)]);

        assert!(validate_template(&template).is_ok());
    }

    #[test]
    fn test_missing_fallback_choice_is_rejected() {
        // Arrange
        let mut gated = choice("study", ChoicePathType::Stat, true);
        gated.requirement = RequirementFormula::single(Requirement::MinStat {
            stat: Stat::Insight,
            value: 4,
        });
        let template = main_story(vec![gated]);

        // Act
        let defects = template_defects(&template);

        // Assert
        assert_eq!(defects, vec!["a_story_2/s1: main story situation has no fallback choice"]);
    }

    #[test]
    fn test_fallback_with_cost_is_rejected() {
        let mut costly = choice("bribe", ChoicePathType::Fallback, true);
        costly.cost = ChoiceCost::coins(2);
        let template = main_story(vec![costly, choice("walk", ChoicePathType::Standard, false)]);

        let defects = template_defects(&template);

        assert!(defects.iter().any(|d| d.contains("must be free")));
    }

    #[test]
    fn test_missing_chain_marker_is_rejected() {
        let template = main_story(vec![choice("leave", ChoicePathType::Fallback, false)]);

        match validate_template(&template) {
            Err(DomainError::ContentDefect(message)) => {
                assert!(message.contains("never spawns the next main story scene"));
            }
            other => panic!("expected ContentDefect, got {other:?}"),
        }
    }

    #[test]
    fn test_unmapped_archetype_in_main_story_is_rejected() {
        let mut template = main_story(vec![choice("leave", ChoicePathType::Fallback, true)]);
        template.scene_archetype = SceneArchetype::InnLodging;

        let defects = template_defects(&template);

        assert_eq!(defects.len(), 1);
        assert!(defects[0].contains("InnLodging"));
    }

    #[test]
    fn test_side_story_needs_no_chain_marker() {
        let mut template = main_story(vec![choice("rest", ChoicePathType::Standard, false)]);
        template.story_category = StoryCategory::SideStory;
        template.main_story_sequence = None;
        template.scene_archetype = SceneArchetype::InnLodging;

        assert!(validate_template(&template).is_ok());
    }
}
