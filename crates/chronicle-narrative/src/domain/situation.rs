//! Materialised situations and choices.

use chronicle_content::domain::outcomes::ChoiceConsequence;
use chronicle_content::domain::placement::PersonalityType;
use chronicle_content::domain::requirements::{ChoiceCost, RequirementFormula};
use chronicle_content::domain::resources::PlayerResources;
use chronicle_content::domain::templates::{ChoicePathType, ChoiceTemplate, NarrativeHints};
use chronicle_world::domain::entities::{Location, Npc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The location a situation was bound to at finalize time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundLocation {
    pub id: Uuid,
    pub name: String,
    pub region: String,
    pub description: String,
    pub difficulty: u32,
}

impl From<&Location> for BoundLocation {
    fn from(location: &Location) -> Self {
        Self {
            id: location.id,
            name: location.name.clone(),
            region: location.region.clone(),
            description: location.description.clone(),
            difficulty: location.difficulty,
        }
    }
}

/// The NPC a situation was bound to at finalize time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundNpc {
    pub id: Uuid,
    pub name: String,
    pub personality: PersonalityType,
}

impl From<&Npc> for BoundNpc {
    fn from(npc: &Npc) -> Self {
        Self {
            id: npc.id,
            name: npc.name.clone(),
            personality: npc.personality,
        }
    }
}

/// A choice as offered to the player, already scaled to its location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    pub id: String,
    pub text: String,
    pub path_type: ChoicePathType,
    pub requirement: RequirementFormula,
    pub cost: ChoiceCost,
    pub consequence: ChoiceConsequence,
}

impl Choice {
    /// Instantiates a choice at a location of difficulty `difficulty`.
    ///
    /// Stat and coin thresholds rise by `difficulty`, Money paths that
    /// already cost coins cost two extra per level. Fallback choices are
    /// never scaled, and a free choice stays free.
    #[must_use]
    pub fn from_template(template: &ChoiceTemplate, difficulty: u32) -> Self {
        let (requirement, cost) = match template.path_type {
            ChoicePathType::Fallback => (template.requirement.clone(), template.cost),
            ChoicePathType::Money if template.cost.coins > 0 => (
                template.requirement.scaled(difficulty),
                ChoiceCost {
                    coins: template.cost.coins + 2 * difficulty,
                    ..template.cost
                },
            ),
            _ => (template.requirement.scaled(difficulty), template.cost),
        };
        Self {
            id: template.id.clone(),
            text: template.text.clone(),
            path_type: template.path_type,
            requirement,
            cost,
            consequence: template.consequence.clone(),
        }
    }

    /// Returns `true` if the player meets the requirements and can pay.
    #[must_use]
    pub fn is_available_to(&self, resources: &PlayerResources) -> bool {
        self.requirement.is_satisfied_by(resources) && self.cost.is_affordable_by(resources)
    }
}

/// One beat of an active scene.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Situation {
    /// Id of the situation template this was built from.
    pub template_id: String,
    pub name: String,
    pub narrative_hints: NarrativeHints,
    pub location: BoundLocation,
    pub npc: Option<BoundNpc>,
    /// Prose from the narrative provider; empty until narrated.
    pub description: String,
    pub choices: Vec<Choice>,
    pub completed: bool,
}

impl Situation {
    #[must_use]
    pub fn choice(&self, choice_id: &str) -> Option<&Choice> {
        self.choices.iter().find(|c| c.id == choice_id)
    }

    /// Choices the player can take right now.
    pub fn available_choices<'a>(
        &'a self,
        resources: &'a PlayerResources,
    ) -> impl Iterator<Item = &'a Choice> + 'a {
        self.choices.iter().filter(|c| c.is_available_to(resources))
    }

    /// Deterministic description used whenever no provider text is available.
    #[must_use]
    pub fn fallback_description(&self) -> String {
        match &self.npc {
            Some(npc) => format!(
                "You encounter {} at {}. {}",
                npc.name,
                self.location.name,
                personality_line(npc.personality)
            ),
            None if self.location.description.is_empty() => {
                format!("You find yourself at {}.", self.location.name)
            }
            None => format!(
                "You find yourself at {}. {}",
                self.location.name, self.location.description
            ),
        }
    }
}

fn personality_line(personality: PersonalityType) -> &'static str {
    match personality {
        PersonalityType::Devoted => "They greet you with genuine warmth and concern.",
        PersonalityType::Mercantile => {
            "They eye you with the practiced assessment of someone who deals in goods and services."
        }
        PersonalityType::Proud => "They carry themselves with unmistakable status and formality.",
        PersonalityType::Cunning => "Their gaze is sharp, calculating.",
        PersonalityType::Steadfast => "They regard you with calm, dutiful consideration.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chronicle_content::domain::requirements::Requirement;
    use chronicle_content::domain::resources::Stat;

    fn template(path_type: ChoicePathType, cost: ChoiceCost) -> ChoiceTemplate {
        ChoiceTemplate {
            id: "c".into(),
            text: "Do it".into(),
            path_type,
            requirement: RequirementFormula::single(Requirement::MinStat {
                stat: Stat::Insight,
                value: 2,
            }),
            cost,
            consequence: ChoiceConsequence::default(),
        }
    }

    fn situation(npc: Option<BoundNpc>) -> Situation {
        Situation {
            template_id: "arrival".into(),
            name: "Arrival".into(),
            narrative_hints: NarrativeHints::default(),
            location: BoundLocation {
                id: Uuid::nil(),
                name: "Abbey Ruins".into(),
                region: "Westmarch".into(),
                description: "Wind moves through the cloister.".into(),
                difficulty: 1,
            },
            npc,
            description: String::new(),
            choices: vec![],
            completed: false,
        }
    }

    #[test]
    fn test_money_path_scales_cost_and_threshold() {
        let choice = Choice::from_template(&template(ChoicePathType::Money, ChoiceCost::coins(4)), 2);

        assert_eq!(choice.cost.coins, 8);
        assert_eq!(
            choice.requirement.any_of[0][0],
            Requirement::MinStat {
                stat: Stat::Insight,
                value: 4
            }
        );
    }

    #[test]
    fn test_free_money_path_stays_free() {
        let free = ChoiceTemplate {
            requirement: RequirementFormula::none(),
            ..template(ChoicePathType::Money, ChoiceCost::free())
        };

        let choice = Choice::from_template(&free, 3);

        assert!(choice.cost.is_free());
        assert!(choice.is_available_to(&PlayerResources::depleted()));
    }

    #[test]
    fn test_stat_path_scales_threshold_only() {
        let choice = Choice::from_template(&template(ChoicePathType::Stat, ChoiceCost::coins(1)), 3);

        assert_eq!(choice.cost.coins, 1);
        assert_eq!(
            choice.requirement.any_of[0][0],
            Requirement::MinStat {
                stat: Stat::Insight,
                value: 5
            }
        );
    }

    #[test]
    fn test_fallback_is_never_scaled() {
        let fallback = ChoiceTemplate {
            requirement: RequirementFormula::none(),
            ..template(ChoicePathType::Fallback, ChoiceCost::free())
        };

        let choice = Choice::from_template(&fallback, 3);

        assert!(choice.cost.is_free());
        assert!(choice.is_available_to(&PlayerResources::depleted()));
    }

    #[test]
    fn test_fallback_description_with_npc_uses_personality_line() {
        let npc = BoundNpc {
            id: Uuid::nil(),
            name: "Mirela Voss".into(),
            personality: PersonalityType::Cunning,
        };

        assert_eq!(
            situation(Some(npc)).fallback_description(),
            "You encounter Mirela Voss at Abbey Ruins. Their gaze is sharp, calculating."
        );
    }

    #[test]
    fn test_fallback_description_without_npc_uses_location() {
        assert_eq!(
            situation(None).fallback_description(),
            "You find yourself at Abbey Ruins. Wind moves through the cloister."
        );
    }
}
