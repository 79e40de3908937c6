//! Rewards, consequences and the scene-spawn directives that chain scenes.

use std::collections::BTreeMap;

use chronicle_core::error::DomainError;
use serde::{Deserialize, Serialize};

use super::resources::Stat;

/// A single mechanical effect of a choice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Outcome {
    GrantStat { stat: Stat, amount: u32 },
    Coins { delta: i32 },
    /// Coins whose amount is read from the owning scene's parameter bag.
    CoinsFromParameter { key: String },
    Health { delta: i32 },
    Stamina { delta: i32 },
    Resolve { delta: i32 },
    SetFlag { flag: String },
    ClearFlag { flag: String },
}

/// Directive to create another scene when a choice resolves.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneSpawnReward {
    /// Target template. May be omitted when `spawn_next_main_story_scene` is set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_id: Option<String>,
    /// Opaque key/value pairs copied verbatim into the spawned scene.
    #[serde(default)]
    pub parameters: BTreeMap<String, String>,
    /// Chain-integrity marker: spawn the next main-story sequence.
    #[serde(default)]
    pub spawn_next_main_story_scene: bool,
}

impl SceneSpawnReward {
    /// A directive that advances the main story.
    #[must_use]
    pub fn next_main_story() -> Self {
        Self {
            spawn_next_main_story_scene: true,
            ..Self::default()
        }
    }
}

/// Everything a resolved choice grants.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChoiceReward {
    #[serde(default)]
    pub outcomes: Vec<Outcome>,
    #[serde(default)]
    pub scenes_to_spawn: Vec<SceneSpawnReward>,
}

impl ChoiceReward {
    /// Returns `true` if this reward advances the main story.
    #[must_use]
    pub fn spawns_next_main_story(&self) -> bool {
        self.scenes_to_spawn
            .iter()
            .any(|s| s.spawn_next_main_story_scene)
    }
}

/// The reward of a choice, possibly split by challenge result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ChoiceConsequence {
    Fixed {
        reward: ChoiceReward,
    },
    Branching {
        on_success: ChoiceReward,
        on_failure: ChoiceReward,
    },
}

impl Default for ChoiceConsequence {
    fn default() -> Self {
        Self::Fixed {
            reward: ChoiceReward::default(),
        }
    }
}

impl ChoiceConsequence {
    /// Every reward this consequence can produce.
    pub fn rewards(&self) -> impl Iterator<Item = &ChoiceReward> {
        let (first, second) = match self {
            Self::Fixed { reward } => (reward, None),
            Self::Branching {
                on_success,
                on_failure,
            } => (on_success, Some(on_failure)),
        };
        std::iter::once(first).chain(second)
    }

    /// Returns `true` if any branch advances the main story.
    #[must_use]
    pub fn spawns_next_main_story(&self) -> bool {
        self.rewards().any(ChoiceReward::spawns_next_main_story)
    }

    /// Picks the reward for a selection.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` when a branching consequence is
    /// selected without a challenge result.
    pub fn resolve(&self, challenge_succeeded: Option<bool>) -> Result<&ChoiceReward, DomainError> {
        match (self, challenge_succeeded) {
            (Self::Fixed { reward }, _) => Ok(reward),
            (Self::Branching { on_success, .. }, Some(true)) => Ok(on_success),
            (Self::Branching { on_failure, .. }, Some(false)) => Ok(on_failure),
            (Self::Branching { .. }, None) => Err(DomainError::Validation(
                "challenge choices need a challenge result".into(),
            )),
        }
    }
}
