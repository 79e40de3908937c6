//! Reward application.
//!
//! Mechanical effects of a choice land on the player's resources here. Spawn
//! directives are not applied; the spawn chain consumes them afterwards.

use chronicle_content::domain::outcomes::{ChoiceReward, Outcome};
use chronicle_content::domain::resources::PlayerResources;
use chronicle_core::error::DomainError;

use crate::domain::scene::Scene;

/// Applies a reward's outcomes to a player's holdings.
pub trait RewardApplicator: Send + Sync {
    /// Applies every outcome of `reward` in order.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ContentDefect` if an outcome cannot be applied
    /// in the context of `scene`.
    fn apply(
        &self,
        reward: &ChoiceReward,
        scene: &Scene,
        resources: &mut PlayerResources,
    ) -> Result<(), DomainError>;
}

/// Applies outcomes directly to `PlayerResources`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResourceRewardApplicator;

impl RewardApplicator for ResourceRewardApplicator {
    fn apply(
        &self,
        reward: &ChoiceReward,
        scene: &Scene,
        resources: &mut PlayerResources,
    ) -> Result<(), DomainError> {
        for outcome in &reward.outcomes {
            match outcome {
                Outcome::GrantStat { stat, amount } => resources.stats.grant(*stat, *amount),
                Outcome::Coins { delta } => resources.adjust_coins(*delta),
                Outcome::CoinsFromParameter { key } => {
                    resources.adjust_coins(parameter_amount(scene, key)?);
                }
                Outcome::Health { delta } => resources.adjust_health(*delta),
                Outcome::Stamina { delta } => resources.adjust_stamina(*delta),
                Outcome::Resolve { delta } => resources.adjust_resolve(*delta),
                Outcome::SetFlag { flag } => {
                    resources.flags.insert(flag.clone());
                }
                Outcome::ClearFlag { flag } => {
                    resources.flags.remove(flag);
                }
            }
        }
        Ok(())
    }
}

/// Reads an integer spawn parameter of the scene being played.
fn parameter_amount(scene: &Scene, key: &str) -> Result<i32, DomainError> {
    let raw = scene.parameter(key).ok_or_else(|| {
        DomainError::ContentDefect(format!(
            "template {} pays from parameter {key}, which scene {} was not spawned with",
            scene.template_id(),
            scene.id
        ))
    })?;
    raw.trim().parse().map_err(|_| {
        DomainError::ContentDefect(format!(
            "parameter {key} of scene {} is not a whole number: {raw:?}",
            scene.id
        ))
    })
}
