//! Requirement formulas and choice costs.

use serde::{Deserialize, Serialize};

use super::resources::{PlayerResources, Stat};

/// A single numeric or flag requirement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Requirement {
    MinStat { stat: Stat, value: u32 },
    MinCoins { amount: u32 },
    MinHealth { amount: u32 },
    MinResolve { amount: u32 },
    HasFlag { flag: String },
    LacksFlag { flag: String },
}

/// Discriminant tag of a `Requirement`, used to remove requirements by kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequirementKind {
    MinStat,
    MinCoins,
    MinHealth,
    MinResolve,
    HasFlag,
    LacksFlag,
}

impl Requirement {
    /// Returns the discriminant tag.
    #[must_use]
    pub fn kind(&self) -> RequirementKind {
        match self {
            Self::MinStat { .. } => RequirementKind::MinStat,
            Self::MinCoins { .. } => RequirementKind::MinCoins,
            Self::MinHealth { .. } => RequirementKind::MinHealth,
            Self::MinResolve { .. } => RequirementKind::MinResolve,
            Self::HasFlag { .. } => RequirementKind::HasFlag,
            Self::LacksFlag { .. } => RequirementKind::LacksFlag,
        }
    }

    /// Returns `true` if `resources` meet this requirement.
    #[must_use]
    pub fn is_met_by(&self, resources: &PlayerResources) -> bool {
        match self {
            Self::MinStat { stat, value } => resources.stats.get(*stat) >= *value,
            Self::MinCoins { amount } => resources.coins >= *amount,
            Self::MinHealth { amount } => resources.health >= *amount,
            Self::MinResolve { amount } => resources.resolve >= *amount,
            Self::HasFlag { flag } => resources.flags.contains(flag),
            Self::LacksFlag { flag } => !resources.flags.contains(flag),
        }
    }

    fn scaled(&self, difficulty: u32) -> Self {
        match self {
            Self::MinStat { stat, value } => Self::MinStat {
                stat: *stat,
                value: value + difficulty,
            },
            Self::MinCoins { amount } => Self::MinCoins {
                amount: amount + difficulty,
            },
            other => other.clone(),
        }
    }
}

/// OR of AND-groups. An empty formula is satisfied by default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequirementFormula {
    #[serde(default)]
    pub any_of: Vec<Vec<Requirement>>,
}

impl RequirementFormula {
    /// A formula with no requirements.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// A formula consisting of one requirement.
    #[must_use]
    pub fn single(requirement: Requirement) -> Self {
        Self {
            any_of: vec![vec![requirement]],
        }
    }

    /// Returns `true` when the formula gates nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.any_of.iter().all(Vec::is_empty)
    }

    /// Returns `true` if any AND-group is fully met by `resources`.
    #[must_use]
    pub fn is_satisfied_by(&self, resources: &PlayerResources) -> bool {
        self.is_empty()
            || self
                .any_of
                .iter()
                .any(|group| group.iter().all(|r| r.is_met_by(resources)))
    }

    /// Returns a copy with every requirement of `kind` removed.
    #[must_use]
    pub fn without(&self, kind: RequirementKind) -> Self {
        Self {
            any_of: self
                .any_of
                .iter()
                .map(|group| {
                    group
                        .iter()
                        .filter(|r| r.kind() != kind)
                        .cloned()
                        .collect()
                })
                .collect(),
        }
    }

    /// Returns a copy with numeric thresholds raised by `difficulty`.
    #[must_use]
    pub fn scaled(&self, difficulty: u32) -> Self {
        Self {
            any_of: self
                .any_of
                .iter()
                .map(|group| group.iter().map(|r| r.scaled(difficulty)).collect())
                .collect(),
        }
    }
}

/// Resources consumed when a choice is taken.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChoiceCost {
    #[serde(default)]
    pub coins: u32,
    #[serde(default)]
    pub stamina: u32,
    #[serde(default)]
    pub health: u32,
}

impl ChoiceCost {
    /// A cost of nothing.
    #[must_use]
    pub fn free() -> Self {
        Self::default()
    }

    /// A pure coin cost.
    #[must_use]
    pub fn coins(coins: u32) -> Self {
        Self {
            coins,
            ..Self::default()
        }
    }

    /// Returns `true` when taking the choice consumes nothing.
    #[must_use]
    pub fn is_free(&self) -> bool {
        self.coins == 0 && self.stamina == 0 && self.health == 0
    }

    /// Returns `true` if `resources` can cover every component.
    #[must_use]
    pub fn is_affordable_by(&self, resources: &PlayerResources) -> bool {
        resources.coins >= self.coins
            && resources.stamina >= self.stamina
            && resources.health >= self.health
    }

    /// Deducts the cost. Callers check affordability first.
    pub fn pay(&self, resources: &mut PlayerResources) {
        resources.coins = resources.coins.saturating_sub(self.coins);
        resources.stamina = resources.stamina.saturating_sub(self.stamina);
        resources.health = resources.health.saturating_sub(self.health);
    }
}
