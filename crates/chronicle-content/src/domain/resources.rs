//! Player resource snapshot that requirements and rewards operate on.
//!
//! Inventory bookkeeping lives outside the engine; callers hand the engine a
//! `PlayerResources` value per action and receive the updated value back.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// The five player stats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stat {
    Insight,
    Rapport,
    Authority,
    Diplomacy,
    Cunning,
}

/// One field per stat; no dynamic property bag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatBlock {
    pub insight: u32,
    pub rapport: u32,
    pub authority: u32,
    pub diplomacy: u32,
    pub cunning: u32,
}

impl StatBlock {
    /// Returns the level of `stat`.
    #[must_use]
    pub fn get(&self, stat: Stat) -> u32 {
        match stat {
            Stat::Insight => self.insight,
            Stat::Rapport => self.rapport,
            Stat::Authority => self.authority,
            Stat::Diplomacy => self.diplomacy,
            Stat::Cunning => self.cunning,
        }
    }

    fn slot(&mut self, stat: Stat) -> &mut u32 {
        match stat {
            Stat::Insight => &mut self.insight,
            Stat::Rapport => &mut self.rapport,
            Stat::Authority => &mut self.authority,
            Stat::Diplomacy => &mut self.diplomacy,
            Stat::Cunning => &mut self.cunning,
        }
    }

    /// Raises `stat` by `amount`.
    pub fn grant(&mut self, stat: Stat, amount: u32) {
        let slot = self.slot(stat);
        *slot = slot.saturating_add(amount);
    }
}

/// Resources a player holds at the moment of a choice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerResources {
    pub coins: u32,
    pub health: u32,
    pub stamina: u32,
    pub resolve: u32,
    pub stats: StatBlock,
    #[serde(default)]
    pub flags: BTreeSet<String>,
}

impl PlayerResources {
    /// A player with nothing at all. Used to prove soft-lock freedom.
    #[must_use]
    pub fn depleted() -> Self {
        Self {
            coins: 0,
            health: 0,
            stamina: 0,
            resolve: 0,
            stats: StatBlock::default(),
            flags: BTreeSet::new(),
        }
    }

    /// Resources at the start of a new story.
    #[must_use]
    pub fn starting() -> Self {
        Self {
            coins: 10,
            health: 10,
            stamina: 6,
            resolve: 3,
            stats: StatBlock {
                insight: 1,
                rapport: 1,
                authority: 1,
                diplomacy: 1,
                cunning: 1,
            },
            flags: BTreeSet::new(),
        }
    }

    /// Applies a signed change to coins, saturating at zero.
    pub fn adjust_coins(&mut self, delta: i32) {
        self.coins = apply_delta(self.coins, delta);
    }

    /// Applies a signed change to health, saturating at zero.
    pub fn adjust_health(&mut self, delta: i32) {
        self.health = apply_delta(self.health, delta);
    }

    /// Applies a signed change to stamina, saturating at zero.
    pub fn adjust_stamina(&mut self, delta: i32) {
        self.stamina = apply_delta(self.stamina, delta);
    }

    /// Applies a signed change to resolve, saturating at zero.
    pub fn adjust_resolve(&mut self, delta: i32) {
        self.resolve = apply_delta(self.resolve, delta);
    }
}

fn apply_delta(value: u32, delta: i32) -> u32 {
    if delta >= 0 {
        value.saturating_add(delta.unsigned_abs())
    } else {
        value.saturating_sub(delta.unsigned_abs())
    }
}
