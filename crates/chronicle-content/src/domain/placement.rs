//! Categorical placement filters.
//!
//! Filters describe *kinds* of places and people by region, tag, difficulty,
//! safety, personality and bond level. They never name a concrete entity;
//! binding happens against the live world when a scene is finalized.

use serde::{Deserialize, Serialize};

/// NPC temperament used for placement and narrative tone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PersonalityType {
    Devoted,
    Mercantile,
    Proud,
    Cunning,
    Steadfast,
}

impl PersonalityType {
    /// All personality types, in declaration order.
    pub const ALL: [Self; 5] = [
        Self::Devoted,
        Self::Mercantile,
        Self::Proud,
        Self::Cunning,
        Self::Steadfast,
    ];
}

/// How safe a location is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LocationSafety {
    Safe,
    Neutral,
    Dangerous,
}

/// Categorical constraints on where a scene or situation takes place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacementFilter {
    /// Allowed region names; empty means any region.
    #[serde(default)]
    pub regions: Vec<String>,
    /// Tags a location must carry (all of them).
    #[serde(default)]
    pub location_tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_difficulty: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_difficulty: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub safety: Option<LocationSafety>,
    /// Tags an NPC must carry (all of them).
    #[serde(default)]
    pub npc_tags: Vec<String>,
    /// Acceptable NPC personalities; empty means any.
    #[serde(default)]
    pub personality_types: Vec<PersonalityType>,
    /// Relationship-tier bounds on the NPC's bond with the player.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_bond: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_bond: Option<i32>,
    /// Regions to prefer against. Soft: ignored when honouring it finds nothing.
    #[serde(default)]
    pub avoid_regions: Vec<String>,
}

impl PlacementFilter {
    /// Returns `true` if the region is allowed.
    #[must_use]
    pub fn allows_region(&self, region: &str) -> bool {
        self.regions.is_empty() || self.regions.iter().any(|r| r == region)
    }

    /// Returns `true` if `difficulty` is within bounds.
    #[must_use]
    pub fn allows_difficulty(&self, difficulty: u32) -> bool {
        self.min_difficulty.is_none_or(|min| difficulty >= min)
            && self.max_difficulty.is_none_or(|max| difficulty <= max)
    }

    /// Returns `true` if `bond` is within the relationship-tier bounds.
    #[must_use]
    pub fn allows_bond(&self, bond: i32) -> bool {
        self.min_bond.is_none_or(|min| bond >= min) && self.max_bond.is_none_or(|max| bond <= max)
    }

    /// Returns `true` if the personality is acceptable.
    #[must_use]
    pub fn allows_personality(&self, personality: PersonalityType) -> bool {
        self.personality_types.is_empty() || self.personality_types.contains(&personality)
    }

    /// Returns `true` if the filter constrains NPCs at all.
    #[must_use]
    pub fn wants_npc(&self) -> bool {
        !self.npc_tags.is_empty()
            || !self.personality_types.is_empty()
            || self.min_bond.is_some()
            || self.max_bond.is_some()
    }
}
