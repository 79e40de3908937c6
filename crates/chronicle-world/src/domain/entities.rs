//! Live world entities.

use chronicle_content::domain::placement::{LocationSafety, PersonalityType, PlacementFilter};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A place a situation can happen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub id: Uuid,
    pub name: String,
    pub region: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Mechanical difficulty, 0 (trivial) to 3 (hardest).
    #[serde(default)]
    pub difficulty: u32,
    pub safety: LocationSafety,
}

impl Location {
    /// Returns `true` if this location satisfies the hard constraints of `filter`.
    #[must_use]
    pub fn matches(&self, filter: &PlacementFilter) -> bool {
        filter.allows_region(&self.region)
            && filter
                .location_tags
                .iter()
                .all(|tag| self.tags.contains(tag))
            && filter.allows_difficulty(self.difficulty)
            && filter.safety.is_none_or(|safety| safety == self.safety)
    }
}

/// A person a situation can feature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Npc {
    pub id: Uuid,
    pub name: String,
    pub personality: PersonalityType,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Relationship level with the player.
    #[serde(default)]
    pub bond: i32,
    /// Where the NPC can usually be found.
    #[serde(default)]
    pub home_location: Option<Uuid>,
}

impl Npc {
    /// Returns `true` if this NPC satisfies the NPC constraints of `filter`.
    #[must_use]
    pub fn matches(&self, filter: &PlacementFilter) -> bool {
        filter.npc_tags.iter().all(|tag| self.tags.contains(tag))
            && filter.allows_personality(self.personality)
            && filter.allows_bond(self.bond)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn archive() -> Location {
        Location {
            id: Uuid::new_v4(),
            name: "Sunken Archive".into(),
            region: "Westmarch".into(),
            description: String::new(),
            tags: vec!["story_significant".into(), "indoor".into()],
            difficulty: 2,
            safety: LocationSafety::Neutral,
        }
    }

    #[test]
    fn test_location_needs_every_tag_and_bounds() {
        let location = archive();
        let filter = PlacementFilter {
            location_tags: vec!["story_significant".into()],
            max_difficulty: Some(2),
            safety: Some(LocationSafety::Neutral),
            ..PlacementFilter::default()
        };

        assert!(location.matches(&filter));
        assert!(!location.matches(&PlacementFilter {
            location_tags: vec!["story_significant".into(), "urban".into()],
            ..PlacementFilter::default()
        }));
        assert!(!location.matches(&PlacementFilter {
            regions: vec!["Eastreach".into()],
            ..PlacementFilter::default()
        }));
    }

    #[test]
    fn test_npc_bond_and_personality_bounds() {
        let npc = Npc {
            id: Uuid::new_v4(),
            name: "Brother Aldric".into(),
            personality: PersonalityType::Devoted,
            tags: vec!["order_connected".into()],
            bond: 1,
            home_location: None,
        };

        assert!(npc.matches(&PlacementFilter {
            npc_tags: vec!["order_connected".into()],
            personality_types: vec![PersonalityType::Devoted, PersonalityType::Proud],
            min_bond: Some(0),
            ..PlacementFilter::default()
        }));
        assert!(!npc.matches(&PlacementFilter {
            min_bond: Some(2),
            ..PlacementFilter::default()
        }));
    }
}
