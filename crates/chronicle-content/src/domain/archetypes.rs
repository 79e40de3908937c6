//! Archetype tables: the structural "shape" vocabulary of scenes.
//!
//! The archetype → category and archetype → intensity lookups are fixed
//! tables. Archetypes outside the tables (service scenes) fail loudly
//! instead of defaulting.

use std::fmt;

use chronicle_core::error::DomainError;
use serde::{Deserialize, Serialize};

use super::resources::Stat;

/// Coarse grouping used by archetype selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ArchetypeCategory {
    /// Searching, questioning, discovering.
    Investigation,
    /// Meeting and persuading people.
    Social,
    /// Facing an opponent directly.
    Confrontation,
    /// Urgent, high-pressure decisions.
    Crisis,
    /// Quiet recovery beats.
    Peaceful,
}

impl ArchetypeCategory {
    /// Concrete archetypes belonging to this category, in preference order.
    #[must_use]
    pub fn archetypes(self) -> &'static [SceneArchetype] {
        use SceneArchetype as A;
        match self {
            Self::Investigation => &[
                A::InvestigateLocation,
                A::GatherTestimony,
                A::SeekAudience,
                A::DiscoverArtifact,
                A::UncoverConspiracy,
            ],
            Self::Social => &[A::MeetOrderMember],
            Self::Confrontation => &[A::ConfrontAntagonist],
            Self::Crisis => &[A::UrgentDecision, A::MoralCrossroads],
            Self::Peaceful => &[A::QuietReflection, A::CasualEncounter, A::ScholarlyPursuit],
        }
    }

    /// Intensity recorded when a scene of this category completes.
    #[must_use]
    pub fn intensity(self) -> ArchetypeIntensity {
        match self {
            Self::Peaceful => ArchetypeIntensity::Recovery,
            Self::Confrontation | Self::Crisis => ArchetypeIntensity::Demanding,
            Self::Investigation | Self::Social => ArchetypeIntensity::Standard,
        }
    }

    /// The stat a scene of this category primarily tests.
    #[must_use]
    pub fn primary_stat(self) -> Stat {
        match self {
            Self::Investigation => Stat::Insight,
            Self::Social => Stat::Rapport,
            Self::Confrontation => Stat::Authority,
            Self::Crisis => Stat::Cunning,
            Self::Peaceful => Stat::Diplomacy,
        }
    }
}

impl fmt::Display for ArchetypeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Intensity tag recorded per completed scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArchetypeIntensity {
    /// Restorative, low-pressure.
    Recovery,
    /// Ordinary pressure.
    Standard,
    /// High pressure.
    Demanding,
}

/// Pacing signal derived from intensity history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RhythmPattern {
    /// Rising action: accumulate capability.
    Building,
    /// Peak pressure.
    Crisis,
    /// Trade-offs between the two.
    Mixed,
}

impl RhythmPattern {
    /// Stable ordinal used for deterministic selection.
    #[must_use]
    pub fn ordinal(self) -> usize {
        match self {
            Self::Building => 0,
            Self::Crisis => 1,
            Self::Mixed => 2,
        }
    }
}

/// Concrete scene archetype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SceneArchetype {
    InvestigateLocation,
    GatherTestimony,
    SeekAudience,
    DiscoverArtifact,
    UncoverConspiracy,
    MeetOrderMember,
    ConfrontAntagonist,
    UrgentDecision,
    MoralCrossroads,
    QuietReflection,
    CasualEncounter,
    ScholarlyPursuit,
    // Service archetypes have no category; they never enter selection.
    InnLodging,
    DeliveryContract,
    RouteTravel,
    ConsequenceReflection,
}

impl SceneArchetype {
    /// Returns the category of a main-story archetype.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ContentDefect` for service archetypes, which
    /// have no category mapping.
    pub fn category(self) -> Result<ArchetypeCategory, DomainError> {
        use ArchetypeCategory as C;
        match self {
            Self::InvestigateLocation
            | Self::GatherTestimony
            | Self::SeekAudience
            | Self::DiscoverArtifact
            | Self::UncoverConspiracy => Ok(C::Investigation),
            Self::MeetOrderMember => Ok(C::Social),
            Self::ConfrontAntagonist => Ok(C::Confrontation),
            Self::UrgentDecision | Self::MoralCrossroads => Ok(C::Crisis),
            Self::QuietReflection | Self::CasualEncounter | Self::ScholarlyPursuit => {
                Ok(C::Peaceful)
            }
            Self::InnLodging
            | Self::DeliveryContract
            | Self::RouteTravel
            | Self::ConsequenceReflection => Err(DomainError::ContentDefect(format!(
                "archetype {self:?} has no category mapping"
            ))),
        }
    }

    /// Returns the intensity recorded when a scene of this archetype completes.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ContentDefect` for unmapped archetypes.
    pub fn intensity(self) -> Result<ArchetypeIntensity, DomainError> {
        Ok(self.category()?.intensity())
    }

    /// Player-facing label.
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Self::InvestigateLocation => "Investigate Location",
            Self::GatherTestimony => "Gather Testimony",
            Self::SeekAudience => "Seek Audience",
            Self::DiscoverArtifact => "Discover Artifact",
            Self::UncoverConspiracy => "Uncover Conspiracy",
            Self::MeetOrderMember => "Meet Order Member",
            Self::ConfrontAntagonist => "Confront Antagonist",
            Self::UrgentDecision => "Urgent Decision",
            Self::MoralCrossroads => "Moral Crossroads",
            Self::QuietReflection => "Quiet Reflection",
            Self::CasualEncounter => "Casual Encounter",
            Self::ScholarlyPursuit => "Scholarly Pursuit",
            Self::InnLodging => "Inn Lodging",
            Self::DeliveryContract => "Delivery Contract",
            Self::RouteTravel => "Route Travel",
            Self::ConsequenceReflection => "Consequence Reflection",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_category_lists_archetypes_that_map_back_to_it() {
        for category in [
            ArchetypeCategory::Investigation,
            ArchetypeCategory::Social,
            ArchetypeCategory::Confrontation,
            ArchetypeCategory::Crisis,
            ArchetypeCategory::Peaceful,
        ] {
            assert!(!category.archetypes().is_empty());
            for archetype in category.archetypes() {
                assert_eq!(archetype.category().unwrap(), category);
            }
        }
    }

    #[test]
    fn test_intensity_table() {
        assert_eq!(
            SceneArchetype::QuietReflection.intensity().unwrap(),
            ArchetypeIntensity::Recovery
        );
        assert_eq!(
            SceneArchetype::ConfrontAntagonist.intensity().unwrap(),
            ArchetypeIntensity::Demanding
        );
        assert_eq!(
            SceneArchetype::MoralCrossroads.intensity().unwrap(),
            ArchetypeIntensity::Demanding
        );
        assert_eq!(
            SceneArchetype::GatherTestimony.intensity().unwrap(),
            ArchetypeIntensity::Standard
        );
    }

    #[test]
    fn test_service_archetype_fails_loudly() {
        match SceneArchetype::InnLodging.category() {
            Err(DomainError::ContentDefect(message)) => assert!(message.contains("InnLodging")),
            other => panic!("expected ContentDefect, got {other:?}"),
        }
        assert!(SceneArchetype::RouteTravel.intensity().is_err());
    }

    #[test]
    fn test_rhythm_ordinals_are_stable() {
        assert_eq!(RhythmPattern::Building.ordinal(), 0);
        assert_eq!(RhythmPattern::Crisis.ordinal(), 1);
        assert_eq!(RhythmPattern::Mixed.ordinal(), 2);
    }

    #[test]
    fn test_category_serializes_as_plain_name() {
        let json = serde_json::to_string(&ArchetypeCategory::Investigation).unwrap();
        assert_eq!(json, "\"Investigation\"");
    }
}
