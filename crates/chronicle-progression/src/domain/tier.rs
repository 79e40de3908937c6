//! Escalation tiers.
//!
//! Tier is a pure function of the main-story sequence and shapes narrative
//! framing text only. Mechanical difficulty comes from resolved locations.

use serde::{Deserialize, Serialize};

/// Escalating story band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StoryTier {
    /// Sequences 1-10, authored content.
    Tutorial,
    /// Sequences 11-20.
    Local,
    /// Sequences 21-30.
    Regional,
    /// Sequences 31-40.
    Continental,
    /// Sequence 41 onward, open-ended.
    Cosmic,
}

impl StoryTier {
    /// Returns the tier of a main-story sequence.
    #[must_use]
    pub fn for_sequence(sequence: u32) -> Self {
        match sequence {
            0..=10 => Self::Tutorial,
            11..=20 => Self::Local,
            21..=30 => Self::Regional,
            31..=40 => Self::Continental,
            _ => Self::Cosmic,
        }
    }

    /// Where the story's stakes play out.
    #[must_use]
    pub fn scope(self) -> &'static str {
        match self {
            Self::Tutorial => "the borderlands",
            Self::Local => "the valley",
            Self::Regional => "the kingdom",
            Self::Continental => "the continent",
            Self::Cosmic => "the world beyond",
        }
    }

    /// One-line framing handed to the narrative provider.
    #[must_use]
    pub fn narrative_framing(self) -> &'static str {
        match self {
            Self::Tutorial => "The first threads of the Order's fate come loose.",
            Self::Local => {
                "The scattered Order's trail runs through nearby towns and the people you know."
            }
            Self::Regional => {
                "The Order's fall echoes through the kingdom's courts and trade roads."
            }
            Self::Continental => {
                "Nations move against one another over what the Order left behind."
            }
            Self::Cosmic => "The Order's secret reaches past the edge of the known world.",
        }
    }

    /// What is at risk at this tier.
    #[must_use]
    pub fn stakes_description(self) -> &'static str {
        match self {
            Self::Tutorial => "Your own footing in a strange land.",
            Self::Local => "The safety of a handful of settlements.",
            Self::Regional => "The stability of the realm.",
            Self::Continental => "Peace between nations.",
            Self::Cosmic => "The order of the world itself.",
        }
    }
}
