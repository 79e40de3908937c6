//! Situation beats used by generated templates.

use chronicle_content::domain::archetypes::ArchetypeCategory;
use chronicle_content::domain::templates::NarrativeHints;

/// One situation in a generated scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Beat {
    /// Short id fragment, also used to prefix choice ids.
    pub key: &'static str,
    pub name: &'static str,
    pub tone: &'static str,
    pub theme: &'static str,
    pub context: &'static str,
}

impl Beat {
    #[must_use]
    pub fn narrative_hints(&self) -> NarrativeHints {
        NarrativeHints {
            tone: self.tone.to_owned(),
            theme: self.theme.to_owned(),
            context: self.context.to_owned(),
        }
    }
}

const fn beat(
    key: &'static str,
    name: &'static str,
    tone: &'static str,
    theme: &'static str,
    context: &'static str,
) -> Beat {
    Beat {
        key,
        name,
        tone,
        theme,
        context,
    }
}

const INVESTIGATION: [Beat; 3] = [
    beat(
        "arrival",
        "Arrival",
        "curious",
        "information_exchange",
        "a place the Order passed through not long ago",
    ),
    beat(
        "search",
        "Search",
        "focused",
        "information_exchange",
        "traces someone tried to hide",
    ),
    beat(
        "revelation",
        "Revelation",
        "startled",
        "information_exchange",
        "a discovery that points further down the trail",
    ),
];

const SOCIAL: [Beat; 3] = [
    beat(
        "introduction",
        "Introduction",
        "guarded",
        "social_maneuvering",
        "someone who knew the Order and is wary of strangers",
    ),
    beat(
        "negotiation",
        "Negotiation",
        "measured",
        "economic_negotiation",
        "what they want in return for their help",
    ),
    beat(
        "accord",
        "Accord",
        "hopeful",
        "social_maneuvering",
        "an agreement that binds you both",
    ),
];

const CONFRONTATION: [Beat; 3] = [
    beat(
        "standoff",
        "Standoff",
        "tense",
        "authority_confrontation",
        "those hunting the Order bar the way",
    ),
    beat(
        "escalation",
        "Escalation",
        "heated",
        "authority_confrontation",
        "words fail and tempers rise",
    ),
    beat(
        "reckoning",
        "Reckoning",
        "grim",
        "authority_confrontation",
        "one side must yield",
    ),
];

const CRISIS: [Beat; 3] = [
    beat(
        "alarm",
        "Alarm",
        "urgent",
        "crisis_response",
        "something has gone badly wrong nearby",
    ),
    beat(
        "choice",
        "Choice",
        "desperate",
        "crisis_response",
        "there is time to save only part of what matters",
    ),
    beat(
        "aftermath",
        "Aftermath",
        "somber",
        "crisis_response",
        "counting what was lost and what was kept",
    ),
];

const PEACEFUL: [Beat; 3] = [
    beat(
        "respite",
        "Respite",
        "calm",
        "information_exchange",
        "a quiet hour away from the road",
    ),
    beat(
        "reflection",
        "Reflection",
        "thoughtful",
        "social_maneuvering",
        "old memories and new doubts",
    ),
    beat(
        "resolve",
        "Resolve",
        "steady",
        "information_exchange",
        "deciding what comes next",
    ),
];

/// Opening, development and resolution beats of a category.
#[must_use]
pub fn beats_for(category: ArchetypeCategory) -> &'static [Beat; 3] {
    match category {
        ArchetypeCategory::Investigation => &INVESTIGATION,
        ArchetypeCategory::Social => &SOCIAL,
        ArchetypeCategory::Confrontation => &CONFRONTATION,
        ArchetypeCategory::Crisis => &CRISIS,
        ArchetypeCategory::Peaceful => &PEACEFUL,
    }
}
