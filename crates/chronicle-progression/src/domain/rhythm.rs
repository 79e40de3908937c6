//! Rhythm signal derived from intensity history.

use chronicle_content::domain::archetypes::{ArchetypeIntensity, RhythmPattern};
use serde::{Deserialize, Serialize};

/// Intensity and rhythm recorded for one completed main-story scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntensityRecord {
    pub intensity: ArchetypeIntensity,
    pub rhythm: RhythmPattern,
}

/// Computes the rhythm for the next pick from oldest-first history.
///
/// - no history: `Building`
/// - last scene demanding, or played under a `Crisis` rhythm: `Mixed`
/// - last two scenes standard: `Crisis`
/// - otherwise: `Building`
#[must_use]
pub fn rhythm_from_history(history: &[IntensityRecord]) -> RhythmPattern {
    let Some(last) = history.last() else {
        return RhythmPattern::Building;
    };
    if last.intensity == ArchetypeIntensity::Demanding || last.rhythm == RhythmPattern::Crisis {
        return RhythmPattern::Mixed;
    }
    let standard_streak = history
        .iter()
        .rev()
        .take_while(|r| r.intensity == ArchetypeIntensity::Standard)
        .count();
    if standard_streak >= 2 {
        RhythmPattern::Crisis
    } else {
        RhythmPattern::Building
    }
}
