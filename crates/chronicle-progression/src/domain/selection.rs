//! The Archetype Selector.
//!
//! One algorithm serves authored and procedural content alike: the caller
//! only varies the inputs. Player resources never reach this module, so
//! pacing depends on intensity history alone.

use chronicle_content::domain::archetypes::{ArchetypeCategory, RhythmPattern, SceneArchetype};
use tracing::debug;

use super::progress::StoryProgress;
use super::rhythm::rhythm_from_history;

/// Everything the selector looks at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionInputs {
    pub rhythm_pattern: RhythmPattern,
    /// Categories of the most recently completed archetypes.
    pub recent_categories: Vec<ArchetypeCategory>,
    /// The full recent-archetype window.
    pub recent_archetypes: Vec<SceneArchetype>,
}

impl SelectionInputs {
    /// Inputs for procedural content: rhythm comes from intensity history.
    #[must_use]
    pub fn from_progress(progress: &StoryProgress) -> Self {
        Self::authored(rhythm_from_history(&progress.intensity_history()), progress)
    }

    /// Inputs for content whose rhythm is supplied by its author.
    #[must_use]
    pub fn authored(rhythm_pattern: RhythmPattern, progress: &StoryProgress) -> Self {
        Self {
            rhythm_pattern,
            recent_categories: progress.recent_categories(),
            recent_archetypes: progress.recent_archetypes(),
        }
    }
}

/// Categories a rhythm allows, in selection order.
#[must_use]
pub fn candidate_categories(rhythm: RhythmPattern) -> &'static [ArchetypeCategory] {
    use ArchetypeCategory as C;
    match rhythm {
        RhythmPattern::Building => &[C::Investigation, C::Social, C::Confrontation],
        RhythmPattern::Crisis => &[C::Crisis, C::Confrontation],
        RhythmPattern::Mixed => &[C::Social, C::Investigation],
    }
}

/// Picks the category of the next scene.
///
/// Recent categories are excluded unless that would leave nothing, and the
/// pick is `ordinal(rhythm) mod count` over what remains.
#[must_use]
pub fn select_archetype_category(inputs: &SelectionInputs) -> ArchetypeCategory {
    let all = candidate_categories(inputs.rhythm_pattern);
    let fresh: Vec<ArchetypeCategory> = all
        .iter()
        .copied()
        .filter(|c| !inputs.recent_categories.contains(c))
        .collect();
    let pool: &[ArchetypeCategory] = if fresh.is_empty() { all } else { &fresh };

    let selected = pool[inputs.rhythm_pattern.ordinal() % pool.len()];
    debug!(
        rhythm = ?inputs.rhythm_pattern,
        recent = ?inputs.recent_categories,
        candidates = ?pool,
        %selected,
        "selected archetype category"
    );
    selected
}

/// Resolves a category to a concrete archetype, skipping recent ones.
#[must_use]
pub fn select_archetype(
    category: ArchetypeCategory,
    recent_archetypes: &[SceneArchetype],
) -> SceneArchetype {
    let archetypes = category.archetypes();
    archetypes
        .iter()
        .copied()
        .find(|a| !recent_archetypes.contains(a))
        .unwrap_or(archetypes[0])
}

/// Rhythm a generated scene of `category` is played under, given the
/// rhythm it was selected with.
#[must_use]
pub fn generated_rhythm(category: ArchetypeCategory, input: RhythmPattern) -> RhythmPattern {
    match (category, input) {
        (ArchetypeCategory::Crisis, _) => RhythmPattern::Crisis,
        (ArchetypeCategory::Peaceful, _) | (_, RhythmPattern::Mixed) => RhythmPattern::Building,
        _ => RhythmPattern::Mixed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(rhythm_pattern: RhythmPattern, recent: &[ArchetypeCategory]) -> SelectionInputs {
        SelectionInputs {
            rhythm_pattern,
            recent_categories: recent.to_vec(),
            recent_archetypes: vec![],
        }
    }

    #[test]
    fn test_building_without_history_selects_investigation() {
        assert_eq!(
            select_archetype_category(&inputs(RhythmPattern::Building, &[])),
            ArchetypeCategory::Investigation
        );
    }

    #[test]
    fn test_pick_uses_rhythm_ordinal_over_remaining_candidates() {
        // Crisis: [Crisis, Confrontation], ordinal 1.
        assert_eq!(
            select_archetype_category(&inputs(RhythmPattern::Crisis, &[])),
            ArchetypeCategory::Confrontation
        );
        // Mixed: [Social, Investigation], ordinal 2 -> index 0.
        assert_eq!(
            select_archetype_category(&inputs(RhythmPattern::Mixed, &[])),
            ArchetypeCategory::Social
        );
    }

    #[test]
    fn test_recent_categories_are_excluded() {
        // Building minus Investigation: [Social, Confrontation], index 0.
        assert_eq!(
            select_archetype_category(&inputs(
                RhythmPattern::Building,
                &[ArchetypeCategory::Investigation]
            )),
            ArchetypeCategory::Social
        );
        // Crisis minus Confrontation leaves only Crisis.
        assert_eq!(
            select_archetype_category(&inputs(
                RhythmPattern::Crisis,
                &[ArchetypeCategory::Confrontation]
            )),
            ArchetypeCategory::Crisis
        );
    }

    #[test]
    fn test_exclusion_is_ignored_when_it_would_empty_the_set() {
        let recent = [ArchetypeCategory::Social, ArchetypeCategory::Investigation];

        assert_eq!(
            select_archetype_category(&inputs(RhythmPattern::Mixed, &recent)),
            ArchetypeCategory::Social
        );
    }

    #[test]
    fn test_selection_is_pure() {
        let recent = [ArchetypeCategory::Social];
        for rhythm in [RhythmPattern::Building, RhythmPattern::Crisis, RhythmPattern::Mixed] {
            let first = select_archetype_category(&inputs(rhythm, &recent));
            for _ in 0..10 {
                assert_eq!(select_archetype_category(&inputs(rhythm, &recent)), first);
            }
        }
    }

    #[test]
    fn test_select_archetype_skips_recent_then_falls_back_to_first() {
        let recent = [SceneArchetype::InvestigateLocation, SceneArchetype::GatherTestimony];

        assert_eq!(
            select_archetype(ArchetypeCategory::Investigation, &recent),
            SceneArchetype::SeekAudience
        );
        assert_eq!(
            select_archetype(
                ArchetypeCategory::Confrontation,
                &[SceneArchetype::ConfrontAntagonist]
            ),
            SceneArchetype::ConfrontAntagonist
        );
    }

    #[test]
    fn test_generated_rhythm_table() {
        use ArchetypeCategory as C;
        use RhythmPattern as R;

        assert_eq!(generated_rhythm(C::Peaceful, R::Crisis), R::Building);
        assert_eq!(generated_rhythm(C::Crisis, R::Crisis), R::Crisis);
        assert_eq!(generated_rhythm(C::Investigation, R::Mixed), R::Building);
        assert_eq!(generated_rhythm(C::Investigation, R::Building), R::Mixed);
        assert_eq!(generated_rhythm(C::Confrontation, R::Crisis), R::Mixed);
    }
}
