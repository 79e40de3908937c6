//! The Progression Context aggregate.

use std::collections::{BTreeSet, VecDeque};

use chronicle_content::domain::archetypes::{ArchetypeCategory, SceneArchetype};
use chronicle_content::domain::placement::PersonalityType;
use chronicle_core::aggregate::AggregateRoot;
use chronicle_core::error::DomainError;
use chronicle_core::event::{Envelope, Stamp};
use serde::Serialize;
use uuid::Uuid;

use super::events::{CompletionRecorded, ProgressEvent, ProgressEventKind, ProgressStarted};
use super::rhythm::IntensityRecord;
use super::tier::StoryTier;

/// Recent archetypes remembered for anti-repetition.
pub const ARCHETYPE_WINDOW: usize = 5;
/// Recent regions remembered for anti-repetition.
pub const REGION_WINDOW: usize = 3;
/// Recent NPC personalities remembered for anti-repetition.
pub const PERSONALITY_WINDOW: usize = 3;
/// Completed-scene intensities remembered for rhythm.
pub const INTENSITY_WINDOW: usize = 6;
/// Categories considered "recent" by the selector.
pub const RECENT_CATEGORY_COUNT: usize = 2;

/// Pursuit goal before any main-story completion is recorded.
pub const INITIAL_PURSUIT_GOAL: &str = "Discover the fate of the scattered Order";

/// A completed main-story scene.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompletedScene {
    pub scene_id: Uuid,
    pub template_id: String,
    pub sequence: u32,
}

/// Per-player rolling history used for anti-repetition and escalation.
///
/// After `start`, the only mutator is `record_completion`; nothing rolls
/// back.
#[derive(Debug)]
pub struct StoryProgress {
    /// Aggregate identifier (the player id).
    pub id: Uuid,
    /// Current version (event count).
    pub(crate) version: i64,
    started: bool,
    current_sequence: u32,
    last_completed_sequence: u32,
    completed_scenes: Vec<CompletedScene>,
    recent_archetypes: VecDeque<SceneArchetype>,
    recent_regions: VecDeque<String>,
    recent_personality_types: VecDeque<PersonalityType>,
    intensity_history: VecDeque<IntensityRecord>,
    unlocked_regions: BTreeSet<String>,
    pursuit_goal: String,
    /// Uncommitted events pending persistence.
    uncommitted_events: Vec<ProgressEvent>,
}

fn push_bounded<T>(window: &mut VecDeque<T>, value: T, capacity: usize) {
    window.push_back(value);
    while window.len() > capacity {
        window.pop_front();
    }
}

fn push_distinct<T: PartialEq>(window: &mut VecDeque<T>, value: T, capacity: usize) {
    window.retain(|existing| *existing != value);
    push_bounded(window, value, capacity);
}

/// Goal the player pursues after completing a scene of `category` at `tier`.
#[must_use]
pub fn pursuit_goal_after(category: ArchetypeCategory, tier: StoryTier) -> String {
    let scope = tier.scope();
    match category {
        ArchetypeCategory::Investigation => format!("Follow the Order's trail across {scope}"),
        ArchetypeCategory::Social => {
            format!("Win the trust of the Order's survivors in {scope}")
        }
        ArchetypeCategory::Confrontation => {
            format!("Break the grip of those hunting the Order in {scope}")
        }
        ArchetypeCategory::Crisis => {
            format!("Hold {scope} together long enough to learn the truth")
        }
        ArchetypeCategory::Peaceful => {
            format!("Gather strength for the road ahead through {scope}")
        }
    }
}

impl StoryProgress {
    /// Creates an unstarted progress aggregate for a player.
    #[must_use]
    pub fn new(player_id: Uuid) -> Self {
        Self {
            id: player_id,
            version: 0,
            started: false,
            current_sequence: 1,
            last_completed_sequence: 0,
            completed_scenes: Vec::new(),
            recent_archetypes: VecDeque::new(),
            recent_regions: VecDeque::new(),
            recent_personality_types: VecDeque::new(),
            intensity_history: VecDeque::new(),
            unlocked_regions: BTreeSet::new(),
            pursuit_goal: INITIAL_PURSUIT_GOAL.to_owned(),
            uncommitted_events: Vec::new(),
        }
    }

    /// Returns the next sequence number for a new event.
    #[allow(clippy::cast_possible_wrap)]
    fn next_sequence_number(&self) -> i64 {
        self.version + self.uncommitted_events.len() as i64 + 1
    }

    fn record(&mut self, kind: ProgressEventKind, stamp: &Stamp<'_>) {
        let event = Envelope::new(self.id, self.next_sequence_number(), stamp, kind);
        self.mutate(&event.kind);
        self.uncommitted_events.push(event);
    }

    fn mutate(&mut self, kind: &ProgressEventKind) {
        match kind {
            ProgressEventKind::ProgressStarted(_) => {
                self.started = true;
            }
            ProgressEventKind::CompletionRecorded(completion) => {
                self.last_completed_sequence = completion.sequence;
                self.current_sequence = completion.sequence + 1;
                self.completed_scenes.push(CompletedScene {
                    scene_id: completion.scene_id,
                    template_id: completion.template_id.clone(),
                    sequence: completion.sequence,
                });
                push_bounded(
                    &mut self.recent_archetypes,
                    completion.archetype,
                    ARCHETYPE_WINDOW,
                );
                if let Some(region) = &completion.region {
                    push_distinct(&mut self.recent_regions, region.clone(), REGION_WINDOW);
                    self.unlocked_regions.insert(region.clone());
                }
                if let Some(personality) = completion.personality {
                    push_distinct(
                        &mut self.recent_personality_types,
                        personality,
                        PERSONALITY_WINDOW,
                    );
                }
                push_bounded(
                    &mut self.intensity_history,
                    IntensityRecord {
                        intensity: completion.intensity,
                        rhythm: completion.rhythm,
                    },
                    INTENSITY_WINDOW,
                );
                self.pursuit_goal = pursuit_goal_after(
                    completion.category,
                    StoryTier::for_sequence(completion.sequence),
                );
            }
        }
    }

    /// Begins the story, producing a `ProgressStarted` event.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the story already started.
    pub fn start(&mut self, stamp: &Stamp<'_>) -> Result<(), DomainError> {
        if self.started {
            return Err(DomainError::Validation(format!(
                "story for player {} has already started",
                self.id
            )));
        }
        self.record(
            ProgressEventKind::ProgressStarted(ProgressStarted { player_id: self.id }),
            stamp,
        );
        Ok(())
    }

    /// Records a completed main-story scene into the rolling history.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the story has not started or the
    /// sequence was already recorded.
    pub fn record_completion(
        &mut self,
        completion: CompletionRecorded,
        stamp: &Stamp<'_>,
    ) -> Result<(), DomainError> {
        if !self.started {
            return Err(DomainError::Validation(format!(
                "story for player {} has not started",
                self.id
            )));
        }
        if completion.sequence <= self.last_completed_sequence {
            return Err(DomainError::Validation(format!(
                "main story sequence {} was already completed",
                completion.sequence
            )));
        }
        self.record(ProgressEventKind::CompletionRecorded(completion), stamp);
        Ok(())
    }

    /// Returns `true` once the story has started.
    #[must_use]
    pub fn is_started(&self) -> bool {
        self.started
    }

    /// The next main-story sequence to play.
    #[must_use]
    pub fn current_sequence(&self) -> u32 {
        self.current_sequence
    }

    /// The most recently completed main-story sequence, 0 if none.
    #[must_use]
    pub fn last_completed_sequence(&self) -> u32 {
        self.last_completed_sequence
    }

    /// Tier of the next sequence.
    #[must_use]
    pub fn tier(&self) -> StoryTier {
        StoryTier::for_sequence(self.current_sequence)
    }

    #[must_use]
    pub fn completed_scenes(&self) -> &[CompletedScene] {
        &self.completed_scenes
    }

    /// Ids of every completed template.
    #[must_use]
    pub fn completed_template_ids(&self) -> BTreeSet<String> {
        self.completed_scenes
            .iter()
            .map(|c| c.template_id.clone())
            .collect()
    }

    /// Recent archetypes, oldest first.
    #[must_use]
    pub fn recent_archetypes(&self) -> Vec<SceneArchetype> {
        self.recent_archetypes.iter().copied().collect()
    }

    /// Categories of the most recent archetypes, oldest first.
    #[must_use]
    pub fn recent_categories(&self) -> Vec<ArchetypeCategory> {
        let skip = self
            .recent_archetypes
            .len()
            .saturating_sub(RECENT_CATEGORY_COUNT);
        self.recent_archetypes
            .iter()
            .skip(skip)
            .filter_map(|a| a.category().ok())
            .collect()
    }

    /// Returns `true` if `archetype` is inside the recent window.
    #[must_use]
    pub fn is_archetype_recent(&self, archetype: SceneArchetype) -> bool {
        self.recent_archetypes.contains(&archetype)
    }

    #[must_use]
    pub fn recent_regions(&self) -> Vec<String> {
        self.recent_regions.iter().cloned().collect()
    }

    #[must_use]
    pub fn recent_personality_types(&self) -> Vec<PersonalityType> {
        self.recent_personality_types.iter().copied().collect()
    }

    /// Intensity history, oldest first.
    #[must_use]
    pub fn intensity_history(&self) -> Vec<IntensityRecord> {
        self.intensity_history.iter().copied().collect()
    }

    #[must_use]
    pub fn unlocked_regions(&self) -> &BTreeSet<String> {
        &self.unlocked_regions
    }

    #[must_use]
    pub fn pursuit_goal(&self) -> &str {
        &self.pursuit_goal
    }
}

impl AggregateRoot for StoryProgress {
    type Event = ProgressEvent;

    fn aggregate_id(&self) -> Uuid {
        self.id
    }

    fn version(&self) -> i64 {
        self.version
    }

    fn apply(&mut self, event: &Self::Event) {
        self.mutate(&event.kind);
        self.version += 1;
    }

    fn uncommitted_events(&self) -> &[Self::Event] {
        &self.uncommitted_events
    }

    #[allow(clippy::cast_possible_wrap)]
    fn mark_committed(&mut self) {
        self.version += self.uncommitted_events.len() as i64;
        self.uncommitted_events.clear();
    }
}
