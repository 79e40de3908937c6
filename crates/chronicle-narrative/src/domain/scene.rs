//! The Scene aggregate.

use std::collections::BTreeMap;

use chrono::{Days, NaiveDate};
use chronicle_content::domain::archetypes::{ArchetypeCategory, RhythmPattern, SceneArchetype};
use chronicle_content::domain::resources::PlayerResources;
use chronicle_content::domain::templates::{SceneTemplate, StoryCategory};
use chronicle_core::aggregate::AggregateRoot;
use chronicle_core::error::DomainError;
use chronicle_core::event::{Envelope, Stamp};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::events::{
    ChoiceResolved, SceneCompleted, SceneCreated, SceneDiscarded, SceneEvent, SceneEventKind,
    SceneFinalized, SituationCompleted, SituationDescribed,
};
use super::situation::{Choice, Situation};

/// Lifecycle state. Only ever moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SceneState {
    Deferred,
    Active,
    Completed,
}

/// Where a scene went after a situation finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "route", rename_all = "snake_case")]
pub enum SceneRoute {
    /// The scene continues at this situation index.
    NextSituation { situation_index: usize },
    /// That was the last situation.
    SceneCompleted,
}

/// A scene instance.
///
/// Deferred scenes know how many situations they will have but hold none.
/// Finalisation materialises all of them at once.
#[derive(Debug)]
pub struct Scene {
    /// Aggregate identifier.
    pub id: Uuid,
    /// Current version (event count).
    pub(crate) version: i64,
    pub(crate) created: bool,
    pub(crate) player_id: Uuid,
    pub(crate) template_id: String,
    pub(crate) state: SceneState,
    pub(crate) discarded: bool,
    pub(crate) situation_count: usize,
    pub(crate) current_situation_index: usize,
    pub(crate) parameters: BTreeMap<String, String>,
    pub(crate) main_story_sequence: Option<u32>,
    pub(crate) story_category: StoryCategory,
    pub(crate) category: Option<ArchetypeCategory>,
    pub(crate) archetype: SceneArchetype,
    pub(crate) rhythm: RhythmPattern,
    pub(crate) expires_on: Option<NaiveDate>,
    pub(crate) situations: Vec<Situation>,
    /// Uncommitted events pending persistence.
    uncommitted_events: Vec<SceneEvent>,
}

impl Scene {
    /// Creates an empty scene shell for replay.
    #[must_use]
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            version: 0,
            created: false,
            player_id: Uuid::nil(),
            template_id: String::new(),
            state: SceneState::Deferred,
            discarded: false,
            situation_count: 0,
            current_situation_index: 0,
            parameters: BTreeMap::new(),
            main_story_sequence: None,
            story_category: StoryCategory::SideStory,
            category: None,
            archetype: SceneArchetype::CasualEncounter,
            rhythm: RhythmPattern::Building,
            expires_on: None,
            situations: Vec::new(),
            uncommitted_events: Vec::new(),
        }
    }

    /// Creates a provisional scene from `template`, producing `SceneCreated`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ContentDefect` if a main-story template has no
    /// category mapping.
    pub fn create(
        id: Uuid,
        player_id: Uuid,
        template: &SceneTemplate,
        parameters: BTreeMap<String, String>,
        today: NaiveDate,
        stamp: &Stamp<'_>,
    ) -> Result<Self, DomainError> {
        let category = if template.is_main_story() {
            Some(template.category()?)
        } else {
            template.category().ok()
        };
        let expires_on = template
            .expiration_days
            .and_then(|days| today.checked_add_days(Days::new(u64::from(days))));

        let mut scene = Self::new(id);
        scene.record(
            SceneEventKind::SceneCreated(SceneCreated {
                scene_id: id,
                player_id,
                template_id: template.id.clone(),
                situation_count: template.situations.len(),
                parameters,
                main_story_sequence: template.main_story_sequence,
                story_category: template.story_category,
                category,
                archetype: template.scene_archetype,
                rhythm: template.rhythm_pattern,
                expires_on,
            }),
            stamp,
        );
        Ok(scene)
    }

    /// Returns the next sequence number for a new event.
    #[allow(clippy::cast_possible_wrap)]
    fn next_sequence_number(&self) -> i64 {
        self.version + self.uncommitted_events.len() as i64 + 1
    }

    fn record(&mut self, kind: SceneEventKind, stamp: &Stamp<'_>) {
        let event = Envelope::new(self.id, self.next_sequence_number(), stamp, kind);
        self.mutate(&event.kind);
        self.uncommitted_events.push(event);
    }

    fn mutate(&mut self, kind: &SceneEventKind) {
        match kind {
            SceneEventKind::SceneCreated(created) => {
                self.created = true;
                self.player_id = created.player_id;
                self.template_id.clone_from(&created.template_id);
                self.situation_count = created.situation_count;
                self.parameters.clone_from(&created.parameters);
                self.main_story_sequence = created.main_story_sequence;
                self.story_category = created.story_category;
                self.category = created.category;
                self.archetype = created.archetype;
                self.rhythm = created.rhythm;
                self.expires_on = created.expires_on;
            }
            SceneEventKind::SceneFinalized(finalized) => {
                self.situations.clone_from(&finalized.situations);
                self.state = SceneState::Active;
            }
            SceneEventKind::SituationDescribed(described) => {
                if let Some(situation) = self.situations.get_mut(described.situation_index) {
                    situation.description.clone_from(&described.description);
                }
            }
            SceneEventKind::ChoiceResolved(_) => {}
            SceneEventKind::SituationCompleted(completed) => {
                if let Some(situation) = self.situations.get_mut(completed.situation_index) {
                    situation.completed = true;
                }
                if completed.situation_index + 1 < self.situation_count {
                    self.current_situation_index = completed.situation_index + 1;
                }
            }
            SceneEventKind::SceneCompleted(_) => {
                self.state = SceneState::Completed;
            }
            SceneEventKind::SceneDiscarded(_) => {
                self.discarded = true;
            }
        }
    }

    fn require_created(&self) -> Result<(), DomainError> {
        if self.created {
            Ok(())
        } else {
            Err(DomainError::AggregateNotFound(self.id))
        }
    }

    fn require_active(&self) -> Result<(), DomainError> {
        self.require_created()?;
        if self.state == SceneState::Active {
            Ok(())
        } else {
            Err(DomainError::Validation(format!(
                "scene {} is {:?}, not active",
                self.id, self.state
            )))
        }
    }

    fn require_provisional(&self, action: &str) -> Result<(), DomainError> {
        self.require_created()?;
        if self.discarded {
            return Err(DomainError::Validation(format!(
                "scene {} was discarded and cannot be {action}",
                self.id
            )));
        }
        if self.state != SceneState::Deferred {
            return Err(DomainError::Validation(format!(
                "scene {} is {:?} and cannot be {action}",
                self.id, self.state
            )));
        }
        Ok(())
    }

    /// Returns `true` if the scene's expiry day is before `today`.
    #[must_use]
    pub fn is_expired(&self, today: NaiveDate) -> bool {
        self.expires_on.is_some_and(|day| day < today)
    }

    /// Transitions Deferred → Active with every situation at once.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the scene is not a live
    /// provisional scene, has expired, or `situations` does not match the
    /// template's situation count.
    pub fn finalize(
        &mut self,
        situations: Vec<Situation>,
        today: NaiveDate,
        stamp: &Stamp<'_>,
    ) -> Result<(), DomainError> {
        self.require_provisional("finalized")?;
        if self.is_expired(today) {
            return Err(DomainError::Validation(format!(
                "scene {} expired on {}",
                self.id,
                self.expires_on.unwrap_or(today)
            )));
        }
        if situations.len() != self.situation_count {
            return Err(DomainError::Validation(format!(
                "scene {} expects {} situations, got {}",
                self.id,
                self.situation_count,
                situations.len()
            )));
        }
        self.record(
            SceneEventKind::SceneFinalized(SceneFinalized {
                scene_id: self.id,
                situations,
            }),
            stamp,
        );
        Ok(())
    }

    /// Sets a situation's prose.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the scene is not active, the
    /// index is out of range, or the description is blank.
    pub fn describe_situation(
        &mut self,
        situation_index: usize,
        description: String,
        stamp: &Stamp<'_>,
    ) -> Result<(), DomainError> {
        self.require_active()?;
        if situation_index >= self.situations.len() {
            return Err(DomainError::Validation(format!(
                "scene {} has no situation {situation_index}",
                self.id
            )));
        }
        if description.trim().is_empty() {
            return Err(DomainError::Validation(
                "situation description must not be empty".into(),
            ));
        }
        self.record(
            SceneEventKind::SituationDescribed(SituationDescribed {
                situation_index,
                description,
            }),
            stamp,
        );
        Ok(())
    }

    /// Commits to a choice in the current situation and returns it.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the scene is not active, the
    /// choice does not exist, its requirements are unmet, it is
    /// unaffordable, or a challenge choice comes without a result.
    pub fn choose(
        &mut self,
        choice_id: &str,
        challenge_succeeded: Option<bool>,
        resources: &PlayerResources,
        stamp: &Stamp<'_>,
    ) -> Result<Choice, DomainError> {
        self.require_active()?;
        let situation_index = self.current_situation_index;
        let situation = &self.situations[situation_index];
        let choice = situation.choice(choice_id).cloned().ok_or_else(|| {
            DomainError::Validation(format!(
                "situation {} has no choice {choice_id}",
                situation.template_id
            ))
        })?;
        if !choice.requirement.is_satisfied_by(resources) {
            return Err(DomainError::Validation(format!(
                "requirements for choice {choice_id} are not met"
            )));
        }
        if !choice.cost.is_affordable_by(resources) {
            return Err(DomainError::Validation(format!(
                "choice {choice_id} is not affordable"
            )));
        }
        choice.consequence.resolve(challenge_succeeded)?;

        self.record(
            SceneEventKind::ChoiceResolved(ChoiceResolved {
                situation_index,
                choice_id: choice.id.clone(),
                challenge_succeeded,
            }),
            stamp,
        );
        Ok(choice)
    }

    /// Finishes the current situation, completing the scene after the last.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the scene is not active.
    pub fn complete_current_situation(
        &mut self,
        stamp: &Stamp<'_>,
    ) -> Result<SceneRoute, DomainError> {
        self.require_active()?;
        let situation_index = self.current_situation_index;
        self.record(
            SceneEventKind::SituationCompleted(SituationCompleted { situation_index }),
            stamp,
        );
        if situation_index + 1 < self.situation_count {
            return Ok(SceneRoute::NextSituation {
                situation_index: situation_index + 1,
            });
        }
        self.record(
            SceneEventKind::SceneCompleted(SceneCompleted { scene_id: self.id }),
            stamp,
        );
        Ok(SceneRoute::SceneCompleted)
    }

    /// Throws away a provisional scene.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the scene was already finalized
    /// or discarded.
    pub fn discard(&mut self, stamp: &Stamp<'_>) -> Result<(), DomainError> {
        self.require_provisional("discarded")?;
        self.record(
            SceneEventKind::SceneDiscarded(SceneDiscarded { scene_id: self.id }),
            stamp,
        );
        Ok(())
    }

    #[must_use]
    pub fn player_id(&self) -> Uuid {
        self.player_id
    }

    #[must_use]
    pub fn template_id(&self) -> &str {
        &self.template_id
    }

    #[must_use]
    pub fn state(&self) -> SceneState {
        self.state
    }

    #[must_use]
    pub fn is_discarded(&self) -> bool {
        self.discarded
    }

    #[must_use]
    pub fn situation_count(&self) -> usize {
        self.situation_count
    }

    #[must_use]
    pub fn current_situation_index(&self) -> usize {
        self.current_situation_index
    }

    #[must_use]
    pub fn current_situation(&self) -> Option<&Situation> {
        match self.state {
            SceneState::Active => self.situations.get(self.current_situation_index),
            SceneState::Deferred | SceneState::Completed => None,
        }
    }

    #[must_use]
    pub fn parameters(&self) -> &BTreeMap<String, String> {
        &self.parameters
    }

    #[must_use]
    pub fn parameter(&self, key: &str) -> Option<&str> {
        self.parameters.get(key).map(String::as_str)
    }

    #[must_use]
    pub fn main_story_sequence(&self) -> Option<u32> {
        self.main_story_sequence
    }

    #[must_use]
    pub fn is_main_story(&self) -> bool {
        self.story_category == StoryCategory::MainStory
    }

    #[must_use]
    pub fn story_category(&self) -> StoryCategory {
        self.story_category
    }

    #[must_use]
    pub fn category(&self) -> Option<ArchetypeCategory> {
        self.category
    }

    #[must_use]
    pub fn archetype(&self) -> SceneArchetype {
        self.archetype
    }

    #[must_use]
    pub fn rhythm(&self) -> RhythmPattern {
        self.rhythm
    }

    #[must_use]
    pub fn expires_on(&self) -> Option<NaiveDate> {
        self.expires_on
    }

    #[must_use]
    pub fn situations(&self) -> &[Situation] {
        &self.situations
    }
}

impl AggregateRoot for Scene {
    type Event = SceneEvent;

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

#[cfg(test)]
mod tests {
    use super::*;
    use chronicle_core::event::DomainEvent;
    use chronicle_test_support::{SequentialIds, fixture_clock, fixture_world, tutorial_store};

    use crate::domain::materialize::materialize_situations;

    struct Harness {
        clock: chronicle_test_support::FixedClock,
        ids: SequentialIds,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                clock: fixture_clock(),
                ids: SequentialIds::new(),
            }
        }

        fn stamp(&self) -> Stamp<'_> {
            Stamp {
                correlation_id: Uuid::nil(),
                clock: &self.clock,
                ids: &self.ids,
            }
        }

        fn today(&self) -> NaiveDate {
            self.clock.0.date_naive()
        }
    }

    fn provisional(h: &Harness, template_id: &str) -> (Scene, std::sync::Arc<SceneTemplate>) {
        let template = tutorial_store().get_template(template_id).unwrap();
        let scene = Scene::create(
            Uuid::new_v4(),
            Uuid::new_v4(),
            &template,
            BTreeMap::new(),
            h.today(),
            &h.stamp(),
        )
        .unwrap();
        (scene, template)
    }

    #[test]
    fn test_create_produces_deferred_scene_without_situations() {
        // Arrange
        let h = Harness::new();

        // Act
        let (scene, template) = provisional(&h, "a_story_1");

        // Assert
        assert_eq!(scene.state(), SceneState::Deferred);
        assert!(scene.situations().is_empty());
        assert_eq!(scene.situation_count(), template.situations.len());
        assert_eq!(scene.main_story_sequence(), Some(1));
        assert_eq!(scene.category(), Some(ArchetypeCategory::Investigation));
        let events = scene.uncommitted_events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type(), "scene.created");
        assert_eq!(events[0].metadata().sequence_number, 1);
    }

    #[test]
    fn test_finalize_materialises_every_situation() {
        let h = Harness::new();
        let (mut scene, template) = provisional(&h, "a_story_1");
        let situations = materialize_situations(&template, &fixture_world()).unwrap();

        scene.finalize(situations, h.today(), &h.stamp()).unwrap();

        assert_eq!(scene.state(), SceneState::Active);
        assert_eq!(scene.situations().len(), scene.situation_count());
        assert_eq!(scene.current_situation().unwrap().template_id, "arrival");
    }

    #[test]
    fn test_finalize_twice_is_rejected() {
        let h = Harness::new();
        let (mut scene, template) = provisional(&h, "a_story_1");
        let situations = materialize_situations(&template, &fixture_world()).unwrap();
        scene
            .finalize(situations.clone(), h.today(), &h.stamp())
            .unwrap();

        let result = scene.finalize(situations, h.today(), &h.stamp());

        match result {
            Err(DomainError::Validation(message)) => assert!(message.contains("Active")),
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn test_finalize_with_partial_situations_is_rejected() {
        let h = Harness::new();
        let (mut scene, template) = provisional(&h, "a_story_1");
        let mut situations = materialize_situations(&template, &fixture_world()).unwrap();
        situations.pop();

        let result = scene.finalize(situations, h.today(), &h.stamp());

        assert!(matches!(result, Err(DomainError::Validation(_))));
        assert_eq!(scene.state(), SceneState::Deferred);
        assert!(scene.situations().is_empty());
    }

    #[test]
    fn test_discarded_scene_cannot_be_finalized() {
        let h = Harness::new();
        let (mut scene, template) = provisional(&h, "a_story_1");
        scene.discard(&h.stamp()).unwrap();
        let situations = materialize_situations(&template, &fixture_world()).unwrap();

        let result = scene.finalize(situations, h.today(), &h.stamp());

        match result {
            Err(DomainError::Validation(message)) => assert!(message.contains("discarded")),
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn test_expired_scene_cannot_be_finalized() {
        let h = Harness::new();
        let (mut scene, template) = provisional(&h, "a_story_3");
        let situations = materialize_situations(&template, &fixture_world()).unwrap();
        let later = h.today().checked_add_days(Days::new(8)).unwrap();

        let result = scene.finalize(situations, later, &h.stamp());

        match result {
            Err(DomainError::Validation(message)) => assert!(message.contains("expired")),
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn test_completing_situations_routes_then_completes() {
        // Arrange
        let h = Harness::new();
        let (mut scene, template) = provisional(&h, "a_story_1");
        let situations = materialize_situations(&template, &fixture_world()).unwrap();
        scene.finalize(situations, h.today(), &h.stamp()).unwrap();

        // Act
        let first = scene.complete_current_situation(&h.stamp()).unwrap();
        let second = scene.complete_current_situation(&h.stamp()).unwrap();

        // Assert
        assert_eq!(first, SceneRoute::NextSituation { situation_index: 1 });
        assert_eq!(second, SceneRoute::SceneCompleted);
        assert_eq!(scene.state(), SceneState::Completed);
        assert!(scene.situations().iter().all(|s| s.completed));
        assert!(scene.current_situation().is_none());
        assert!(matches!(
            scene.complete_current_situation(&h.stamp()),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn test_choose_rejects_unaffordable_choice() {
        let h = Harness::new();
        let (mut scene, template) = provisional(&h, "a_story_1");
        let situations = materialize_situations(&template, &fixture_world()).unwrap();
        scene.finalize(situations, h.today(), &h.stamp()).unwrap();

        let result = scene.choose(
            "arrival_bribe",
            None,
            &PlayerResources::depleted(),
            &h.stamp(),
        );

        match result {
            Err(DomainError::Validation(message)) => assert!(message.contains("not affordable")),
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn test_choose_requires_challenge_result_for_branching_choice() {
        let h = Harness::new();
        let (mut scene, template) = provisional(&h, "a_story_1");
        let situations = materialize_situations(&template, &fixture_world()).unwrap();
        scene.finalize(situations, h.today(), &h.stamp()).unwrap();
        scene.complete_current_situation(&h.stamp()).unwrap();

        let result = scene.choose(
            "witness_press",
            None,
            &PlayerResources::starting(),
            &h.stamp(),
        );

        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[test]
    fn test_replay_rebuilds_identical_state() {
        // Arrange
        let h = Harness::new();
        let (mut scene, template) = provisional(&h, "a_story_1");
        let situations = materialize_situations(&template, &fixture_world()).unwrap();
        scene.finalize(situations, h.today(), &h.stamp()).unwrap();
        scene
            .describe_situation(0, "Ash drifts over the road.".into(), &h.stamp())
            .unwrap();
        scene.complete_current_situation(&h.stamp()).unwrap();
        let stored: Vec<_> = scene
            .uncommitted_events()
            .iter()
            .map(DomainEvent::to_stored)
            .collect();

        // Act
        let replayed = chronicle_core::repository::replay(Scene::new(scene.id), &stored).unwrap();

        // Assert
        assert_eq!(replayed.version(), 4);
        assert_eq!(replayed.state(), SceneState::Active);
        assert_eq!(replayed.current_situation_index(), 1);
        assert_eq!(replayed.situations(), scene.situations());
        assert_eq!(replayed.situations()[0].description, "Ash drifts over the road.");
    }
}
