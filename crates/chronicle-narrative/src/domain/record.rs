//! Persisted-state shape of a scene and reconstruction from it.
//!
//! A record holds only scalars and the template id. Situations are rebuilt
//! by re-resolving the template against the world, which is deterministic.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use chronicle_content::domain::templates::SceneTemplate;
use chronicle_core::error::DomainError;
use chronicle_world::domain::resolver::EntityResolver;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::materialize::materialize_situations;
use super::scene::{Scene, SceneState};

/// Flat, format-agnostic snapshot of a scene.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneRecord {
    pub scene_id: Uuid,
    pub player_id: Uuid,
    pub template_id: String,
    pub state: SceneState,
    pub discarded: bool,
    pub situation_count: usize,
    pub current_situation_index: usize,
    pub parameters: BTreeMap<String, String>,
    pub main_story_sequence: Option<u32>,
    pub expires_on: Option<NaiveDate>,
}

impl Scene {
    /// Snapshot of this scene's persisted state.
    #[must_use]
    pub fn to_record(&self) -> SceneRecord {
        SceneRecord {
            scene_id: self.id,
            player_id: self.player_id,
            template_id: self.template_id.clone(),
            state: self.state,
            discarded: self.discarded,
            situation_count: self.situation_count,
            current_situation_index: self.current_situation_index,
            parameters: self.parameters.clone(),
            main_story_sequence: self.main_story_sequence,
            expires_on: self.expires_on,
        }
    }

    /// Rebuilds a live scene from `record`.
    ///
    /// Situations of an active or completed scene are re-resolved and
    /// described with deterministic fallback text; situations before the
    /// current index are marked completed.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the record does not belong to
    /// `template` or its indices are out of range, `DomainError::ContentDefect`
    /// for an unmapped main-story archetype, and `DomainError::Unresolved`
    /// if the world no longer offers a mandatory location.
    pub fn restore(
        record: &SceneRecord,
        template: &SceneTemplate,
        resolver: &dyn EntityResolver,
    ) -> Result<Self, DomainError> {
        if record.template_id != template.id {
            return Err(DomainError::Validation(format!(
                "record of scene {} names template {}, not {}",
                record.scene_id, record.template_id, template.id
            )));
        }
        if record.situation_count != template.situations.len()
            || (record.situation_count > 0
                && record.current_situation_index >= record.situation_count)
        {
            return Err(DomainError::Validation(format!(
                "record of scene {} does not fit template {}",
                record.scene_id, template.id
            )));
        }

        let mut scene = Self::new(record.scene_id);
        scene.created = true;
        scene.player_id = record.player_id;
        scene.template_id.clone_from(&record.template_id);
        scene.state = record.state;
        scene.discarded = record.discarded;
        scene.situation_count = record.situation_count;
        scene.current_situation_index = record.current_situation_index;
        scene.parameters.clone_from(&record.parameters);
        scene.main_story_sequence = record.main_story_sequence;
        scene.story_category = template.story_category;
        scene.category = if template.is_main_story() {
            Some(template.category()?)
        } else {
            template.category().ok()
        };
        scene.archetype = template.scene_archetype;
        scene.rhythm = template.rhythm_pattern;
        scene.expires_on = record.expires_on;

        if record.state != SceneState::Deferred {
            let mut situations = materialize_situations(template, resolver)?;
            for (index, situation) in situations.iter_mut().enumerate() {
                situation.description = situation.fallback_description();
                situation.completed = record.state == SceneState::Completed
                    || index < record.current_situation_index;
            }
            scene.situations = situations;
        }
        Ok(scene)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chronicle_core::event::Stamp;
    use chronicle_test_support::{SequentialIds, fixture_clock, fixture_world, tutorial_store};

    #[test]
    fn test_record_round_trip_rebuilds_active_scene() {
        // Arrange
        let clock = fixture_clock();
        let ids = SequentialIds::new();
        let stamp = Stamp {
            correlation_id: Uuid::nil(),
            clock: &clock,
            ids: &ids,
        };
        let world = fixture_world();
        let template = tutorial_store().get_template("a_story_2").unwrap();
        let parameters = BTreeMap::from([("Destination".to_owned(), "Ravenford".to_owned())]);
        let mut scene = Scene::create(
            Uuid::new_v4(),
            Uuid::new_v4(),
            &template,
            parameters,
            clock.0.date_naive(),
            &stamp,
        )
        .unwrap();
        scene
            .finalize(
                materialize_situations(&template, &world).unwrap(),
                clock.0.date_naive(),
                &stamp,
            )
            .unwrap();
        scene.complete_current_situation(&stamp).unwrap();

        // Act
        let record = scene.to_record();
        let restored = Scene::restore(&record, &template, &world).unwrap();

        // Assert
        assert_eq!(restored.to_record(), record);
        assert_eq!(restored.situations().len(), 2);
        assert!(restored.situations()[0].completed);
        assert!(!restored.situations()[1].completed);
        assert_eq!(restored.parameter("Destination"), Some("Ravenford"));
        assert_eq!(
            restored.situations()[1].location,
            scene.situations()[1].location
        );
        assert!(restored.situations().iter().all(|s| !s.description.is_empty()));
    }

    #[test]
    fn test_restore_rejects_foreign_template() {
        let store = tutorial_store();
        let record = SceneRecord {
            scene_id: Uuid::new_v4(),
            player_id: Uuid::new_v4(),
            template_id: "a_story_1".into(),
            state: SceneState::Deferred,
            discarded: false,
            situation_count: 2,
            current_situation_index: 0,
            parameters: BTreeMap::new(),
            main_story_sequence: Some(1),
            expires_on: None,
        };
        let other = store.get_template("a_story_2").unwrap();

        let result = Scene::restore(&record, &other, &fixture_world());

        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[test]
    fn test_restored_deferred_scene_has_no_situations() {
        let store = tutorial_store();
        let template = store.get_template("a_story_1").unwrap();
        let record = SceneRecord {
            scene_id: Uuid::new_v4(),
            player_id: Uuid::new_v4(),
            template_id: "a_story_1".into(),
            state: SceneState::Deferred,
            discarded: false,
            situation_count: 2,
            current_situation_index: 0,
            parameters: BTreeMap::new(),
            main_story_sequence: Some(1),
            expires_on: None,
        };

        let restored = Scene::restore(&record, &template, &fixture_world()).unwrap();

        assert_eq!(restored.state(), SceneState::Deferred);
        assert!(restored.situations().is_empty());
        assert_eq!(restored.situation_count(), 2);
    }
}
