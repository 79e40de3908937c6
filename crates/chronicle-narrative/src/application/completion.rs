//! The Completion Handler.
//!
//! Advances a scene past its current situation and, when a main-story scene
//! finishes, folds it into the player's rolling history.

use chronicle_core::error::DomainError;
use chronicle_core::event::Stamp;
use chronicle_progression::domain::events::CompletionRecorded;
use chronicle_progression::domain::progress::StoryProgress;
use tracing::{debug, info};

use crate::domain::scene::{Scene, SceneRoute, SceneState};

/// Builds the history entry for a completed main-story scene.
///
/// Region and personality come from the final situation.
///
/// # Errors
///
/// Returns `DomainError::Validation` if the scene has not completed, and
/// `DomainError::ContentDefect` if it lacks a sequence or category mapping.
pub fn completion_record(scene: &Scene) -> Result<CompletionRecorded, DomainError> {
    if scene.state() != SceneState::Completed {
        return Err(DomainError::Validation(format!(
            "scene {} has not completed",
            scene.id
        )));
    }
    let sequence = scene.main_story_sequence().ok_or_else(|| {
        DomainError::ContentDefect(format!(
            "main story scene {} has no sequence",
            scene.template_id()
        ))
    })?;
    let category = scene.category().ok_or_else(|| {
        DomainError::ContentDefect(format!(
            "main story scene {} has no archetype category",
            scene.template_id()
        ))
    })?;
    let last = scene.situations().last();

    Ok(CompletionRecorded {
        scene_id: scene.id,
        template_id: scene.template_id().to_owned(),
        sequence,
        archetype: scene.archetype(),
        category,
        intensity: category.intensity(),
        rhythm: scene.rhythm(),
        region: last.map(|s| s.location.region.clone()),
        personality: last.and_then(|s| s.npc.as_ref()).map(|n| n.personality),
    })
}

/// Finishes the scene's current situation.
///
/// When that completes a main-story scene, the completion is recorded on
/// `progress` before returning. A sequence the player already completed
/// (a sibling instance of the same template) completes the scene without
/// touching the history.
///
/// # Errors
///
/// Returns `DomainError::Validation` if the scene is not active, and
/// `DomainError::ContentDefect` for a main-story scene without sequence or
/// category.
pub fn complete_situation(
    scene: &mut Scene,
    progress: &mut StoryProgress,
    stamp: &Stamp<'_>,
) -> Result<SceneRoute, DomainError> {
    let route = scene.complete_current_situation(stamp)?;
    if route == SceneRoute::SceneCompleted {
        info!(scene_id = %scene.id, template_id = %scene.template_id(), "scene completed");
        if scene.is_main_story() {
            let record = completion_record(scene)?;
            if record.sequence <= progress.last_completed_sequence() {
                debug!(
                    scene_id = %scene.id,
                    sequence = record.sequence,
                    "sequence already in history, completion not recorded"
                );
            } else {
                progress.record_completion(record, stamp)?;
            }
        }
    }
    Ok(route)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use chronicle_content::domain::archetypes::ArchetypeCategory;
    use chronicle_content::domain::placement::PersonalityType;
    use chronicle_test_support::{SequentialIds, fixture_clock, fixture_world, tutorial_store};
    use uuid::Uuid;

    use super::*;
    use crate::domain::materialize::materialize_situations;

    struct Fixture {
        clock: chronicle_test_support::FixedClock,
        ids: SequentialIds,
    }

    impl Fixture {
        fn stamp(&self) -> Stamp<'_> {
            Stamp {
                correlation_id: Uuid::nil(),
                clock: &self.clock,
                ids: &self.ids,
            }
        }

        fn active_scene(&self, template_id: &str) -> Scene {
            let template = tutorial_store().get_template(template_id).unwrap();
            let today = self.clock.0.date_naive();
            let mut scene = Scene::create(
                Uuid::new_v4(),
                Uuid::new_v4(),
                &template,
                BTreeMap::new(),
                today,
                &self.stamp(),
            )
            .unwrap();
            scene
                .finalize(
                    materialize_situations(&template, &fixture_world()).unwrap(),
                    today,
                    &self.stamp(),
                )
                .unwrap();
            scene
        }

        fn started_progress(&self, player_id: Uuid) -> StoryProgress {
            let mut progress = StoryProgress::new(player_id);
            progress.start(&self.stamp()).unwrap();
            progress
        }
    }

    fn fixture() -> Fixture {
        Fixture {
            clock: fixture_clock(),
            ids: SequentialIds::new(),
        }
    }

    #[test]
    fn test_intermediate_situation_does_not_touch_history() {
        let f = fixture();
        let mut scene = f.active_scene("a_story_1");
        let mut progress = f.started_progress(scene.player_id());

        let route = complete_situation(&mut scene, &mut progress, &f.stamp()).unwrap();

        assert_eq!(route, SceneRoute::NextSituation { situation_index: 1 });
        assert_eq!(progress.last_completed_sequence(), 0);
    }

    #[test]
    fn test_main_story_completion_is_recorded() {
        // Arrange
        let f = fixture();
        let mut scene = f.active_scene("a_story_1");
        let mut progress = f.started_progress(scene.player_id());
        complete_situation(&mut scene, &mut progress, &f.stamp()).unwrap();

        // Act
        let route = complete_situation(&mut scene, &mut progress, &f.stamp()).unwrap();

        // Assert
        assert_eq!(route, SceneRoute::SceneCompleted);
        assert_eq!(progress.last_completed_sequence(), 1);
        assert_eq!(progress.current_sequence(), 2);
        assert_eq!(progress.recent_categories(), vec![ArchetypeCategory::Investigation]);
        let last = scene.situations().last().unwrap();
        assert_eq!(progress.recent_regions(), vec![last.location.region.clone()]);
    }

    #[test]
    fn test_completion_record_takes_final_situation_npc() {
        let f = fixture();
        let mut scene = f.active_scene("a_story_1");
        let mut progress = f.started_progress(scene.player_id());
        complete_situation(&mut scene, &mut progress, &f.stamp()).unwrap();
        complete_situation(&mut scene, &mut progress, &f.stamp()).unwrap();

        let record = completion_record(&scene).unwrap();

        let expected = scene.situations()[1].npc.as_ref().map(|n| n.personality);
        assert_eq!(record.personality, expected);
        assert!(matches!(
            record.personality,
            Some(PersonalityType::Devoted | PersonalityType::Steadfast)
        ));
        assert_eq!(record.sequence, 1);
    }

    #[test]
    fn test_side_story_completion_leaves_history_alone() {
        let f = fixture();
        let mut scene = f.active_scene("side_inn_lodging");
        let mut progress = f.started_progress(scene.player_id());

        let mut route = complete_situation(&mut scene, &mut progress, &f.stamp()).unwrap();
        while route != SceneRoute::SceneCompleted {
            route = complete_situation(&mut scene, &mut progress, &f.stamp()).unwrap();
        }

        assert_eq!(progress.last_completed_sequence(), 0);
        assert!(progress.completed_scenes().is_empty());
    }

    #[test]
    fn test_sibling_of_completed_sequence_still_completes() {
        // Arrange
        let f = fixture();
        let mut first = f.active_scene("a_story_1");
        let mut sibling = f.active_scene("a_story_1");
        let mut progress = f.started_progress(first.player_id());
        complete_situation(&mut first, &mut progress, &f.stamp()).unwrap();
        complete_situation(&mut first, &mut progress, &f.stamp()).unwrap();
        let history = progress.completed_scenes().len();

        // Act
        complete_situation(&mut sibling, &mut progress, &f.stamp()).unwrap();
        let route = complete_situation(&mut sibling, &mut progress, &f.stamp()).unwrap();

        // Assert
        assert_eq!(route, SceneRoute::SceneCompleted);
        assert_eq!(sibling.state(), SceneState::Completed);
        assert_eq!(progress.last_completed_sequence(), 1);
        assert_eq!(progress.completed_scenes().len(), history);
    }

    #[test]
    fn test_record_of_unfinished_scene_is_rejected() {
        let f = fixture();
        let scene = f.active_scene("a_story_1");

        let result = completion_record(&scene);

        match result {
            Err(DomainError::Validation(message)) => assert!(message.contains("not completed")),
            other => panic!("expected Validation, got {other:?}"),
        }
    }
}
