//! Query handlers for the Narrative context.

use chronicle_content::domain::archetypes::{ArchetypeCategory, RhythmPattern, SceneArchetype};
use chronicle_content::domain::templates::StoryCategory;
use chronicle_core::aggregate::AggregateRoot;
use chronicle_core::error::DomainError;
use chronicle_progression::application::query_handlers::{self, ProgressView};
use serde::Serialize;
use uuid::Uuid;

use super::engine::ProgressionEngine;
use crate::domain::record::SceneRecord;
use crate::domain::situation::Situation;

/// Read-only view of a scene.
#[derive(Debug, Serialize)]
pub struct SceneView {
    /// The persisted-state shape.
    #[serde(flatten)]
    pub record: SceneRecord,
    pub display_name: String,
    pub story_category: StoryCategory,
    pub category: Option<ArchetypeCategory>,
    pub archetype: SceneArchetype,
    pub rhythm: RhythmPattern,
    pub narrative_framing: Option<String>,
    /// Empty while the scene is Deferred.
    pub situations: Vec<Situation>,
    /// Current version (event count).
    pub version: i64,
}

impl ProgressionEngine {
    /// Retrieves a scene.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::AggregateNotFound` if the scene does not exist,
    /// or `DomainError::TemplateNotFound` if its template is no longer
    /// loaded.
    pub async fn get_scene(&self, scene_id: Uuid) -> Result<SceneView, DomainError> {
        let scene = self.load_scene(scene_id).await?;
        let template = self.template_of(&scene)?;
        Ok(SceneView {
            record: scene.to_record(),
            display_name: template.display_name.clone(),
            story_category: scene.story_category(),
            category: scene.category(),
            archetype: scene.archetype(),
            rhythm: scene.rhythm(),
            narrative_framing: template.narrative_framing.clone(),
            situations: scene.situations().to_vec(),
            version: scene.version(),
        })
    }

    /// Retrieves a player's progress.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::AggregateNotFound` if the story never started.
    pub async fn get_progress(&self, player_id: Uuid) -> Result<ProgressView, DomainError> {
        query_handlers::get_progress(player_id, self.repo.as_ref()).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chronicle_content::domain::resources::PlayerResources;
    use chronicle_event_store::in_memory::InMemoryEventRepository;
    use chronicle_test_support::{SequentialIds, fixture_clock, fixture_world, tutorial_store};

    use super::*;
    use crate::domain::commands::{ActivateScene, StartStory};
    use crate::domain::scene::SceneState;

    fn engine() -> ProgressionEngine {
        ProgressionEngine::new(
            Arc::new(InMemoryEventRepository::new()),
            tutorial_store(),
            Arc::new(fixture_world()),
            Arc::new(fixture_clock()),
            Arc::new(SequentialIds::new()),
        )
    }

    #[tokio::test]
    async fn test_get_scene_reports_deferred_then_active() {
        // Arrange
        let engine = engine();
        let player_id = Uuid::new_v4();
        let story = engine
            .start_story(&StartStory {
                correlation_id: Uuid::new_v4(),
                player_id,
                resources: PlayerResources::starting(),
            })
            .await
            .unwrap();
        let scene_id = story.scene_ids[0];

        // Act
        let deferred = engine.get_scene(scene_id).await.unwrap();
        engine
            .activate_scene(&ActivateScene {
                correlation_id: Uuid::new_v4(),
                scene_id,
            })
            .await
            .unwrap();
        let active = engine.get_scene(scene_id).await.unwrap();

        // Assert
        assert_eq!(deferred.record.state, SceneState::Deferred);
        assert!(deferred.situations.is_empty());
        assert_eq!(deferred.record.player_id, player_id);
        assert_eq!(deferred.record.main_story_sequence, Some(1));
        assert_eq!(active.record.state, SceneState::Active);
        assert_eq!(active.situations.len(), active.record.situation_count);
        assert!(active.version > deferred.version);
    }

    #[tokio::test]
    async fn test_scene_view_serializes_record_fields_flat() {
        let engine = engine();
        let story = engine
            .start_story(&StartStory {
                correlation_id: Uuid::new_v4(),
                player_id: Uuid::new_v4(),
                resources: PlayerResources::starting(),
            })
            .await
            .unwrap();

        let view = engine.get_scene(story.scene_ids[0]).await.unwrap();
        let json = serde_json::to_value(&view).unwrap();

        assert_eq!(json["template_id"], "a_story_1");
        assert_eq!(json["state"], "Deferred");
        assert_eq!(json["current_situation_index"], 0);
    }

    #[tokio::test]
    async fn test_get_scene_unknown_is_not_found() {
        let engine = engine();

        let result = engine.get_scene(Uuid::new_v4()).await;

        match result {
            Err(DomainError::AggregateNotFound(_)) => {}
            other => panic!("expected AggregateNotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_get_progress_before_start_is_not_found() {
        let engine = engine();

        let result = engine.get_progress(Uuid::new_v4()).await;

        assert!(matches!(result, Err(DomainError::AggregateNotFound(_))));
    }
}
