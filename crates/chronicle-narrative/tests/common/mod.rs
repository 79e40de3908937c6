//! Shared helpers for engine integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use chronicle_content::domain::outcomes::SceneSpawnReward;
use chronicle_content::domain::resources::PlayerResources;
use chronicle_content::domain::templates::ChoicePathType;
use chronicle_event_store::in_memory::InMemoryEventRepository;
use chronicle_narrative::application::command_handlers::ChoiceOutcome;
use chronicle_narrative::application::engine::ProgressionEngine;
use chronicle_narrative::domain::commands::{
    ActivateScene, SelectChoice, SpawnScene, StartStory,
};
use chronicle_narrative::domain::scene::{Scene, SceneRoute};
use chronicle_test_support::{SequentialIds, fixture_clock, fixture_world, tutorial_store};
use uuid::Uuid;

/// An engine over the tutorial content, the bundled world and an in-memory
/// event store, with one player whose story has started.
pub struct Harness {
    pub engine: ProgressionEngine,
    pub player_id: Uuid,
    /// Starter scene ids, ordered by template id.
    pub starters: Vec<Uuid>,
}

impl Harness {
    pub async fn start(resources: PlayerResources) -> Self {
        let engine = ProgressionEngine::new(
            Arc::new(InMemoryEventRepository::new()),
            tutorial_store(),
            Arc::new(fixture_world()),
            Arc::new(fixture_clock()),
            Arc::new(SequentialIds::new()),
        );
        let player_id = Uuid::new_v4();
        let started = engine
            .start_story(&StartStory {
                correlation_id: Uuid::new_v4(),
                player_id,
                resources,
            })
            .await
            .unwrap();
        Self {
            engine,
            player_id,
            starters: started.scene_ids,
        }
    }

    /// The first main-story scene.
    pub fn opening_scene(&self) -> Uuid {
        self.starters[0]
    }

    pub async fn scene(&self, scene_id: Uuid) -> Scene {
        self.engine.load_scene(scene_id).await.unwrap()
    }

    pub async fn activate(&self, scene_id: Uuid) -> Scene {
        self.engine
            .activate_scene(&ActivateScene {
                correlation_id: Uuid::new_v4(),
                scene_id,
            })
            .await
            .unwrap();
        self.scene(scene_id).await
    }

    pub async fn choose(
        &self,
        scene_id: Uuid,
        choice_id: &str,
        challenge_succeeded: Option<bool>,
        resources: &PlayerResources,
    ) -> ChoiceOutcome {
        self.engine
            .select_choice(&SelectChoice {
                correlation_id: Uuid::new_v4(),
                scene_id,
                choice_id: choice_id.to_owned(),
                challenge_succeeded,
                resources: resources.clone(),
            })
            .await
            .unwrap()
    }

    pub async fn spawn_next_after(&self, source_sequence: u32) -> Uuid {
        self.engine
            .spawn_scene(&SpawnScene {
                correlation_id: Uuid::new_v4(),
                player_id: self.player_id,
                spawn: SceneSpawnReward::next_main_story(),
                source_sequence: Some(source_sequence),
            })
            .await
            .unwrap()
            .scene_id
    }

    /// Activates `scene_id` and takes the Fallback choice of every situation.
    ///
    /// Returns the final outcome and the holdings afterwards.
    pub async fn play_fallbacks(
        &self,
        scene_id: Uuid,
        resources: PlayerResources,
    ) -> (ChoiceOutcome, PlayerResources) {
        let mut resources = resources;
        let mut scene = self.activate(scene_id).await;
        loop {
            let situation = scene.current_situation().unwrap();
            let fallback = situation
                .choices
                .iter()
                .find(|c| c.path_type == ChoicePathType::Fallback)
                .unwrap_or_else(|| panic!("{} has no fallback", situation.template_id));
            assert!(
                fallback.is_available_to(&resources),
                "fallback {} is not available",
                fallback.id
            );
            let outcome = self.choose(scene_id, &fallback.id, None, &resources).await;
            resources = outcome.resources.clone();
            if outcome.route == SceneRoute::SceneCompleted {
                return (outcome, resources);
            }
            scene = self.scene(scene_id).await;
        }
    }
}
