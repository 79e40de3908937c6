//! The progression engine.
//!
//! Owns the collaborators every scene command needs. Command handlers live
//! in `command_handlers`, read models in `query_handlers`.

use std::sync::Arc;

use chronicle_content::application::store::TemplateStore;
use chronicle_content::domain::templates::SceneTemplate;
use chronicle_core::clock::Clock;
use chronicle_core::error::DomainError;
use chronicle_core::event::Stamp;
use chronicle_core::ids::IdSource;
use chronicle_core::repository::{EventRepository, replay};
use chronicle_progression::application::generator::TemplateGenerator;
use chronicle_world::domain::resolver::EntityResolver;
use uuid::Uuid;

use super::narrator::Narrator;
use super::rewards::{ResourceRewardApplicator, RewardApplicator};
use crate::domain::scene::Scene;

/// Scene lifecycle, narration, rewards and the spawn chain over one event
/// repository.
pub struct ProgressionEngine {
    pub(crate) repo: Arc<dyn EventRepository>,
    pub(crate) store: Arc<TemplateStore>,
    pub(crate) resolver: Arc<dyn EntityResolver>,
    pub(crate) narrator: Narrator,
    pub(crate) rewards: Arc<dyn RewardApplicator>,
    pub(crate) generator: TemplateGenerator,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) ids: Arc<dyn IdSource>,
}

impl std::fmt::Debug for ProgressionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressionEngine")
            .field("narrator", &self.narrator)
            .finish_non_exhaustive()
    }
}

impl ProgressionEngine {
    /// Builds an engine with fallback-only narration and the resource
    /// reward applicator.
    #[must_use]
    pub fn new(
        repo: Arc<dyn EventRepository>,
        store: Arc<TemplateStore>,
        resolver: Arc<dyn EntityResolver>,
        clock: Arc<dyn Clock>,
        ids: Arc<dyn IdSource>,
    ) -> Self {
        let generator = TemplateGenerator::new(Arc::clone(&store), Arc::clone(&clock));
        Self {
            repo,
            store,
            resolver,
            narrator: Narrator::fallback_only(),
            rewards: Arc::new(ResourceRewardApplicator),
            generator,
            clock,
            ids,
        }
    }

    #[must_use]
    pub fn with_narrator(mut self, narrator: Narrator) -> Self {
        self.narrator = narrator;
        self
    }

    #[must_use]
    pub fn with_reward_applicator(mut self, rewards: Arc<dyn RewardApplicator>) -> Self {
        self.rewards = rewards;
        self
    }

    /// The template store scenes are instantiated from.
    #[must_use]
    pub fn store(&self) -> &Arc<TemplateStore> {
        &self.store
    }

    pub(crate) fn stamp(&self, correlation_id: Uuid) -> Stamp<'_> {
        Stamp {
            correlation_id,
            clock: self.clock.as_ref(),
            ids: self.ids.as_ref(),
        }
    }

    /// Reconstitutes a scene from its event stream.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::AggregateNotFound` if the scene has no history,
    /// or `DomainError::Infrastructure` if loading or deserialization fails.
    pub async fn load_scene(&self, scene_id: Uuid) -> Result<Scene, DomainError> {
        let history = self.repo.load_events(scene_id).await?;
        if history.is_empty() {
            return Err(DomainError::AggregateNotFound(scene_id));
        }
        replay(Scene::new(scene_id), &history)
    }

    pub(crate) fn template_of(&self, scene: &Scene) -> Result<Arc<SceneTemplate>, DomainError> {
        self.store.require_template(scene.template_id())
    }
}
