//! Command handlers for the Narrative context.
//!
//! Each handler loads the aggregates it touches, runs the domain steps in
//! memory and persists only once every step has succeeded.

use std::collections::BTreeMap;

use chronicle_content::domain::resources::PlayerResources;
use chronicle_core::error::DomainError;
use chronicle_core::repository::save;
use chronicle_progression::application::command_handlers::{load_progress, require_progress};
use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

use super::completion::complete_situation;
use super::engine::ProgressionEngine;
use super::instantiator::{create_provisional_scene, delete_provisional_scene, finalize_scene};
use super::narrator::SituationContext;
use super::spawn_chain::{SpawnedScenes, spawn_scenes};
use crate::domain::commands::{
    ActivateScene, DeleteProvisionalScene, FinalizeScene, SelectChoice, SpawnScene, StartStory,
};
use crate::domain::manifest::DependentResourceManifest;
use crate::domain::scene::{SceneRoute, SceneState};

/// Result of `start_story`.
#[derive(Debug, Serialize)]
pub struct StoryStarted {
    pub player_id: Uuid,
    /// Provisional starter scenes, ordered by template id.
    pub scene_ids: Vec<Uuid>,
}

/// Result of `spawn_scene`.
#[derive(Debug, Serialize)]
pub struct SceneSpawned {
    pub scene_id: Uuid,
    pub template_id: String,
    /// Set when the template was generated for this spawn.
    pub generated: bool,
}

/// Result of `select_choice`.
#[derive(Debug, Serialize)]
pub struct ChoiceOutcome {
    pub scene_id: Uuid,
    pub choice_id: String,
    /// Holdings after cost and reward.
    pub resources: PlayerResources,
    pub route: SceneRoute,
    pub spawned_scene_ids: Vec<Uuid>,
    pub generated_template_ids: Vec<String>,
}

impl ProgressionEngine {
    /// Starts a player's story and spawns eligible starter scenes.
    ///
    /// Starter templates whose spawn conditions are not met are skipped.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the story already started, or an
    /// error from loading or appending events.
    pub async fn start_story(&self, command: &StartStory) -> Result<StoryStarted, DomainError> {
        let repo = self.repo.as_ref();
        let stamp = self.stamp(command.correlation_id);
        let today = self.clock.today();

        let mut progress = load_progress(command.player_id, repo).await?;
        progress.start(&stamp)?;

        let completed = progress.completed_template_ids();
        let mut scenes = Vec::new();
        for template in self.store.starter_templates() {
            let eligible = template.spawn_conditions.as_ref().is_none_or(|conditions| {
                conditions.are_met(&completed, progress.current_sequence(), &command.resources)
            });
            if !eligible {
                debug!(template_id = %template.id, "starter skipped, spawn conditions unmet");
                continue;
            }
            scenes.push(create_provisional_scene(
                self.ids.next_id(),
                command.player_id,
                &template,
                BTreeMap::new(),
                today,
                &stamp,
            )?);
        }

        save(repo, &mut progress).await?;
        let mut scene_ids = Vec::with_capacity(scenes.len());
        for scene in &mut scenes {
            save(repo, scene).await?;
            scene_ids.push(scene.id);
        }

        info!(
            player_id = %command.player_id,
            starters = scene_ids.len(),
            "story started"
        );
        Ok(StoryStarted {
            player_id: command.player_id,
            scene_ids,
        })
    }

    /// Creates a provisional scene from one spawn directive.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::AggregateNotFound` if the player's story never
    /// started, plus any error from resolving the directive's template.
    pub async fn spawn_scene(&self, command: &SpawnScene) -> Result<SceneSpawned, DomainError> {
        let repo = self.repo.as_ref();
        let stamp = self.stamp(command.correlation_id);
        let progress = require_progress(command.player_id, repo).await?;

        let SpawnedScenes {
            mut scenes,
            generated_template_ids,
        } = spawn_scenes(
            std::slice::from_ref(&command.spawn),
            command.player_id,
            command.source_sequence,
            &progress,
            &self.store,
            &self.generator,
            self.clock.today(),
            &stamp,
        )?;
        let mut scene = scenes
            .pop()
            .ok_or_else(|| DomainError::Validation("spawn produced no scene".into()))?;
        save(repo, &mut scene).await?;

        Ok(SceneSpawned {
            scene_id: scene.id,
            template_id: scene.template_id().to_owned(),
            generated: !generated_template_ids.is_empty(),
        })
    }

    /// Resolves a provisional scene's entities, Deferred → Active.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Unresolved` if a mandatory location is missing
    /// (the scene stays Deferred), or `DomainError::Validation` if the scene
    /// is not a live provisional scene.
    pub async fn finalize_scene(
        &self,
        command: &FinalizeScene,
    ) -> Result<DependentResourceManifest, DomainError> {
        let stamp = self.stamp(command.correlation_id);
        let mut scene = self.load_scene(command.scene_id).await?;
        let template = self.template_of(&scene)?;

        let manifest = finalize_scene(
            &mut scene,
            &template,
            self.resolver.as_ref(),
            self.clock.today(),
            &stamp,
        )?;
        save(self.repo.as_ref(), &mut scene).await?;
        Ok(manifest)
    }

    /// Finalizes the scene if still provisional, then narrates every
    /// situation that has no description yet.
    ///
    /// Narration never fails: provider errors fall back to deterministic
    /// text.
    ///
    /// # Errors
    ///
    /// Returns the finalize errors for a provisional scene, or
    /// `DomainError::Validation` for a completed or discarded one.
    pub async fn activate_scene(
        &self,
        command: &ActivateScene,
    ) -> Result<DependentResourceManifest, DomainError> {
        let stamp = self.stamp(command.correlation_id);
        let mut scene = self.load_scene(command.scene_id).await?;
        let template = self.template_of(&scene)?;

        let manifest = match scene.state() {
            SceneState::Deferred => finalize_scene(
                &mut scene,
                &template,
                self.resolver.as_ref(),
                self.clock.today(),
                &stamp,
            )?,
            SceneState::Active => {
                DependentResourceManifest::build(scene.id, &template, scene.situations())
            }
            SceneState::Completed => {
                return Err(DomainError::Validation(format!(
                    "scene {} is already completed",
                    scene.id
                )));
            }
        };

        let pending: Vec<(usize, SituationContext)> = scene
            .situations()
            .iter()
            .enumerate()
            .filter(|(_, s)| s.description.is_empty())
            .map(|(index, s)| (index, SituationContext::new(&template, s)))
            .collect();
        for (index, context) in pending {
            let description = self
                .narrator
                .describe(&context, &scene.situations()[index])
                .await;
            scene.describe_situation(index, description, &stamp)?;
        }

        save(self.repo.as_ref(), &mut scene).await?;
        info!(scene_id = %scene.id, template_id = %scene.template_id(), "scene activated");
        Ok(manifest)
    }

    /// Discards a provisional scene.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the scene was already finalized
    /// or discarded.
    pub async fn delete_provisional_scene(
        &self,
        command: &DeleteProvisionalScene,
    ) -> Result<(), DomainError> {
        let stamp = self.stamp(command.correlation_id);
        let mut scene = self.load_scene(command.scene_id).await?;
        delete_provisional_scene(&mut scene, &stamp)?;
        save(self.repo.as_ref(), &mut scene).await?;
        Ok(())
    }

    /// Takes a choice in the scene's current situation.
    ///
    /// Validates, pays the cost, applies the reward's outcomes, completes the
    /// situation (recording main-story completion) and then runs the spawn
    /// chain. Nothing is persisted unless every step succeeds.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` for an unavailable choice,
    /// `DomainError::ContentDefect` or `DomainError::Unresolved` for broken
    /// content, or an error from loading or appending events.
    pub async fn select_choice(&self, command: &SelectChoice) -> Result<ChoiceOutcome, DomainError> {
        let repo = self.repo.as_ref();
        let stamp = self.stamp(command.correlation_id);
        let mut scene = self.load_scene(command.scene_id).await?;
        let mut progress = require_progress(scene.player_id(), repo).await?;

        let choice = scene.choose(
            &command.choice_id,
            command.challenge_succeeded,
            &command.resources,
            &stamp,
        )?;
        let reward = choice.consequence.resolve(command.challenge_succeeded)?;

        let mut resources = command.resources.clone();
        choice.cost.pay(&mut resources);
        self.rewards.apply(reward, &scene, &mut resources)?;

        let route = complete_situation(&mut scene, &mut progress, &stamp)?;

        let SpawnedScenes {
            mut scenes,
            generated_template_ids,
        } = spawn_scenes(
            &reward.scenes_to_spawn,
            scene.player_id(),
            scene.main_story_sequence(),
            &progress,
            &self.store,
            &self.generator,
            self.clock.today(),
            &stamp,
        )?;

        save(repo, &mut scene).await?;
        save(repo, &mut progress).await?;
        let mut spawned_scene_ids = Vec::with_capacity(scenes.len());
        for spawned in &mut scenes {
            save(repo, spawned).await?;
            spawned_scene_ids.push(spawned.id);
        }

        info!(
            scene_id = %scene.id,
            choice_id = %choice.id,
            route = ?route,
            spawned = spawned_scene_ids.len(),
            "choice resolved"
        );
        Ok(ChoiceOutcome {
            scene_id: scene.id,
            choice_id: choice.id,
            resources,
            route,
            spawned_scene_ids,
            generated_template_ids,
        })
    }
}
