//! The Reward / Spawn Chain.
//!
//! Turns `scenesToSpawn` directives into provisional scenes. A next-main-story
//! directive targets the sequence after the spawning scene; when no template
//! exists for it, the generator writes one from the player's history first.
//! Spawn conditions are not checked here: they gate starter scenes only.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::NaiveDate;
use chronicle_content::application::store::TemplateStore;
use chronicle_content::domain::outcomes::SceneSpawnReward;
use chronicle_content::domain::templates::SceneTemplate;
use chronicle_core::error::DomainError;
use chronicle_core::event::Stamp;
use chronicle_progression::application::generator::TemplateGenerator;
use chronicle_progression::domain::progress::StoryProgress;
use chronicle_progression::domain::selection::SelectionInputs;
use tracing::debug;
use uuid::Uuid;

use super::instantiator::create_provisional_scene;
use crate::domain::scene::Scene;

/// Template a spawn directive points at.
#[derive(Debug, Clone)]
pub struct SpawnTarget {
    pub template: Arc<SceneTemplate>,
    /// `true` if the template was generated for this spawn.
    pub generated: bool,
}

/// Scenes created by one pass over a reward's directives.
#[derive(Debug, Default)]
pub struct SpawnedScenes {
    pub scenes: Vec<Scene>,
    pub generated_template_ids: Vec<String>,
}

/// Main-story sequence a next-main-story directive points at.
#[must_use]
pub fn next_sequence(source_sequence: Option<u32>, progress: &StoryProgress) -> u32 {
    source_sequence.map_or_else(|| progress.current_sequence(), |n| n + 1)
}

/// Finds or generates the template a directive names.
///
/// # Errors
///
/// Returns `DomainError::Validation` for a directive with neither a template
/// id nor the next-main-story marker, `DomainError::TemplateNotFound` for an
/// unknown id, and `DomainError::ContentDefect` if generation fails.
pub fn resolve_spawn_target(
    spawn: &SceneSpawnReward,
    source_sequence: Option<u32>,
    progress: &StoryProgress,
    store: &TemplateStore,
    generator: &TemplateGenerator,
) -> Result<SpawnTarget, DomainError> {
    if spawn.spawn_next_main_story_scene {
        let sequence = next_sequence(source_sequence, progress);
        if let Some(template) = store.main_story_template(sequence) {
            return Ok(SpawnTarget {
                template,
                generated: false,
            });
        }
        return generate_or_reuse(sequence, progress, store, generator);
    }

    let template_id = spawn.template_id.as_deref().ok_or_else(|| {
        DomainError::Validation("spawn directive names no template".into())
    })?;
    Ok(SpawnTarget {
        template: store.require_template(template_id)?,
        generated: false,
    })
}

/// Generates the template for `sequence`, or takes the one another spawn
/// loaded between the caller's lookup and this generation.
///
/// # Errors
///
/// Returns the generator's error when no template for `sequence` exists
/// afterwards.
pub fn generate_or_reuse(
    sequence: u32,
    progress: &StoryProgress,
    store: &TemplateStore,
    generator: &TemplateGenerator,
) -> Result<SpawnTarget, DomainError> {
    match generator.generate_next_template(
        sequence,
        progress,
        &SelectionInputs::from_progress(progress),
    ) {
        Ok(template_id) => Ok(SpawnTarget {
            template: store.require_template(&template_id)?,
            generated: true,
        }),
        Err(err) => match store.main_story_template(sequence) {
            Some(template) => {
                debug!(
                    sequence,
                    template_id = %template.id,
                    "sequence claimed concurrently, reusing loaded template"
                );
                Ok(SpawnTarget {
                    template,
                    generated: false,
                })
            }
            None => Err(err),
        },
    }
}

/// Creates a provisional scene for every directive, in order.
///
/// Parameters are copied verbatim from each directive.
///
/// # Errors
///
/// Returns the first error from resolving a target or creating a scene.
#[allow(clippy::too_many_arguments)]
pub fn spawn_scenes(
    spawns: &[SceneSpawnReward],
    player_id: Uuid,
    source_sequence: Option<u32>,
    progress: &StoryProgress,
    store: &TemplateStore,
    generator: &TemplateGenerator,
    today: NaiveDate,
    stamp: &Stamp<'_>,
) -> Result<SpawnedScenes, DomainError> {
    let mut spawned = SpawnedScenes::default();
    for spawn in spawns {
        let target = resolve_spawn_target(spawn, source_sequence, progress, store, generator)?;
        if target.generated {
            spawned
                .generated_template_ids
                .push(target.template.id.clone());
        }
        let parameters: BTreeMap<String, String> = spawn.parameters.clone();
        spawned.scenes.push(create_provisional_scene(
            stamp.ids.next_id(),
            player_id,
            &target.template,
            parameters,
            today,
            stamp,
        )?);
    }
    Ok(spawned)
}
