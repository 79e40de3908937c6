//! The Scene Instantiator.
//!
//! Two phases: a provisional scene records only what the template says,
//! finalisation resolves every situation against the world in one step.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use chronicle_content::domain::templates::SceneTemplate;
use chronicle_core::error::DomainError;
use chronicle_core::event::Stamp;
use chronicle_world::domain::resolver::EntityResolver;
use tracing::info;
use uuid::Uuid;

use crate::domain::manifest::DependentResourceManifest;
use crate::domain::materialize::materialize_situations;
use crate::domain::scene::Scene;

/// Creates a Deferred scene for `player_id` from `template`.
///
/// # Errors
///
/// Returns `DomainError::ContentDefect` if a main-story template has no
/// category mapping.
pub fn create_provisional_scene(
    scene_id: Uuid,
    player_id: Uuid,
    template: &SceneTemplate,
    parameters: BTreeMap<String, String>,
    today: NaiveDate,
    stamp: &Stamp<'_>,
) -> Result<Scene, DomainError> {
    let scene = Scene::create(scene_id, player_id, template, parameters, today, stamp)?;
    info!(
        scene_id = %scene_id,
        player_id = %player_id,
        template_id = %template.id,
        sequence = ?template.main_story_sequence,
        "provisional scene created"
    );
    Ok(scene)
}

/// Resolves entities and moves `scene` from Deferred to Active.
///
/// On any failure the scene is left Deferred with no situations.
///
/// # Errors
///
/// Returns `DomainError::Unresolved` if a mandatory location is missing,
/// or `DomainError::Validation` if the scene is not a live provisional
/// scene or has expired.
pub fn finalize_scene(
    scene: &mut Scene,
    template: &SceneTemplate,
    resolver: &dyn EntityResolver,
    today: NaiveDate,
    stamp: &Stamp<'_>,
) -> Result<DependentResourceManifest, DomainError> {
    if scene.template_id() != template.id {
        return Err(DomainError::Validation(format!(
            "scene {} was created from {}, not {}",
            scene.id,
            scene.template_id(),
            template.id
        )));
    }
    let situations = materialize_situations(template, resolver)?;
    let manifest = DependentResourceManifest::build(scene.id, template, &situations);
    scene.finalize(situations, today, stamp)?;

    info!(
        scene_id = %scene.id,
        template_id = %template.id,
        situations = scene.situation_count(),
        dependent_locations = manifest.locations.len(),
        dependent_items = manifest.items.len(),
        "scene finalized"
    );
    Ok(manifest)
}

/// Discards a provisional scene.
///
/// # Errors
///
/// Returns `DomainError::Validation` if the scene was already finalized or
/// discarded.
pub fn delete_provisional_scene(scene: &mut Scene, stamp: &Stamp<'_>) -> Result<(), DomainError> {
    scene.discard(stamp)?;
    info!(scene_id = %scene.id, template_id = %scene.template_id(), "provisional scene discarded");
    Ok(())
}
