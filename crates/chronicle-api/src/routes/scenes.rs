//! Routes for the scene lifecycle: spawn, activate, choose, discard.

use std::collections::BTreeMap;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Json, Router, routing::get, routing::post};
use chronicle_content::domain::outcomes::SceneSpawnReward;
use chronicle_content::domain::resources::PlayerResources;
use chronicle_narrative::application::command_handlers::{ChoiceOutcome, SceneSpawned};
use chronicle_narrative::application::query_handlers::SceneView;
use chronicle_narrative::domain::commands;
use chronicle_narrative::domain::manifest::DependentResourceManifest;
use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for POST /.
#[derive(Debug, Deserialize)]
pub struct SpawnSceneRequest {
    /// Player whose story receives the scene.
    pub player_id: Uuid,
    /// Template to instantiate. Ignored when `spawn_next_main_story_scene`
    /// is set.
    #[serde(default)]
    pub template_id: Option<String>,
    /// Values copied verbatim onto the provisional scene.
    #[serde(default)]
    pub parameters: BTreeMap<String, String>,
    /// Spawn the next main-story sequence, generating it if unauthored.
    #[serde(default)]
    pub spawn_next_main_story_scene: bool,
    /// Main-story sequence of the scene that triggered the spawn.
    #[serde(default)]
    pub source_sequence: Option<u32>,
}

/// Request body for POST /{scene_id}/choices.
#[derive(Debug, Deserialize)]
pub struct SelectChoiceRequest {
    /// Choice of the scene's current situation.
    pub choice_id: String,
    /// Outcome of the choice's challenge, if it has one.
    #[serde(default)]
    pub challenge_succeeded: Option<bool>,
    /// Player holdings before the choice is paid for.
    pub resources: PlayerResources,
}

/// POST /
#[instrument(skip(state, request), fields(player_id = %request.player_id))]
async fn spawn_scene(
    State(state): State<AppState>,
    Json(request): Json<SpawnSceneRequest>,
) -> Result<Json<SceneSpawned>, ApiError> {
    let command = commands::SpawnScene {
        correlation_id: Uuid::new_v4(),
        player_id: request.player_id,
        spawn: SceneSpawnReward {
            template_id: request.template_id,
            parameters: request.parameters,
            spawn_next_main_story_scene: request.spawn_next_main_story_scene,
        },
        source_sequence: request.source_sequence,
    };

    info!(correlation_id = %command.correlation_id, "handling spawn_scene command");

    let spawned = state.engine.spawn_scene(&command).await?;
    Ok(Json(spawned))
}

/// GET /{scene_id}
async fn get_scene(
    State(state): State<AppState>,
    Path(scene_id): Path<Uuid>,
) -> Result<Json<SceneView>, ApiError> {
    let view = state.engine.get_scene(scene_id).await?;
    Ok(Json(view))
}

/// POST /{scene_id}/activate
#[instrument(skip(state))]
async fn activate_scene(
    State(state): State<AppState>,
    Path(scene_id): Path<Uuid>,
) -> Result<Json<DependentResourceManifest>, ApiError> {
    let command = commands::ActivateScene {
        correlation_id: Uuid::new_v4(),
        scene_id,
    };

    info!(correlation_id = %command.correlation_id, "handling activate_scene command");

    let manifest = state.engine.activate_scene(&command).await?;
    Ok(Json(manifest))
}

/// DELETE /{scene_id}
#[instrument(skip(state))]
async fn delete_provisional_scene(
    State(state): State<AppState>,
    Path(scene_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let command = commands::DeleteProvisionalScene {
        correlation_id: Uuid::new_v4(),
        scene_id,
    };

    info!(correlation_id = %command.correlation_id, "handling delete_provisional_scene command");

    state.engine.delete_provisional_scene(&command).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /{scene_id}/choices
#[instrument(skip(state, request), fields(choice_id = %request.choice_id))]
async fn select_choice(
    State(state): State<AppState>,
    Path(scene_id): Path<Uuid>,
    Json(request): Json<SelectChoiceRequest>,
) -> Result<Json<ChoiceOutcome>, ApiError> {
    let command = commands::SelectChoice {
        correlation_id: Uuid::new_v4(),
        scene_id,
        choice_id: request.choice_id,
        challenge_succeeded: request.challenge_succeeded,
        resources: request.resources,
    };

    info!(correlation_id = %command.correlation_id, "handling select_choice command");

    let outcome = state.engine.select_choice(&command).await?;
    Ok(Json(outcome))
}

/// Returns the router for scene endpoints.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(spawn_scene))
        .route("/{scene_id}", get(get_scene).delete(delete_provisional_scene))
        .route("/{scene_id}/activate", post(activate_scene))
        .route("/{scene_id}/choices", post(select_choice))
}
