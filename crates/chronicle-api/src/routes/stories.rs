//! Routes for starting a story and reading a player's progress.

use axum::extract::{Path, State};
use axum::{Json, Router, routing::get, routing::post};
use chronicle_content::domain::resources::PlayerResources;
use chronicle_narrative::application::command_handlers::StoryStarted;
use chronicle_narrative::domain::commands;
use chronicle_progression::application::query_handlers::ProgressView;
use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for POST /.
#[derive(Debug, Deserialize)]
pub struct StartStoryRequest {
    /// Player starting the story.
    pub player_id: Uuid,
    /// Holdings checked against starter spawn conditions. Defaults to a new
    /// player's starting resources.
    #[serde(default)]
    pub resources: Option<PlayerResources>,
}

/// POST /
#[instrument(skip(state, request), fields(player_id = %request.player_id))]
async fn start_story(
    State(state): State<AppState>,
    Json(request): Json<StartStoryRequest>,
) -> Result<Json<StoryStarted>, ApiError> {
    let command = commands::StartStory {
        correlation_id: Uuid::new_v4(),
        player_id: request.player_id,
        resources: request.resources.unwrap_or_else(PlayerResources::starting),
    };

    info!(correlation_id = %command.correlation_id, "handling start_story command");

    let started = state.engine.start_story(&command).await?;
    Ok(Json(started))
}

/// GET /{player_id}
async fn get_progress(
    State(state): State<AppState>,
    Path(player_id): Path<Uuid>,
) -> Result<Json<ProgressView>, ApiError> {
    let view = state.engine.get_progress(player_id).await?;
    Ok(Json(view))
}

/// Returns the router for story endpoints.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(start_story))
        .route("/{player_id}", get(get_progress))
}
