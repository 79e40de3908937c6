//! Routes for loading authored content and reading templates.

use axum::extract::{Path, State};
use axum::{Json, Router, routing::get, routing::post};
use chronicle_content::application::store::LoadedPackage;
use chronicle_content::domain::templates::SceneTemplate;
use chronicle_core::error::DomainError;
use tracing::{info, instrument};

use crate::error::ApiError;
use crate::state::AppState;

/// POST /
///
/// The body is a template package document.
#[instrument(skip(state, body), fields(bytes = body.len()))]
async fn load_package(
    State(state): State<AppState>,
    body: String,
) -> Result<Json<LoadedPackage>, ApiError> {
    // Package defects are client errors on this route.
    let loaded = state
        .engine
        .store()
        .load_package(&body)
        .map_err(|err| match err {
            DomainError::ContentDefect(message) => DomainError::Validation(message),
            other => other,
        })?;

    info!(
        package_id = %loaded.package_id,
        templates = loaded.template_ids.len(),
        "loaded content package"
    );

    Ok(Json(loaded))
}

/// GET /{template_id}
async fn get_template(
    State(state): State<AppState>,
    Path(template_id): Path<String>,
) -> Result<Json<SceneTemplate>, ApiError> {
    let template = state.engine.store().require_template(&template_id)?;
    Ok(Json(SceneTemplate::clone(&template)))
}

/// Returns the router for template endpoints.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(load_package))
        .route("/{template_id}", get(get_template))
}
