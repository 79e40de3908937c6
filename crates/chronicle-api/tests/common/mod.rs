//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use chronicle_api::state::AppState;
use chronicle_event_store::in_memory::InMemoryEventRepository;
use chronicle_narrative::application::engine::ProgressionEngine;
use chronicle_test_support::{SequentialIds, fixture_clock, fixture_world, tutorial_store};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

/// Build the full app router over an in-memory event store, the tutorial
/// content and the bundled world. Uses the same route structure as
/// `main.rs`.
///
/// The router is cheap to clone and every clone shares the same engine.
pub fn build_test_app() -> Router {
    let engine = ProgressionEngine::new(
        Arc::new(InMemoryEventRepository::new()),
        tutorial_store(),
        Arc::new(fixture_world()),
        Arc::new(fixture_clock()),
        Arc::new(SequentialIds::new()),
    );
    chronicle_api::app(AppState::new(engine))
}

/// Send a request and return the status with the JSON body, or
/// `Value::Null` for an empty body.
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Body>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if body.is_some() {
        builder = builder.header("content-type", "application/json");
    }
    let request = builder.body(body.unwrap_or_else(Body::empty)).unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if body_bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body_bytes).unwrap()
    };

    (status, json)
}

/// Send a POST request with a JSON body and return the response.
pub async fn post_json(app: &Router, uri: &str, body: &Value) -> (StatusCode, Value) {
    let body = Body::from(serde_json::to_vec(body).unwrap());
    send(app, Method::POST, uri, Some(body)).await
}

/// Send a GET request and return the response.
pub async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Method::GET, uri, None).await
}

/// Send a DELETE request and return the response.
pub async fn delete(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Method::DELETE, uri, None).await
}

/// Start a story for `player_id` and return the starter scene ids.
pub async fn start_story(app: &Router, player_id: uuid::Uuid) -> Vec<String> {
    let (status, json) = post_json(
        app,
        "/api/v1/stories",
        &serde_json::json!({ "player_id": player_id }),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "start_story failed: {json}");
    json["scene_ids"]
        .as_array()
        .unwrap()
        .iter()
        .map(|id| id.as_str().unwrap().to_owned())
        .collect()
}
