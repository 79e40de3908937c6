//! Integration tests for the story endpoints.

mod common;

use axum::http::StatusCode;
use uuid::Uuid;

#[tokio::test]
async fn test_start_story_spawns_starters_and_progress() {
    let app = common::build_test_app();
    let player_id = Uuid::new_v4();

    // POST /api/v1/stories
    let scene_ids = common::start_story(&app, player_id).await;

    assert_eq!(scene_ids.len(), 2);

    // GET /api/v1/stories/{player_id} — verify persisted progress
    let (status, json) = common::get_json(&app, &format!("/api/v1/stories/{player_id}")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["player_id"], player_id.to_string());
    assert_eq!(json["current_sequence"], 1);
    assert_eq!(json["last_completed_sequence"], 0);
    assert!(json["completed_scenes"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_start_story_twice_returns_400() {
    let app = common::build_test_app();
    let player_id = Uuid::new_v4();
    common::start_story(&app, player_id).await;

    let (status, json) = common::post_json(
        &app,
        "/api/v1/stories",
        &serde_json::json!({ "player_id": player_id }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "validation_error");
}

#[tokio::test]
async fn test_start_story_accepts_explicit_resources() {
    let app = common::build_test_app();
    let mut resources =
        serde_json::to_value(chronicle_content::domain::resources::PlayerResources::starting())
            .unwrap();
    resources["flags"] = serde_json::json!(["ledgers_opened"]);

    let (status, json) = common::post_json(
        &app,
        "/api/v1/stories",
        &serde_json::json!({ "player_id": Uuid::new_v4(), "resources": resources }),
    )
    .await;

    // The archive starter also needs a_story_2 completed, so it stays closed.
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["scene_ids"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_get_progress_for_unknown_player_returns_404() {
    let app = common::build_test_app();

    let (status, json) =
        common::get_json(&app, &format!("/api/v1/stories/{}", Uuid::new_v4())).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "aggregate_not_found");
}
