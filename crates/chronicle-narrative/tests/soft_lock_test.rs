//! A player with nothing can always move forward.

mod common;

use chronicle_content::domain::resources::PlayerResources;
use chronicle_narrative::domain::scene::SceneState;
use chronicle_test_support::tutorial_store;
use common::Harness;

#[test]
fn test_every_main_story_situation_offers_an_accessible_choice() {
    let store = tutorial_store();

    for template in store.main_story_templates() {
        for situation in &template.situations {
            assert!(
                situation.has_accessible_choice(),
                "{}/{} can soft-lock",
                template.id,
                situation.id
            );
        }
    }
}

#[tokio::test]
async fn test_depleted_player_walks_the_whole_main_story() {
    // Arrange
    let harness = Harness::start(PlayerResources::depleted()).await;
    let mut scene_id = harness.opening_scene();
    let mut resources = PlayerResources::depleted();

    // Act
    for _ in 1..=5 {
        let scene = harness.activate(scene_id).await;
        for situation in scene.situations() {
            assert!(
                situation
                    .available_choices(&PlayerResources::depleted())
                    .next()
                    .is_some(),
                "{} offers nothing to a depleted player",
                situation.template_id
            );
        }
        let (outcome, after) = harness.play_fallbacks(scene_id, resources).await;
        resources = after;
        assert_eq!(harness.scene(scene_id).await.state(), SceneState::Completed);
        scene_id = outcome.spawned_scene_ids[0];
    }

    // Assert
    let progress = harness.engine.get_progress(harness.player_id).await.unwrap();
    assert_eq!(progress.last_completed_sequence, 5);
    assert_eq!(resources.coins, 0);
}

#[tokio::test]
async fn test_sibling_instances_of_one_sequence_both_complete() {
    // Arrange
    let harness = Harness::start(PlayerResources::starting()).await;
    let opening = harness.opening_scene();
    let sibling = harness.spawn_next_after(0).await;
    assert_eq!(harness.scene(sibling).await.template_id(), "a_story_1");
    let (_, resources) = harness
        .play_fallbacks(opening, PlayerResources::starting())
        .await;

    // Act
    let (outcome, _) = harness.play_fallbacks(sibling, resources).await;

    // Assert
    assert_eq!(harness.scene(sibling).await.state(), SceneState::Completed);
    let progress = harness.engine.get_progress(harness.player_id).await.unwrap();
    assert_eq!(progress.last_completed_sequence, 1);
    assert_eq!(progress.completed_scenes.len(), 1);
    let next = harness.scene(outcome.spawned_scene_ids[0]).await;
    assert_eq!(next.template_id(), "a_story_2");
}
