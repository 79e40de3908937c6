//! Content loading and engine assembly.

use std::path::Path;
use std::sync::Arc;

use chronicle_content::application::store::{LoadedPackage, TemplateStore};
use chronicle_content::bundled::TUTORIAL_PACKAGE;
use chronicle_core::clock::SystemClock;
use chronicle_core::repository::EventRepository;
use chronicle_core::ids::TimeOrderedIds;
use chronicle_narrative::application::engine::ProgressionEngine;
use chronicle_narrative::application::narrator::{NarrativeProvider, Narrator};
use chronicle_world::application::pool::WorldPool;
use chronicle_world::bundled::BUNDLED_WORLD;
use tracing::info;

use crate::config::AppConfig;
use crate::error::AppError;

/// Loads the tutorial package, then every `*.json` package in
/// `content_dir` ordered by file name.
///
/// # Errors
///
/// Returns `AppError::Server` if the directory cannot be read and
/// `AppError::Content` if any package is defective.
pub fn load_content(
    store: &TemplateStore,
    content_dir: Option<&Path>,
) -> Result<Vec<LoadedPackage>, AppError> {
    let mut loaded = vec![store.load_package(TUTORIAL_PACKAGE)?];

    if let Some(dir) = content_dir {
        let mut paths = std::fs::read_dir(dir)?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<Result<Vec<_>, _>>()?;
        paths.retain(|p| p.extension().is_some_and(|ext| ext == "json"));
        paths.sort();

        for path in paths {
            let json = std::fs::read_to_string(&path)?;
            let package = store.load_package(&json)?;
            info!(
                path = %path.display(),
                package_id = %package.package_id,
                templates = package.template_ids.len(),
                "loaded content package"
            );
            loaded.push(package);
        }
    }

    Ok(loaded)
}

/// Assembles an engine over `repo` with the loaded content and the bundled
/// world.
///
/// Narration uses `provider` bounded by the configured timeout, or the
/// authored fallback text when no provider is given.
///
/// # Errors
///
/// Returns `AppError::Content` or `AppError::Server` if content fails to
/// load.
pub fn build_engine(
    config: &AppConfig,
    repo: Arc<dyn EventRepository>,
    provider: Option<Arc<dyn NarrativeProvider>>,
) -> Result<ProgressionEngine, AppError> {
    let store = TemplateStore::new();
    let packages = load_content(&store, config.content_dir.as_deref())?;
    let world = WorldPool::from_json(BUNDLED_WORLD)?;
    info!(packages = packages.len(), "content ready");

    let engine = ProgressionEngine::new(
        repo,
        Arc::new(store),
        Arc::new(world),
        Arc::new(SystemClock),
        Arc::new(TimeOrderedIds),
    );

    Ok(match provider {
        Some(provider) => {
            engine.with_narrator(Narrator::new(provider, config.narrative_timeout))
        }
        None => engine,
    })
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use async_trait::async_trait;
    use chronicle_event_store::in_memory::InMemoryEventRepository;
    use chronicle_narrative::application::narrator::{NarrativeError, SituationContext};
    use uuid::Uuid;

    use super::*;

    struct Quiet;

    #[async_trait]
    impl NarrativeProvider for Quiet {
        async fn generate_description(
            &self,
            context: &SituationContext,
        ) -> Result<String, NarrativeError> {
            Ok(format!("{} falls quiet.", context.situation_name))
        }
    }

    struct Slow;

    #[async_trait]
    impl NarrativeProvider for Slow {
        async fn generate_description(
            &self,
            _context: &SituationContext,
        ) -> Result<String, NarrativeError> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok("too late".into())
        }
    }

    async fn activated_descriptions(engine: &ProgressionEngine) -> Vec<String> {
        let started = engine
            .start_story(&chronicle_narrative::domain::commands::StartStory {
                correlation_id: Uuid::new_v4(),
                player_id: Uuid::new_v4(),
                resources: chronicle_content::domain::resources::PlayerResources::starting(),
            })
            .await
            .unwrap();
        let scene_id = started.scene_ids[0];
        engine
            .activate_scene(&chronicle_narrative::domain::commands::ActivateScene {
                correlation_id: Uuid::new_v4(),
                scene_id,
            })
            .await
            .unwrap();
        let scene = engine.load_scene(scene_id).await.unwrap();
        scene
            .situations()
            .iter()
            .map(|s| s.description.clone())
            .collect()
    }

    fn config(content_dir: Option<std::path::PathBuf>) -> AppConfig {
        AppConfig {
            host: "127.0.0.1".into(),
            port: 0,
            database_url: None,
            content_dir,
            narrative_timeout: Duration::from_millis(50),
        }
    }

    fn side_package(template_id: &str) -> String {
        let mut package: serde_json::Value = serde_json::from_str(TUTORIAL_PACKAGE).unwrap();
        let mut side = package["sceneTemplates"]
            .as_array()
            .unwrap()
            .iter()
            .find(|t| t["id"] == "side_inn_lodging")
            .cloned()
            .unwrap();
        side["id"] = template_id.into();
        package["packageId"] = format!("pkg_{template_id}").into();
        package["sceneTemplates"] = serde_json::json!([side]);
        package.to_string()
    }

    #[test]
    fn test_load_content_without_directory_loads_tutorial() {
        let store = TemplateStore::new();

        let loaded = load_content(&store, None).unwrap();

        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].package_id, "main_story_tutorial");
        assert!(store.get_template("a_story_1").is_some());
    }

    #[test]
    fn test_load_content_reads_json_files_in_name_order() {
        // Arrange
        let dir = std::env::temp_dir().join(format!("chronicle-content-{}", Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("b_second.json"), side_package("side_b")).unwrap();
        std::fs::write(dir.join("a_first.json"), side_package("side_a")).unwrap();
        std::fs::write(dir.join("notes.txt"), "not content").unwrap();
        let store = TemplateStore::new();

        // Act
        let loaded = load_content(&store, Some(&dir)).unwrap();
        std::fs::remove_dir_all(&dir).unwrap();

        // Assert
        let ids: Vec<_> = loaded.iter().map(|p| p.package_id.as_str()).collect();
        assert_eq!(ids, ["main_story_tutorial", "pkg_side_a", "pkg_side_b"]);
    }

    #[test]
    fn test_load_content_missing_directory_is_server_error() {
        let store = TemplateStore::new();
        let dir = std::env::temp_dir().join(format!("chronicle-missing-{}", Uuid::new_v4()));

        let result = load_content(&store, Some(&dir));

        match result {
            Err(AppError::Server(_)) => {}
            other => panic!("expected Server, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_build_engine_narrates_through_provider() {
        // Arrange
        let engine = build_engine(
            &config(None),
            Arc::new(InMemoryEventRepository::new()),
            Some(Arc::new(Quiet) as Arc<dyn NarrativeProvider>),
        )
        .unwrap();
        let started = engine
            .start_story(&chronicle_narrative::domain::commands::StartStory {
                correlation_id: Uuid::new_v4(),
                player_id: Uuid::new_v4(),
                resources: chronicle_content::domain::resources::PlayerResources::starting(),
            })
            .await
            .unwrap();
        let scene_id = started.scene_ids[0];

        // Act
        engine
            .activate_scene(&chronicle_narrative::domain::commands::ActivateScene {
                correlation_id: Uuid::new_v4(),
                scene_id,
            })
            .await
            .unwrap();

        // Assert
        let scene = engine.load_scene(scene_id).await.unwrap();
        assert!(
            scene
                .situations()
                .iter()
                .all(|s| s.description.ends_with("falls quiet."))
        );
    }

    #[tokio::test]
    async fn test_build_engine_bounds_provider_by_configured_timeout() {
        // Arrange
        let engine = build_engine(
            &config(None),
            Arc::new(InMemoryEventRepository::new()),
            Some(Arc::new(Slow) as Arc<dyn NarrativeProvider>),
        )
        .unwrap();

        // Act
        let started_at = std::time::Instant::now();
        let descriptions = activated_descriptions(&engine).await;

        // Assert
        assert!(started_at.elapsed() < Duration::from_secs(5));
        assert!(descriptions.iter().all(|d| !d.is_empty() && d != "too late"));
    }

    #[tokio::test]
    async fn test_build_engine_without_provider_uses_fallback_text() {
        let engine = build_engine(&config(None), Arc::new(InMemoryEventRepository::new()), None)
            .unwrap();

        let descriptions = activated_descriptions(&engine).await;

        assert!(!descriptions.is_empty());
        assert!(descriptions.iter().all(|d| !d.is_empty()));
    }
}
