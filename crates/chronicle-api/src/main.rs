//! Chronicle API server entry point.

use std::error::Error;
use std::sync::Arc;

use chronicle_api::config::AppConfig;
use chronicle_api::startup::build_engine;
use chronicle_api::state::AppState;
use chronicle_core::repository::EventRepository;
use chronicle_event_store::in_memory::InMemoryEventRepository;
use chronicle_event_store::pg_event_repository::{PgEventRepository, run_migrations};
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Initialize tracing subscriber.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    tracing::info!("Starting Chronicle API server");

    let config = AppConfig::from_env()?;

    let repo: Arc<dyn EventRepository> = match &config.database_url {
        Some(database_url) => {
            let pool = PgPoolOptions::new()
                .max_connections(10)
                .connect(database_url)
                .await?;
            run_migrations(&pool).await?;
            tracing::info!("Using PostgreSQL event store");
            Arc::new(PgEventRepository::new(pool))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, events are kept in memory");
            Arc::new(InMemoryEventRepository::new())
        }
    };

    // No narrative provider is bundled, so situations use authored fallback text.
    let engine = build_engine(&config, repo, None)?;
    let app = chronicle_api::app(AppState::new(engine));

    let addr = config.bind_addr()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app).await?;

    Ok(())
}
