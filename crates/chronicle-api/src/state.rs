//! Shared application state.

use std::sync::Arc;

use chronicle_narrative::application::engine::ProgressionEngine;

/// Application state shared across all request handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The progression engine and everything it owns.
    pub engine: Arc<ProgressionEngine>,
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(engine: ProgressionEngine) -> Self {
        Self {
            engine: Arc::new(engine),
        }
    }
}
