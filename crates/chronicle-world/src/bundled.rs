//! World shipped with the engine.

/// Default world document, used when no world is configured.
pub const BUNDLED_WORLD: &str = include_str!("../../../content/world.json");
