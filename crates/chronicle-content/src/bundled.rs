//! Content shipped with the engine.

/// The authored tutorial package: main-story sequences 1 to 3 plus the
/// side and service scenes they reference.
pub const TUTORIAL_PACKAGE: &str = include_str!("../../../content/main_story_tutorial.json");
