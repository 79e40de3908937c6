//! Shared test mocks and fixtures for the Chronicle engine.

mod clock;
mod fixtures;
mod ids;
mod repository;

pub use clock::FixedClock;
pub use fixtures::{fixture_clock, fixture_world, tutorial_store};
pub use ids::SequentialIds;
pub use repository::{EmptyEventRepository, FailingEventRepository, RecordingEventRepository};
