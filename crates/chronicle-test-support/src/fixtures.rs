//! Fixture content and world shared across crate tests.

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use chronicle_content::application::store::TemplateStore;
use chronicle_content::bundled::TUTORIAL_PACKAGE;
use chronicle_world::application::pool::WorldPool;
use chronicle_world::bundled::BUNDLED_WORLD;

use crate::clock::FixedClock;

/// A store holding the tutorial package (main story 1 to 3).
///
/// # Panics
///
/// Panics if the bundled package fails validation.
#[must_use]
pub fn tutorial_store() -> Arc<TemplateStore> {
    let store = TemplateStore::new();
    store
        .load_package(TUTORIAL_PACKAGE)
        .expect("bundled tutorial package is valid");
    Arc::new(store)
}

/// The bundled world.
///
/// # Panics
///
/// Panics if the bundled world document is malformed.
#[must_use]
pub fn fixture_world() -> WorldPool {
    WorldPool::from_json(BUNDLED_WORLD).expect("bundled world is valid")
}

/// Clock pinned to 2026-01-15 10:00 UTC.
///
/// # Panics
///
/// Never in practice; the date is a valid constant.
#[must_use]
pub fn fixture_clock() -> FixedClock {
    FixedClock(
        Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0)
            .single()
            .expect("valid fixture timestamp"),
    )
}
