//! The world/entity boundary.

use chronicle_content::domain::placement::PlacementFilter;

use super::entities::{Location, Npc};

/// Binds categorical filters to live world entities.
///
/// Implementations accept only category and tag constraints, never concrete
/// ids, and must be deterministic for a given world state.
pub trait EntityResolver: Send + Sync {
    /// Returns a location satisfying `filter`, if any exists.
    fn resolve_location(&self, filter: &PlacementFilter) -> Option<Location>;

    /// Returns an NPC satisfying `filter`, preferring one found at `near`.
    fn resolve_npc(&self, filter: &PlacementFilter, near: Option<&Location>) -> Option<Npc>;
}
