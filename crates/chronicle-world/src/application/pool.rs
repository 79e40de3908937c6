//! Deterministic in-memory world pool.

use chronicle_content::domain::placement::PlacementFilter;
use chronicle_core::error::DomainError;
use serde::Deserialize;
use tracing::debug;

use crate::domain::entities::{Location, Npc};
use crate::domain::resolver::EntityResolver;

#[derive(Debug, Deserialize)]
struct WorldDocument {
    #[serde(default)]
    locations: Vec<Location>,
    #[serde(default)]
    npcs: Vec<Npc>,
}

/// Read-only set of locations and NPCs the engine resolves against.
///
/// Candidates are ordered by name then id, so identical filters always bind
/// the same entities.
#[derive(Debug, Default, Clone)]
pub struct WorldPool {
    locations: Vec<Location>,
    npcs: Vec<Npc>,
}

impl WorldPool {
    /// Builds a pool, checking the spatial hierarchy is complete.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ContentDefect` when a location has no region or
    /// an NPC's home location is not part of the world.
    pub fn new(mut locations: Vec<Location>, mut npcs: Vec<Npc>) -> Result<Self, DomainError> {
        if let Some(orphan) = locations.iter().find(|l| l.region.trim().is_empty()) {
            return Err(DomainError::ContentDefect(format!(
                "location {} has no region",
                orphan.name
            )));
        }
        if let Some(stray) = npcs.iter().find(|n| {
            n.home_location
                .is_some_and(|home| !locations.iter().any(|l| l.id == home))
        }) {
            return Err(DomainError::ContentDefect(format!(
                "npc {} lives at a location outside the world",
                stray.name
            )));
        }

        locations.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        npcs.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(Self { locations, npcs })
    }

    /// Parses a `{ "locations": [...], "npcs": [...] }` document.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ContentDefect` for malformed JSON or an
    /// incomplete spatial hierarchy.
    pub fn from_json(json: &str) -> Result<Self, DomainError> {
        let document: WorldDocument = serde_json::from_str(json)
            .map_err(|e| DomainError::ContentDefect(format!("malformed world document: {e}")))?;
        Self::new(document.locations, document.npcs)
    }

    /// All locations, in resolution order.
    #[must_use]
    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    /// All NPCs, in resolution order.
    #[must_use]
    pub fn npcs(&self) -> &[Npc] {
        &self.npcs
    }
}

impl EntityResolver for WorldPool {
    fn resolve_location(&self, filter: &PlacementFilter) -> Option<Location> {
        let mut candidates = self.locations.iter().filter(|l| l.matches(filter));
        let preferred = candidates
            .clone()
            .find(|l| !filter.avoid_regions.contains(&l.region));
        let resolved = preferred.or_else(|| candidates.next()).cloned();
        debug!(
            resolved = resolved.as_ref().map(|l| l.name.as_str()),
            "resolved location"
        );
        resolved
    }

    fn resolve_npc(&self, filter: &PlacementFilter, near: Option<&Location>) -> Option<Npc> {
        let lives_near = |npc: &&Npc| near.is_some_and(|l| npc.home_location == Some(l.id));
        let mut candidates = self.npcs.iter().filter(|n| n.matches(filter));

        if !filter.wants_npc() {
            // Unconstrained: only someone already at the location appears.
            return candidates.find(lives_near).cloned();
        }

        candidates
            .clone()
            .find(lives_near)
            .or_else(|| candidates.next())
            .cloned()
    }
}
