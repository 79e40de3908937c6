//! Identifier generation abstraction for determinism.
//!
//! Every identifier minted by domain code (event ids, scene ids) comes from
//! an injected `IdSource`, so replays and tests can substitute a sequence.

use uuid::Uuid;

/// Abstraction over identifier generation.
pub trait IdSource: Send + Sync {
    /// Returns a fresh identifier.
    fn next_id(&self) -> Uuid;
}

/// Production id source producing time-ordered v7 UUIDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeOrderedIds;

impl IdSource for TimeOrderedIds {
    fn next_id(&self) -> Uuid {
        Uuid::now_v7()
    }
}
