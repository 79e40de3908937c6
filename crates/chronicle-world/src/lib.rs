//! Chronicle — World bounded context.
//!
//! The engine's view of live world entities. Scenes never name a concrete
//! location or NPC; they hand a categorical filter to an `EntityResolver`
//! when they are finalized.

pub mod application;
pub mod bundled;
pub mod domain;
