//! Chronicle — Narrative bounded context.
//!
//! Responsible for scenes and their situations: the Deferred → Active →
//! Completed lifecycle, entity resolution at finalize time, narration
//! through a pluggable provider, the reward/spawn chain that carries
//! parameters from one scene into the next, and the completion handler that
//! feeds the Progression Context.

pub mod application;
pub mod domain;
