//! Chronicle — Progression bounded context.
//!
//! Responsible for the per-player Progression Context (rolling history,
//! tier, pursuit goal), the rhythm signal derived from intensity history,
//! the archetype selector shared by authored and procedural content, and the
//! generator that writes main-story templates for sequences nobody authored.

pub mod application;
pub mod domain;
