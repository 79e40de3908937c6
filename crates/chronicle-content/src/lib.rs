//! Chronicle — Template Store bounded context.
//!
//! Responsible for the immutable scene blueprints the progression engine
//! instantiates: archetype tables, requirement and reward value types,
//! template packages, ingestion-time validation, and the append-only store
//! both authored and generated content are loaded into.

pub mod application;
pub mod bundled;
pub mod domain;
