//! Domain types for the Template Store.

pub mod archetypes;
pub mod outcomes;
pub mod package;
pub mod placement;
pub mod requirements;
pub mod resources;
pub mod templates;
pub mod validation;
