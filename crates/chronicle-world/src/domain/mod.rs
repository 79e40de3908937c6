//! Domain types for the World context.

pub mod entities;
pub mod resolver;
