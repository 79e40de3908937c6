//! Application services for the World context.

pub mod pool;
