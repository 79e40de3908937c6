//! Application services for the Template Store.

pub mod store;
