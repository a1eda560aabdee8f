//! Infrastructure adapters for external systems.

pub mod cache;
pub mod github;
pub mod graph;

#[cfg(test)]
pub mod mock;
