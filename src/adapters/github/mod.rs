//! GitHub platform adapter.
//!
//! Implements the platform gateway port over the GitHub REST API v3:
//! organization teams, team membership, organization membership and user
//! lookup.

pub mod client;
pub mod models;

pub use client::GitHubClient;
