//! Microsoft Graph directory adapter.
//!
//! Implements the directory service port: resolves a group by display name
//! and lists its members using an app-only (client credentials) token.

pub mod client;
pub mod models;

pub use client::GraphClient;
