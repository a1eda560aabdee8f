//! Infrastructure layer module
//!
//! Process-level concerns that are not adapters for a port:
//! - Configuration management
//! - Logging infrastructure

pub mod config;
pub mod logging;
