//! Domain layer for group-to-team synchronization
//!
//! This module contains the core models, the port traits adapters must
//! implement, and the domain error type.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{DomainError, DomainResult};
