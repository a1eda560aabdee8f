//! Port trait definitions (Hexagonal Architecture)
//!
//! This module defines async trait interfaces that infrastructure adapters must implement:
//! - DirectoryService: group membership lookups in the identity directory
//! - PlatformGateway: team, user and organization operations on the platform
//!
//! The reconciliation engine depends only on these traits, never on a
//! concrete HTTP client.

pub mod directory_service;
pub mod platform_gateway;

pub use directory_service::DirectoryService;
pub use platform_gateway::PlatformGateway;
