//! In-memory caching layer for repeated platform lookups.
//!
//! Uses `moka` for idle-expiry caching. Wraps the platform gateway trait
//! as a decorator.

pub mod cached_platform_gateway;

pub use cached_platform_gateway::CachedPlatformGateway;
