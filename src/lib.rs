//! groupsync - directory group to GitHub team reconciliation
//!
//! groupsync mirrors identity-directory groups (Microsoft Entra ID) into
//! GitHub organization teams. Each group's members are mapped from their
//! email address to a candidate GitHub login, resolved against the
//! platform, and added to the team of the same name. Members of a
//! designated group are also made organization members. Directory members
//! whose login cannot be resolved are reported back as sync issues.
//!
//! # Architecture
//!
//! This crate follows Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): models, ports and errors
//! - **Service Layer** (`services`): identity mapping and the reconciliation engine
//! - **Adapters** (`adapters`): GitHub, Microsoft Graph and the lookup cache
//! - **Infrastructure Layer** (`infrastructure`): configuration and logging
//! - **CLI Layer** (`cli`): Command-line interface
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use groupsync::adapters::{cache::CachedPlatformGateway, github::GitHubClient, graph::GraphClient};
//! use groupsync::{GroupDefinition, IdentityMapper, ReconciliationEngine};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = groupsync::ConfigLoader::load(None)?;
//!     let github = Arc::new(GitHubClient::new(config.github.token.clone())?);
//!     let engine = ReconciliationEngine::new(
//!         Arc::new(GraphClient::new(&config.directory)?),
//!         Arc::new(CachedPlatformGateway::new(github)),
//!         IdentityMapper::from_config(&config.identity_mapping),
//!     );
//!     let result = engine
//!         .synchronize_groups("my-org", &[GroupDefinition::active_directory("Engineers")])
//!         .await?;
//!     println!("{} users with sync issues", result.users_with_sync_issues().len());
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::errors::{DomainError, DomainResult};
pub use domain::models::{
    Config, DirectoryMember, GroupDefinition, MembersResponse, MembershipCheckResult,
    OperationOutcome, PlatformIdentity, PlatformTeam, ReconciliationResult, SyncIssueUser,
};
pub use domain::ports::{DirectoryService, PlatformGateway};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{IdentityMapper, ReconciliationEngine};
