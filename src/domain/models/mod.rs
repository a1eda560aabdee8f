//! Domain models.

pub mod config;
pub mod directory;
pub mod platform;
pub mod reconciliation;

pub use config::{
    CacheConfig, Config, DirectoryConfig, GitHubConfig, IdentityMappingConfig, LoggingConfig,
    TextReplacement,
};
pub use directory::{DirectoryMember, DirectorySource, GroupDefinition, MembersResponse};
pub use platform::{MembershipCheckResult, OperationOutcome, PlatformIdentity, PlatformTeam};
pub use reconciliation::{ReconciliationResult, SyncIssueUser};
