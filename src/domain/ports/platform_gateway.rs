/// Platform gateway port (trait) for team and organization operations.
///
/// Implemented by the GitHub REST adapter and by the caching decorator that
/// wraps it.
use crate::domain::errors::DomainResult;
use crate::domain::models::{
    MembershipCheckResult, OperationOutcome, PlatformIdentity, PlatformTeam,
};
use async_trait::async_trait;

#[async_trait]
pub trait PlatformGateway: Send + Sync {
    /// Lists the teams of an organization
    async fn get_all_teams(&self, org: &str) -> DomainResult<Vec<PlatformTeam>>;

    /// Creates a team with the given name
    async fn create_team(&self, org: &str, name: &str) -> DomainResult<PlatformTeam>;

    /// Adds (or keeps) a user as a plain member of a team
    async fn add_team_member(&self, team_id: u64, identity: &PlatformIdentity) -> DomainResult<()>;

    /// Checks whether a user belongs to the organization
    async fn is_org_member(
        &self,
        org: &str,
        identity: &PlatformIdentity,
    ) -> DomainResult<MembershipCheckResult>;

    /// Invites or adds a user to the organization
    ///
    /// Failures of the call itself are reported in the returned
    /// [`OperationOutcome`]; `Err` is reserved for failures outside the
    /// call (none in the GitHub adapter).
    async fn add_org_member(
        &self,
        org: &str,
        identity: &PlatformIdentity,
    ) -> DomainResult<OperationOutcome>;

    /// Resolves a candidate login to an existing account
    ///
    /// # Returns
    /// - `Some(PlatformIdentity)` if the account exists
    /// - `None` if there is no such account
    ///
    /// # Errors
    /// Any other failure (transport, auth, unexpected status)
    async fn resolve_identity(&self, candidate: &str) -> DomainResult<Option<PlatformIdentity>>;
}
