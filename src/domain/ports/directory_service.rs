/// Directory service port (trait) for group membership lookups.
///
/// The directory is the source of truth for group rosters.
use crate::domain::models::MembersResponse;
use async_trait::async_trait;

#[async_trait]
pub trait DirectoryService: Send + Sync {
    /// Fetch the members of the group with the given display name
    ///
    /// Never fails: an unknown group or a transport error is reported as
    /// `MembersResponse { success: false, .. }` so callers can skip the
    /// group and carry on.
    async fn fetch_members(&self, group_name: &str) -> MembersResponse;
}
