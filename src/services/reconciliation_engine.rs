//! Group-to-team reconciliation.
//!
//! For each requested directory group the engine resolves (or creates) the
//! team of the same name, fetches the group roster, maps every member's
//! email to a platform login, and adds validated users to the team. When
//! promotion is requested, users who are not yet organization members are
//! added to the organization as well.
//!
//! Failure policy:
//! - a directory fetch failure skips that group and the run continues
//! - an email that maps to no platform account is recorded as a sync issue
//!   and the run continues
//! - any other gateway error aborts the run

use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::domain::errors::DomainResult;
use crate::domain::models::{
    DirectoryMember, GroupDefinition, MembershipCheckResult, PlatformTeam, ReconciliationResult,
    SyncIssueUser,
};
use crate::domain::ports::{DirectoryService, PlatformGateway};
use crate::services::identity_mapper::IdentityMapper;

/// Reconciles directory groups into platform teams.
///
/// Work is strictly sequential: groups are processed in input order and
/// members in roster order, with one remote call in flight at a time.
pub struct ReconciliationEngine {
    directory: Arc<dyn DirectoryService>,
    platform: Arc<dyn PlatformGateway>,
    mapper: IdentityMapper,
}

impl ReconciliationEngine {
    pub fn new(
        directory: Arc<dyn DirectoryService>,
        platform: Arc<dyn PlatformGateway>,
        mapper: IdentityMapper,
    ) -> Self {
        Self {
            directory,
            platform,
            mapper,
        }
    }

    /// Synchronize team membership for every group, in order.
    pub async fn synchronize_groups(
        &self,
        org: &str,
        groups: &[GroupDefinition],
    ) -> DomainResult<ReconciliationResult> {
        self.synchronize(org, groups, false).await
    }

    /// Synchronize team membership for one group and promote its members
    /// to organization membership.
    pub async fn synchronize_members(
        &self,
        org: &str,
        group: &GroupDefinition,
    ) -> DomainResult<ReconciliationResult> {
        self.synchronize(org, std::slice::from_ref(group), true).await
    }

    #[instrument(skip(self, groups), fields(groups = groups.len()), err)]
    async fn synchronize(
        &self,
        org: &str,
        groups: &[GroupDefinition],
        promote_to_org_membership: bool,
    ) -> DomainResult<ReconciliationResult> {
        // Fetched once per invocation; teams created below are appended.
        let mut known_teams = self.platform.get_all_teams(org).await?;
        let mut failed_groups: Vec<String> = Vec::new();
        let mut result = ReconciliationResult::new();

        for group in groups {
            let team = self.resolve_team(org, &mut known_teams, &group.name).await?;

            let response = self.directory.fetch_members(&group.name).await;
            if !response.success {
                warn!(group = %group.name, source = %group.source, "failed to fetch group members, skipping group");
                failed_groups.push(group.name.clone());
                continue;
            }

            info!(
                group = %group.name,
                team_id = team.id,
                members = response.members.len(),
                "synchronizing group"
            );

            for member in &response.members {
                self.synchronize_member(org, &team, member, promote_to_org_membership, &mut result)
                    .await?;
            }
        }

        if !failed_groups.is_empty() {
            warn!(failed_groups = ?failed_groups, "some groups could not be synchronized");
        }

        Ok(result)
    }

    /// Exact-name lookup in the known teams, creating the team when absent.
    /// The first team with a matching name wins.
    async fn resolve_team(
        &self,
        org: &str,
        known_teams: &mut Vec<PlatformTeam>,
        name: &str,
    ) -> DomainResult<PlatformTeam> {
        if let Some(team) = known_teams.iter().find(|t| t.name == name) {
            debug!(team = name, team_id = team.id, "using existing team");
            return Ok(team.clone());
        }

        let team = self.platform.create_team(org, name).await?;
        info!(team = name, team_id = team.id, "created team");
        known_teams.push(team.clone());
        Ok(team)
    }

    async fn synchronize_member(
        &self,
        org: &str,
        team: &PlatformTeam,
        member: &DirectoryMember,
        promote_to_org_membership: bool,
        result: &mut ReconciliationResult,
    ) -> DomainResult<()> {
        let candidate = self.mapper.to_identity(&member.email);

        let Some(identity) = self.platform.resolve_identity(&candidate).await? else {
            warn!(email = %member.email, candidate = %candidate, "no platform account for directory member");
            result.record(SyncIssueUser::new(member.email.clone(), candidate));
            return Ok(());
        };

        self.platform.add_team_member(team.id, &identity).await?;
        debug!(user = %identity, team = %team.name, "added team member");

        if !promote_to_org_membership {
            return Ok(());
        }

        let membership = self.platform.is_org_member(org, &identity).await?;
        if membership == MembershipCheckResult::IsNotOrgMember {
            let outcome = self.platform.add_org_member(org, &identity).await?;
            if outcome.succeeded {
                info!(user = %identity, "added organization member");
            } else {
                warn!(
                    user = %identity,
                    message = outcome.message.as_deref().unwrap_or_default(),
                    "failed to add organization member"
                );
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::{member, MockDirectory, MockPlatform};
    use crate::domain::errors::DomainError;
    use crate::domain::models::TextReplacement;

    fn strip_domain() -> IdentityMapper {
        IdentityMapper::new("", "", vec![TextReplacement::new("@co.com", "")])
    }

    fn engine(directory: Arc<MockDirectory>, platform: Arc<MockPlatform>) -> ReconciliationEngine {
        ReconciliationEngine::new(directory, platform, strip_domain())
    }

    #[tokio::test]
    async fn test_engineers_scenario() {
        let directory = Arc::new(MockDirectory::new(vec![(
            "Engineers",
            vec![member("a@co.com"), member("b@co.com")],
        )]));
        let platform = Arc::new(MockPlatform::new(&["a"]));
        let engine = engine(directory, platform.clone());

        let result = engine
            .synchronize_groups("acme", &[GroupDefinition::active_directory("Engineers")])
            .await
            .unwrap();

        assert_eq!(
            platform.calls(),
            vec![
                "get_all_teams:acme",
                "create_team:Engineers",
                "resolve_identity:a",
                "add_team_member:100:a",
                "resolve_identity:b",
            ]
        );
        assert_eq!(
            result.users_with_sync_issues(),
            &[SyncIssueUser::new("b@co.com", "b")]
        );
    }

    #[tokio::test]
    async fn test_existing_team_is_reused() {
        let directory = Arc::new(MockDirectory::new(vec![("Engineers", vec![member("a@co.com")])]));
        let platform = Arc::new(MockPlatform::new(&["a"]).with_team(7, "Engineers"));
        let engine = engine(directory, platform.clone());

        engine
            .synchronize_groups("acme", &[GroupDefinition::active_directory("Engineers")])
            .await
            .unwrap();

        assert_eq!(platform.count("create_team"), 0);
        assert_eq!(platform.count("add_team_member:7:a"), 1);
    }

    #[tokio::test]
    async fn test_team_match_is_exact() {
        let directory = Arc::new(MockDirectory::new(vec![("Engineers", vec![])]));
        let platform = Arc::new(MockPlatform::new(&[]).with_team(7, "engineers"));
        let engine = engine(directory, platform.clone());

        engine
            .synchronize_groups("acme", &[GroupDefinition::active_directory("Engineers")])
            .await
            .unwrap();

        assert_eq!(platform.count("create_team:Engineers"), 1);
    }

    #[tokio::test]
    async fn test_repeated_group_creates_team_once() {
        let directory = Arc::new(MockDirectory::new(vec![("Ops", vec![member("a@co.com")])]));
        let platform = Arc::new(MockPlatform::new(&["a"]));
        let engine = engine(directory, platform.clone());

        let ops = GroupDefinition::active_directory("Ops");
        engine
            .synchronize_groups("acme", &[ops.clone(), ops])
            .await
            .unwrap();

        assert_eq!(platform.count("create_team"), 1);
        assert_eq!(platform.count("get_all_teams"), 1);
        assert_eq!(platform.count("add_team_member:100:a"), 2);
    }

    #[tokio::test]
    async fn test_sync_issues_deduplicated_across_groups() {
        let directory = Arc::new(MockDirectory::new(vec![
            ("Engineers", vec![member("ghost@co.com"), member("a@co.com")]),
            ("Ops", vec![member("ghost@co.com")]),
        ]));
        let platform = Arc::new(MockPlatform::new(&["a"]));
        let engine = engine(directory, platform);

        let result = engine
            .synchronize_groups(
                "acme",
                &[
                    GroupDefinition::active_directory("Engineers"),
                    GroupDefinition::active_directory("Ops"),
                ],
            )
            .await
            .unwrap();

        assert_eq!(
            result.users_with_sync_issues(),
            &[SyncIssueUser::new("ghost@co.com", "ghost")]
        );
    }

    #[tokio::test]
    async fn test_failed_group_does_not_block_others() {
        // "Missing" is unknown to the directory, so its fetch fails.
        let directory = Arc::new(MockDirectory::new(vec![("Ops", vec![member("h@co.com")])]));
        let platform = Arc::new(MockPlatform::new(&["h"]));
        let engine = engine(directory.clone(), platform.clone());

        let result = engine
            .synchronize_groups(
                "acme",
                &[
                    GroupDefinition::active_directory("Missing"),
                    GroupDefinition::active_directory("Ops"),
                ],
            )
            .await
            .unwrap();

        assert_eq!(directory.fetched(), vec!["Missing", "Ops"]);
        assert_eq!(platform.count("create_team:Missing"), 1);
        assert_eq!(platform.count("add_team_member:101:h"), 1);
        // Group failures are not part of the returned result.
        assert!(result.is_clean());
    }

    #[tokio::test]
    async fn test_synchronize_groups_never_touches_org_membership() {
        let directory = Arc::new(MockDirectory::new(vec![("Ops", vec![member("a@co.com")])]));
        let platform = Arc::new(MockPlatform::new(&["a"]));
        let engine = engine(directory, platform.clone());

        engine
            .synchronize_groups("acme", &[GroupDefinition::active_directory("Ops")])
            .await
            .unwrap();

        assert_eq!(platform.count("is_org_member"), 0);
        assert_eq!(platform.count("add_org_member"), 0);
    }

    #[tokio::test]
    async fn test_synchronize_members_adds_only_non_members() {
        let directory = Arc::new(MockDirectory::new(vec![(
            "Everyone",
            vec![member("a@co.com"), member("n@co.com")],
        )]));
        let platform = Arc::new(MockPlatform::new(&["a", "n"]).with_org_members(&["a"]));
        let engine = engine(directory, platform.clone());

        engine
            .synchronize_members("acme", &GroupDefinition::active_directory("Everyone"))
            .await
            .unwrap();

        assert_eq!(platform.count("is_org_member"), 2);
        assert_eq!(platform.count("add_org_member"), 1);
        assert_eq!(platform.count("add_org_member:n"), 1);
        assert_eq!(platform.count("add_team_member"), 2);
    }

    #[tokio::test]
    async fn test_rejected_org_add_does_not_abort() {
        let directory = Arc::new(MockDirectory::new(vec![(
            "Everyone",
            vec![member("n@co.com"), member("m@co.com")],
        )]));
        let platform = Arc::new(MockPlatform::new(&["n", "m"]).rejecting_org_adds());
        let engine = engine(directory, platform.clone());

        let result = engine
            .synchronize_members("acme", &GroupDefinition::active_directory("Everyone"))
            .await;

        assert!(result.is_ok());
        assert_eq!(platform.count("add_org_member"), 2);
    }

    #[tokio::test]
    async fn test_unexpected_platform_error_aborts_run() {
        let directory = Arc::new(MockDirectory::new(vec![
            ("Engineers", vec![member("a@co.com"), member("b@co.com")]),
            ("Ops", vec![member("b@co.com")]),
        ]));
        let platform = Arc::new(MockPlatform::new(&["a", "b"]).failing_team_add_for("a"));
        let engine = engine(directory, platform.clone());

        let result = engine
            .synchronize_groups(
                "acme",
                &[
                    GroupDefinition::active_directory("Engineers"),
                    GroupDefinition::active_directory("Ops"),
                ],
            )
            .await;

        assert!(matches!(result, Err(DomainError::PlatformResponse { status: 500, .. })));
        assert_eq!(platform.count("resolve_identity:b"), 0);
        assert_eq!(platform.count("create_team:Ops"), 0);
    }

    #[tokio::test]
    async fn test_member_order_follows_roster() {
        let directory = Arc::new(MockDirectory::new(vec![(
            "Ops",
            vec![member("c@co.com"), member("a@co.com"), member("b@co.com")],
        )]));
        let platform = Arc::new(MockPlatform::new(&["a", "b", "c"]).with_team(1, "Ops"));
        let engine = engine(directory, platform.clone());

        engine
            .synchronize_groups("acme", &[GroupDefinition::active_directory("Ops")])
            .await
            .unwrap();

        let adds: Vec<String> = platform
            .calls()
            .into_iter()
            .filter(|c| c.starts_with("add_team_member"))
            .collect();
        assert_eq!(
            adds,
            vec!["add_team_member:1:c", "add_team_member:1:a", "add_team_member:1:b"]
        );
    }
}
