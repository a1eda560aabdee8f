//! In-memory directory and platform mocks for testing.
//!
//! Both mocks record their calls in order so tests can assert on the exact
//! sequence of remote operations.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{
    DirectoryMember, MembersResponse, MembershipCheckResult, OperationOutcome, PlatformIdentity,
    PlatformTeam,
};
use crate::domain::ports::{DirectoryService, PlatformGateway};

/// Build a directory member whose id and display name derive from the email.
pub fn member(email: &str) -> DirectoryMember {
    let local = email.split('@').next().unwrap_or_default();
    DirectoryMember {
        id: format!("id-{local}"),
        display_name: local.to_string(),
        email: email.to_string(),
    }
}

/// Mock directory keyed by group name. Unknown groups fail to fetch.
pub struct MockDirectory {
    groups: HashMap<String, Vec<DirectoryMember>>,
    fetched: Mutex<Vec<String>>,
}

impl MockDirectory {
    pub fn new(groups: Vec<(&str, Vec<DirectoryMember>)>) -> Self {
        Self {
            groups: groups
                .into_iter()
                .map(|(name, members)| (name.to_string(), members))
                .collect(),
            fetched: Mutex::new(Vec::new()),
        }
    }

    /// Group names fetched so far, in order.
    pub fn fetched(&self) -> Vec<String> {
        self.fetched.lock().unwrap().clone()
    }
}

#[async_trait]
impl DirectoryService for MockDirectory {
    async fn fetch_members(&self, group_name: &str) -> MembersResponse {
        self.fetched.lock().unwrap().push(group_name.to_string());
        match self.groups.get(group_name) {
            Some(members) => MembersResponse::succeeded(members.clone()),
            None => MembersResponse::failed(),
        }
    }
}

/// Mock platform. Created teams get ids from 100 upwards.
pub struct MockPlatform {
    teams: Mutex<Vec<PlatformTeam>>,
    users: HashSet<String>,
    org_members: HashSet<String>,
    fail_team_add_for: Option<String>,
    reject_org_add: bool,
    calls: Mutex<Vec<String>>,
}

impl MockPlatform {
    /// A platform where exactly `users` exist.
    pub fn new(users: &[&str]) -> Self {
        Self {
            teams: Mutex::new(Vec::new()),
            users: users.iter().map(ToString::to_string).collect(),
            org_members: HashSet::new(),
            fail_team_add_for: None,
            reject_org_add: false,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_team(self, id: u64, name: &str) -> Self {
        self.teams.lock().unwrap().push(PlatformTeam::new(id, name));
        self
    }

    pub fn with_org_members(mut self, logins: &[&str]) -> Self {
        self.org_members = logins.iter().map(ToString::to_string).collect();
        self
    }

    /// Make `add_team_member` fail with a 500 for this login.
    pub fn failing_team_add_for(mut self, login: &str) -> Self {
        self.fail_team_add_for = Some(login.to_string());
        self
    }

    /// Make every `add_org_member` report an in-band failure.
    pub fn rejecting_org_adds(mut self) -> Self {
        self.reject_org_add = true;
        self
    }

    /// All calls so far, formatted as `operation:args`.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of calls starting with `prefix`.
    pub fn count(&self, prefix: &str) -> usize {
        self.calls()
            .iter()
            .filter(|c| c.starts_with(prefix))
            .count()
    }

    fn log(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl PlatformGateway for MockPlatform {
    async fn get_all_teams(&self, org: &str) -> DomainResult<Vec<PlatformTeam>> {
        self.log(format!("get_all_teams:{org}"));
        Ok(self.teams.lock().unwrap().clone())
    }

    async fn create_team(&self, _org: &str, name: &str) -> DomainResult<PlatformTeam> {
        self.log(format!("create_team:{name}"));
        let mut teams = self.teams.lock().unwrap();
        let team = PlatformTeam::new(100 + teams.len() as u64, name);
        teams.push(team.clone());
        Ok(team)
    }

    async fn add_team_member(&self, team_id: u64, identity: &PlatformIdentity) -> DomainResult<()> {
        self.log(format!("add_team_member:{team_id}:{identity}"));
        if self.fail_team_add_for.as_deref() == Some(identity.as_str()) {
            return Err(DomainError::PlatformResponse {
                operation: "add_team_member".to_string(),
                status: 500,
                body: "boom".to_string(),
            });
        }
        Ok(())
    }

    async fn is_org_member(
        &self,
        _org: &str,
        identity: &PlatformIdentity,
    ) -> DomainResult<MembershipCheckResult> {
        self.log(format!("is_org_member:{identity}"));
        Ok(if self.org_members.contains(identity.as_str()) {
            MembershipCheckResult::IsMember
        } else {
            MembershipCheckResult::IsNotOrgMember
        })
    }

    async fn add_org_member(
        &self,
        _org: &str,
        identity: &PlatformIdentity,
    ) -> DomainResult<OperationOutcome> {
        self.log(format!("add_org_member:{identity}"));
        if self.reject_org_add {
            return Ok(OperationOutcome::failed("Failed to add org member: 403"));
        }
        Ok(OperationOutcome::succeeded())
    }

    async fn resolve_identity(&self, candidate: &str) -> DomainResult<Option<PlatformIdentity>> {
        self.log(format!("resolve_identity:{candidate}"));
        Ok(self
            .users
            .contains(candidate)
            .then(|| PlatformIdentity::new(candidate)))
    }
}
