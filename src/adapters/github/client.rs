//! GitHub HTTP client implementing the platform gateway.
//!
//! Wraps the GitHub REST API v3. Only the first page (100 items) of the
//! team listing is read, and requests are not rate limited.

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, Url};
use tracing::{debug, instrument, warn};

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{
    MembershipCheckResult, OperationOutcome, PlatformIdentity, PlatformTeam,
};
use crate::domain::ports::PlatformGateway;

use super::models::{GitHubCreateTeamRequest, GitHubMembershipRequest, GitHubTeam};

/// Base URL for the GitHub REST API v3.
pub const GITHUB_API_BASE: &str = "https://api.github.com";

/// Maximum page size accepted by the GitHub API.
const PAGE_SIZE: &str = "100";

/// Longest login GitHub accepts for a managed user.
const MAX_LOGIN_LEN: usize = 39;

/// HTTP client for the GitHub REST API v3.
///
/// Transport failures map to [`DomainError::PlatformRequest`] and
/// unexpected statuses to [`DomainError::PlatformResponse`].
#[derive(Debug, Clone)]
pub struct GitHubClient {
    /// The underlying HTTP client. Redirects are not followed so the
    /// membership check can observe GitHub's 302 response.
    http: Client,
    /// Token with organization administration rights.
    token: String,
    /// API base URL, overridable for tests and GitHub Enterprise.
    base_url: Url,
}

impl GitHubClient {
    /// Create a client against the public GitHub API.
    pub fn new(token: String) -> DomainResult<Self> {
        Self::with_base_url(token, GITHUB_API_BASE)
    }

    /// Create a client against a custom API base URL.
    pub fn with_base_url(token: String, base_url: &str) -> DomainResult<Self> {
        let base_url = Url::parse(base_url).map_err(|e| {
            DomainError::ValidationFailed(format!("invalid GitHub API URL '{base_url}': {e}"))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(DomainError::ValidationFailed(format!(
                "GitHub API URL '{base_url}' cannot be a base URL"
            )));
        }

        let http = Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| DomainError::PlatformRequest(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            token,
            base_url,
        })
    }

    /// Build an endpoint URL; each segment is percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Build an authorized request.
    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.http
            .request(method, url)
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28")
            .header("User-Agent", "groups-to-teams-sync")
    }

    async fn send(&self, operation: &str, request: RequestBuilder) -> DomainResult<Response> {
        request.send().await.map_err(|e| {
            DomainError::PlatformRequest(format!("GitHub {operation} request failed: {e}"))
        })
    }

    /// Turn a non-success response into a [`DomainError::PlatformResponse`].
    async fn unexpected(operation: &str, resp: Response) -> DomainError {
        let status = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_default();
        DomainError::PlatformResponse {
            operation: operation.to_string(),
            status,
            body,
        }
    }

    async fn expect_success(operation: &str, resp: Response) -> DomainResult<Response> {
        if resp.status().is_success() {
            Ok(resp)
        } else {
            Err(Self::unexpected(operation, resp).await)
        }
    }

    async fn put_org_membership(&self, org: &str, login: &str) -> DomainResult<()> {
        let url = self.endpoint(&["orgs", org, "memberships", login]);
        let req = self
            .request(Method::PUT, url)
            .json(&GitHubMembershipRequest::member());
        let resp = self.send("add_org_member", req).await?;
        Self::expect_success("add_org_member", resp).await?;
        Ok(())
    }
}

#[async_trait]
impl PlatformGateway for GitHubClient {
    #[instrument(skip(self), err)]
    async fn get_all_teams(&self, org: &str) -> DomainResult<Vec<PlatformTeam>> {
        let mut url = self.endpoint(&["orgs", org, "teams"]);
        url.query_pairs_mut().append_pair("per_page", PAGE_SIZE);

        let resp = self
            .send("get_all_teams", self.request(Method::GET, url))
            .await?;
        let resp = Self::expect_success("get_all_teams", resp).await?;

        let teams = resp.json::<Vec<GitHubTeam>>().await.map_err(|e| {
            DomainError::SerializationError(format!("GitHub get_all_teams parse failed: {e}"))
        })?;
        debug!(count = teams.len(), "listed teams");

        Ok(teams.into_iter().map(PlatformTeam::from).collect())
    }

    #[instrument(skip(self), err)]
    async fn create_team(&self, org: &str, name: &str) -> DomainResult<PlatformTeam> {
        let url = self.endpoint(&["orgs", org, "teams"]);
        let body = GitHubCreateTeamRequest {
            name: name.to_string(),
        };

        let resp = self
            .send("create_team", self.request(Method::POST, url).json(&body))
            .await?;
        let resp = Self::expect_success("create_team", resp).await?;

        let team = resp.json::<GitHubTeam>().await.map_err(|e| {
            DomainError::SerializationError(format!("GitHub create_team parse failed: {e}"))
        })?;
        Ok(team.into())
    }

    #[instrument(skip(self, identity), fields(user = %identity), err)]
    async fn add_team_member(&self, team_id: u64, identity: &PlatformIdentity) -> DomainResult<()> {
        let team_id = team_id.to_string();
        let url = self.endpoint(&["teams", team_id.as_str(), "memberships", identity.as_str()]);
        let req = self
            .request(Method::PUT, url)
            .json(&GitHubMembershipRequest::member());

        let resp = self.send("add_team_member", req).await?;
        Self::expect_success("add_team_member", resp).await?;
        Ok(())
    }

    #[instrument(skip(self, identity), fields(user = %identity), err)]
    async fn is_org_member(
        &self,
        org: &str,
        identity: &PlatformIdentity,
    ) -> DomainResult<MembershipCheckResult> {
        let url = self.endpoint(&["orgs", org, "members", identity.as_str()]);
        let resp = self
            .send("is_org_member", self.request(Method::GET, url))
            .await?;

        match resp.status() {
            StatusCode::NO_CONTENT => Ok(MembershipCheckResult::IsMember),
            // 302 is returned when the requester is not an org member.
            StatusCode::NOT_FOUND | StatusCode::FOUND => Ok(MembershipCheckResult::IsNotOrgMember),
            _ => Err(Self::unexpected("is_org_member", resp).await),
        }
    }

    #[instrument(skip(self, identity), fields(user = %identity))]
    async fn add_org_member(
        &self,
        org: &str,
        identity: &PlatformIdentity,
    ) -> DomainResult<OperationOutcome> {
        match self.put_org_membership(org, identity.as_str()).await {
            Ok(()) => Ok(OperationOutcome::succeeded()),
            Err(e) => {
                warn!(error = %e, "add_org_member failed");
                Ok(OperationOutcome::failed(format!("Failed to add org member: {e}")))
            }
        }
    }

    #[instrument(skip(self), err)]
    async fn resolve_identity(&self, candidate: &str) -> DomainResult<Option<PlatformIdentity>> {
        // Anything else could collapse into another endpoint (`/users/`).
        if !is_login_shaped(candidate) {
            debug!("candidate cannot be a GitHub login");
            return Ok(None);
        }

        let url = self.endpoint(&["users", candidate]);
        let resp = self
            .send("resolve_identity", self.request(Method::GET, url))
            .await?;

        match resp.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => Ok(Some(PlatformIdentity::new(candidate))),
            _ => Err(Self::unexpected("resolve_identity", resp).await),
        }
    }
}

/// GitHub logins are ASCII letters, digits and hyphens, at most 39
/// characters. Underscores appear in managed-user logins (`jdoe_acme`).
fn is_login_shaped(candidate: &str) -> bool {
    !candidate.is_empty()
        && candidate.len() <= MAX_LOGIN_LEN
        && candidate
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}
