//! GitHub API response and request models.
//!
//! These structs map to the GitHub REST API v3 JSON payloads. They are
//! internal to the GitHub adapter; the engine only sees domain types.

use serde::{Deserialize, Serialize};

use crate::domain::models::PlatformTeam;

/// A team returned by the GitHub API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubTeam {
    /// Unique numeric identifier for the team.
    pub id: u64,
    /// Display name of the team.
    pub name: String,
    /// URL-safe slug derived from the name.
    #[serde(default)]
    pub slug: Option<String>,
}

impl From<GitHubTeam> for PlatformTeam {
    fn from(team: GitHubTeam) -> Self {
        Self::new(team.id, team.name)
    }
}

/// Request body for creating a team.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubCreateTeamRequest {
    pub name: String,
}

/// Request body for team and organization membership updates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubMembershipRequest {
    /// "member" or "maintainer" for teams, "member" or "admin" for orgs.
    pub role: String,
}

impl GitHubMembershipRequest {
    pub fn member() -> Self {
        Self {
            role: "member".to_string(),
        }
    }
}
