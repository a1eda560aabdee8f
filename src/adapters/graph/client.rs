//! Microsoft Graph HTTP client implementing the directory service.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{DirectoryConfig, DirectoryMember, MembersResponse};
use crate::domain::ports::DirectoryService;

use super::models::{GraphGroup, GraphMember, ODataCollection, TokenResponse};

/// Largest page the members endpoint returns in one call.
const MEMBERS_PAGE_SIZE: &str = "999";

/// Cached OAuth2 access token.
#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    expires_at: DateTime<Utc>,
}

impl CachedToken {
    /// Returns true if the token is expired or will expire within the grace period.
    fn is_expired(&self, grace_period: Duration) -> bool {
        Utc::now() + grace_period >= self.expires_at
    }
}

/// Microsoft Graph client with an in-memory app token.
#[derive(Debug)]
pub struct GraphClient {
    http: Client,
    tenant_id: String,
    client_id: String,
    client_secret: String,
    graph_base_url: Url,
    login_base_url: Url,
    cached_token: RwLock<Option<CachedToken>>,
    /// Refresh the token this long before it expires.
    grace_period: Duration,
}

impl GraphClient {
    pub fn new(config: &DirectoryConfig) -> DomainResult<Self> {
        Ok(Self {
            http: Client::new(),
            tenant_id: config.tenant_id.clone(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            graph_base_url: parse_base_url(&config.graph_base_url)?,
            login_base_url: parse_base_url(&config.login_base_url)?,
            cached_token: RwLock::new(None),
            grace_period: Duration::minutes(5),
        })
    }

    /// Gets a valid access token, refreshing if necessary.
    async fn token(&self) -> DomainResult<String> {
        {
            let cache = self.cached_token.read().await;
            if let Some(ref token) = *cache {
                if !token.is_expired(self.grace_period) {
                    return Ok(token.access_token.clone());
                }
            }
        }

        debug!("acquiring Graph access token");
        let token = self.acquire_token().await?;
        let access_token = token.access_token.clone();
        *self.cached_token.write().await = Some(token);
        Ok(access_token)
    }

    /// Acquires a new access token using the client credentials flow.
    async fn acquire_token(&self) -> DomainResult<CachedToken> {
        let token_url = join(&self.login_base_url, &[self.tenant_id.as_str(), "oauth2", "v2.0", "token"]);
        let scope = format!("{}/.default", self.graph_base_url.as_str().trim_end_matches('/'));
        let params = [
            ("grant_type", "client_credentials"),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("scope", scope.as_str()),
        ];

        let response = self
            .http
            .post(token_url)
            .form(&params)
            .send()
            .await
            .map_err(|e| DomainError::DirectoryAuth(format!("token request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(DomainError::DirectoryAuth(format!(
                "token request returned {status}: {body}"
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| DomainError::DirectoryAuth(format!("failed to parse token response: {e}")))?;

        let expires_at = Duration::try_seconds(token.expires_in)
            .and_then(|ttl| Utc::now().checked_add_signed(ttl))
            .ok_or_else(|| {
                DomainError::DirectoryAuth(format!(
                    "token expires_in out of range: {}",
                    token.expires_in
                ))
            })?;

        Ok(CachedToken {
            access_token: token.access_token,
            expires_at,
        })
    }

    async fn get<T: DeserializeOwned>(&self, url: Url) -> DomainResult<T> {
        let token = self.token().await?;
        let response = self
            .http
            .get(url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| DomainError::DirectoryRequest(format!("Graph request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(DomainError::DirectoryRequest(format!(
                "Graph returned {status}: {body}"
            )));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| DomainError::SerializationError(format!("Graph response parse failed: {e}")))
    }

    /// Find a group by exact display name; the first match wins.
    async fn find_group(&self, group_name: &str) -> DomainResult<GraphGroup> {
        let mut url = join(&self.graph_base_url, &["v1.0", "groups"]);
        url.query_pairs_mut()
            .append_pair(
                "$filter",
                &format!("displayName eq '{}'", group_name.replace('\'', "''")),
            )
            .append_pair("$select", "id,displayName");

        let groups: ODataCollection<GraphGroup> = self.get(url).await?;
        groups.value.into_iter().next().ok_or_else(|| {
            DomainError::DirectoryRequest(format!("no group named '{group_name}'"))
        })
    }

    async fn list_members(&self, group_id: &str) -> DomainResult<Vec<DirectoryMember>> {
        let mut url = join(&self.graph_base_url, &["v1.0", "groups", group_id, "members"]);
        url.query_pairs_mut()
            .append_pair("$select", "id,displayName,mail,userPrincipalName")
            .append_pair("$top", MEMBERS_PAGE_SIZE);

        let members: ODataCollection<GraphMember> = self.get(url).await?;
        Ok(members
            .value
            .into_iter()
            .filter_map(GraphMember::into_directory_member)
            .collect())
    }
}

#[async_trait]
impl DirectoryService for GraphClient {
    #[instrument(skip(self))]
    async fn fetch_members(&self, group_name: &str) -> MembersResponse {
        let result = async {
            let group = self.find_group(group_name).await?;
            self.list_members(&group.id).await
        }
        .await;

        match result {
            Ok(members) => {
                debug!(count = members.len(), "fetched group members");
                MembersResponse::succeeded(members)
            }
            Err(e) => {
                warn!(error = %e, "failed to fetch group members");
                MembersResponse::failed()
            }
        }
    }
}

fn parse_base_url(raw: &str) -> DomainResult<Url> {
    let url = Url::parse(raw)
        .map_err(|e| DomainError::ValidationFailed(format!("invalid URL '{raw}': {e}")))?;
    if url.cannot_be_a_base() {
        return Err(DomainError::ValidationFailed(format!(
            "URL '{raw}' cannot be a base URL"
        )));
    }
    Ok(url)
}

/// Append percent-encoded path segments to a base URL.
fn join(base: &Url, segments: &[&str]) -> Url {
    let mut url = base.clone();
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }
    url
}
