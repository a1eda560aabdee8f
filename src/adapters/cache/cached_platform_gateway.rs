//! Cached wrapper for PlatformGateway using moka idle-expiry caches.
//!
//! Memoizes `resolve_identity` and `is_org_member` for the lifetime of one
//! run: the same user commonly appears in several groups. Entries expire on
//! a sliding window (time-to-idle). Team listing, team creation and
//! membership mutations always go to the inner gateway.

use async_trait::async_trait;
use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;
use tracing::trace;

use crate::domain::errors::DomainResult;
use crate::domain::models::{
    MembershipCheckResult, OperationOutcome, PlatformIdentity, PlatformTeam,
};
use crate::domain::ports::PlatformGateway;

/// Default sliding expiration for cached lookups.
const DEFAULT_SLIDING_EXPIRATION_SECS: u64 = 600;

/// Maximum number of entries per cache.
const CACHE_MAX_CAPACITY: u64 = 50_000;

/// Cached platform gateway decorator.
///
/// Lookups follow a two-step contract: read the key, and on a miss call the
/// inner gateway and insert what it returned. Errors are never cached.
/// Two concurrent misses on the same key both reach the inner gateway; runs
/// are sequential so this does not happen today.
pub struct CachedPlatformGateway<G: PlatformGateway> {
    inner: Arc<G>,
    /// Candidate login -> resolved identity (`None` = no such account).
    identities: Cache<String, Option<PlatformIdentity>>,
    /// (org, login) -> membership check result.
    memberships: Cache<(String, String), MembershipCheckResult>,
}

impl<G: PlatformGateway> CachedPlatformGateway<G> {
    /// Create a new cached gateway with the default sliding expiration.
    pub fn new(inner: Arc<G>) -> Self {
        Self::with_sliding_expiration(inner, Duration::from_secs(DEFAULT_SLIDING_EXPIRATION_SECS))
    }

    /// Create with a custom sliding expiration.
    pub fn with_sliding_expiration(inner: Arc<G>, expiration: Duration) -> Self {
        let identities = Cache::builder()
            .max_capacity(CACHE_MAX_CAPACITY)
            .time_to_idle(expiration)
            .build();
        let memberships = Cache::builder()
            .max_capacity(CACHE_MAX_CAPACITY)
            .time_to_idle(expiration)
            .build();

        Self {
            inner,
            identities,
            memberships,
        }
    }
}

#[async_trait]
impl<G: PlatformGateway + 'static> PlatformGateway for CachedPlatformGateway<G> {
    async fn get_all_teams(&self, org: &str) -> DomainResult<Vec<PlatformTeam>> {
        self.inner.get_all_teams(org).await
    }

    async fn create_team(&self, org: &str, name: &str) -> DomainResult<PlatformTeam> {
        self.inner.create_team(org, name).await
    }

    async fn add_team_member(&self, team_id: u64, identity: &PlatformIdentity) -> DomainResult<()> {
        self.inner.add_team_member(team_id, identity).await
    }

    async fn is_org_member(
        &self,
        org: &str,
        identity: &PlatformIdentity,
    ) -> DomainResult<MembershipCheckResult> {
        let key = (org.to_string(), identity.as_str().to_string());
        if let Some(cached) = self.memberships.get(&key).await {
            trace!(org, user = %identity, "org membership cache hit");
            return Ok(cached);
        }

        let result = self.inner.is_org_member(org, identity).await?;
        self.memberships.insert(key, result).await;
        Ok(result)
    }

    async fn add_org_member(
        &self,
        org: &str,
        identity: &PlatformIdentity,
    ) -> DomainResult<OperationOutcome> {
        self.inner.add_org_member(org, identity).await
    }

    async fn resolve_identity(&self, candidate: &str) -> DomainResult<Option<PlatformIdentity>> {
        if let Some(cached) = self.identities.get(candidate).await {
            trace!(candidate, "identity cache hit");
            return Ok(cached);
        }

        let result = self.inner.resolve_identity(candidate).await?;
        self.identities
            .insert(candidate.to_string(), result.clone())
            .await;
        Ok(result)
    }
}
