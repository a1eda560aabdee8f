//! Reconciliation run results.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A directory member who could not be matched to a platform account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncIssueUser {
    pub email: String,
    pub attempted_identity: String,
}

impl SyncIssueUser {
    pub fn new(email: impl Into<String>, attempted_identity: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            attempted_identity: attempted_identity.into(),
        }
    }
}

/// Aggregate outcome of one reconciliation run.
///
/// Sync issues have set semantics keyed by email: the first record for an
/// email wins and later ones are dropped. Insertion order is kept so that
/// reports are stable across runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconciliationResult {
    #[serde(rename = "usersWithSyncIssues")]
    users_with_sync_issues: Vec<SyncIssueUser>,
    #[serde(skip)]
    seen_emails: HashSet<String>,
}

impl ReconciliationResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a sync issue. Returns `false` if the email was already recorded.
    pub fn record(&mut self, user: SyncIssueUser) -> bool {
        if !self.seen_emails.insert(user.email.clone()) {
            return false;
        }
        self.users_with_sync_issues.push(user);
        true
    }

    /// Fold another result into this one, keeping email de-duplication.
    pub fn merge(&mut self, other: Self) {
        for user in other.users_with_sync_issues {
            self.record(user);
        }
    }

    pub fn users_with_sync_issues(&self) -> &[SyncIssueUser] {
        &self.users_with_sync_issues
    }

    pub fn is_clean(&self) -> bool {
        self.users_with_sync_issues.is_empty()
    }
}
