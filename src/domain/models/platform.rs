//! Platform-side models: teams, validated identities and call outcomes.

use serde::Serialize;
use std::fmt;

/// A platform login that was confirmed to exist.
///
/// Values are only produced by a platform gateway after a successful
/// existence check, so the constructor is crate-private and the type is
/// not deserializable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct PlatformIdentity(String);

impl PlatformIdentity {
    pub(crate) fn new(login: impl Into<String>) -> Self {
        Self(login.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlatformIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A remote team. The id is only meaningful to the gateway that returned it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlatformTeam {
    pub id: u64,
    pub name: String,
}

impl PlatformTeam {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Outcome of an organization membership check.
///
/// Errors while checking are raised through the gateway's `Result`, never
/// folded into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum MembershipCheckResult {
    IsMember,
    IsNotOrgMember,
}

/// Result of a mutating call whose failure is reported, not raised.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperationOutcome {
    pub succeeded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl OperationOutcome {
    pub fn succeeded() -> Self {
        Self {
            succeeded: true,
            message: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            succeeded: false,
            message: Some(message.into()),
        }
    }
}
