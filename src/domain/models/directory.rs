//! Directory-side models: the groups to reconcile and their members.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The directory system a group definition originates from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DirectorySource {
    /// Microsoft Entra ID (Azure Active Directory).
    ActiveDirectory,
}

impl fmt::Display for DirectorySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ActiveDirectory => write!(f, "ActiveDirectory"),
        }
    }
}

/// A directory group to reconcile.
///
/// The group name doubles as the remote team name: a directory group and
/// its team are matched purely by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GroupDefinition {
    pub source: DirectorySource,
    pub name: String,
}

impl GroupDefinition {
    pub fn new(source: DirectorySource, name: impl Into<String>) -> Self {
        Self {
            source,
            name: name.into(),
        }
    }

    /// Shorthand for an Active Directory group.
    pub fn active_directory(name: impl Into<String>) -> Self {
        Self::new(DirectorySource::ActiveDirectory, name)
    }
}

/// A member of a directory group, as returned by one fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryMember {
    pub id: String,
    pub display_name: String,
    pub email: String,
}

/// Result of a directory membership fetch.
///
/// Failure is reported in-band: `success == false` means the group could
/// not be read and `members` is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MembersResponse {
    pub success: bool,
    pub members: Vec<DirectoryMember>,
}

impl MembersResponse {
    pub fn succeeded(members: Vec<DirectoryMember>) -> Self {
        Self {
            success: true,
            members,
        }
    }

    pub fn failed() -> Self {
        Self {
            success: false,
            members: Vec::new(),
        }
    }
}
