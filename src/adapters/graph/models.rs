//! Microsoft Graph response models.

use serde::Deserialize;

use crate::domain::models::DirectoryMember;

/// OAuth2 token response from the Microsoft identity platform.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub expires_in: i64,
}

/// Collection wrapper used by Graph list endpoints.
#[derive(Debug, Deserialize)]
pub struct ODataCollection<T> {
    pub value: Vec<T>,
}

/// A group, as returned by the group lookup.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphGroup {
    pub id: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

/// A directory object listed as a group member.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphMember {
    pub id: String,
    #[serde(rename = "@odata.type", default)]
    pub odata_type: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub mail: Option<String>,
    #[serde(default)]
    pub user_principal_name: Option<String>,
}

const USER_ODATA_TYPE: &str = "#microsoft.graph.user";

impl GraphMember {
    /// Convert to a directory member.
    ///
    /// Returns `None` for non-user objects (nested groups, devices) and for
    /// users with neither a mail address nor a user principal name.
    pub fn into_directory_member(self) -> Option<DirectoryMember> {
        if self
            .odata_type
            .as_deref()
            .is_some_and(|t| t != USER_ODATA_TYPE)
        {
            return None;
        }

        let email = self
            .mail
            .filter(|m| !m.is_empty())
            .or(self.user_principal_name)
            .filter(|m| !m.is_empty())?;

        Some(DirectoryMember {
            id: self.id,
            display_name: self.display_name.unwrap_or_default(),
            email,
        })
    }
}
