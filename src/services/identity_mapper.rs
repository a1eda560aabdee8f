use crate::domain::models::{IdentityMappingConfig, TextReplacement};

/// Maps a directory email address to a candidate platform login
///
/// Mapping formula: prepend + apply_replacements(email) + append
///
/// The result is not validated here. Whether the candidate names a real
/// account is decided by the platform gateway.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentityMapper {
    prepend: String,
    append: String,
    replacements: Vec<TextReplacement>,
}

impl IdentityMapper {
    /// Create a mapper from explicit parameters
    pub fn new(
        prepend: impl Into<String>,
        append: impl Into<String>,
        replacements: Vec<TextReplacement>,
    ) -> Self {
        Self {
            prepend: prepend.into(),
            append: append.into(),
            replacements,
        }
    }

    /// Create a mapper from the `identity_mapping` config section
    pub fn from_config(config: &IdentityMappingConfig) -> Self {
        Self::new(
            config.prepend.clone(),
            config.append.clone(),
            config.replacements.clone(),
        )
    }

    /// Map an email to a candidate login
    ///
    /// Replacements are applied in configured order, each one over the
    /// output of the previous. A replacement with an empty `find` is a no-op.
    pub fn to_identity(&self, email: &str) -> String {
        let replaced = self
            .replacements
            .iter()
            .filter(|r| !r.find.is_empty())
            .fold(email.to_string(), |acc, r| acc.replace(&r.find, &r.replace));

        format!("{}{}{}", self.prepend, replaced, self.append)
    }
}
