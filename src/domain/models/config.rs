use serde::{Deserialize, Serialize};

/// Main configuration structure for groupsync
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// GitHub organization that owns the teams
    #[serde(default)]
    pub organization: String,

    /// Directory groups to mirror as teams (group name == team name)
    #[serde(default)]
    pub team_names: Vec<String>,

    /// Group whose members are also promoted to organization members
    #[serde(default)]
    pub organization_members_group: Option<String>,

    /// Email to login mapping rules
    #[serde(default)]
    pub identity_mapping: IdentityMappingConfig,

    /// GitHub API settings
    #[serde(default)]
    pub github: GitHubConfig,

    /// Microsoft Graph settings
    #[serde(default)]
    pub directory: DirectoryConfig,

    /// Lookup cache settings
    #[serde(default)]
    pub cache: CacheConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// The organization members group, if set to something other than blanks.
    pub fn members_group(&self) -> Option<&str> {
        self.organization_members_group
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }
}

/// Email to platform login mapping parameters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct IdentityMappingConfig {
    /// Literal prefix added to the mapped email
    #[serde(default)]
    pub prepend: String,

    /// Literal suffix added to the mapped email
    #[serde(default)]
    pub append: String,

    /// Literal substitutions, applied in order before prepend/append
    #[serde(default)]
    pub replacements: Vec<TextReplacement>,
}

/// A single literal find/replace pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TextReplacement {
    pub find: String,
    #[serde(default)]
    pub replace: String,
}

impl TextReplacement {
    pub fn new(find: impl Into<String>, replace: impl Into<String>) -> Self {
        Self {
            find: find.into(),
            replace: replace.into(),
        }
    }
}

/// GitHub API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct GitHubConfig {
    /// Token with organization administration rights
    #[serde(default)]
    pub token: String,

    /// REST API base URL
    #[serde(default = "default_github_api_base_url")]
    pub api_base_url: String,
}

fn default_github_api_base_url() -> String {
    "https://api.github.com".to_string()
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            api_base_url: default_github_api_base_url(),
        }
    }
}

/// Microsoft Graph configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DirectoryConfig {
    #[serde(default)]
    pub tenant_id: String,

    #[serde(default)]
    pub client_id: String,

    #[serde(default)]
    pub client_secret: String,

    /// Graph API base URL
    #[serde(default = "default_graph_base_url")]
    pub graph_base_url: String,

    /// OAuth2 authority base URL
    #[serde(default = "default_login_base_url")]
    pub login_base_url: String,
}

fn default_graph_base_url() -> String {
    "https://graph.microsoft.com".to_string()
}

fn default_login_base_url() -> String {
    "https://login.microsoftonline.com".to_string()
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            tenant_id: String::new(),
            client_id: String::new(),
            client_secret: String::new(),
            graph_base_url: default_graph_base_url(),
            login_base_url: default_login_base_url(),
        }
    }
}

/// Lookup cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CacheConfig {
    /// Sliding expiration for cached lookups, in seconds
    #[serde(default = "default_sliding_expiration_secs")]
    pub sliding_expiration_secs: u64,
}

const fn default_sliding_expiration_secs() -> u64 {
    600
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            sliding_expiration_secs: default_sliding_expiration_secs(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Optional directory for JSON log files
    #[serde(default)]
    pub log_dir: Option<String>,

    /// Log file rotation: daily, hourly or never
    #[serde(default = "default_log_rotation")]
    pub rotation: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_log_rotation() -> String {
    "daily".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            log_dir: None,
            rotation: default_log_rotation(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.github.api_base_url, "https://api.github.com");
        assert_eq!(config.directory.graph_base_url, "https://graph.microsoft.com");
        assert_eq!(config.cache.sliding_expiration_secs, 600);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.rotation, "daily");
        assert!(config.members_group().is_none());
    }

    #[test]
    fn test_blank_members_group_is_ignored() {
        let config = Config {
            organization_members_group: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(config.members_group().is_none());

        let config = Config {
            organization_members_group: Some("Everyone".to_string()),
            ..Default::default()
        };
        assert_eq!(config.members_group(), Some("Everyone"));
    }

    #[test]
    fn test_empty_document_matches_defaults() {
        let config: Config = serde_yaml::from_str("{}").unwrap();
        assert!(config.organization.is_empty());
        assert!(config.team_names.is_empty());
        assert_eq!(config.cache.sliding_expiration_secs, 600);
        assert_eq!(config.logging.rotation, "daily");

        let yaml = "team_names: [Engineers]\norganization_members_group: Everyone\n";
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.team_names, vec!["Engineers"]);
        assert_eq!(config.members_group(), Some("Everyone"));
    }

    #[test]
    fn test_replacement_without_replace_defaults_to_empty() {
        let yaml = "find: \"@co.com\"\n";
        let replacement: TextReplacement = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(replacement, TextReplacement::new("@co.com", ""));
    }
}
