//! Synchronization command.

use anyhow::{Context, Result};
use std::collections::HashSet;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::adapters::cache::CachedPlatformGateway;
use crate::adapters::github::GitHubClient;
use crate::adapters::graph::GraphClient;
use crate::cli::commands::apply_mapping_overrides;
use crate::cli::output::{arrow_table, output, CommandOutput};
use crate::cli::types::SyncArgs;
use crate::domain::errors::DomainResult;
use crate::domain::models::{Config, GroupDefinition, ReconciliationResult, SyncIssueUser};
use crate::infrastructure::config::ConfigLoader;
use crate::services::{IdentityMapper, ReconciliationEngine};

/// Key of the GitHub Actions step output listing unmatched users.
pub const SYNC_ISSUES_OUTPUT: &str = "users-with-sync-issues";

const BANNER: &str = "################################################";

#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncOutput {
    pub groups: Vec<String>,
    pub users_with_sync_issues: Vec<SyncIssueUser>,
}

impl SyncOutput {
    pub fn new(groups: Vec<String>, result: &ReconciliationResult) -> Self {
        Self {
            groups,
            users_with_sync_issues: result.users_with_sync_issues().to_vec(),
        }
    }

    /// The sync issues as a compact JSON array.
    pub fn issues_json(&self) -> String {
        serde_json::to_string(&self.users_with_sync_issues).unwrap_or_else(|_| "[]".to_string())
    }
}

impl CommandOutput for SyncOutput {
    fn to_human(&self) -> String {
        let mut lines = Vec::new();

        if !self.users_with_sync_issues.is_empty() {
            let rows: Vec<(String, String)> = self
                .users_with_sync_issues
                .iter()
                .map(|u| (u.email.clone(), u.attempted_identity.clone()))
                .collect();

            lines.push(BANNER.to_string());
            lines.push(String::new());
            lines.push("There were issues with the following users:".to_string());
            lines.push(String::new());
            lines.push(arrow_table(("EMAIL", "ATTEMPTED LOGIN"), &rows));
            lines.push(String::new());
            lines.push(BANNER.to_string());
        }

        lines.push("Complete!".to_string());
        lines.push(format!("::set-output name={SYNC_ISSUES_OUTPUT}::{}", self.issues_json()));
        lines.join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

/// Overlay command-line flags on the loaded configuration. Blank values are
/// treated as not given.
pub fn apply_overrides(config: &mut Config, args: &SyncArgs) {
    if let Some(org) = non_blank(args.org.as_deref()) {
        config.organization = org.to_string();
    }

    let teams: Vec<String> = args
        .teams
        .iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect();
    if !teams.is_empty() {
        config.team_names = teams;
    }

    if let Some(group) = non_blank(args.members_group.as_deref()) {
        config.organization_members_group = Some(group.to_string());
    }

    apply_mapping_overrides(&mut config.identity_mapping, &args.mapping);

    if let Some(token) = non_blank(args.github_token.as_deref()) {
        config.github.token = token.to_string();
    }
    if let Some(url) = non_blank(args.github_api_url.as_deref()) {
        config.github.api_base_url = url.to_string();
    }
    if let Some(tenant_id) = non_blank(args.tenant_id.as_deref()) {
        config.directory.tenant_id = tenant_id.to_string();
    }
    if let Some(client_id) = non_blank(args.client_id.as_deref()) {
        config.directory.client_id = client_id.to_string();
    }
    if let Some(secret) = non_blank(args.client_secret.as_deref()) {
        config.directory.client_secret = secret.to_string();
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Team names followed by the organization members group, blanks dropped
/// and duplicates removed keeping the first occurrence.
pub fn target_groups(config: &Config) -> Vec<String> {
    let mut seen = HashSet::new();
    config
        .team_names
        .iter()
        .map(|name| name.trim())
        .chain(config.members_group())
        .filter(|name| !name.is_empty())
        .filter(|name| seen.insert(*name))
        .map(String::from)
        .collect()
}

/// Run both reconciliation passes and merge their sync issues.
///
/// The members group is promoted first so that its users are organization
/// members before the team pass runs over every group.
pub async fn run_sync(
    engine: &ReconciliationEngine,
    org: &str,
    groups: &[String],
    members_group: Option<&str>,
) -> DomainResult<ReconciliationResult> {
    let mut result = ReconciliationResult::new();

    if let Some(name) = members_group {
        let members = engine
            .synchronize_members(org, &GroupDefinition::active_directory(name))
            .await?;
        result.merge(members);
    }

    let definitions: Vec<GroupDefinition> = groups
        .iter()
        .map(|name| GroupDefinition::active_directory(name.as_str()))
        .collect();
    result.merge(engine.synchronize_groups(org, &definitions).await?);

    Ok(result)
}

/// Append `key=value` to the GitHub Actions output file.
pub fn append_step_output(path: &Path, key: &str, value: &str) -> Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open step output file {}", path.display()))?;
    writeln!(file, "{key}={value}").context("Failed to write step output")?;
    Ok(())
}

fn build_engine(config: &Config) -> Result<ReconciliationEngine> {
    let github = GitHubClient::with_base_url(config.github.token.clone(), &config.github.api_base_url)
        .context("Failed to create GitHub client")?;
    let platform = CachedPlatformGateway::with_sliding_expiration(
        Arc::new(github),
        Duration::from_secs(config.cache.sliding_expiration_secs),
    );
    let directory = GraphClient::new(&config.directory).context("Failed to create Graph client")?;

    Ok(ReconciliationEngine::new(
        Arc::new(directory),
        Arc::new(platform),
        IdentityMapper::from_config(&config.identity_mapping),
    ))
}

pub async fn execute(args: SyncArgs, mut config: Config, json_mode: bool) -> Result<()> {
    apply_overrides(&mut config, &args);

    let groups = target_groups(&config);
    if groups.is_empty() {
        if json_mode {
            output(&SyncOutput::new(groups, &ReconciliationResult::new()), true);
        } else {
            println!("No teams found to synchronize");
        }
        return Ok(());
    }

    ConfigLoader::validate(&config).context("Invalid configuration")?;
    let engine = build_engine(&config)?;

    if !json_mode {
        println!("This run will synchronize the following groups:");
        for group in &groups {
            println!("* {group}");
        }
    }

    let result = run_sync(&engine, &config.organization, &groups, config.members_group())
        .await
        .context("Synchronization aborted")?;

    info!(
        org = %config.organization,
        groups = groups.len(),
        sync_issues = result.users_with_sync_issues().len(),
        "synchronization complete"
    );

    let sync_output = SyncOutput::new(groups, &result);

    if let Some(path) = std::env::var_os("GITHUB_OUTPUT").filter(|p| !p.is_empty()) {
        let issues = sync_output.issues_json();
        if let Err(err) = append_step_output(Path::new(&path), SYNC_ISSUES_OUTPUT, &issues) {
            warn!(error = %err, "could not write GitHub step output");
        }
    }

    output(&sync_output, json_mode);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::{member, MockDirectory, MockPlatform};
    use crate::cli::types::MappingArgs;
    use crate::domain::models::TextReplacement;

    fn sync_args() -> SyncArgs {
        SyncArgs {
            org: None,
            teams: vec![],
            members_group: None,
            mapping: MappingArgs::default(),
            github_token: None,
            github_api_url: None,
            tenant_id: None,
            client_id: None,
            client_secret: None,
        }
    }

    fn strip_domain() -> IdentityMapper {
        IdentityMapper::new("", "", vec![TextReplacement::new("@co.com", "")])
    }

    #[test]
    fn test_target_groups_appends_members_group_once() {
        let config = Config {
            team_names: vec!["Engineers".into(), " ".into(), "Everyone".into(), "Engineers".into()],
            organization_members_group: Some("Everyone".into()),
            ..Default::default()
        };

        assert_eq!(target_groups(&config), vec!["Engineers", "Everyone"]);
    }

    #[test]
    fn test_target_groups_empty_without_teams_or_members_group() {
        let config = Config {
            organization_members_group: Some("   ".into()),
            ..Default::default()
        };

        assert!(target_groups(&config).is_empty());
    }

    #[test]
    fn test_target_groups_members_group_only_still_runs() {
        let config = Config {
            organization_members_group: Some("Everyone".into()),
            ..Default::default()
        };

        assert_eq!(target_groups(&config), vec!["Everyone"]);
    }

    #[test]
    fn test_overrides_replace_configured_values() {
        let mut config = Config {
            organization: "file-org".into(),
            team_names: vec!["FromFile".into()],
            ..Default::default()
        };
        let args = SyncArgs {
            org: Some("cli-org".into()),
            teams: vec!["A".into(), "B".into()],
            members_group: Some("Everyone".into()),
            github_token: Some("ghp_x".into()),
            ..sync_args()
        };

        apply_overrides(&mut config, &args);

        assert_eq!(config.organization, "cli-org");
        assert_eq!(config.team_names, vec!["A", "B"]);
        assert_eq!(config.members_group(), Some("Everyone"));
        assert_eq!(config.github.token, "ghp_x");
    }

    #[test]
    fn test_blank_flags_keep_configured_values() {
        let mut config = Config {
            organization: "file-org".into(),
            team_names: vec!["FromFile".into()],
            organization_members_group: Some("Everyone".into()),
            ..Default::default()
        };
        let args = SyncArgs {
            org: Some(" ".into()),
            teams: vec![String::new()],
            members_group: Some(String::new()),
            ..sync_args()
        };

        apply_overrides(&mut config, &args);

        assert_eq!(config.organization, "file-org");
        assert_eq!(config.team_names, vec!["FromFile"]);
        assert_eq!(config.members_group(), Some("Everyone"));
    }

    #[tokio::test]
    async fn test_run_sync_promotes_members_group_then_syncs_teams() {
        let directory = Arc::new(MockDirectory::new(vec![
            ("Engineers", vec![member("a@co.com"), member("b@co.com")]),
            ("Everyone", vec![member("a@co.com"), member("b@co.com")]),
        ]));
        let platform = Arc::new(MockPlatform::new(&["a"]));
        let engine = ReconciliationEngine::new(directory.clone(), platform.clone(), strip_domain());
        let groups = vec!["Engineers".to_string(), "Everyone".to_string()];

        let result = run_sync(&engine, "org", &groups, Some("Everyone")).await.unwrap();

        assert_eq!(
            result.users_with_sync_issues(),
            &[SyncIssueUser::new("b@co.com", "b")]
        );
        assert_eq!(directory.fetched(), vec!["Everyone", "Engineers", "Everyone"]);
        assert_eq!(platform.count("create_team:Everyone"), 1);
        assert_eq!(platform.count("add_org_member"), 1);
    }

    #[tokio::test]
    async fn test_run_sync_without_members_group_never_touches_org() {
        let directory = Arc::new(MockDirectory::new(vec![("Engineers", vec![member("a@co.com")])]));
        let platform = Arc::new(MockPlatform::new(&["a"]));
        let engine = ReconciliationEngine::new(directory, platform.clone(), strip_domain());

        let result = run_sync(&engine, "org", &["Engineers".to_string()], None).await.unwrap();

        assert!(result.is_clean());
        assert_eq!(platform.count("is_org_member"), 0);
        assert_eq!(platform.count("add_org_member"), 0);
    }

    #[test]
    fn test_human_output_lists_issues_and_step_output() {
        let mut result = ReconciliationResult::new();
        result.record(SyncIssueUser::new("b@co.com", "b"));
        let rendered = SyncOutput::new(vec!["Engineers".into()], &result).to_human();

        assert!(rendered.contains("There were issues with the following users:"));
        assert!(rendered.contains("b@co.com"));
        assert!(rendered.contains("Complete!"));
        assert!(rendered.ends_with(
            r#"::set-output name=users-with-sync-issues::[{"email":"b@co.com","attemptedIdentity":"b"}]"#
        ));
    }

    #[test]
    fn test_clean_run_has_no_banner() {
        let rendered = SyncOutput::new(vec![], &ReconciliationResult::new()).to_human();

        assert!(!rendered.contains(BANNER));
        assert_eq!(rendered, "Complete!\n::set-output name=users-with-sync-issues::[]");
    }

    #[test]
    fn test_json_output_shape() {
        let mut result = ReconciliationResult::new();
        result.record(SyncIssueUser::new("b@co.com", "b"));
        let json = SyncOutput::new(vec!["Engineers".into()], &result).to_json();

        assert_eq!(json["groups"][0], "Engineers");
        assert_eq!(json["usersWithSyncIssues"][0]["attemptedIdentity"], "b");
    }

    #[test]
    fn test_append_step_output() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output");
        std::fs::write(&path, "existing=1\n").unwrap();

        append_step_output(&path, SYNC_ISSUES_OUTPUT, "[]").unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "existing=1\nusers-with-sync-issues=[]\n");
    }
}
