//! CLI type definitions
//!
//! This module contains clap command structures that define the CLI interface.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::domain::models::TextReplacement;

#[derive(Parser, Debug)]
#[command(name = "groupsync")]
#[command(about = "Synchronize directory groups into GitHub teams", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file (.json, .yml or .yaml)
    #[arg(short, long, global = true, env = "GROUPSYNC_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Reconcile directory groups into teams and organization membership
    Sync(SyncArgs),

    /// Preview the login each email maps to, without remote calls
    Map(MapArgs),
}

/// Overrides for the email-to-login mapping
#[derive(Args, Debug, Default, Clone)]
pub struct MappingArgs {
    /// Text prepended to every mapped email
    #[arg(long)]
    pub email_prepend: Option<String>,

    /// Text appended to every mapped email
    #[arg(long)]
    pub email_append: Option<String>,

    /// Literal substitution FIND=REPLACE applied to emails, in order (repeatable)
    #[arg(long = "email-replace", value_name = "FIND=REPLACE", value_parser = parse_replacement)]
    pub email_replacements: Vec<TextReplacement>,
}

#[derive(Args, Debug)]
pub struct SyncArgs {
    /// GitHub organization owning the teams
    #[arg(long)]
    pub org: Option<String>,

    /// Team / directory group names to synchronize (repeatable or comma separated)
    #[arg(long = "team", value_delimiter = ',')]
    pub teams: Vec<String>,

    /// Directory group whose members become organization members
    #[arg(long)]
    pub members_group: Option<String>,

    #[command(flatten)]
    pub mapping: MappingArgs,

    /// GitHub token with organization administration rights
    #[arg(long, env = "GITHUB_ORG_ADMIN_TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,

    /// GitHub REST API base URL
    #[arg(long)]
    pub github_api_url: Option<String>,

    /// Entra ID tenant id
    #[arg(long, env = "AZURE_TENANT_ID")]
    pub tenant_id: Option<String>,

    /// Entra ID application (client) id
    #[arg(long, env = "AZURE_CLIENT_ID")]
    pub client_id: Option<String>,

    /// Entra ID application secret
    #[arg(long, env = "AZURE_CLIENT_SECRET", hide_env_values = true)]
    pub client_secret: Option<String>,
}

#[derive(Args, Debug)]
pub struct MapArgs {
    /// Email addresses to map
    #[arg(required = true, num_args = 1..)]
    pub emails: Vec<String>,

    #[command(flatten)]
    pub mapping: MappingArgs,
}

/// Parse a `FIND=REPLACE` pair. The split is on the first `=`, and
/// `REPLACE` may be empty.
pub fn parse_replacement(raw: &str) -> Result<TextReplacement, String> {
    match raw.split_once('=') {
        Some((find, _)) if find.is_empty() => {
            Err(format!("'{raw}': the text to find cannot be empty"))
        }
        Some((find, replace)) => Ok(TextReplacement::new(find, replace)),
        None => Err(format!("'{raw}': expected FIND=REPLACE")),
    }
}
