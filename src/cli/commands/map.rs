//! Mapping preview command.

use anyhow::Result;

use crate::cli::commands::apply_mapping_overrides;
use crate::cli::output::{arrow_table, output, CommandOutput};
use crate::cli::types::MapArgs;
use crate::domain::models::Config;
use crate::services::IdentityMapper;

#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MappedIdentity {
    pub email: String,
    pub identity: String,
}

#[derive(Debug, serde::Serialize)]
pub struct MapOutput {
    pub mappings: Vec<MappedIdentity>,
}

impl CommandOutput for MapOutput {
    fn to_human(&self) -> String {
        let rows: Vec<(String, String)> = self
            .mappings
            .iter()
            .map(|m| (m.email.clone(), m.identity.clone()))
            .collect();
        arrow_table(("EMAIL", "LOGIN"), &rows)
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

/// Map every email with the configured rules. No remote calls are made, so
/// the candidates are not checked against real accounts.
pub fn preview(mapper: &IdentityMapper, emails: &[String]) -> MapOutput {
    MapOutput {
        mappings: emails
            .iter()
            .map(|email| MappedIdentity {
                email: email.clone(),
                identity: mapper.to_identity(email),
            })
            .collect(),
    }
}

pub fn execute(args: MapArgs, mut config: Config, json_mode: bool) -> Result<()> {
    apply_mapping_overrides(&mut config.identity_mapping, &args.mapping);
    let mapper = IdentityMapper::from_config(&config.identity_mapping);

    output(&preview(&mapper, &args.emails), json_mode);
    Ok(())
}
