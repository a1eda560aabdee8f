//! Command-line interface.

pub mod commands;
pub mod output;
pub mod types;

pub use types::{Cli, Commands};

use anyhow::Result;

use crate::domain::models::Config;

/// Dispatch a parsed command against the loaded configuration.
pub async fn run(command: Commands, config: Config, json_mode: bool) -> Result<()> {
    match command {
        Commands::Sync(args) => commands::sync::execute(args, config, json_mode).await,
        Commands::Map(args) => commands::map::execute(args, config, json_mode),
    }
}

/// Report a fatal error and exit with status 1.
pub fn handle_error(err: anyhow::Error, json_mode: bool) -> ! {
    if json_mode {
        let chain: Vec<String> = err.chain().map(ToString::to_string).collect();
        let payload = serde_json::json!({
            "error": err.to_string(),
            "causes": chain.get(1..).unwrap_or_default(),
        });
        println!("{payload}");
    } else {
        eprintln!("Error: {err:#}");
    }
    std::process::exit(1);
}
