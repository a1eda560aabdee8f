//! groupsync CLI entry point.

use clap::Parser;
use tracing::warn;

use groupsync::cli::{self, Cli};
use groupsync::infrastructure::config::ConfigLoader;
use groupsync::infrastructure::logging::{LogConfig, LoggerImpl};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let json_mode = cli.json;

    let config = match ConfigLoader::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(err) => cli::handle_error(err, json_mode),
    };

    if let Err(err) = ConfigLoader::validate_logging(&config) {
        cli::handle_error(err.into(), json_mode);
    }

    let _logger = match LoggerImpl::init(&LogConfig::from(&config.logging)) {
        Ok(logger) => logger,
        Err(err) => cli::handle_error(err, json_mode),
    };

    if let Some(path) = cli.config.as_deref() {
        if !ConfigLoader::is_supported_file(path) {
            warn!(path = %path.display(), "unrecognized config file extension, file was ignored");
        }
    }

    if let Err(err) = cli::run(cli.command, config, json_mode).await {
        cli::handle_error(err, json_mode);
    }
}
