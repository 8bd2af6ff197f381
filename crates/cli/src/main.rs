use std::process::ExitCode;

use anyhow::{anyhow, Result};
use clap::Parser;
use menulytics_cli::Cli;
use menulytics_core::config::AppConfig;

fn init_logging(config: &AppConfig) -> Result<()> {
    use menulytics_core::config::LogFormat::*;
    use tracing::Level;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);
    let builder = tracing_subscriber::fmt()
        .with_target(false)
        .with_max_level(log_level)
        .with_writer(std::io::stderr);

    // Reports own stdout; logs go to stderr.
    let installed = match config.logging.format {
        Compact => builder.compact().try_init(),
        Pretty => builder.pretty().try_init(),
        Json => builder.json().try_init(),
    };
    installed.map_err(|error| anyhow!("failed to install tracing subscriber: {error}"))
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Config errors are reported by the command itself as a JSON payload.
    if let Ok(config) = AppConfig::load(cli.global.load_options()) {
        init_logging(&config)?;
    }

    Ok(menulytics_cli::run(cli))
}
