//! Portal server CLI.

use anyhow::{Context, Result};
use clap::Parser;
use shared::{Config, Environment, LogConfig};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Override the bind address (e.g. 0.0.0.0:3000)
    #[arg(long)]
    bind: Option<String>,

    /// Deployment environment: development serves mock providers
    #[arg(long, env = "PORTAL_ENV")]
    environment: Option<Environment>,

    /// Write the effective configuration to the config path and exit
    #[arg(long)]
    write_config: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = Config::from_file(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    if let Some(bind) = args.bind {
        config.server.bind_addr = bind;
    }
    if let Some(environment) = args.environment {
        config.environment = environment;
    }

    if args.write_config {
        config
            .save(&args.config)
            .with_context(|| format!("Failed to write config to {}", args.config.display()))?;
        println!("Configuration written to {}", args.config.display());
        return Ok(());
    }

    let mut log_config = LogConfig::from_settings("portal-server", &config.logging);
    if args.verbose {
        log_config.default_level = tracing::Level::DEBUG;
    }
    shared::logging::init(log_config)?;

    info!(
        config_file = %args.config.display(),
        environment = %config.environment,
        "Portal server starting"
    );

    portal_server::run_server(config).await
}
