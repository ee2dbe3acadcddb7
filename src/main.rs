use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use myflix::cli::{run_command, Cli};
use myflix::config::Config;
use myflix::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let mut config = Config::load(&cli.config)?;
    if let Some(url) = &cli.api_url {
        config.api.url = url.clone();
    }

    // Initialize logging
    let log_level = cli
        .log_level
        .as_ref()
        .unwrap_or(&config.logging.level)
        .clone();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::debug!("Starting myflix v{}", env!("CARGO_PKG_VERSION"));
    match &config.source {
        Some(path) => tracing::info!("Loaded configuration from {}", path.display()),
        None => tracing::info!("No config file found, using defaults"),
    }

    let state = AppState::new(config)?;

    if let Err(e) = run_command(&cli, &state).await {
        // Only the outermost message reaches the user; causes are in the log
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
    Ok(())
}
