use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use pomodorino::config::Config;
use pomodorino::http::AppState;
use pomodorino::{cli, http, logging};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file before anything else (silently ignore if missing)
    dotenvy::dotenv().ok();

    // Parse CLI arguments first to check for debug flag
    let cli_args = cli::Cli::parse();

    // Initialize logging based on --debug flag
    let mut log_config = logging::LogConfig::new().with_debug_mode(cli_args.debug);

    // Custom log directory from env
    if let Ok(log_dir) = std::env::var("POMODORINO_LOG_DIR") {
        log_config = log_config.with_log_dir(std::path::PathBuf::from(log_dir));
    }

    let _guard = logging::init_logging(log_config)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    let mut config = Config::load(cli_args.config.as_deref())?;
    if let Some(port) = cli_args.port {
        config.server.port = port;
    }

    let elevenlabs_key =
        std::env::var("ELEVENLABS_API_KEY").context("ELEVENLABS_API_KEY not found")?;
    let google_key = std::env::var("GOOGLE_API_KEY").context("GOOGLE_API_KEY not found")?;

    let state = Arc::new(AppState::from_config(&config, elevenlabs_key, google_key));
    http::serve(&config.server, state).await?;

    Ok(())
}
