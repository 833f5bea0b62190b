/*
postwriter - main.rs
This binary loads configuration, resolves API keys and starts the Rocket HTTP server.
*/

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

use postwriter::generator::ContentGenerator;
use postwriter::server::{launch_rocket, AppState};

#[derive(Parser, Debug)]
#[command(name = "postwriter", about = "Drafts blog posts from recent news on a topic")]
struct Args {
    /// Path to config.toml
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Listening port (overrides PORT and the config file)
    #[arg(long)]
    port: Option<u16>,

    /// Override log level (info, debug, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let filter = EnvFilter::try_new(&args.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();

    let config = match common::load_config(args.config.as_deref()).await {
        Ok(cfg) => {
            info!(port = cfg.server.port(), model = cfg.llm.model(), "configuration loaded");
            cfg
        }
        Err(e) => {
            error!("failed to load configuration: {:#}", e);
            return Err(e);
        }
    };
    let mut config = config.with_port_override(std::env::var("PORT").ok().as_deref())?;
    if let Some(port) = args.port {
        config.server.port = Some(port);
    }

    // Both keys are required; refuse to bind without them.
    let keys = match config.api_keys() {
        Ok(keys) => keys,
        Err(e) => {
            error!("missing API credentials: {:#}", e);
            return Err(e);
        }
    };

    let generator = ContentGenerator::from_config(&config, &keys)?;
    let state = AppState {
        generator: Arc::new(generator),
    };

    if let Err(e) = launch_rocket(state, &config.server).await {
        error!(%e, "Rocket server failed");
        return Err(e);
    }

    info!("Shutdown complete");
    Ok(())
}
