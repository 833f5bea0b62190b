use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use postwriter::generator::ContentGenerator;

/// Run one generation against the real APIs and print the JSON result.
#[derive(Parser, Debug)]
#[command(name = "generate_once")]
struct Args {
    /// Topic to write about
    #[arg(long)]
    topic: String,

    /// Path to config.toml
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = common::load_config(args.config.as_deref()).await?;
    let keys = config.api_keys()?;
    let generator = ContentGenerator::from_config(&config, &keys)?;

    eprintln!("\n{}", "=".repeat(60));
    eprintln!("Topic: {}", args.topic);
    eprintln!("Model: {}", config.llm.model());
    eprintln!("{}", "=".repeat(60));

    let content = generator
        .generate_content(&args.topic)
        .await
        .with_context(|| format!("generation failed for topic '{}'", args.topic))?;

    println!(
        "{}",
        serde_json::to_string_pretty(&content).context("failed to serialize result")?
    );
    Ok(())
}
