//! Reelcut CLI
//!
//! A configuration-driven command-line pipeline for video and subtitle
//! editing: concatenation, interval trimming, sliding-window segmentation,
//! playback speed changes, frozen frames, and subtitle retiming.
//!
//! # Usage
//!
//! ```bash
//! reelcut run --config pipeline.yaml
//! reelcut plan --config pipeline.yaml --assume-duration 120
//! ```

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use reelcut::cli::{commands, Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG takes precedence over the --log-level flag
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.log_level.clone()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Commands::Run(args) => {
            info!("executing run command");
            commands::run(args).await?;
        }
        Commands::Plan(args) => {
            commands::plan(args).await?;
        }
    }

    Ok(())
}
