//! SplitX CLI Video Splitter
//!
//! Splits a video into segments by fixed time intervals, detected
//! scene changes, or manually chosen timestamps, delegating the
//! frame-accurate cutting to ffmpeg.
//!
//! # Usage
//!
//! ```bash
//! splitx split --input video.mp4 --every 01:00
//! splitx split --input video.mp4 --scenes --threshold 0.3
//! splitx split --input video.mp4 --at 00:30 --at 02:15
//! splitx inspect --input video.mp4
//! splitx scenes --input video.mp4 --threshold 0.4
//! ```

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use splitx::cli::{commands, Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins over --log-level when set.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.log_level.clone()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Starting SplitX");

    match cli.command {
        Commands::Split(args) => commands::split(args).await?,
        Commands::Inspect(args) => commands::inspect(args).await?,
        Commands::Scenes(args) => commands::scenes(args).await?,
    }

    Ok(())
}
