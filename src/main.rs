//! clipbatch CLI
//!
//! Batch video clipping with lossless stream-copy fast paths and re-encode
//! fallbacks, plus concatenation and whole-file transforms, all delegated to
//! an external ffmpeg binary.
//!
//! # Usage
//!
//! ```bash
//! clipbatch cut-batch --input talk.mp4 --requests segments.json --concat
//! clipbatch concat a.mp4 b.mp4 --output joined.mp4
//! clipbatch compress --input talk.mp4 --preset high --speed slow
//! ```

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use clipbatch::cli::{commands, Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(cli.log_level.clone())),
        )
        .with_writer(std::io::stderr)
        .init();

    info!("starting clipbatch");

    match cli.command {
        Commands::CutBatch(args) => commands::cut_batch(args).await?,
        Commands::Concat(args) => commands::concat(args).await?,
        Commands::Compress(args) => commands::compress(args).await?,
        Commands::Crop(args) => commands::crop(args).await?,
        Commands::SetCover(args) => commands::set_cover(args).await?,
        Commands::Estimate(args) => commands::estimate(args).await?,
        Commands::Info(args) => commands::info(args).await?,
    }

    Ok(())
}
