//! CLI module for clipbatch
//!
//! This module handles command-line argument parsing and command execution.

use clap::{Parser, Subcommand};

pub mod args;
pub mod commands;

/// clipbatch - batch video clipping with stream-copy fast paths
///
/// Cuts an ordered list of time-range segments out of a source file,
/// optionally stitches them back together, and prints a per-segment report.
#[derive(Parser)]
#[command(name = "clipbatch")]
#[command(about = "Batch video clipping, concatenation, and whole-file transforms")]
#[command(version)]
#[command(long_about = None)]
pub struct Cli {
    /// Logging level (overridden by RUST_LOG when set)
    #[arg(long, default_value = "info", global = true)]
    pub log_level: String,

    /// The command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Cut every segment in a request list out of one source file
    CutBatch(args::CutBatchArgs),
    /// Join already-cut files into one output
    Concat(args::ConcatArgs),
    /// Re-encode a whole file to a quality preset
    Compress(args::CompressArgs),
    /// Crop the video track to a rectangle
    Crop(args::CropArgs),
    /// Attach a still image as cover art
    SetCover(args::SetCoverArgs),
    /// Predict compressed size and runtime without running the tool
    Estimate(args::EstimateArgs),
    /// Show basic media file information
    Info(args::InfoArgs),
}
