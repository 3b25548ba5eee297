//! Command-line argument definitions

use std::path::PathBuf;

use clap::Args;

/// Arguments for the cut-batch command
#[derive(Args, Debug)]
pub struct CutBatchArgs {
    /// Source media file
    #[arg(short, long)]
    pub input: PathBuf,

    /// JSON file with the ordered segment request list
    /// (array of {"start", "end", "title"} objects)
    #[arg(short, long)]
    pub requests: PathBuf,

    /// Directory receiving the cut segments
    #[arg(short, long, default_value = "output")]
    pub output_dir: PathBuf,

    /// Strip video and export MP3 segments
    #[arg(long)]
    pub audio_only: bool,

    /// Stitch the produced segments into one file afterwards
    #[arg(long)]
    pub concat: bool,

    /// Filename for the stitched artifact (extension must match the mode)
    #[arg(long, requires = "concat")]
    pub concat_name: Option<String>,
}

/// Arguments for the concat command
#[derive(Args, Debug)]
pub struct ConcatArgs {
    /// Input files, joined in the order given
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Destination file
    #[arg(short, long)]
    pub output: PathBuf,
}

/// Arguments for the compress command
#[derive(Args, Debug)]
pub struct CompressArgs {
    /// Input video file
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output file (default: {stem}_compressed.mp4 next to the input)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Quality preset
    #[arg(long, default_value = "medium")]
    pub preset: String,

    /// Encoder speed mode
    #[arg(long, default_value = "medium")]
    pub speed: String,
}

/// Arguments for the crop command
#[derive(Args, Debug)]
pub struct CropArgs {
    /// Input video file
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output file
    #[arg(short, long)]
    pub output: PathBuf,

    /// Crop width in pixels
    #[arg(long)]
    pub width: u32,

    /// Crop height in pixels
    #[arg(long)]
    pub height: u32,

    /// Left edge of the crop rectangle
    #[arg(short, long, default_value = "0")]
    pub x: u32,

    /// Top edge of the crop rectangle
    #[arg(short, long, default_value = "0")]
    pub y: u32,

    /// Restrict to a sub-range: start time (HH:MM:SS[.fraction])
    #[arg(long, requires = "end")]
    pub start: Option<String>,

    /// Restrict to a sub-range: end time (HH:MM:SS[.fraction])
    #[arg(long, requires = "start")]
    pub end: Option<String>,
}

/// Arguments for the set-cover command
#[derive(Args, Debug)]
pub struct SetCoverArgs {
    /// Input video file
    #[arg(short, long)]
    pub input: PathBuf,

    /// Cover image file
    #[arg(short, long)]
    pub cover: PathBuf,

    /// Output file (default: {stem}_with_cover.{ext} next to the input)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for the estimate command
#[derive(Args, Debug)]
pub struct EstimateArgs {
    /// Input video file
    #[arg(short, long)]
    pub input: PathBuf,

    /// Quality preset to estimate for
    #[arg(long, default_value = "medium")]
    pub preset: String,
}

/// Arguments for the info command
#[derive(Args, Debug)]
pub struct InfoArgs {
    /// Media file to probe
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}
