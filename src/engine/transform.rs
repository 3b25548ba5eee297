//! Whole-file transforms
//!
//! Compression, rectangular crop, and cover-image attachment share the
//! cutter's subprocess contract but operate on whole files. None of them has
//! a fallback tier; a failure is terminal for the call. The compression
//! estimator is a pure heuristic and spawns nothing.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::Config;
use crate::engine::runner::ToolRunner;
use crate::engine::sync_safe_video_args;
use crate::error::{require_file, ClipError, ClipResult};
use crate::utils::path::file_size_mb;

/// Quality preset mapping to a fixed CRF / audio bitrate pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompressionPreset {
    Low,
    Medium,
    High,
}

impl CompressionPreset {
    pub fn parse(raw: &str) -> ClipResult<Self> {
        match raw {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(ClipError::InvalidInput {
                message: format!("unknown preset '{other}', expected low|medium|high"),
            }),
        }
    }

    /// Constant quality factor; lower means higher quality and larger output.
    pub fn crf(&self) -> u8 {
        match self {
            Self::Low => 35,
            Self::Medium => 28,
            Self::High => 23,
        }
    }

    pub fn audio_bitrate(&self) -> &'static str {
        match self {
            Self::Low => "64k",
            Self::Medium => "96k",
            Self::High => "128k",
        }
    }

    /// Predicted output-to-input size ratio.
    fn size_ratio(&self) -> f64 {
        match self {
            Self::Low => 0.10,
            Self::Medium => 0.25,
            Self::High => 0.50,
        }
    }

    /// Throughput heuristic in MB per minute.
    fn throughput_mb_per_min(&self) -> f64 {
        match self {
            Self::Low => 150.0,
            Self::Medium => 100.0,
            Self::High => 60.0,
        }
    }
}

/// Encoder effort setting, independent of the quality preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpeedMode {
    Fast,
    Medium,
    Slow,
}

impl SpeedMode {
    pub fn parse(raw: &str) -> ClipResult<Self> {
        match raw {
            "fast" => Ok(Self::Fast),
            "medium" => Ok(Self::Medium),
            "slow" => Ok(Self::Slow),
            other => Err(ClipError::InvalidInput {
                message: format!("unknown speed mode '{other}', expected fast|medium|slow"),
            }),
        }
    }

    pub fn encoder_preset(&self) -> &'static str {
        match self {
            Self::Fast => "ultrafast",
            Self::Medium => "medium",
            Self::Slow => "veryslow",
        }
    }
}

/// Crop rectangle in pixels.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CropRect {
    pub width: u32,
    pub height: u32,
    pub x: u32,
    pub y: u32,
}

/// Optional sub-range restriction for whole-file transforms.
#[derive(Debug, Clone, Copy)]
pub struct TimeWindow {
    pub start_sec: f64,
    pub end_sec: f64,
}

/// Advisory size/time prediction; never authoritative.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompressionEstimate {
    pub original_size_mb: f64,
    pub estimated_size_mb: f64,
    pub reduction_percent: f64,
    pub estimated_minutes: f64,
}

/// Predict compressed size and runtime from the preset heuristic table
/// without running the tool.
pub fn estimate_compression(original_size_mb: f64, preset: CompressionPreset) -> CompressionEstimate {
    let ratio = preset.size_ratio();
    CompressionEstimate {
        original_size_mb,
        estimated_size_mb: original_size_mb * ratio,
        reduction_percent: (1.0 - ratio) * 100.0,
        estimated_minutes: original_size_mb / preset.throughput_mb_per_min(),
    }
}

/// Whole-file transform executor.
pub struct Transformer<'a> {
    config: &'a Config,
    runner: ToolRunner,
}

impl<'a> Transformer<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self {
            config,
            runner: ToolRunner::new(&config.ffmpeg),
        }
    }

    /// Re-encode the whole file to the preset's quality target. Reports
    /// input/output sizes and the achieved reduction.
    pub async fn compress(
        &self,
        input: &Path,
        output: &Path,
        preset: CompressionPreset,
        speed: SpeedMode,
    ) -> ClipResult<String> {
        require_file(input)?;
        let original_mb = file_size_mb(input)?;

        self.runner
            .run(
                &compress_args(input, output, preset, speed),
                self.config.long_timeout,
            )
            .await?;

        let compressed_mb = file_size_mb(output)?;
        let reduction = reduction_percent(original_mb, compressed_mb);
        info!(original_mb, compressed_mb, "compression finished");
        Ok(format!(
            "compressed {} -> {}: {:.1} MB -> {:.1} MB ({:.1}% reduction)",
            input.display(),
            output.display(),
            original_mb,
            compressed_mb,
            reduction
        ))
    }

    /// Crop the video track to `rect`; audio is always stream-copied. Odd
    /// dimensions are corrected down to the nearest even value before
    /// invocation.
    pub async fn crop(
        &self,
        input: &Path,
        output: &Path,
        rect: CropRect,
        window: Option<TimeWindow>,
    ) -> ClipResult<String> {
        require_file(input)?;
        let args = crop_args(input, output, rect, window)?;

        self.runner.run(&args, self.config.long_timeout).await?;
        Ok(format!(
            "cropped {} -> {}",
            input.display(),
            output.display()
        ))
    }

    /// Attach a still image as the video's disposition-flagged cover art.
    /// Pure stream copy on both inputs.
    pub async fn set_cover(
        &self,
        video: &Path,
        cover: &Path,
        output: &Path,
    ) -> ClipResult<String> {
        require_file(video)?;
        require_file(cover)?;

        self.runner
            .run(&cover_args(video, cover, output), self.config.cut_timeout)
            .await?;
        Ok(format!(
            "cover set: {} + {} -> {}",
            video.display(),
            cover.display(),
            output.display()
        ))
    }
}

/// Achieved size reduction in percent. A zero-byte input reports 0.0 rather
/// than dividing by zero.
fn reduction_percent(original_mb: f64, compressed_mb: f64) -> f64 {
    if original_mb > 0.0 {
        (1.0 - compressed_mb / original_mb) * 100.0
    } else {
        0.0
    }
}

fn compress_args(
    input: &Path,
    output: &Path,
    preset: CompressionPreset,
    speed: SpeedMode,
) -> Vec<String> {
    vec![
        "-i".into(),
        input.to_string_lossy().into_owned(),
        "-vcodec".into(),
        "libx264".into(),
        "-crf".into(),
        preset.crf().to_string(),
        "-preset".into(),
        speed.encoder_preset().into(),
        "-acodec".into(),
        "aac".into(),
        "-b:a".into(),
        preset.audio_bitrate().into(),
        "-y".into(),
        output.to_string_lossy().into_owned(),
    ]
}

/// Build crop arguments, validating and even-correcting the rectangle.
pub(crate) fn crop_args(
    input: &Path,
    output: &Path,
    rect: CropRect,
    window: Option<TimeWindow>,
) -> ClipResult<Vec<String>> {
    if rect.width == 0 || rect.height == 0 {
        return Err(ClipError::InvalidInput {
            message: "crop width and height must be positive".into(),
        });
    }
    // x264 requires even frame dimensions.
    let width = rect.width - (rect.width % 2);
    let height = rect.height - (rect.height % 2);

    let mut args = vec!["-i".into(), input.to_string_lossy().into_owned()];
    if let Some(window) = window {
        args.push("-ss".into());
        args.push(window.start_sec.to_string());
        args.push("-to".into());
        args.push(window.end_sec.to_string());
    }
    args.push("-vf".into());
    args.push(format!("crop={}:{}:{}:{}", width, height, rect.x, rect.y));
    args.extend(crop_encode_args());
    args.push("-y".into());
    args.push(output.to_string_lossy().into_owned());
    Ok(args)
}

/// Crop re-encodes video through the sync-safe profile but always
/// stream-copies audio.
fn crop_encode_args() -> Vec<String> {
    let mut args: Vec<String> = Vec::new();
    let mut profile = sync_safe_video_args().into_iter();
    while let Some(arg) = profile.next() {
        if arg == "-c:a" {
            profile.next();
            continue;
        }
        args.push(arg);
    }
    args.push("-c:a".into());
    args.push("copy".into());
    args
}

fn cover_args(video: &Path, cover: &Path, output: &Path) -> Vec<String> {
    vec![
        "-i".into(),
        video.to_string_lossy().into_owned(),
        "-i".into(),
        cover.to_string_lossy().into_owned(),
        "-map".into(),
        "0".into(),
        "-map".into(),
        "1".into(),
        "-c".into(),
        "copy".into(),
        "-disposition:v:1".into(),
        "attached_pic".into(),
        "-y".into(),
        output.to_string_lossy().into_owned(),
    ]
}
