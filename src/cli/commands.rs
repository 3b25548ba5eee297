//! Command implementations

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use crate::app::{BatchOptions, BatchRunner};
use crate::cli::args::{
    CompressArgs, ConcatArgs, CropArgs, CutBatchArgs, EstimateArgs, InfoArgs, SetCoverArgs,
};
use crate::config::Config;
use crate::engine::transform::{
    estimate_compression, CompressionPreset, CropRect, SpeedMode, TimeWindow,
};
use crate::planner::SegmentRequest;
use crate::probe;
use crate::utils::path::file_size_mb;
use crate::utils::time::parse_time;

/// Execute the cut-batch command
pub async fn cut_batch(args: CutBatchArgs) -> Result<()> {
    info!(input = %args.input.display(), requests = %args.requests.display(), "starting batch");

    let requests = load_requests(&args.requests)?;
    let config = Config::resolve(args.output_dir.clone());
    let runner = BatchRunner::new(&config);

    let options = BatchOptions {
        audio_only: args.audio_only,
        concat_after: args.concat,
        concat_name: args.concat_name,
    };
    let report = runner.cut_batch(&args.input, &requests, &options).await;
    print!("{report}");
    Ok(())
}

/// Execute the concat command
pub async fn concat(args: ConcatArgs) -> Result<()> {
    let config = Config::resolve(default_output_dir(&args.output));
    let runner = BatchRunner::new(&config);

    let report = runner
        .concatenate(&args.inputs, &args.output)
        .await
        .context("concatenation failed")?;
    println!("ok: {report}");
    Ok(())
}

/// Execute the compress command
pub async fn compress(args: CompressArgs) -> Result<()> {
    let preset = CompressionPreset::parse(&args.preset)?;
    let speed = SpeedMode::parse(&args.speed)?;
    let output = args
        .output
        .unwrap_or_else(|| sibling_output(&args.input, "_compressed", Some("mp4")));

    let config = Config::resolve(default_output_dir(&output));
    let runner = BatchRunner::new(&config);

    let message = runner
        .compress(&args.input, &output, preset, speed)
        .await
        .context("compression failed")?;
    println!("ok: {message}");
    Ok(())
}

/// Execute the crop command
pub async fn crop(args: CropArgs) -> Result<()> {
    let rect = CropRect {
        width: args.width,
        height: args.height,
        x: args.x,
        y: args.y,
    };
    let window = match (&args.start, &args.end) {
        (Some(start), Some(end)) => Some(TimeWindow {
            start_sec: parse_time(Some(start)),
            end_sec: parse_time(Some(end)),
        }),
        _ => None,
    };

    let config = Config::resolve(default_output_dir(&args.output));
    let runner = BatchRunner::new(&config);

    let message = runner
        .crop(&args.input, &args.output, rect, window)
        .await
        .context("crop failed")?;
    println!("ok: {message}");
    Ok(())
}

/// Execute the set-cover command
pub async fn set_cover(args: SetCoverArgs) -> Result<()> {
    let output = args.output.unwrap_or_else(|| {
        let ext = args
            .input
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_string());
        sibling_output(&args.input, "_with_cover", ext.as_deref())
    });

    let config = Config::resolve(default_output_dir(&output));
    let runner = BatchRunner::new(&config);

    let message = runner
        .set_cover(&args.input, &args.cover, &output)
        .await
        .context("setting cover failed")?;
    println!("ok: {message}");
    Ok(())
}

/// Execute the estimate command (pure, no subprocess)
pub async fn estimate(args: EstimateArgs) -> Result<()> {
    let preset = CompressionPreset::parse(&args.preset)?;
    let size_mb = file_size_mb(&args.input)
        .with_context(|| format!("cannot read {}", args.input.display()))?;

    let estimate = estimate_compression(size_mb, preset);
    println!(
        "estimate: {:.1} MB -> {:.1} MB ({:.1}% reduction), about {:.1} min",
        estimate.original_size_mb,
        estimate.estimated_size_mb,
        estimate.reduction_percent,
        estimate.estimated_minutes
    );
    Ok(())
}

/// Execute the info command
pub async fn info(args: InfoArgs) -> Result<()> {
    let config = Config::resolve(PathBuf::from("."));
    let media_info = probe::probe(&config, &args.input)
        .await
        .context("probe failed")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&media_info)?);
    } else {
        println!("{media_info}");
    }
    Ok(())
}

/// Load and parse the JSON request list.
fn load_requests(path: &Path) -> Result<Vec<SegmentRequest>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read request file {}", path.display()))?;
    let requests: Vec<SegmentRequest> = serde_json::from_str(&text)
        .with_context(|| format!("malformed request file {}", path.display()))?;
    Ok(requests)
}

/// `{stem}{suffix}.{ext}` next to the input file.
fn sibling_output(input: &Path, suffix: &str, extension: Option<&str>) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    let name = match extension {
        Some(ext) => format!("{stem}{suffix}.{ext}"),
        None => format!("{stem}{suffix}"),
    };
    input.with_file_name(name)
}

/// Output directory for single-artifact commands: the destination's parent.
fn default_output_dir(output: &Path) -> PathBuf {
    output
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}
