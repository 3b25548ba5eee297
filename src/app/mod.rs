//! Batch orchestration
//!
//! Drives planner -> cutter -> optional concatenation for one batch call and
//! aggregates the ordered report. Nothing unwinds past this layer: per-item
//! failures, concat failures, even a missing source file all surface as
//! report lines, never as `Err`.

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::config::Config;
use crate::engine::concat::{ConcatEngine, ConcatReport};
use crate::engine::cutter::SegmentCutter;
use crate::engine::transform::{
    CompressionPreset, CropRect, SpeedMode, TimeWindow, Transformer,
};
use crate::engine::ItemOutcome;
use crate::error::{ClipError, ClipResult};
use crate::planner::{plan, CutMode, PlanEntry, PlanOptions, SegmentRequest, SkipReason};

/// Batch-level options supplied by the caller.
#[derive(Debug, Clone, Default)]
pub struct BatchOptions {
    /// Strip video and emit `.mp3` segments
    pub audio_only: bool,
    /// Stitch surviving segments into one artifact after cutting
    pub concat_after: bool,
    /// Custom name for the concatenated artifact; honored only when its
    /// extension matches the batch mode
    pub concat_name: Option<String>,
}

/// One line of the batch report, in submission order.
#[derive(Debug)]
pub enum ReportLine {
    /// Source file did not exist; the batch never started
    SourceMissing { source: PathBuf },
    /// Output directory could not be created; the batch never started
    SetupFailed { error: ClipError },
    /// Request excluded at plan time
    PlanSkip { title: String, reason: SkipReason },
    /// Cut attempt resolved
    Item {
        title: String,
        output: PathBuf,
        outcome: ItemOutcome,
    },
    /// Always emitted after the last item
    BatchComplete {
        done: usize,
        skipped: usize,
        failed: usize,
    },
    /// Concat requested but no usable segment outputs survived
    NothingToConcat,
    /// Result of the requested concatenation
    Concat(Result<ConcatReport, ClipError>),
}

impl fmt::Display for ReportLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportLine::SourceMissing { source } => {
                write!(f, "failed: source file not found: {}", source.display())
            }
            ReportLine::SetupFailed { error } => write!(f, "failed: {error}"),
            ReportLine::PlanSkip { title, reason } => {
                write!(f, "skipped: {title} ({reason})")
            }
            ReportLine::Item {
                title,
                output,
                outcome,
            } => match outcome {
                ItemOutcome::Done { method, detail } => {
                    write!(f, "ok: {title} ({detail}) [{method}]")
                }
                ItemOutcome::SkippedExisting => {
                    write!(f, "exists, skipped: {}", output.display())
                }
                ItemOutcome::Failed { cause } => write!(f, "failed: {title} - {cause}"),
            },
            ReportLine::BatchComplete {
                done,
                skipped,
                failed,
            } => write!(
                f,
                "batch complete: {done} cut, {skipped} skipped, {failed} failed"
            ),
            ReportLine::NothingToConcat => write!(f, "concat: no files to concatenate"),
            ReportLine::Concat(Ok(report)) => write!(f, "concat: ok: {report}"),
            ReportLine::Concat(Err(err)) => write!(f, "concat: failed: {err}"),
        }
    }
}

/// Ordered report for one batch call plus the final artifact, if produced.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub lines: Vec<ReportLine>,
    /// Concatenated artifact path when concat was requested and succeeded
    pub artifact: Option<PathBuf>,
}

impl fmt::Display for BatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

/// Batch orchestrator holding the immutable process configuration.
pub struct BatchRunner<'a> {
    config: &'a Config,
}

impl<'a> BatchRunner<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// Cut every requested segment from `source`, sequentially and in
    /// request order, then optionally concatenate the surviving outputs.
    pub async fn cut_batch(
        &self,
        source: &Path,
        requests: &[SegmentRequest],
        options: &BatchOptions,
    ) -> BatchReport {
        let mut report = BatchReport::default();

        if !source.is_file() {
            report.lines.push(ReportLine::SourceMissing {
                source: source.to_path_buf(),
            });
            return report;
        }
        if let Err(err) = std::fs::create_dir_all(&self.config.output_dir) {
            report.lines.push(ReportLine::SetupFailed {
                error: ClipError::Io(err),
            });
            return report;
        }

        let entries = plan(
            source,
            requests,
            &PlanOptions {
                audio_only: options.audio_only,
                output_dir: self.config.output_dir.clone(),
            },
        );
        info!(requests = requests.len(), entries = entries.len(), "batch planned");

        let cutter = SegmentCutter::new(self.config);
        let mut concat_inputs: Vec<PathBuf> = Vec::new();
        let (mut done, mut skipped, mut failed) = (0usize, 0usize, 0usize);

        for entry in entries {
            match entry {
                PlanEntry::Skipped { title, reason } => {
                    skipped += 1;
                    report.lines.push(ReportLine::PlanSkip { title, reason });
                }
                PlanEntry::Cut(item) => {
                    let outcome = cutter.cut(&item).await;
                    match &outcome {
                        ItemOutcome::Done { .. } => done += 1,
                        ItemOutcome::SkippedExisting => skipped += 1,
                        ItemOutcome::Failed { .. } => failed += 1,
                    }
                    if options.concat_after && outcome.output_usable() {
                        concat_inputs.push(item.output.clone());
                    }
                    report.lines.push(ReportLine::Item {
                        title: item.title,
                        output: item.output,
                        outcome,
                    });
                }
            }
        }

        report.lines.push(ReportLine::BatchComplete {
            done,
            skipped,
            failed,
        });

        if options.concat_after {
            if concat_inputs.is_empty() {
                report.lines.push(ReportLine::NothingToConcat);
            } else {
                let mode = if options.audio_only {
                    CutMode::AudioOnly
                } else {
                    CutMode::Video
                };
                let destination = self
                    .config
                    .output_dir
                    .join(concat_artifact_name(options.concat_name.as_deref(), mode));
                let result = ConcatEngine::new(self.config)
                    .concat(&concat_inputs, &destination)
                    .await;
                if result.is_ok() {
                    report.artifact = Some(destination);
                }
                report.lines.push(ReportLine::Concat(result));
            }
        }

        report
    }

    /// Concatenate explicit paths; caller-determined order is preserved.
    pub async fn concatenate(
        &self,
        paths: &[PathBuf],
        destination: &Path,
    ) -> ClipResult<ConcatReport> {
        ConcatEngine::new(self.config)
            .concat(paths, destination)
            .await
    }

    /// Whole-file compression to the preset's quality target.
    pub async fn compress(
        &self,
        input: &Path,
        output: &Path,
        preset: CompressionPreset,
        speed: SpeedMode,
    ) -> ClipResult<String> {
        Transformer::new(self.config)
            .compress(input, output, preset, speed)
            .await
    }

    /// Rectangular crop with optional time-window restriction.
    pub async fn crop(
        &self,
        input: &Path,
        output: &Path,
        rect: CropRect,
        window: Option<TimeWindow>,
    ) -> ClipResult<String> {
        Transformer::new(self.config)
            .crop(input, output, rect, window)
            .await
    }

    /// Attach a cover image to a video.
    pub async fn set_cover(&self, video: &Path, cover: &Path, output: &Path) -> ClipResult<String> {
        Transformer::new(self.config)
            .set_cover(video, cover, output)
            .await
    }
}

/// Pick the concat artifact filename: the custom name when its extension
/// matches the batch mode, else the fixed default for that mode.
fn concat_artifact_name(custom: Option<&str>, mode: CutMode) -> String {
    let extension = mode.extension();
    match custom {
        Some(name) if name.ends_with(&format!(".{extension}")) => name.to_string(),
        _ => format!("combined.{extension}"),
    }
}
