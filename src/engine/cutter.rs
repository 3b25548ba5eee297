//! Segment extraction
//!
//! One cut per plan item. Video items get the two-tier treatment: a
//! time-ranged stream-copy first (fast, lossless, but imprecise when the cut
//! points miss keyframes or the container resists lossless trimming), then a
//! full re-encode with the sync-safe profile. Audio-only items have a single
//! encode tier. An output that already exists is never touched; that is the
//! idempotent-rerun guarantee.

use tracing::{info, warn};

use crate::config::Config;
use crate::engine::runner::ToolRunner;
use crate::engine::{audio_profile_args, sync_safe_video_args, ItemOutcome, Method};
use crate::planner::{CutMode, PlanItem};
use crate::utils::time::format_time;

/// Executes single-segment extractions against the configured tool.
pub struct SegmentCutter<'a> {
    config: &'a Config,
    runner: ToolRunner,
}

impl<'a> SegmentCutter<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self {
            config,
            runner: ToolRunner::new(&config.ffmpeg),
        }
    }

    /// Cut one segment. Never returns an error; all outcomes are reified as
    /// [`ItemOutcome`] so one bad item cannot abort the batch.
    pub async fn cut(&self, item: &PlanItem) -> ItemOutcome {
        if item.output.exists() {
            info!(output = %item.output.display(), "output exists, skipping");
            return ItemOutcome::SkippedExisting;
        }

        match item.mode {
            CutMode::AudioOnly => self.cut_audio(item).await,
            CutMode::Video => self.cut_video(item).await,
        }
    }

    async fn cut_audio(&self, item: &PlanItem) -> ItemOutcome {
        match self
            .runner
            .run(&audio_extract_args(item), self.config.cut_timeout)
            .await
        {
            Ok(()) => ItemOutcome::Done {
                method: Method::AudioEncode,
                detail: range_detail(item),
            },
            Err(err) => ItemOutcome::Failed {
                cause: err.to_string(),
            },
        }
    }

    async fn cut_video(&self, item: &PlanItem) -> ItemOutcome {
        let primary = self
            .runner
            .run(&stream_copy_args(item), self.config.cut_timeout)
            .await;

        let primary_err = match primary {
            Ok(()) => {
                return ItemOutcome::Done {
                    method: Method::StreamCopy,
                    detail: range_detail(item),
                }
            }
            Err(err) => err,
        };

        if !primary_err.triggers_fallback() {
            return ItemOutcome::Failed {
                cause: primary_err.to_string(),
            };
        }

        warn!(
            title = %item.title,
            error = %primary_err,
            "stream copy failed, falling back to re-encode"
        );

        match self
            .runner
            .run(&reencode_args(item), self.config.cut_timeout)
            .await
        {
            Ok(()) => ItemOutcome::Done {
                method: Method::ReEncode,
                detail: format!("{} after stream-copy failure", range_detail(item)),
            },
            Err(fallback_err) => ItemOutcome::Failed {
                cause: format!(
                    "stream copy: {primary_err}; re-encode: {fallback_err}"
                ),
            },
        }
    }
}

fn range_detail(item: &PlanItem) -> String {
    format!(
        "{} - {}",
        format_time(item.start_sec),
        format_time(item.end_sec)
    )
}

/// Primary tier: time-ranged lossless extraction.
pub(crate) fn stream_copy_args(item: &PlanItem) -> Vec<String> {
    vec![
        "-i".into(),
        item.source.to_string_lossy().into_owned(),
        "-ss".into(),
        item.start_sec.to_string(),
        "-to".into(),
        item.end_sec.to_string(),
        "-c".into(),
        "copy".into(),
        "-y".into(),
        item.output.to_string_lossy().into_owned(),
    ]
}

/// Fallback tier: decode, trim, re-encode with the sync-safe profile.
pub(crate) fn reencode_args(item: &PlanItem) -> Vec<String> {
    let mut args = vec![
        "-i".into(),
        item.source.to_string_lossy().into_owned(),
        "-ss".into(),
        item.start_sec.to_string(),
        "-to".into(),
        item.end_sec.to_string(),
    ];
    args.extend(sync_safe_video_args());
    args.push("-y".into());
    args.push(item.output.to_string_lossy().into_owned());
    args
}

/// Audio-only extraction: strip video, encode to the fixed MP3 profile.
pub(crate) fn audio_extract_args(item: &PlanItem) -> Vec<String> {
    let mut args = vec![
        "-i".into(),
        item.source.to_string_lossy().into_owned(),
        "-ss".into(),
        item.start_sec.to_string(),
        "-to".into(),
        item.end_sec.to_string(),
    ];
    args.extend(audio_profile_args());
    args.push("-y".into());
    args.push(item.output.to_string_lossy().into_owned());
    args
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn item(mode: CutMode) -> PlanItem {
        PlanItem {
            source: PathBuf::from("in.mp4"),
            start_sec: 5.0,
            end_sec: 10.0,
            output: PathBuf::from("out/clip.mp4"),
            mode,
            title: "clip".into(),
        }
    }

    #[test]
    fn stream_copy_tier_never_re_encodes() {
        let args = stream_copy_args(&item(CutMode::Video));
        assert!(args.windows(2).any(|w| w[0] == "-c" && w[1] == "copy"));
        assert!(!args.iter().any(|a| a == "libx264"));
        assert_eq!(args.last().unwrap(), "out/clip.mp4");
    }

    #[test]
    fn reencode_tier_carries_sync_profile() {
        let args = reencode_args(&item(CutMode::Video));
        assert!(args.windows(2).any(|w| w[0] == "-c:v" && w[1] == "libx264"));
        assert!(args.windows(2).any(|w| w[0] == "-crf" && w[1] == "23"));
        assert!(args.iter().any(|a| a == "+faststart"));
        // Trim range still applies on the fallback tier.
        assert!(args.windows(2).any(|w| w[0] == "-ss" && w[1] == "5"));
        assert!(args.windows(2).any(|w| w[0] == "-to" && w[1] == "10"));
    }

    #[test]
    fn audio_tier_strips_video() {
        let args = audio_extract_args(&item(CutMode::AudioOnly));
        assert!(args.iter().any(|a| a == "-vn"));
        assert!(args.windows(2).any(|w| w[0] == "-acodec" && w[1] == "libmp3lame"));
        assert!(args.windows(2).any(|w| w[0] == "-b:a" && w[1] == "192k"));
    }

    #[tokio::test]
    async fn existing_output_is_skipped_without_spawning() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("clip.mp4");
        std::fs::write(&output, b"already cut").unwrap();

        // A nonexistent tool path proves nothing was spawned: any invocation
        // would have failed, not skipped.
        let config = Config::with_tools(
            PathBuf::from("/nonexistent/ffmpeg"),
            PathBuf::from("/nonexistent/ffprobe"),
            dir.path().to_path_buf(),
        );
        let cutter = SegmentCutter::new(&config);
        let mut item = item(CutMode::Video);
        item.output = output.clone();

        let outcome = cutter.cut(&item).await;
        assert!(matches!(outcome, ItemOutcome::SkippedExisting));
        assert_eq!(std::fs::read(&output).unwrap(), b"already cut");
    }

    #[tokio::test]
    async fn audio_failure_has_no_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::with_tools(
            PathBuf::from("/nonexistent/ffmpeg"),
            PathBuf::from("/nonexistent/ffprobe"),
            dir.path().to_path_buf(),
        );
        let cutter = SegmentCutter::new(&config);
        let mut item = item(CutMode::AudioOnly);
        item.output = dir.path().join("clip.mp3");

        let outcome = cutter.cut(&item).await;
        assert!(matches!(outcome, ItemOutcome::Failed { .. }));
    }
}
