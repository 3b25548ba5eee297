//! Segment planning
//!
//! Validates and normalizes a sequence of segment requests into a
//! deterministic execution plan. Requests are evaluated in input order and
//! that order is significant: it becomes both execution order and report
//! order. Rejected requests stay in the plan as skip entries so the report
//! can account for every input row.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::utils::path::sanitize_title;
use crate::utils::time::{is_blank, parse_time};

/// One row of the caller-supplied cut list. All fields are raw strings as
/// they arrived; normalization happens during planning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentRequest {
    /// Start time, `HH:MM:SS[.fraction]` or blank
    #[serde(default)]
    pub start: Option<String>,
    /// End time, `HH:MM:SS[.fraction]` or blank
    #[serde(default)]
    pub end: Option<String>,
    /// Human-readable segment title, becomes the output filename
    #[serde(default)]
    pub title: Option<String>,
}

/// Output mode for a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CutMode {
    /// Full audio/video segment, `.mp4` output
    Video,
    /// Video track stripped, `.mp3` output
    AudioOnly,
}

impl CutMode {
    /// Output file extension for this mode.
    pub fn extension(&self) -> &'static str {
        match self {
            CutMode::Video => "mp4",
            CutMode::AudioOnly => "mp3",
        }
    }
}

/// Why a request was excluded from execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// End time missing or blank
    EmptyEnd,
    /// Start time missing or blank
    EmptyStart,
    /// Parsed start is not strictly before parsed end
    InvalidRange,
    /// Output path already claimed by an earlier request in this batch
    DuplicateOutput,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::EmptyEnd => write!(f, "empty end time"),
            SkipReason::EmptyStart => write!(f, "empty start time"),
            SkipReason::InvalidRange => write!(f, "invalid range (start must be before end)"),
            SkipReason::DuplicateOutput => write!(f, "duplicate output path"),
        }
    }
}

/// One executable unit of the plan. Invariant: `start_sec < end_sec`.
#[derive(Debug, Clone)]
pub struct PlanItem {
    /// Source media file
    pub source: PathBuf,
    /// Normalized start offset in seconds
    pub start_sec: f64,
    /// Normalized end offset in seconds
    pub end_sec: f64,
    /// Destination path for the cut segment
    pub output: PathBuf,
    /// Video or audio-only extraction
    pub mode: CutMode,
    /// Sanitized title, used in report lines
    pub title: String,
}

/// A planned entry, in request order: either an executable item or a
/// recorded skip.
#[derive(Debug, Clone)]
pub enum PlanEntry {
    /// Request passed validation and will be executed
    Cut(PlanItem),
    /// Request was excluded; carries enough context for the report line
    Skipped { title: String, reason: SkipReason },
}

/// Planning options derived from batch-level flags.
#[derive(Debug, Clone)]
pub struct PlanOptions {
    /// Strip video and emit `.mp3` segments
    pub audio_only: bool,
    /// Directory receiving the cut segments
    pub output_dir: PathBuf,
}

/// Build the execution plan for one batch.
///
/// Per-request rules, applied in order:
/// 1. blank end time → skip (`EmptyEnd`);
/// 2. blank start time → skip (`EmptyStart`) — an explicitly blank start is
///    a skip, never defaulted to zero;
/// 3. `parse_time(start) >= parse_time(end)` → skip (`InvalidRange`);
/// 4. output path collides with an earlier item → skip (`DuplicateOutput`)
///    instead of silently overwriting at execution time.
pub fn plan(source: &Path, requests: &[SegmentRequest], options: &PlanOptions) -> Vec<PlanEntry> {
    let mode = if options.audio_only {
        CutMode::AudioOnly
    } else {
        CutMode::Video
    };

    let mut entries = Vec::with_capacity(requests.len());
    let mut claimed: Vec<PathBuf> = Vec::new();

    for request in requests {
        let title = sanitize_title(request.title.as_deref().unwrap_or(""));

        if is_blank(request.end.as_deref()) {
            entries.push(PlanEntry::Skipped {
                title,
                reason: SkipReason::EmptyEnd,
            });
            continue;
        }
        if is_blank(request.start.as_deref()) {
            entries.push(PlanEntry::Skipped {
                title,
                reason: SkipReason::EmptyStart,
            });
            continue;
        }

        let start_sec = parse_time(request.start.as_deref());
        let end_sec = parse_time(request.end.as_deref());
        if start_sec >= end_sec {
            entries.push(PlanEntry::Skipped {
                title,
                reason: SkipReason::InvalidRange,
            });
            continue;
        }

        let output = options
            .output_dir
            .join(format!("{}.{}", title, mode.extension()));

        if claimed.contains(&output) {
            entries.push(PlanEntry::Skipped {
                title,
                reason: SkipReason::DuplicateOutput,
            });
            continue;
        }
        claimed.push(output.clone());

        debug!(title = %title, start_sec, end_sec, output = %output.display(), "planned segment");
        entries.push(PlanEntry::Cut(PlanItem {
            source: source.to_path_buf(),
            start_sec,
            end_sec,
            output,
            mode,
            title,
        }));
    }

    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(start: &str, end: &str, title: &str) -> SegmentRequest {
        SegmentRequest {
            start: Some(start.to_string()),
            end: Some(end.to_string()),
            title: Some(title.to_string()),
        }
    }

    fn options() -> PlanOptions {
        PlanOptions {
            audio_only: false,
            output_dir: PathBuf::from("out"),
        }
    }

    #[test]
    fn plans_valid_request() {
        let entries = plan(
            Path::new("in.mp4"),
            &[request("00:00:05", "00:00:10", "intro")],
            &options(),
        );
        assert_eq!(entries.len(), 1);
        match &entries[0] {
            PlanEntry::Cut(item) => {
                assert_eq!(item.start_sec, 5.0);
                assert_eq!(item.end_sec, 10.0);
                assert_eq!(item.output, PathBuf::from("out/intro.mp4"));
                assert_eq!(item.mode, CutMode::Video);
            }
            other => panic!("expected cut entry, got {other:?}"),
        }
    }

    #[test]
    fn blank_end_is_skipped_before_blank_start() {
        // A row with both fields blank reports the end-time rule first.
        let entries = plan(
            Path::new("in.mp4"),
            &[SegmentRequest {
                start: None,
                end: None,
                title: Some("b".into()),
            }],
            &options(),
        );
        assert!(matches!(
            entries[0],
            PlanEntry::Skipped {
                reason: SkipReason::EmptyEnd,
                ..
            }
        ));
    }

    #[test]
    fn blank_start_is_skipped_not_defaulted() {
        let entries = plan(
            Path::new("in.mp4"),
            &[SegmentRequest {
                start: Some("  ".into()),
                end: Some("00:00:10".into()),
                title: Some("b".into()),
            }],
            &options(),
        );
        assert!(matches!(
            entries[0],
            PlanEntry::Skipped {
                reason: SkipReason::EmptyStart,
                ..
            }
        ));
    }

    #[test]
    fn inverted_range_is_skipped() {
        let entries = plan(
            Path::new("in.mp4"),
            &[request("00:00:10", "00:00:05", "a")],
            &options(),
        );
        assert!(matches!(
            entries[0],
            PlanEntry::Skipped {
                reason: SkipReason::InvalidRange,
                ..
            }
        ));
    }

    #[test]
    fn malformed_times_become_invalid_range() {
        // Both sides parse to 0.0, so start >= end catches them.
        let entries = plan(
            Path::new("in.mp4"),
            &[request("garbage", "also garbage", "a")],
            &options(),
        );
        assert!(matches!(
            entries[0],
            PlanEntry::Skipped {
                reason: SkipReason::InvalidRange,
                ..
            }
        ));
    }

    #[test]
    fn duplicate_output_is_rejected() {
        let entries = plan(
            Path::new("in.mp4"),
            &[
                request("00:00:00", "00:00:05", "same"),
                request("00:00:10", "00:00:20", "same"),
            ],
            &options(),
        );
        assert!(matches!(entries[0], PlanEntry::Cut(_)));
        assert!(matches!(
            entries[1],
            PlanEntry::Skipped {
                reason: SkipReason::DuplicateOutput,
                ..
            }
        ));
    }

    #[test]
    fn audio_only_mode_uses_mp3_extension() {
        let entries = plan(
            Path::new("in.mp4"),
            &[request("00:00:00", "00:00:05", "song")],
            &PlanOptions {
                audio_only: true,
                output_dir: PathBuf::from("out"),
            },
        );
        match &entries[0] {
            PlanEntry::Cut(item) => {
                assert_eq!(item.output, PathBuf::from("out/song.mp3"));
                assert_eq!(item.mode, CutMode::AudioOnly);
            }
            other => panic!("expected cut entry, got {other:?}"),
        }
    }

    #[test]
    fn titles_are_sanitized_for_output_paths() {
        let entries = plan(
            Path::new("in.mp4"),
            &[request("00:00:00", "00:00:05", "a/b\\c")],
            &options(),
        );
        match &entries[0] {
            PlanEntry::Cut(item) => assert_eq!(item.output, PathBuf::from("out/a-b-c.mp4")),
            other => panic!("expected cut entry, got {other:?}"),
        }
    }

    #[test]
    fn order_is_preserved_across_mixed_outcomes() {
        let entries = plan(
            Path::new("in.mp4"),
            &[
                request("00:00:10", "00:00:05", "bad"),
                request("00:00:00", "00:00:05", "good"),
                SegmentRequest {
                    start: Some("00:00:00".into()),
                    end: None,
                    title: Some("open".into()),
                },
            ],
            &options(),
        );
        assert_eq!(entries.len(), 3);
        assert!(matches!(entries[0], PlanEntry::Skipped { .. }));
        assert!(matches!(entries[1], PlanEntry::Cut(_)));
        assert!(matches!(entries[2], PlanEntry::Skipped { .. }));
    }
}
