//! Execution engine
//!
//! Everything that actually spawns the external transcoder lives here. The
//! cutter and the concat engine share a two-tier shape: attempt the lossless
//! stream-copy path first, fall back to a full re-encode when the tool
//! reports failure or times out.

use std::fmt;

use serde::{Deserialize, Serialize};

pub mod concat;
pub mod cutter;
pub mod runner;
pub mod transform;

pub use concat::{ConcatEngine, ConcatReport};
pub use cutter::SegmentCutter;
pub use runner::ToolRunner;
pub use transform::Transformer;

/// How an output artifact was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Method {
    /// Lossless re-mux without decoding
    StreamCopy,
    /// Full decode and re-encode
    ReEncode,
    /// Audio-only extraction to MP3
    AudioEncode,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::StreamCopy => write!(f, "stream copy"),
            Method::ReEncode => write!(f, "re-encode"),
            Method::AudioEncode => write!(f, "audio encode"),
        }
    }
}

/// Resolved outcome of one plan item. The cutter never returns `Err`; every
/// result, including double-tier failure, is reified here.
#[derive(Debug, Clone)]
pub enum ItemOutcome {
    /// Output produced by the named method
    Done { method: Method, detail: String },
    /// Output already existed; file untouched, no subprocess spawned
    SkippedExisting,
    /// Every applicable tier failed
    Failed { cause: String },
}

impl ItemOutcome {
    /// True when the item's output file is usable for concatenation.
    /// Pre-existing outputs count: re-running a batch after a partial
    /// failure must still stitch the already-finished segments.
    pub fn output_usable(&self) -> bool {
        matches!(self, ItemOutcome::Done { .. } | ItemOutcome::SkippedExisting)
    }
}

/// Fixed re-encode profile tuned for network playback and A/V sync. Used by
/// the cutter's fallback tier, the concat fallback, and the crop transform.
pub fn sync_safe_video_args() -> Vec<String> {
    [
        "-c:v",
        "libx264",
        "-crf",
        "23",
        "-preset",
        "medium",
        "-c:a",
        "aac",
        "-movflags",
        "+faststart",
        "-avoid_negative_ts",
        "make_zero",
        "-fflags",
        "+genpts",
        "-async",
        "1",
        "-vsync",
        "1",
        "-threads",
        "4",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// Fixed audio extraction profile: stereo 44.1 kHz MP3 at 192 kbit/s.
pub fn audio_profile_args() -> Vec<String> {
    [
        "-vn",
        "-acodec",
        "libmp3lame",
        "-ar",
        "44100",
        "-ac",
        "2",
        "-b:a",
        "192k",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}
