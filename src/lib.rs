//! clipbatch library
//!
//! Batch video clipping driven by an external transcoding tool: a planner
//! turns caller-supplied segment requests into a deterministic execution
//! plan, a two-tier cutter extracts each segment (stream copy first,
//! re-encode fallback), and an optional concatenation pass stitches the
//! surviving segments back into one artifact.

pub mod app;
pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod planner;
pub mod probe;
pub mod utils;

// Re-export commonly used types
pub use app::{BatchOptions, BatchReport, BatchRunner, ReportLine};
pub use config::Config;
pub use engine::{ItemOutcome, Method};
pub use error::{ClipError, ClipResult};
pub use planner::{CutMode, PlanEntry, PlanItem, SegmentRequest, SkipReason};
