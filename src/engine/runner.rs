//! External tool invocation
//!
//! Each invocation is a blocking call from the batch's point of view: spawn,
//! capture output, enforce a wall-clock timeout. A timeout is reported as a
//! distinct failure category from a non-zero exit so the report can say
//! which one happened, but both trigger the same fallback tier upstream.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tracing::debug;

use crate::error::{ClipError, ClipResult};

/// Maximum stderr excerpt carried into report lines.
const STDERR_EXCERPT_LEN: usize = 800;

/// Runs one external binary with captured output and a timeout.
#[derive(Debug, Clone)]
pub struct ToolRunner {
    binary: PathBuf,
}

impl ToolRunner {
    pub fn new(binary: &Path) -> Self {
        Self {
            binary: binary.to_path_buf(),
        }
    }

    /// Short tool name for error messages.
    fn tool_name(&self) -> String {
        self.binary
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.binary.to_string_lossy().into_owned())
    }

    /// Run the tool, discarding stdout. Non-zero exit becomes
    /// [`ClipError::ToolFailure`] with a stderr excerpt; exceeding `limit`
    /// becomes [`ClipError::Timeout`].
    pub async fn run(&self, args: &[String], limit: Duration) -> ClipResult<()> {
        self.run_capture(args, limit).await.map(|_| ())
    }

    /// Run the tool and return captured stdout on success.
    pub async fn run_capture(&self, args: &[String], limit: Duration) -> ClipResult<String> {
        debug!(tool = %self.binary.display(), ?args, "spawning external tool");

        let mut command = Command::new(&self.binary);
        command
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let output = match tokio::time::timeout(limit, command.output()).await {
            Ok(result) => result?,
            Err(_) => {
                return Err(ClipError::Timeout {
                    tool: self.tool_name(),
                    seconds: limit.as_secs(),
                })
            }
        };

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).into_owned())
        } else {
            Err(ClipError::ToolFailure {
                tool: self.tool_name(),
                stderr: stderr_excerpt(&output.stderr),
            })
        }
    }
}

/// Trailing excerpt of captured stderr; the end of ffmpeg's output carries
/// the actual error line.
fn stderr_excerpt(stderr: &[u8]) -> String {
    let text = String::from_utf8_lossy(stderr);
    let trimmed = text.trim();
    if trimmed.len() <= STDERR_EXCERPT_LEN {
        return trimmed.to_string();
    }
    let tail_start = trimmed
        .char_indices()
        .rev()
        .take(STDERR_EXCERPT_LEN)
        .last()
        .map(|(i, _)| i)
        .unwrap_or(0);
    format!("...{}", &trimmed[tail_start..])
}
