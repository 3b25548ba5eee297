//! Process configuration
//!
//! Tool paths are resolved once at startup and the resulting [`Config`] is
//! immutable for the life of the process. Precedence for each tool:
//! explicit environment override > search-path lookup > bare name (left for
//! the OS to resolve at spawn time).

use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{debug, info};

/// Environment variable naming a specific ffmpeg binary to use.
pub const FFMPEG_ENV: &str = "CLIPBATCH_FFMPEG";
/// Environment variable naming a specific ffprobe binary to use.
pub const FFPROBE_ENV: &str = "CLIPBATCH_FFPROBE";

/// Wall-clock timeout for single-file operations (cut tiers, cover attach).
pub const SINGLE_FILE_TIMEOUT: Duration = Duration::from_secs(300);
/// Wall-clock timeout for concatenation and whole-file re-encodes.
pub const LONG_RUN_TIMEOUT: Duration = Duration::from_secs(600);

/// Immutable process configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Resolved ffmpeg binary.
    pub ffmpeg: PathBuf,
    /// Resolved ffprobe binary.
    pub ffprobe: PathBuf,
    /// Directory where cut segments and concat artifacts are written.
    pub output_dir: PathBuf,
    /// Timeout for single-file tool invocations.
    pub cut_timeout: Duration,
    /// Timeout for concatenation and whole-file re-encodes.
    pub long_timeout: Duration,
}

impl Config {
    /// Build a configuration with tools resolved from the environment.
    pub fn resolve(output_dir: PathBuf) -> Self {
        let ffmpeg = resolve_tool("ffmpeg", FFMPEG_ENV);
        let ffprobe = resolve_tool("ffprobe", FFPROBE_ENV);
        info!(ffmpeg = %ffmpeg.display(), ffprobe = %ffprobe.display(), "resolved tool paths");

        Self {
            ffmpeg,
            ffprobe,
            output_dir,
            cut_timeout: SINGLE_FILE_TIMEOUT,
            long_timeout: LONG_RUN_TIMEOUT,
        }
    }

    /// Configuration with explicit tool paths, used by tests.
    pub fn with_tools(ffmpeg: PathBuf, ffprobe: PathBuf, output_dir: PathBuf) -> Self {
        Self {
            ffmpeg,
            ffprobe,
            output_dir,
            cut_timeout: SINGLE_FILE_TIMEOUT,
            long_timeout: LONG_RUN_TIMEOUT,
        }
    }
}

/// Resolve a tool path, preferring a configured path over PATH lookup.
fn resolve_tool(name: &str, env_var: &str) -> PathBuf {
    if let Ok(configured) = std::env::var(env_var) {
        let path = Path::new(&configured);
        if path.is_file() {
            debug!(tool = name, path = %path.display(), "using configured tool path");
            return path.to_path_buf();
        }
        debug!(tool = name, path = %path.display(), "configured tool path missing, falling back");
    }

    match which::which(name) {
        Ok(found) => found,
        // Leave resolution to the OS at spawn time; a genuinely absent tool
        // then surfaces as a spawn error on first use.
        Err(_) => PathBuf::from(name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_falls_back_to_bare_name() {
        let path = resolve_tool("definitely_not_a_real_tool_9f3a", "CLIPBATCH_UNSET_ENV_9F3A");
        assert_eq!(path, PathBuf::from("definitely_not_a_real_tool_9f3a"));
    }

    #[test]
    fn config_carries_design_timeouts() {
        let config = Config::with_tools("ffmpeg".into(), "ffprobe".into(), "out".into());
        assert_eq!(config.cut_timeout, Duration::from_secs(300));
        assert_eq!(config.long_timeout, Duration::from_secs(600));
    }
}
