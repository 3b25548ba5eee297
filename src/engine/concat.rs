//! Concatenation engine
//!
//! Joins an ordered list of already-cut segments into one artifact. The
//! primary tier writes a concat-demuxer manifest and stream-copies; the
//! fallback tier decodes every input and re-encodes through a concat filter.
//! Input order is preserved exactly as received and each attempt is
//! all-or-nothing. When every input is an audio file the same two-tier shape
//! runs with audio-only defaults.

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{info, warn};

use crate::config::Config;
use crate::engine::runner::ToolRunner;
use crate::engine::{sync_safe_video_args, Method};
use crate::error::{require_file, ClipError, ClipResult};
use crate::utils::path::is_audio_file;

/// Result of a successful concatenation.
#[derive(Debug)]
pub struct ConcatReport {
    pub destination: PathBuf,
    pub method: Method,
    pub inputs: usize,
}

impl std::fmt::Display for ConcatReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "joined {} inputs into {} ({})",
            self.inputs,
            self.destination.display(),
            self.method
        )
    }
}

/// Joins cut segments with a stream-copy fast path and re-encode fallback.
pub struct ConcatEngine<'a> {
    config: &'a Config,
    runner: ToolRunner,
}

impl<'a> ConcatEngine<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self {
            config,
            runner: ToolRunner::new(&config.ffmpeg),
        }
    }

    /// Concatenate `paths` into `destination`, in the order given.
    pub async fn concat(&self, paths: &[PathBuf], destination: &Path) -> ClipResult<ConcatReport> {
        if paths.is_empty() {
            return Err(ClipError::InvalidInput {
                message: "no input files to concatenate".into(),
            });
        }
        for path in paths {
            require_file(path)?;
        }

        let audio_only = paths.iter().all(|p| is_audio_file(p));
        info!(
            inputs = paths.len(),
            audio_only,
            destination = %destination.display(),
            "starting concatenation"
        );

        // The manifest lives in the process temp dir under a unique name and
        // is removed on drop whether either tier succeeds or not.
        let manifest = write_manifest(paths)?;
        let primary = self
            .runner
            .run(
                &demuxer_args(manifest.path(), destination),
                self.config.long_timeout,
            )
            .await;

        let primary_err = match primary {
            Ok(()) => {
                return Ok(ConcatReport {
                    destination: destination.to_path_buf(),
                    method: Method::StreamCopy,
                    inputs: paths.len(),
                })
            }
            Err(err) if err.triggers_fallback() => err,
            Err(err) => return Err(err),
        };

        warn!(error = %primary_err, "concat demuxer failed, falling back to filter re-encode");

        self.runner
            .run(
                &filter_concat_args(paths, destination, audio_only),
                self.config.long_timeout,
            )
            .await
            .map_err(|fallback_err| ClipError::ToolFailure {
                tool: "ffmpeg".into(),
                stderr: format!("concat demuxer: {primary_err}; concat filter: {fallback_err}"),
            })?;

        Ok(ConcatReport {
            destination: destination.to_path_buf(),
            method: if audio_only {
                Method::AudioEncode
            } else {
                Method::ReEncode
            },
            inputs: paths.len(),
        })
    }
}

/// Write the concat-demuxer manifest: one `file '<absolute-path>'` line per
/// input, UTF-8, in input order.
fn write_manifest(paths: &[PathBuf]) -> ClipResult<NamedTempFile> {
    let mut manifest = tempfile::Builder::new()
        .prefix("clipbatch-concat-")
        .suffix(".txt")
        .tempfile()
        .map_err(|e| ClipError::Manifest(e.to_string()))?;

    for path in paths {
        let absolute = std::fs::canonicalize(path).map_err(|e| {
            ClipError::Manifest(format!("cannot resolve {}: {e}", path.display()))
        })?;
        writeln!(manifest, "{}", manifest_line(&absolute))
            .map_err(|e| ClipError::Manifest(e.to_string()))?;
    }
    manifest
        .flush()
        .map_err(|e| ClipError::Manifest(e.to_string()))?;

    Ok(manifest)
}

/// One manifest line. Single quotes inside the path use the demuxer's
/// close-escape-reopen convention so arbitrary filenames stay safe.
fn manifest_line(path: &Path) -> String {
    let escaped = path.to_string_lossy().replace('\'', r"'\''");
    format!("file '{escaped}'")
}

fn demuxer_args(manifest: &Path, destination: &Path) -> Vec<String> {
    vec![
        "-f".into(),
        "concat".into(),
        "-safe".into(),
        "0".into(),
        "-i".into(),
        manifest.to_string_lossy().into_owned(),
        "-c".into(),
        "copy".into(),
        "-y".into(),
        destination.to_string_lossy().into_owned(),
    ]
}

/// Fallback tier: every input decoded, joined through the concat filter.
fn filter_concat_args(paths: &[PathBuf], destination: &Path, audio_only: bool) -> Vec<String> {
    let mut args: Vec<String> = Vec::new();
    for path in paths {
        args.push("-i".into());
        args.push(path.to_string_lossy().into_owned());
    }

    let n = paths.len();
    let mut filter = String::new();
    if audio_only {
        for i in 0..n {
            filter.push_str(&format!("[{i}:a]"));
        }
        filter.push_str(&format!("concat=n={n}:v=0:a=1[a]"));
    } else {
        for i in 0..n {
            filter.push_str(&format!("[{i}:v][{i}:a]"));
        }
        filter.push_str(&format!("concat=n={n}:v=1:a=1[v][a]"));
    }

    args.push("-filter_complex".into());
    args.push(filter);
    if audio_only {
        args.extend(["-map".into(), "[a]".into()]);
        args.extend([
            "-acodec".into(),
            "libmp3lame".into(),
            "-ar".into(),
            "44100".into(),
            "-ac".into(),
            "2".into(),
            "-b:a".into(),
            "192k".into(),
        ]);
    } else {
        args.extend(["-map".into(), "[v]".into(), "-map".into(), "[a]".into()]);
        args.extend(sync_safe_video_args());
    }
    args.push("-y".into());
    args.push(destination.to_string_lossy().into_owned());
    args
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manifest_lines_quote_and_escape() {
        assert_eq!(
            manifest_line(Path::new("/tmp/plain.mp4")),
            "file '/tmp/plain.mp4'"
        );
        assert_eq!(
            manifest_line(Path::new("/tmp/it's here.mp4")),
            r"file '/tmp/it'\''s here.mp4'"
        );
    }

    #[test]
    fn manifest_preserves_input_order() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.mp4");
        let b = dir.path().join("b.mp4");
        std::fs::write(&a, b"a").unwrap();
        std::fs::write(&b, b"b").unwrap();

        let manifest = write_manifest(&[b.clone(), a.clone()]).unwrap();
        let text = std::fs::read_to_string(manifest.path()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("b.mp4"));
        assert!(lines[1].contains("a.mp4"));
    }

    #[test]
    fn demuxer_args_stream_copy() {
        let args = demuxer_args(Path::new("/tmp/list.txt"), Path::new("out.mp4"));
        assert_eq!(args[0], "-f");
        assert_eq!(args[1], "concat");
        assert!(args.windows(2).any(|w| w[0] == "-safe" && w[1] == "0"));
        assert!(args.windows(2).any(|w| w[0] == "-c" && w[1] == "copy"));
    }

    #[test]
    fn video_filter_fallback_maps_both_streams() {
        let paths = vec![PathBuf::from("a.mp4"), PathBuf::from("b.mp4")];
        let args = filter_concat_args(&paths, Path::new("out.mp4"), false);
        let filter = &args[args.iter().position(|a| a == "-filter_complex").unwrap() + 1];
        assert_eq!(filter, "[0:v][0:a][1:v][1:a]concat=n=2:v=1:a=1[v][a]");
        assert!(args.windows(2).any(|w| w[0] == "-map" && w[1] == "[v]"));
        assert!(args.windows(2).any(|w| w[0] == "-map" && w[1] == "[a]"));
        assert!(args.iter().any(|a| a == "libx264"));
    }

    #[test]
    fn audio_filter_fallback_uses_mp3_profile() {
        let paths = vec![PathBuf::from("a.mp3"), PathBuf::from("b.mp3")];
        let args = filter_concat_args(&paths, Path::new("out.mp3"), true);
        let filter = &args[args.iter().position(|a| a == "-filter_complex").unwrap() + 1];
        assert_eq!(filter, "[0:a][1:a]concat=n=2:v=0:a=1[a]");
        assert!(args.iter().any(|a| a == "libmp3lame"));
        assert!(!args.iter().any(|a| a == "libx264"));
    }

    #[tokio::test]
    async fn missing_input_rejected_before_spawn() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::with_tools(
            PathBuf::from("/nonexistent/ffmpeg"),
            PathBuf::from("/nonexistent/ffprobe"),
            dir.path().to_path_buf(),
        );
        let engine = ConcatEngine::new(&config);
        let err = engine
            .concat(
                &[dir.path().join("missing.mp4")],
                &dir.path().join("out.mp4"),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ClipError::InvalidInput { .. }));
    }

    #[tokio::test]
    async fn empty_input_list_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::with_tools(
            PathBuf::from("/nonexistent/ffmpeg"),
            PathBuf::from("/nonexistent/ffprobe"),
            dir.path().to_path_buf(),
        );
        let engine = ConcatEngine::new(&config);
        let err = engine
            .concat(&[], &dir.path().join("out.mp4"))
            .await
            .unwrap_err();
        assert!(matches!(err, ClipError::InvalidInput { .. }));
    }
}
