//! Media file probing
//!
//! Thin wrapper over the probe tool's JSON output. Only the fields the
//! `info` command displays are extracted; everything else in the probe
//! report is ignored.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::engine::runner::ToolRunner;
use crate::error::{require_file, ClipError, ClipResult};
use crate::utils::path::file_size_mb;
use crate::utils::time::format_time;

/// Basic media file information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaInfo {
    pub filename: String,
    pub size_mb: f64,
    /// Duration as `HH:MM:SS.mmm`
    pub duration: String,
    /// `WIDTHxHEIGHT` of the first video stream, if any
    pub resolution: Option<String>,
}

impl std::fmt::Display for MediaInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {:.2} MB, duration {}",
            self.filename, self.size_mb, self.duration
        )?;
        if let Some(res) = &self.resolution {
            write!(f, ", {res}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    format: Option<ProbeFormat>,
    #[serde(default)]
    streams: Vec<ProbeStream>,
}

#[derive(Debug, Deserialize)]
struct ProbeFormat {
    duration: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProbeStream {
    codec_type: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
}

/// Probe a media file for display purposes.
pub async fn probe(config: &Config, path: &Path) -> ClipResult<MediaInfo> {
    require_file(path)?;

    let runner = ToolRunner::new(&config.ffprobe);
    let args = vec![
        "-v".to_string(),
        "error".to_string(),
        "-print_format".to_string(),
        "json".to_string(),
        "-show_format".to_string(),
        "-show_streams".to_string(),
        path.to_string_lossy().into_owned(),
    ];
    let stdout = runner.run_capture(&args, config.cut_timeout).await?;

    let parsed: ProbeOutput = serde_json::from_str(&stdout).map_err(|e| ClipError::ProbeError {
        message: format!("unparseable probe output: {e}"),
    })?;

    let duration_sec = parsed
        .format
        .and_then(|f| f.duration)
        .and_then(|d| d.parse::<f64>().ok())
        .unwrap_or(0.0);

    let resolution = parsed
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("video"))
        .and_then(|s| Some(format!("{}x{}", s.width?, s.height?)));

    Ok(MediaInfo {
        filename: path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default(),
        size_mb: file_size_mb(path)?,
        duration: format_time(duration_sec),
        resolution,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_probe_json() {
        let json = r#"{
            "format": {"duration": "90.5"},
            "streams": [
                {"codec_type": "audio"},
                {"codec_type": "video", "width": 1920, "height": 1080}
            ]
        }"#;
        let parsed: ProbeOutput = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.streams.len(), 2);
        assert_eq!(parsed.format.unwrap().duration.as_deref(), Some("90.5"));
        let video = parsed
            .streams
            .iter()
            .find(|s| s.codec_type.as_deref() == Some("video"))
            .unwrap();
        assert_eq!(video.width, Some(1920));
    }

    #[test]
    fn tolerates_audio_only_probe_output() {
        let json = r#"{"format": {"duration": "12.0"}, "streams": [{"codec_type": "audio"}]}"#;
        let parsed: ProbeOutput = serde_json::from_str(json).unwrap();
        let resolution = parsed
            .streams
            .iter()
            .find(|s| s.codec_type.as_deref() == Some("video"))
            .and_then(|s| Some(format!("{}x{}", s.width?, s.height?)));
        assert!(resolution.is_none());
    }
}
