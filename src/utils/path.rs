//! Path and filename utilities

use std::path::Path;

/// Placeholder used when a segment title is empty or whitespace-only.
pub const UNTITLED: &str = "untitled";

/// Sanitize a segment title for use as a filename.
///
/// Path separators are replaced with `-` so a title can never escape the
/// output directory; an empty title becomes [`UNTITLED`].
pub fn sanitize_title(title: &str) -> String {
    let cleaned: String = title
        .trim()
        .chars()
        .map(|c| if c == '/' || c == '\\' { '-' } else { c })
        .collect();

    if cleaned.is_empty() {
        UNTITLED.to_string()
    } else {
        cleaned
    }
}

/// True when the path carries an audio extension (concat routing check).
pub fn is_audio_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("mp3"))
        .unwrap_or(false)
}

/// File size in megabytes.
pub fn file_size_mb(path: &Path) -> std::io::Result<f64> {
    let bytes = std::fs::metadata(path)?.len();
    Ok(bytes as f64 / (1024.0 * 1024.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn replaces_path_separators() {
        assert_eq!(sanitize_title("intro/outro"), "intro-outro");
        assert_eq!(sanitize_title("a\\b/c"), "a-b-c");
    }

    #[test]
    fn empty_title_gets_placeholder() {
        assert_eq!(sanitize_title(""), UNTITLED);
        assert_eq!(sanitize_title("   "), UNTITLED);
    }

    #[test]
    fn keeps_ordinary_titles() {
        assert_eq!(sanitize_title("Episode 1 - Opening"), "Episode 1 - Opening");
    }

    #[test]
    fn audio_detection_by_extension() {
        assert!(is_audio_file(&PathBuf::from("clip.mp3")));
        assert!(is_audio_file(&PathBuf::from("CLIP.MP3")));
        assert!(!is_audio_file(&PathBuf::from("clip.mp4")));
        assert!(!is_audio_file(&PathBuf::from("noext")));
    }
}
