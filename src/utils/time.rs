//! Time parsing and formatting utilities
//!
//! Segment requests arrive from unreliable sources (hand-edited spreadsheets
//! exported to JSON), so parsing is total: a malformed cell becomes 0.0 and
//! surfaces later as an "invalid range" skip instead of aborting the batch.

/// Parse an `HH:MM:SS[.fraction]` time string into seconds.
///
/// Accepts `None`, empty, or whitespace-only input and returns 0.0. Any
/// other shape than exactly three numeric colon-separated components also
/// returns 0.0 rather than erroring.
pub fn parse_time(raw: Option<&str>) -> f64 {
    let time_str = match raw {
        Some(s) => s.trim(),
        None => return 0.0,
    };
    if time_str.is_empty() {
        return 0.0;
    }

    let parts: Vec<&str> = time_str.split(':').collect();
    if parts.len() != 3 {
        return 0.0;
    }

    let mut components = [0.0f64; 3];
    for (slot, part) in components.iter_mut().zip(&parts) {
        match part.trim().parse::<f64>() {
            Ok(value) => *slot = value,
            Err(_) => return 0.0,
        }
    }

    let total = components[0] * 3600.0 + components[1] * 60.0 + components[2];
    // Overflowing or negative cells degrade to zero like any other bad cell.
    if total.is_finite() && total >= 0.0 {
        total
    } else {
        0.0
    }
}

/// Format seconds as `HH:MM:SS.mmm`.
///
/// Hours are zero-padded but unbounded (not wrapped at 24).
pub fn format_time(seconds: f64) -> String {
    let hours = (seconds / 3600.0) as u64;
    let minutes = ((seconds % 3600.0) / 60.0) as u64;
    let secs = seconds % 60.0;

    format!("{:02}:{:02}:{:06.3}", hours, minutes, secs)
}

/// True when the string is absent, empty, or whitespace-only.
pub fn is_blank(raw: Option<&str>) -> bool {
    raw.map_or(true, |s| s.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_well_formed_times() {
        assert_eq!(parse_time(Some("00:00:00")), 0.0);
        assert_eq!(parse_time(Some("00:01:30")), 90.0);
        assert_eq!(parse_time(Some("01:00:00")), 3600.0);
        assert!((parse_time(Some("00:00:01.500")) - 1.5).abs() < 1e-9);
        assert_eq!(parse_time(Some("10:30:15")), 37815.0);
    }

    #[test]
    fn blank_input_is_zero() {
        assert_eq!(parse_time(None), 0.0);
        assert_eq!(parse_time(Some("")), 0.0);
        assert_eq!(parse_time(Some("   ")), 0.0);
    }

    #[test]
    fn malformed_input_is_zero_not_an_error() {
        assert_eq!(parse_time(Some("nonsense")), 0.0);
        assert_eq!(parse_time(Some("12:34")), 0.0);
        assert_eq!(parse_time(Some("1:2:3:4")), 0.0);
        assert_eq!(parse_time(Some("aa:bb:cc")), 0.0);
        assert_eq!(parse_time(Some("00:xx:10")), 0.0);
    }

    #[test]
    fn parse_time_is_total() {
        // Arbitrary garbage never panics and never produces NaN.
        for s in ["", ":", "::", ":::", "💥:💥:💥", "1.2.3", "-", "1e999:0:0", "-1:0:0"] {
            let v = parse_time(Some(s));
            assert!(v.is_finite() && v >= 0.0, "bad result {v} for {s:?}");
        }
    }

    #[test]
    fn formats_with_millisecond_precision() {
        assert_eq!(format_time(0.0), "00:00:00.000");
        assert_eq!(format_time(90.0), "00:01:30.000");
        assert_eq!(format_time(3661.25), "01:01:01.250");
    }

    #[test]
    fn hours_are_not_wrapped() {
        assert_eq!(format_time(25.0 * 3600.0), "25:00:00.000");
    }

    #[test]
    fn round_trips_at_millisecond_precision() {
        for s in ["00:00:00.000", "00:01:30.000", "01:02:03.125", "12:59:59.999"] {
            assert_eq!(format_time(parse_time(Some(s))), s);
        }
    }

    #[test]
    fn detects_blank_specs() {
        assert!(is_blank(None));
        assert!(is_blank(Some("")));
        assert!(is_blank(Some("  \t")));
        assert!(!is_blank(Some("00:00:01")));
    }
}
