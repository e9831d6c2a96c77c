//! Small formatting and parsing helpers shared across the UI.

use eframe::egui::Color32;

/// Format seconds as `m:ss` (or `h:mm:ss` past an hour).
pub fn format_time(seconds: f64) -> String {
    let total = seconds.max(0.0) as u64;
    let (h, m, s) = (total / 3600, (total % 3600) / 60, total % 60);
    if h > 0 {
        format!("{h}:{m:02}:{s:02}")
    } else {
        format!("{m}:{s:02}")
    }
}

/// Format a sampling rate as `N Hz` / `N.n kHz`.
pub fn format_sample_rate(hz: f64) -> String {
    if hz >= 1000.0 {
        format!("{:.1} kHz", hz / 1000.0)
    } else {
        format!("{:.0} Hz", hz)
    }
}

/// Parse `#rrggbb` (leading `#` optional) into a color.
pub fn parse_hex_color(raw: &str) -> Option<Color32> {
    let hex = raw.trim().trim_start_matches('#');
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color32::from_rgb(r, g, b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(0.0), "0:00");
        assert_eq!(format_time(65.4), "1:05");
        assert_eq!(format_time(600.0), "10:00");
        assert_eq!(format_time(3725.0), "1:02:05");
        assert_eq!(format_time(-5.0), "0:00");
    }

    #[test]
    fn test_format_sample_rate() {
        assert_eq!(format_sample_rate(50.0), "50 Hz");
        assert_eq!(format_sample_rate(2000.0), "2.0 kHz");
    }

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("#ef4444"), Some(Color32::from_rgb(239, 68, 68)));
        assert_eq!(parse_hex_color("22c55e"), Some(Color32::from_rgb(34, 197, 94)));
        assert_eq!(parse_hex_color("#fff"), None);
        assert_eq!(parse_hex_color("not-a-color"), None);
    }
}
