//! Formatting utilities used for CLI outputs.

pub fn bold(s: &str) -> String {
    format!("\x1b[1m{}\x1b[0m", s)
}

/// Human readable distance: meters below 1 km, kilometers with 2 decimals above.
pub fn format_distance(meters: f64) -> String {
    if !meters.is_finite() {
        "n/a".to_string()
    } else if meters < 1000.0 {
        format!("{:.0} m", meters)
    } else {
        format!("{:.2} km", meters / 1000.0)
    }
}
