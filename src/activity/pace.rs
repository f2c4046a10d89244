//! Pace is stored as `minutes.seconds`: 5.30 is five minutes thirty seconds,
//! not five and three tenths. These helpers translate that encoding to and
//! from `mm:ss` text without reinterpreting it.

/// Parses `mm:ss` or `mm.ss`.
pub fn pace_to_float(value: &str) -> Option<f64> {
    value.trim().replace(':', ".").parse().ok()
}

/// Renders a stored pace as `mm:ss`. Zero is "no pace" and renders empty.
pub fn pace_from_float(value: f64) -> String {
    if value == 0.0 {
        return String::new();
    }
    if !value.is_finite() {
        return value.to_string();
    }
    format!("{:.2}", value).replace('.', ":")
}
