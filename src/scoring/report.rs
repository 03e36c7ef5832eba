use super::recommendation::Recommendation;
use serde::Serialize;

/// Result of one scan, as shown to the user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    /// Mean luminance rounded to the nearest integer.
    pub avg_luminance: i64,
    /// Rounded to 3 decimal places.
    pub flicker_index: f64,
    /// Rounded to 2 decimal places.
    pub color_ratio: f64,
    pub color_temp_label: &'static str,
    /// Always Brightness, ColorTemperature, Flicker in that order.
    pub recommendations: [Recommendation; 3],
    pub score: u8,
}

pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
