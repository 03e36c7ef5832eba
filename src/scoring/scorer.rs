use super::recommendation::{Area, Recommendation, Severity};
use super::report::{Report, round_to};
use super::stats::AggregateStats;
use crate::common::Sample;
use crate::error::{AppError, Result};
use tracing::debug;

pub const WARM_RATIO_MIN: f64 = 1.2;
pub const COOL_RATIO_MAX: f64 = 0.8;
pub const DIM_LUMINANCE_BELOW: f64 = 40.0;
pub const BRIGHT_LUMINANCE_ABOVE: f64 = 200.0;
pub const HIGH_FLICKER_ABOVE: f64 = 0.08;
pub const MODERATE_FLICKER_ABOVE: f64 = 0.03;

const MAX_SCORE: u8 = 100;

/// Maps a batch of per-frame samples to a scored lamp assessment.
///
/// Stateless: the same batch always yields the same report, and one scorer
/// can be shared freely between tasks.
#[derive(Debug, Clone, Copy, Default)]
pub struct LampQualityScorer;

impl LampQualityScorer {
    pub fn new() -> Self {
        Self
    }

    pub fn score(&self, samples: &[Sample]) -> Result<Report> {
        let stats = AggregateStats::from_samples(samples)?;
        debug!(
            "Scoring {} samples: avg_luminance={:.2}, flicker_index={:.4}, color_ratio={:.3}",
            samples.len(),
            stats.avg_luminance,
            stats.flicker_index,
            stats.color_ratio
        );

        let (color_temp_label, color_severity) = classify_color_temperature(stats.color_ratio);
        let recommendations = [
            recommendation(Area::Brightness, classify_brightness(stats.avg_luminance))?,
            recommendation(Area::ColorTemperature, color_severity)?,
            recommendation(Area::Flicker, classify_flicker(stats.flicker_index))?,
        ];

        let penalty: u8 = recommendations.iter().map(|r| r.severity.penalty()).sum();
        let score = MAX_SCORE.saturating_sub(penalty);

        Ok(Report {
            // Finite and non-negative by now, so halves round up.
            avg_luminance: stats.avg_luminance.round() as i64,
            flicker_index: round_to(stats.flicker_index, 3),
            color_ratio: round_to(stats.color_ratio, 2),
            color_temp_label,
            recommendations,
            score,
        })
    }
}

fn recommendation(area: Area, severity: Severity) -> Result<Recommendation> {
    Recommendation::new(area, severity).ok_or_else(|| {
        AppError::InvalidInput(format!("no recommendation for {} / {}", area, severity))
    })
}

pub fn classify_color_temperature(color_ratio: f64) -> (&'static str, Severity) {
    if color_ratio >= WARM_RATIO_MIN {
        ("Warm (yellow/orange)", Severity::Warm)
    } else if color_ratio <= COOL_RATIO_MAX {
        ("Cool (blue/white)", Severity::Cool)
    } else {
        ("Neutral", Severity::Neutral)
    }
}

/// 40 and 200 themselves are inside the comfortable range.
pub fn classify_brightness(avg_luminance: f64) -> Severity {
    if avg_luminance < DIM_LUMINANCE_BELOW {
        Severity::Low
    } else if avg_luminance > BRIGHT_LUMINANCE_ABOVE {
        Severity::High
    } else {
        Severity::Good
    }
}

pub fn classify_flicker(flicker_index: f64) -> Severity {
    if flicker_index > HIGH_FLICKER_ABOVE {
        Severity::High
    } else if flicker_index > MODERATE_FLICKER_ABOVE {
        Severity::Moderate
    } else {
        Severity::Low
    }
}
