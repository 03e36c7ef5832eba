use crate::common::{ColorSample, Sample};
use crate::error::{AppError, Result};

/// Keeps the flicker index finite for an all-black batch.
pub const FLICKER_EPSILON: f64 = 1e-6;

/// Batch statistics over one scan's samples.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AggregateStats {
    pub avg_luminance: f64,
    pub luminance_std_dev: f64,
    pub flicker_index: f64,
    pub avg_color: ColorSample,
    pub color_ratio: f64,
}

impl AggregateStats {
    /// Samples are expected on the 8-bit scale, so every value is finite and
    /// non-negative. Non-finite values are rejected rather than averaged.
    pub fn from_samples(samples: &[Sample]) -> Result<Self> {
        if samples.is_empty() {
            return Err(AppError::InvalidInput(
                "cannot score an empty sample batch".to_string(),
            ));
        }
        if let Some(index) = samples.iter().position(|s| !is_finite(s)) {
            return Err(AppError::InvalidInput(format!(
                "sample {} has a non-finite value",
                index + 1
            )));
        }
        let count = samples.len() as f64;

        let avg_luminance = samples.iter().map(|s| s.luminance).sum::<f64>() / count;
        // Population variance: divisor is the sample count.
        let variance = samples
            .iter()
            .map(|s| (s.luminance - avg_luminance).powi(2))
            .sum::<f64>()
            / count;
        let luminance_std_dev = variance.sqrt();
        let flicker_index = luminance_std_dev / (avg_luminance + FLICKER_EPSILON);

        let sum = samples.iter().fold(ColorSample::default(), |acc, s| {
            ColorSample::new(acc.r + s.color.r, acc.g + s.color.g, acc.b + s.color.b)
        });
        let avg_color = ColorSample::new(sum.r / count, sum.g / count, sum.b / count);
        let color_ratio = (avg_color.r + 1.0) / (avg_color.b + 1.0);

        Ok(Self {
            avg_luminance,
            luminance_std_dev,
            flicker_index,
            avg_color,
            color_ratio,
        })
    }
}

fn is_finite(sample: &Sample) -> bool {
    sample.luminance.is_finite()
        && sample.color.r.is_finite()
        && sample.color.g.is_finite()
        && sample.color.b.is_finite()
}
