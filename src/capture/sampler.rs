use crate::common::{ColorSample, Frame, Sample};
use crate::error::{AppError, Result};
use rand::Rng;

/// Reduces one captured frame to a brightness/color sample.
pub trait FrameSampler: Send + Sync {
    fn sample(&self, frame: &Frame) -> Result<Sample>;
    fn name(&self) -> &'static str;
}

/// Stand-in for real pixel analysis: ignores the frame and returns
/// luminance in [50, 150) and channels in [120, 170).
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomSampler;

impl RandomSampler {
    pub fn new() -> Self {
        Self
    }
}

impl FrameSampler for RandomSampler {
    fn sample(&self, _frame: &Frame) -> Result<Sample> {
        let mut rng = rand::rng();
        let luminance = rng.random_range(50.0..150.0);
        let color = ColorSample::new(
            rng.random_range(120.0..170.0),
            rng.random_range(120.0..170.0),
            rng.random_range(120.0..170.0),
        );
        Ok(Sample::new(luminance, color))
    }

    fn name(&self) -> &'static str {
        "random"
    }
}

/// Plain average over decoded pixels.
///
/// Channels are the 8-bit sRGB values as decoded, without linearisation or
/// white balance, so every output lies in [0, 255]. Luminance is the mean
/// Rec. 709 luma `0.2126 R + 0.7152 G + 0.0722 B`. Only every `stride`-th
/// pixel in each direction is visited. Uncalibrated: fine for comparing
/// lamps under the same camera, not a photometric measurement.
#[derive(Debug, Clone, Copy)]
pub struct MeanPixelSampler {
    stride: u32,
}

impl MeanPixelSampler {
    pub fn new() -> Self {
        Self { stride: 1 }
    }

    pub fn with_stride(mut self, stride: u32) -> Self {
        self.stride = stride.max(1);
        self
    }
}

impl Default for MeanPixelSampler {
    fn default() -> Self {
        Self::new()
    }
}

fn rgb_to_luma(r: f64, g: f64, b: f64) -> f64 {
    // Rec. 709 luminance
    0.2126 * r + 0.7152 * g + 0.0722 * b
}

impl FrameSampler for MeanPixelSampler {
    fn sample(&self, frame: &Frame) -> Result<Sample> {
        let rgb_image = frame.image().to_rgb8();
        let (width, height) = rgb_image.dimensions();
        if width == 0 || height == 0 {
            return Err(AppError::Capture(format!(
                "frame {} has no pixels",
                frame.frame_id()
            )));
        }

        let mut sum = ColorSample::default();
        let mut luma_sum = 0f64;
        let mut n = 0f64;
        for y in (0..height).step_by(self.stride as usize) {
            for x in (0..width).step_by(self.stride as usize) {
                let p = rgb_image.get_pixel(x, y);
                let (r, g, b) = (p[0] as f64, p[1] as f64, p[2] as f64);
                sum.r += r;
                sum.g += g;
                sum.b += b;
                luma_sum += rgb_to_luma(r, g, b);
                n += 1.0;
            }
        }

        Ok(Sample::new(
            luma_sum / n,
            ColorSample::new(sum.r / n, sum.g / n, sum.b / n),
        ))
    }

    fn name(&self) -> &'static str {
        "mean_pixel"
    }
}
