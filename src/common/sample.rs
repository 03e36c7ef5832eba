use serde::{Deserialize, Serialize};

/// Average channel intensities of a frame, each conventionally in [0, 255].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ColorSample {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl ColorSample {
    pub fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }
}

/// Brightness and color measured from a single frame.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Sample {
    pub luminance: f64,
    pub color: ColorSample,
}

impl Sample {
    pub fn new(luminance: f64, color: ColorSample) -> Self {
        Self { luminance, color }
    }
}
