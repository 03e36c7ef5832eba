pub mod capture;
pub mod common;
pub mod config;
pub mod error;
pub mod presentation;
pub mod scoring;
pub mod session;

pub use capture::{Camera, FrameSampler, MeanPixelSampler, RandomSampler, SyntheticCamera};
pub use common::{ColorSample, Frame, Sample};
pub use error::{AppError, Result};
pub use scoring::{LampQualityScorer, Recommendation, Report, Severity};
pub use session::{CaptureSession, ScanSettings, SessionState};
