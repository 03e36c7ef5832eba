pub mod camera;
pub mod sampler;
pub mod synthetic;

pub use camera::{Camera, PermissionStatus};
pub use sampler::{FrameSampler, MeanPixelSampler, RandomSampler};
pub use synthetic::SyntheticCamera;
