pub mod frame;
pub mod sample;

pub use frame::Frame;
pub use sample::{ColorSample, Sample};
