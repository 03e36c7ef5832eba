use std::time::Duration;

/// How many frames one scan captures and how long it pauses between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanSettings {
    pub frame_count: usize,
    pub frame_interval: Duration,
}

impl Default for ScanSettings {
    /// About one second of capture at ~30 fps.
    fn default() -> Self {
        Self {
            frame_count: 30,
            frame_interval: Duration::from_millis(33),
        }
    }
}

impl ScanSettings {
    // Overrides the number of frames per scan.
    pub fn frame_count(mut self, frame_count: usize) -> Self {
        self.frame_count = frame_count;
        self
    }

    // Overrides the pause between two captures.
    pub fn frame_interval(mut self, frame_interval: Duration) -> Self {
        self.frame_interval = frame_interval;
        self
    }
}
