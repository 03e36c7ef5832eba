pub mod controller;
pub mod settings;
pub mod state;

pub use controller::CaptureSession;
pub use settings::ScanSettings;
pub use state::SessionState;
