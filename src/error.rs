use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

// Main Application Error Type

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Camera permission denied")]
    PermissionDenied,
    #[error("Camera not running, start camera first")]
    SessionNotActive,
    #[error("Scan already in progress")]
    ConcurrentScan,
    #[error("No camera device available")]
    NoCameraDevice,
    #[error("Scan cancelled: the capture session ended")]
    ScanCancelled,
    #[error("Capture error: {0}")]
    Capture(String),
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl AppError {
    /// Session-level errors leave the capture session usable.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, AppError::Config(_) | AppError::Serialization(_))
    }

    /// Short text for the presentation layer.
    pub fn user_message(&self) -> String {
        match self {
            AppError::PermissionDenied => "Camera permission denied".to_string(),
            AppError::SessionNotActive => "Camera not running — start camera first.".to_string(),
            AppError::ConcurrentScan => "Scan already in progress".to_string(),
            AppError::NoCameraDevice => "No camera device available".to_string(),
            AppError::ScanCancelled => "Scan cancelled — the camera was stopped.".to_string(),
            AppError::Capture(message) | AppError::InvalidInput(message) => {
                format!("Error during scanning: {}", message)
            }
            other => other.to_string(),
        }
    }
}
