use super::camera::{Camera, PermissionStatus};
use crate::common::Frame;
use crate::error::{AppError, Result};
use async_trait::async_trait;
use chrono::Utc;
use image::{DynamicImage, ImageBuffer, Rgb};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tracing::debug;
use uuid::Uuid;

/// Camera that renders solid-colour frames from a scripted colour sequence.
/// Stands in for a device in tests and in the demo binary.
pub struct SyntheticCamera {
    width: u32,
    height: u32,
    colors: Vec<[u8; 3]>,
    available: bool,
    permission: PermissionStatus,
    grant_on_request: bool,
    fail_after: Option<usize>,
    capture_delay: Duration,
    active_session: Option<Uuid>,
    captured: Arc<AtomicUsize>,
}

impl SyntheticCamera {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            colors: vec![[150, 120, 100]],
            available: true,
            permission: PermissionStatus::NotDetermined,
            grant_on_request: true,
            fail_after: None,
            capture_delay: Duration::ZERO,
            active_session: None,
            captured: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Frames cycle through these colours in order.
    pub fn with_colors(mut self, colors: Vec<[u8; 3]>) -> Self {
        if !colors.is_empty() {
            self.colors = colors;
        }
        self
    }

    pub fn with_permission(mut self, permission: PermissionStatus) -> Self {
        self.permission = permission;
        self
    }

    /// The permission prompt will be refused.
    pub fn denying_requests(mut self) -> Self {
        self.grant_on_request = false;
        self
    }

    pub fn unavailable(mut self) -> Self {
        self.available = false;
        self
    }

    /// Every capture after the first `frames` successful ones fails.
    pub fn failing_after(mut self, frames: usize) -> Self {
        self.fail_after = Some(frames);
        self
    }

    /// Each capture takes this long, like a real shutter.
    pub fn with_capture_delay(mut self, delay: Duration) -> Self {
        self.capture_delay = delay;
        self
    }

    /// Shared count of successful captures, readable after the camera has
    /// been handed to a session.
    pub fn capture_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.captured)
    }
}

#[async_trait]
impl Camera for SyntheticCamera {
    fn is_available(&self) -> bool {
        self.available
    }

    async fn permission_status(&self) -> PermissionStatus {
        self.permission
    }

    async fn request_permission(&mut self) -> PermissionStatus {
        if self.permission == PermissionStatus::NotDetermined {
            self.permission = if self.grant_on_request {
                PermissionStatus::Granted
            } else {
                PermissionStatus::Denied
            };
        }
        self.permission
    }

    async fn activate(&mut self) -> Result<()> {
        if !self.available {
            return Err(AppError::NoCameraDevice);
        }
        if !self.permission.is_granted() {
            return Err(AppError::PermissionDenied);
        }
        let session = Uuid::new_v4();
        debug!("Synthetic camera activated for session {}", session);
        self.active_session = Some(session);
        Ok(())
    }

    async fn deactivate(&mut self) {
        self.active_session = None;
    }

    async fn capture_frame(&mut self) -> Result<Frame> {
        let session = self
            .active_session
            .ok_or_else(|| AppError::Capture("camera is not active".to_string()))?;
        if !self.capture_delay.is_zero() {
            tokio::time::sleep(self.capture_delay).await;
        }

        let index = self.captured.load(Ordering::SeqCst);
        if self.fail_after.is_some_and(|limit| index >= limit) {
            return Err(AppError::Capture(format!("snapshot {} failed", index + 1)));
        }

        let color = self.colors[index % self.colors.len()];
        let image = DynamicImage::ImageRgb8(ImageBuffer::<Rgb<u8>, Vec<u8>>::from_pixel(
            self.width.max(1),
            self.height.max(1),
            Rgb(color),
        ));
        self.captured.fetch_add(1, Ordering::SeqCst);
        Ok(Frame::new(session, image, Utc::now()))
    }
}
