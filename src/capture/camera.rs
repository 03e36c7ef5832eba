use crate::common::Frame;
use crate::error::Result;
use async_trait::async_trait;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PermissionStatus {
    Granted,
    Denied,
    NotDetermined,
    Restricted,
}

impl PermissionStatus {
    pub fn is_granted(&self) -> bool {
        matches!(self, PermissionStatus::Granted)
    }
}

/// Platform camera collaborator: device lookup, permission negotiation and
/// frame capture. Captures are serialized per device, so every method takes
/// the camera exclusively or only reads its state.
#[async_trait]
pub trait Camera: Send + Sync {
    /// Whether a usable capture device exists at all.
    fn is_available(&self) -> bool;

    async fn permission_status(&self) -> PermissionStatus;

    /// Prompts for access if the status is still undetermined and returns
    /// the resulting status.
    async fn request_permission(&mut self) -> PermissionStatus;

    async fn activate(&mut self) -> Result<()>;

    async fn deactivate(&mut self);

    /// Takes one snapshot from the active device.
    async fn capture_frame(&mut self) -> Result<Frame>;
}
