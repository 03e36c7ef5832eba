use crate::capture::PermissionStatus;
use crate::scoring::Report;

/// What the presentation layer sees of a capture session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    /// `None` until the permission has been checked once.
    pub permission: Option<PermissionStatus>,
    pub streaming: bool,
    pub scanning: bool,
    pub results: Option<Report>,
    /// User-visible text of the last failed operation.
    pub error: Option<String>,
}
