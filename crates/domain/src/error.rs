//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts via `#[from]`.

/// A command named a device identity the hub does not know about.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown device `{device}`")]
pub struct UnknownDeviceError {
    /// The identity as received.
    pub device: String,
}

/// Errors returned by the hub handle.
///
/// Command-level problems (unknown device, unknown action, unusable value)
/// are not errors: the dispatcher degrades them to no-ops.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HubError {
    /// The hub task has stopped and no longer accepts requests.
    #[error("hub is not running")]
    Closed,
}
