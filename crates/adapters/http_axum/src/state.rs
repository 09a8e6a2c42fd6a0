//! Shared application state for axum handlers.

use std::sync::Arc;

use homesync_app::event_bus::InProcessEventBus;
use homesync_app::hub::HubHandle;

/// Application state shared across all axum handlers.
///
/// Both fields are cheap handles, so cloning the state per request is fine.
#[derive(Clone)]
pub struct AppState {
    /// Handle to the hub event loop (commands and snapshots).
    pub hub: HubHandle,
    /// Event bus the hub publishes state changes on.
    pub event_bus: Arc<InProcessEventBus>,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(hub: HubHandle, event_bus: Arc<InProcessEventBus>) -> Self {
        Self { hub, event_bus }
    }
}
