//! State store — sole owner and mutator of the canonical [`SystemState`].

use homesync_domain::device::{DeviceId, DeviceState};
use homesync_domain::state::SystemState;

/// Holds the single canonical [`SystemState`].
///
/// Reads hand out copies; the only way to change the state is
/// [`apply`](Self::apply), one device at a time. Broadcasting the result is
/// the caller's job.
#[derive(Debug, Default)]
pub struct StateStore {
    state: SystemState,
}

impl StateStore {
    /// Create a store seeded with `initial`.
    #[must_use]
    pub fn new(initial: SystemState) -> Self {
        Self { state: initial }
    }

    /// Copy of the current state.
    #[must_use]
    pub fn snapshot(&self) -> SystemState {
        self.state
    }

    /// Run `transition` on the current state of device `id` and store the
    /// result. Returns the full state afterwards.
    ///
    /// The transition only ever sees its own device. A result belonging to
    /// another device is discarded and the state is left untouched.
    pub fn apply<F>(&mut self, id: DeviceId, transition: F) -> SystemState
    where
        F: FnOnce(DeviceState) -> DeviceState,
    {
        let next = transition(self.state.device(id));
        if next.id() == id {
            self.state.set_device(next);
        } else {
            tracing::error!(
                device = %id,
                produced = %next.id(),
                "transition produced state for another device, discarding"
            );
        }
        self.state
    }
}
