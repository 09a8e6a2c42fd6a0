//! Event — an immutable record of a state change.
//!
//! One [`StateChanged`] is emitted per mutation of the system state. It
//! names the device that changed and carries the full resulting state.

use serde::{Deserialize, Serialize};

use crate::device::DeviceId;
use crate::state::SystemState;
use crate::time::{Timestamp, now};

/// A device changed (or was commanded); `states` is the state afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateChanged {
    /// Strictly increasing emission order, starting at 1.
    pub sequence: u64,
    pub device: DeviceId,
    pub states: SystemState,
    pub timestamp: Timestamp,
}

impl StateChanged {
    /// Create an event stamped with the current time.
    #[must_use]
    pub fn new(sequence: u64, device: DeviceId, states: SystemState) -> Self {
        Self {
            sequence,
            device,
            states,
            timestamp: now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_stamp_event_with_current_time() {
        let before = now();
        let event = StateChanged::new(1, DeviceId::Flashlight, SystemState::default());
        assert!(event.timestamp >= before);
        assert_eq!(event.sequence, 1);
        assert_eq!(event.device, DeviceId::Flashlight);
    }

    #[test]
    fn should_serialize_device_by_wire_identity() {
        let event = StateChanged::new(3, DeviceId::AirConditioner, SystemState::default());
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["device"], "ac");
        assert_eq!(json["sequence"], 3);
    }
}
