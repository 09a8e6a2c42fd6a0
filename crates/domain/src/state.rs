//! System state — the canonical state of every device.

use serde::{Deserialize, Serialize};

use crate::device::{
    AirConditioner, CoffeeMachine, DeviceId, DeviceState, Flashlight, TemperatureBounds,
};

/// State of all devices at one point in time.
///
/// There is one field per device, so every identity is always present and
/// none can be added or removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SystemState {
    pub flashlight: Flashlight,
    pub coffee_machine: CoffeeMachine,
    pub air_conditioner: AirConditioner,
}

impl SystemState {
    /// Everything off, with the air-conditioner at `ac_celsius` inside `ac_bounds`.
    #[must_use]
    pub fn new(ac_celsius: i32, ac_bounds: TemperatureBounds) -> Self {
        Self {
            flashlight: Flashlight::default(),
            coffee_machine: CoffeeMachine::default(),
            air_conditioner: AirConditioner::new(ac_celsius, ac_bounds),
        }
    }

    /// Copy of a single device's state.
    #[must_use]
    pub fn device(&self, id: DeviceId) -> DeviceState {
        match id {
            DeviceId::Flashlight => DeviceState::Flashlight(self.flashlight),
            DeviceId::CoffeeMachine => DeviceState::CoffeeMachine(self.coffee_machine),
            DeviceId::AirConditioner => DeviceState::AirConditioner(self.air_conditioner),
        }
    }

    /// Replace the state of the device `state` belongs to.
    pub fn set_device(&mut self, state: DeviceState) {
        match state {
            DeviceState::Flashlight(flashlight) => self.flashlight = flashlight,
            DeviceState::CoffeeMachine(machine) => self.coffee_machine = machine,
            DeviceState::AirConditioner(ac) => self.air_conditioner = ac,
        }
    }
}

/// A [`SystemState`] tagged with the sequence number of the last state
/// change it includes.
///
/// Subscribers use the sequence to discard change events that the snapshot
/// already reflects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Snapshot {
    pub sequence: u64,
    pub states: SystemState,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::{BrewPhase, Power};

    #[test]
    fn should_start_with_everything_off() {
        let state = SystemState::default();
        assert_eq!(state.flashlight.power, Power::Off);
        assert_eq!(state.coffee_machine.phase, BrewPhase::Off);
        assert_eq!(state.air_conditioner.power, Power::Off);
        assert_eq!(state.air_conditioner.temperature_celsius, 22);
    }

    #[test]
    fn should_expose_every_device() {
        let state = SystemState::default();
        for id in DeviceId::ALL {
            assert_eq!(state.device(id).id(), id);
        }
    }

    #[test]
    fn should_replace_only_the_targeted_device() {
        let mut state = SystemState::default();
        state.set_device(DeviceState::Flashlight(Flashlight { power: Power::On }));
        assert_eq!(state.flashlight.power, Power::On);
        assert_eq!(state.coffee_machine, CoffeeMachine::default());
        assert_eq!(state.air_conditioner, AirConditioner::default());
    }

    #[test]
    fn should_build_with_custom_ac_settings() {
        let state = SystemState::new(19, TemperatureBounds { min: 18, max: 24 });
        assert_eq!(state.air_conditioner.temperature_celsius, 19);
        assert_eq!(state.air_conditioner.bounds.max, 24);
    }
}
