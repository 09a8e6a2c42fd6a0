//! Device — the simulated appliances managed by the hub.
//!
//! The set of devices is closed: a flashlight, a coffee machine and an
//! air-conditioner. Each device kind owns its legal states and a pure
//! transition function from `(state, action, value)` to the next state.

mod air_conditioner;
mod coffee_machine;
mod flashlight;

pub use air_conditioner::{AirConditioner, TemperatureBounds};
pub use coffee_machine::{BrewEffect, BrewPhase, CoffeeMachine};
pub use flashlight::Flashlight;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::command::{Action, CommandValue};
use crate::error::UnknownDeviceError;

/// Identity of a device. The variants are the only devices that exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeviceId {
    #[serde(rename = "telemovel")]
    Flashlight,
    #[serde(rename = "maquina_cafe")]
    CoffeeMachine,
    #[serde(rename = "ac")]
    AirConditioner,
}

impl DeviceId {
    /// Every device identity, in display order.
    pub const ALL: [Self; 3] = [Self::Flashlight, Self::CoffeeMachine, Self::AirConditioner];

    /// Canonical identity string used on the wire.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Flashlight => "telemovel",
            Self::CoffeeMachine => "maquina_cafe",
            Self::AirConditioner => "ac",
        }
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeviceId {
    type Err = UnknownDeviceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| UnknownDeviceError {
                device: s.to_string(),
            })
    }
}

/// Binary power state shared by the flashlight and the air-conditioner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Power {
    On,
    #[default]
    Off,
}

impl Power {
    /// The opposite power state.
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::On => Self::Off,
            Self::Off => Self::On,
        }
    }

    #[must_use]
    pub fn is_on(self) -> bool {
        matches!(self, Self::On)
    }
}

/// State of one device, tagged by device kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DeviceState {
    Flashlight(Flashlight),
    CoffeeMachine(CoffeeMachine),
    AirConditioner(AirConditioner),
}

impl DeviceState {
    /// The identity of the device this state belongs to.
    #[must_use]
    pub fn id(&self) -> DeviceId {
        match self {
            Self::Flashlight(_) => DeviceId::Flashlight,
            Self::CoffeeMachine(_) => DeviceId::CoffeeMachine,
            Self::AirConditioner(_) => DeviceId::AirConditioner,
        }
    }

    /// Apply an action using the device's own transition rules.
    ///
    /// Only the coffee machine ever reports a [`BrewEffect`] other than
    /// [`BrewEffect::None`].
    #[must_use]
    pub fn apply(self, action: &Action, value: Option<&CommandValue>) -> (Self, BrewEffect) {
        match self {
            Self::Flashlight(flashlight) => {
                (Self::Flashlight(flashlight.apply(action)), BrewEffect::None)
            }
            Self::CoffeeMachine(machine) => {
                let (next, effect) = machine.apply(action);
                (Self::CoffeeMachine(next), effect)
            }
            Self::AirConditioner(ac) => (
                Self::AirConditioner(ac.apply(action, value)),
                BrewEffect::None,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_parse_every_device_identity() {
        for id in DeviceId::ALL {
            assert_eq!(id.as_str().parse::<DeviceId>().unwrap(), id);
        }
    }

    #[test]
    fn should_reject_unknown_device_identity() {
        let err = "frigorifico".parse::<DeviceId>().unwrap_err();
        assert_eq!(err.device, "frigorifico");
    }

    #[test]
    fn should_serialize_device_id_as_wire_identity() {
        let json = serde_json::to_string(&DeviceId::CoffeeMachine).unwrap();
        assert_eq!(json, "\"maquina_cafe\"");
    }

    #[test]
    fn should_toggle_power() {
        assert_eq!(Power::Off.toggled(), Power::On);
        assert_eq!(Power::On.toggled(), Power::Off);
    }

    #[test]
    fn should_report_own_identity() {
        let state = DeviceState::Flashlight(Flashlight::default());
        assert_eq!(state.id(), DeviceId::Flashlight);
    }

    #[test]
    fn should_dispatch_action_to_matching_device() {
        let state = DeviceState::Flashlight(Flashlight::default());
        let (next, effect) = state.apply(&Action::TurnOn, None);
        assert_eq!(next, DeviceState::Flashlight(Flashlight { power: Power::On }));
        assert_eq!(effect, BrewEffect::None);
    }

    #[test]
    fn should_surface_brew_effect_from_coffee_machine() {
        let state = DeviceState::CoffeeMachine(CoffeeMachine::default());
        let (next, effect) = state.apply(&Action::TurnOn, None);
        assert_eq!(
            next,
            DeviceState::CoffeeMachine(CoffeeMachine {
                phase: BrewPhase::Brewing
            })
        );
        assert_eq!(effect, BrewEffect::Start);
    }
}
