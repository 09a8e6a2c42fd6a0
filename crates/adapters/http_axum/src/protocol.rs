//! Wire protocol spoken over the WebSocket.
//!
//! Every frame is a JSON text message shaped as
//! `{"event": <name>, "data": <payload>}`.
//!
//! | Direction | Event | Payload |
//! |-----------|-------|---------|
//! | client → hub | `control_device` | `{device, command, value?}` |
//! | hub → client | `initial_states` | full state |
//! | hub → client | `state_changed` | `{device, states}` |
//!
//! The state keeps the vocabulary existing front-ends expect:
//! `{"telemovel":{"lanterna":"ligada"},"maquina_cafe":{"estado":"pronto"},
//! "ac":{"estado":"ligado","temperatura":22}}`.

use serde::{Deserialize, Serialize};

use homesync_domain::command::CommandRequest;
use homesync_domain::device::{
    AirConditioner, BrewPhase, CoffeeMachine, DeviceId, Flashlight, Power,
};
use homesync_domain::event::StateChanged;
use homesync_domain::state::SystemState;

/// Messages a client may send.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ClientMessage {
    ControlDevice(CommandRequest),
}

impl ClientMessage {
    /// Parse a text frame.
    ///
    /// # Errors
    ///
    /// Returns the JSON error when the frame is not a known message.
    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

/// Messages the hub sends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ServerMessage {
    InitialStates(WireStates),
    StateChanged { device: DeviceId, states: WireStates },
}

impl ServerMessage {
    #[must_use]
    pub fn initial_states(states: &SystemState) -> Self {
        Self::InitialStates(WireStates::from(states))
    }

    /// Encode as a text frame.
    ///
    /// # Errors
    ///
    /// Returns the JSON error if serialization fails.
    pub fn to_text(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl From<&StateChanged> for ServerMessage {
    fn from(event: &StateChanged) -> Self {
        Self::StateChanged {
            device: event.device,
            states: WireStates::from(&event.states),
        }
    }
}

/// Full system state in wire vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WireStates {
    pub telemovel: WireFlashlight,
    pub maquina_cafe: WireCoffeeMachine,
    pub ac: WireAirConditioner,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WireFlashlight {
    pub lanterna: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WireCoffeeMachine {
    pub estado: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WireAirConditioner {
    pub estado: &'static str,
    pub temperatura: i32,
}

impl From<&SystemState> for WireStates {
    fn from(state: &SystemState) -> Self {
        Self {
            telemovel: WireFlashlight::from(&state.flashlight),
            maquina_cafe: WireCoffeeMachine::from(&state.coffee_machine),
            ac: WireAirConditioner::from(&state.air_conditioner),
        }
    }
}

impl From<&Flashlight> for WireFlashlight {
    fn from(flashlight: &Flashlight) -> Self {
        let lanterna = match flashlight.power {
            Power::On => "ligada",
            Power::Off => "desligada",
        };
        Self { lanterna }
    }
}

impl From<&CoffeeMachine> for WireCoffeeMachine {
    fn from(machine: &CoffeeMachine) -> Self {
        let estado = match machine.phase {
            BrewPhase::Off => "desligada",
            BrewPhase::Brewing => "a preparar",
            BrewPhase::Ready => "pronto",
        };
        Self { estado }
    }
}

impl From<&AirConditioner> for WireAirConditioner {
    fn from(ac: &AirConditioner) -> Self {
        let estado = match ac.power {
            Power::On => "ligado",
            Power::Off => "desligado",
        };
        Self {
            estado,
            temperatura: ac.temperature_celsius,
        }
    }
}
