//! Command — a one-shot request to change a device's state.
//!
//! Commands arrive as a loose `(device, command, value)` triple
//! ([`CommandRequest`]) and are resolved into a typed [`Command`] once the
//! device identity is known. Commands are never stored.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::device::DeviceId;
use crate::error::UnknownDeviceError;

/// The action vocabulary understood by the devices.
///
/// Anything outside the known words is kept as [`Action::Other`] and treated
/// as a no-op by every device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// `ligar`
    TurnOn,
    /// `desligar`
    TurnOff,
    /// `ligar_desligar`
    TogglePower,
    /// `set_temperatura`
    SetTemperature,
    Other(String),
}

impl Action {
    /// Wire name of the action.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::TurnOn => "ligar",
            Self::TurnOff => "desligar",
            Self::TogglePower => "ligar_desligar",
            Self::SetTemperature => "set_temperatura",
            Self::Other(raw) => raw,
        }
    }
}

impl From<&str> for Action {
    fn from(value: &str) -> Self {
        match value {
            "ligar" => Self::TurnOn,
            "desligar" => Self::TurnOff,
            "ligar_desligar" => Self::TogglePower,
            "set_temperatura" => Self::SetTemperature,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Optional argument of a command.
///
/// Controllers send either a JSON number or a numeric string (range inputs
/// report their value as text).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CommandValue {
    Number(f64),
    Text(String),
}

impl CommandValue {
    /// Interpret the value as whole degrees Celsius, rounding to the nearest
    /// integer. Returns `None` for non-numeric or non-finite input.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn as_celsius(&self) -> Option<i32> {
        let raw = match self {
            Self::Number(n) => *n,
            Self::Text(text) => text.trim().parse::<f64>().ok()?,
        };
        if !raw.is_finite() {
            return None;
        }
        // Saturating cast; the air-conditioner clamps to its bounds afterwards.
        Some(raw.round() as i32)
    }
}

/// An unresolved command exactly as submitted by a controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandRequest {
    pub device: String,
    pub command: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<CommandValue>,
}

impl CommandRequest {
    /// Build a request without a value.
    pub fn new(device: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            device: device.into(),
            command: command.into(),
            value: None,
        }
    }

    /// Attach a value to the request.
    #[must_use]
    pub fn with_value(mut self, value: CommandValue) -> Self {
        self.value = Some(value);
        self
    }
}

/// A command addressed to a known device.
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    pub device: DeviceId,
    pub action: Action,
    pub value: Option<CommandValue>,
}

impl TryFrom<CommandRequest> for Command {
    type Error = UnknownDeviceError;

    fn try_from(request: CommandRequest) -> Result<Self, Self::Error> {
        let device = request.device.parse()?;
        Ok(Self {
            device,
            action: Action::from(request.command.as_str()),
            value: request.value,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_parse_known_actions() {
        assert_eq!(Action::from("ligar"), Action::TurnOn);
        assert_eq!(Action::from("desligar"), Action::TurnOff);
        assert_eq!(Action::from("ligar_desligar"), Action::TogglePower);
        assert_eq!(Action::from("set_temperatura"), Action::SetTemperature);
    }

    #[test]
    fn should_keep_unknown_action_verbatim() {
        let action = Action::from("piscar");
        assert_eq!(action, Action::Other("piscar".to_string()));
        assert_eq!(action.to_string(), "piscar");
    }

    #[test]
    fn should_read_celsius_from_number() {
        assert_eq!(CommandValue::Number(23.0).as_celsius(), Some(23));
        assert_eq!(CommandValue::Number(22.6).as_celsius(), Some(23));
    }

    #[test]
    fn should_read_celsius_from_numeric_string() {
        assert_eq!(CommandValue::Text("19".to_string()).as_celsius(), Some(19));
        assert_eq!(CommandValue::Text(" 24.4 ".to_string()).as_celsius(), Some(24));
    }

    #[test]
    fn should_reject_non_numeric_string() {
        assert_eq!(CommandValue::Text("warm".to_string()).as_celsius(), None);
    }

    #[test]
    fn should_reject_non_finite_number() {
        assert_eq!(CommandValue::Text("NaN".to_string()).as_celsius(), None);
        assert_eq!(CommandValue::Number(f64::INFINITY).as_celsius(), None);
    }

    #[test]
    fn should_deserialize_number_or_string_value() {
        let number: CommandValue = serde_json::from_str("21").unwrap();
        assert_eq!(number, CommandValue::Number(21.0));
        let text: CommandValue = serde_json::from_str("\"21\"").unwrap();
        assert_eq!(text, CommandValue::Text("21".to_string()));
    }

    #[test]
    fn should_deserialize_request_without_value() {
        let request: CommandRequest =
            serde_json::from_str(r#"{"device":"telemovel","command":"ligar"}"#).unwrap();
        assert_eq!(request, CommandRequest::new("telemovel", "ligar"));
    }

    #[test]
    fn should_resolve_request_for_known_device() {
        let request =
            CommandRequest::new("ac", "set_temperatura").with_value(CommandValue::Number(25.0));
        let command = Command::try_from(request).unwrap();
        assert_eq!(command.device, DeviceId::AirConditioner);
        assert_eq!(command.action, Action::SetTemperature);
        assert_eq!(command.value, Some(CommandValue::Number(25.0)));
    }

    #[test]
    fn should_fail_to_resolve_unknown_device() {
        let err = Command::try_from(CommandRequest::new("torradeira", "ligar")).unwrap_err();
        assert_eq!(err.device, "torradeira");
    }
}
