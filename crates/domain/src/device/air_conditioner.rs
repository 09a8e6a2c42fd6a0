//! Air-conditioner — power toggle plus a bounded target temperature.

use serde::{Deserialize, Serialize};

use super::Power;
use crate::command::{Action, CommandValue};

/// Inclusive range of accepted target temperatures, in degrees Celsius.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemperatureBounds {
    pub min: i32,
    pub max: i32,
}

impl Default for TemperatureBounds {
    fn default() -> Self {
        Self { min: 16, max: 30 }
    }
}

impl TemperatureBounds {
    /// The same range with `min` and `max` in order.
    #[must_use]
    pub fn normalized(self) -> Self {
        Self {
            min: self.min.min(self.max),
            max: self.min.max(self.max),
        }
    }

    /// Clamp `celsius` into the bounds. Inverted bounds are read in order.
    #[must_use]
    pub fn clamp(self, celsius: i32) -> i32 {
        let Self { min, max } = self.normalized();
        celsius.clamp(min, max)
    }

    #[must_use]
    pub fn contains(self, celsius: i32) -> bool {
        (self.min..=self.max).contains(&celsius)
    }
}

/// The air-conditioner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AirConditioner {
    pub power: Power,
    pub temperature_celsius: i32,
    pub bounds: TemperatureBounds,
}

impl Default for AirConditioner {
    fn default() -> Self {
        Self::new(22, TemperatureBounds::default())
    }
}

impl AirConditioner {
    /// A powered-off unit at `temperature_celsius` (clamped into `bounds`).
    ///
    /// Bounds given as `min > max` are swapped.
    #[must_use]
    pub fn new(temperature_celsius: i32, bounds: TemperatureBounds) -> Self {
        let bounds = bounds.normalized();
        Self {
            power: Power::Off,
            temperature_celsius: bounds.clamp(temperature_celsius),
            bounds,
        }
    }

    /// Next state after `action`.
    ///
    /// `set_temperatura` without a usable numeric value is a no-op.
    #[must_use]
    pub fn apply(self, action: &Action, value: Option<&CommandValue>) -> Self {
        match action {
            Action::TogglePower => Self {
                power: self.power.toggled(),
                ..self
            },
            Action::SetTemperature => match value.and_then(CommandValue::as_celsius) {
                Some(celsius) => Self {
                    temperature_celsius: self.bounds.clamp(celsius),
                    ..self
                },
                None => self,
            },
            _ => self,
        }
    }
}
