//! Flashlight — responds to `ligar` / `desligar`.

use serde::{Deserialize, Serialize};

use super::Power;
use crate::command::Action;

/// The phone flashlight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Flashlight {
    pub power: Power,
}

impl Flashlight {
    /// Next state after `action`; anything but on/off leaves it unchanged.
    #[must_use]
    pub fn apply(self, action: &Action) -> Self {
        match action {
            Action::TurnOn => Self { power: Power::On },
            Action::TurnOff => Self { power: Power::Off },
            _ => self,
        }
    }
}
