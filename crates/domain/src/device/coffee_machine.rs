//! Coffee machine — a small state machine with one timed transition.
//!
//! ```text
//!   Off --ligar--> Brewing --(brew delay)--> Ready
//!    ^                |                        |
//!    +---desligar-----+--------desligar--------+
//! ```
//!
//! The machine itself is pure: it reports a [`BrewEffect`] so that the
//! caller can start or cancel the brew timer.

use serde::{Deserialize, Serialize};

use crate::command::Action;

/// Phase of the coffee machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrewPhase {
    #[default]
    Off,
    Brewing,
    Ready,
}

/// Side effect requested by a coffee machine transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrewEffect {
    None,
    /// Brewing has just started: schedule the completion timer.
    Start,
    /// The machine left `Brewing` early: the pending timer is stale.
    Cancel,
}

/// The coffee machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CoffeeMachine {
    pub phase: BrewPhase,
}

impl CoffeeMachine {
    /// Next state after `action`, plus the timer effect it implies.
    ///
    /// `ligar` only starts a brew from `Off`; in any other phase it is a
    /// no-op. `desligar` always settles on `Off`.
    #[must_use]
    pub fn apply(self, action: &Action) -> (Self, BrewEffect) {
        match (action, self.phase) {
            (Action::TurnOn, BrewPhase::Off) => {
                (Self::with(BrewPhase::Brewing), BrewEffect::Start)
            }
            (Action::TurnOff, BrewPhase::Brewing) => {
                (Self::with(BrewPhase::Off), BrewEffect::Cancel)
            }
            (Action::TurnOff, _) => (Self::with(BrewPhase::Off), BrewEffect::None),
            _ => (self, BrewEffect::None),
        }
    }

    /// Finish a brew. Returns `None` when the machine is no longer brewing.
    #[must_use]
    pub fn complete_brew(self) -> Option<Self> {
        (self.phase == BrewPhase::Brewing).then(|| Self::with(BrewPhase::Ready))
    }

    #[must_use]
    pub fn is_brewing(self) -> bool {
        self.phase == BrewPhase::Brewing
    }

    fn with(phase: BrewPhase) -> Self {
        Self { phase }
    }
}
