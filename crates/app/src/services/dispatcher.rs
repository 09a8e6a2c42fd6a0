//! Command dispatcher — maps commands to device transitions and broadcasts
//! the result.
//!
//! Every command addressed to a known device is broadcast once, whether or
//! not the state actually changed. The single exception is a coffee
//! machine `ligar` that starts a brew: that path broadcasts the `Brewing`
//! state itself and schedules the completion timer, so the generic
//! broadcast is skipped. Commands for unknown devices are dropped without a
//! broadcast.

use homesync_domain::command::{Command, CommandRequest};
use homesync_domain::device::{BrewEffect, DeviceId, DeviceState};
use homesync_domain::event::StateChanged;
use homesync_domain::state::{Snapshot, SystemState};

use crate::ports::EventPublisher;
use crate::services::brew_scheduler::{BrewScheduler, BrewToken};
use crate::services::state_store::StateStore;

/// What a dispatched command led to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Unknown device: no state change, no broadcast.
    Ignored,
    /// The resulting state was broadcast under this sequence number.
    Broadcast(u64),
    /// A brew started; the `Brewing` state was broadcast under this sequence
    /// number and the completion timer is pending.
    BrewStarted(u64),
}

/// Applies commands to the [`StateStore`] and publishes the outcome.
pub struct CommandDispatcher<P> {
    store: StateStore,
    scheduler: BrewScheduler,
    publisher: P,
    sequence: u64,
}

impl<P: EventPublisher> CommandDispatcher<P> {
    /// Create a dispatcher that owns `store` and `scheduler`.
    pub fn new(store: StateStore, scheduler: BrewScheduler, publisher: P) -> Self {
        Self {
            store,
            scheduler,
            publisher,
            sequence: 0,
        }
    }

    /// Current state plus the sequence number of the last broadcast.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            sequence: self.sequence,
            states: self.store.snapshot(),
        }
    }

    /// Whether `Brewing` and a live brew timer coincide.
    #[must_use]
    pub fn brew_invariant_holds(&self) -> bool {
        self.store.snapshot().coffee_machine.is_brewing() == self.scheduler.is_pending()
    }

    /// Handle one command.
    pub async fn dispatch(&mut self, request: CommandRequest) -> DispatchOutcome {
        let command = match Command::try_from(request) {
            Ok(command) => command,
            Err(err) => {
                tracing::warn!(device = %err.device, "ignoring command for unknown device");
                return DispatchOutcome::Ignored;
            }
        };

        let mut effect = BrewEffect::None;
        let states = self.store.apply(command.device, |current| {
            let (next, brew) = current.apply(&command.action, command.value.as_ref());
            effect = brew;
            next
        });

        tracing::info!(
            device = %command.device,
            action = %command.action,
            "command applied"
        );

        match effect {
            BrewEffect::Start => {
                let sequence = self.broadcast(command.device, states).await;
                self.scheduler.schedule();
                tracing::debug!(delay = ?self.scheduler.delay(), "brew started");
                return DispatchOutcome::BrewStarted(sequence);
            }
            BrewEffect::Cancel => {
                self.scheduler.cancel();
            }
            BrewEffect::None => {}
        }

        DispatchOutcome::Broadcast(self.broadcast(command.device, states).await)
    }

    /// Handle an expired brew timer.
    ///
    /// Moves the coffee machine from `Brewing` to `Ready` and broadcasts,
    /// but only if `token` is the live brew and the machine is still
    /// brewing. Returns whether the brew completed.
    pub async fn complete_brew(&mut self, token: BrewToken) -> bool {
        if !self.scheduler.complete(token) {
            tracing::debug!(?token, "dropping stale brew timer");
            return false;
        }

        let mut completed = false;
        let states = self.store.apply(DeviceId::CoffeeMachine, |current| match current {
            DeviceState::CoffeeMachine(machine) => match machine.complete_brew() {
                Some(ready) => {
                    completed = true;
                    DeviceState::CoffeeMachine(ready)
                }
                None => DeviceState::CoffeeMachine(machine),
            },
            other => other,
        });

        if completed {
            tracing::info!("coffee ready");
            self.broadcast(DeviceId::CoffeeMachine, states).await;
        }
        completed
    }

    async fn broadcast(&mut self, device: DeviceId, states: SystemState) -> u64 {
        self.sequence += 1;
        let sequence = self.sequence;
        let event = StateChanged::new(sequence, device, states);
        tracing::debug!(
            sequence,
            device = %device,
            timestamp = %event.timestamp,
            "publishing state change"
        );
        if let Err(err) = self.publisher.publish(event).await {
            tracing::warn!(%err, sequence, "failed to publish state change");
        }
        sequence
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event_bus::InProcessEventBus;
    use homesync_domain::command::CommandValue;
    use homesync_domain::device::{BrewPhase, Power};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::{broadcast, mpsc};

    const BREW_DELAY: Duration = Duration::from_secs(4);

    struct Harness {
        dispatcher: CommandDispatcher<Arc<InProcessEventBus>>,
        brew_elapsed: mpsc::Receiver<BrewToken>,
        events: broadcast::Receiver<StateChanged>,
    }

    fn harness() -> Harness {
        let bus = Arc::new(InProcessEventBus::new(16));
        let events = bus.subscribe();
        let (scheduler, brew_elapsed) = BrewScheduler::new(BREW_DELAY);
        Harness {
            dispatcher: CommandDispatcher::new(StateStore::default(), scheduler, bus),
            brew_elapsed,
            events,
        }
    }

    fn request(device: &str, command: &str) -> CommandRequest {
        CommandRequest::new(device, command)
    }

    fn assert_no_event(events: &mut broadcast::Receiver<StateChanged>) {
        assert!(matches!(
            events.try_recv(),
            Err(broadcast::error::TryRecvError::Empty)
        ));
    }

    #[tokio::test]
    async fn should_turn_flashlight_on_and_broadcast() {
        let mut h = harness();

        let outcome = h.dispatcher.dispatch(request("telemovel", "ligar")).await;

        assert_eq!(outcome, DispatchOutcome::Broadcast(1));
        let event = h.events.try_recv().unwrap();
        assert_eq!(event.device, DeviceId::Flashlight);
        assert_eq!(event.states.flashlight.power, Power::On);
        assert_no_event(&mut h.events);
    }

    #[tokio::test]
    async fn should_round_trip_every_device_through_on_then_off() {
        let mut h = harness();
        let initial = h.dispatcher.snapshot().states;

        for device in ["telemovel", "maquina_cafe", "ac"] {
            h.dispatcher.dispatch(request(device, "ligar")).await;
            h.dispatcher.dispatch(request(device, "desligar")).await;
        }

        assert_eq!(h.dispatcher.snapshot().states, initial);
        assert!(h.dispatcher.brew_invariant_holds());
    }

    #[tokio::test]
    async fn should_broadcast_even_when_state_is_unchanged() {
        let mut h = harness();

        let outcome = h.dispatcher.dispatch(request("telemovel", "desligar")).await;

        assert_eq!(outcome, DispatchOutcome::Broadcast(1));
        let event = h.events.try_recv().unwrap();
        assert_eq!(event.states, SystemState::default());
    }

    #[tokio::test]
    async fn should_broadcast_unknown_action_for_known_device() {
        let mut h = harness();

        let outcome = h.dispatcher.dispatch(request("ac", "turbo")).await;

        assert_eq!(outcome, DispatchOutcome::Broadcast(1));
        assert_eq!(h.events.try_recv().unwrap().states, SystemState::default());
    }

    #[tokio::test]
    async fn should_ignore_unknown_device_without_broadcast() {
        let mut h = harness();
        let before = h.dispatcher.snapshot();

        let outcome = h.dispatcher.dispatch(request("torradeira", "ligar")).await;

        assert_eq!(outcome, DispatchOutcome::Ignored);
        assert_eq!(h.dispatcher.snapshot(), before);
        assert_no_event(&mut h.events);
    }

    #[tokio::test]
    async fn should_set_and_read_back_ac_temperature() {
        let mut h = harness();

        h.dispatcher
            .dispatch(request("ac", "set_temperatura").with_value(CommandValue::Number(27.0)))
            .await;

        assert_eq!(
            h.dispatcher.snapshot().states.air_conditioner.temperature_celsius,
            27
        );
    }

    #[tokio::test]
    async fn should_toggle_ac_power_back_to_original() {
        let mut h = harness();

        h.dispatcher.dispatch(request("ac", "ligar_desligar")).await;
        assert_eq!(
            h.dispatcher.snapshot().states.air_conditioner.power,
            Power::On
        );
        h.dispatcher.dispatch(request("ac", "ligar_desligar")).await;
        assert_eq!(
            h.dispatcher.snapshot().states.air_conditioner.power,
            Power::Off
        );
    }

    #[tokio::test]
    async fn should_stamp_broadcast_with_dispatch_time() {
        let mut h = harness();
        let before = homesync_domain::time::now();

        h.dispatcher.dispatch(request("telemovel", "ligar")).await;

        let after = homesync_domain::time::now();
        let event = h.events.try_recv().unwrap();
        assert!(event.timestamp >= before);
        assert!(event.timestamp <= after);
    }

    #[tokio::test]
    async fn should_number_broadcasts_sequentially() {
        let mut h = harness();

        h.dispatcher.dispatch(request("telemovel", "ligar")).await;
        h.dispatcher.dispatch(request("ac", "ligar_desligar")).await;

        assert_eq!(h.events.try_recv().unwrap().sequence, 1);
        assert_eq!(h.events.try_recv().unwrap().sequence, 2);
        assert_eq!(h.dispatcher.snapshot().sequence, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn should_broadcast_brewing_once_then_ready_after_delay() {
        let mut h = harness();
        let start = tokio::time::Instant::now();

        let outcome = h.dispatcher.dispatch(request("maquina_cafe", "ligar")).await;

        assert_eq!(outcome, DispatchOutcome::BrewStarted(1));
        let brewing = h.events.try_recv().unwrap();
        assert_eq!(brewing.states.coffee_machine.phase, BrewPhase::Brewing);
        assert_no_event(&mut h.events);
        assert!(h.dispatcher.brew_invariant_holds());

        let token = h.brew_elapsed.recv().await.unwrap();
        assert_eq!(start.elapsed(), BREW_DELAY);
        assert!(h.dispatcher.complete_brew(token).await);

        let ready = h.events.try_recv().unwrap();
        assert_eq!(ready.device, DeviceId::CoffeeMachine);
        assert_eq!(ready.states.coffee_machine.phase, BrewPhase::Ready);
        assert_no_event(&mut h.events);
        assert!(h.dispatcher.brew_invariant_holds());
    }

    #[tokio::test(start_paused = true)]
    async fn should_never_reach_ready_when_cancelled() {
        let mut h = harness();

        h.dispatcher.dispatch(request("maquina_cafe", "ligar")).await;
        h.dispatcher.dispatch(request("maquina_cafe", "desligar")).await;

        assert!(h.dispatcher.brew_invariant_holds());
        tokio::time::sleep(BREW_DELAY * 2).await;
        assert!(h.brew_elapsed.try_recv().is_err());

        let phases: Vec<BrewPhase> = std::iter::from_fn(|| h.events.try_recv().ok())
            .map(|event| event.states.coffee_machine.phase)
            .collect();
        assert_eq!(phases, vec![BrewPhase::Brewing, BrewPhase::Off]);
        assert_eq!(
            h.dispatcher.snapshot().states.coffee_machine.phase,
            BrewPhase::Off
        );
    }

    #[tokio::test(start_paused = true)]
    async fn should_drop_token_that_fired_before_cancel_was_processed() {
        let mut h = harness();

        h.dispatcher.dispatch(request("maquina_cafe", "ligar")).await;
        let token = h.brew_elapsed.recv().await.unwrap();
        h.dispatcher.dispatch(request("maquina_cafe", "desligar")).await;

        assert!(!h.dispatcher.complete_brew(token).await);
        assert_eq!(
            h.dispatcher.snapshot().states.coffee_machine.phase,
            BrewPhase::Off
        );
    }

    #[tokio::test(start_paused = true)]
    async fn should_not_restart_brew_when_turned_on_twice() {
        let mut h = harness();

        h.dispatcher.dispatch(request("maquina_cafe", "ligar")).await;
        let outcome = h.dispatcher.dispatch(request("maquina_cafe", "ligar")).await;

        assert_eq!(outcome, DispatchOutcome::Broadcast(2));
        assert_eq!(
            h.dispatcher.snapshot().states.coffee_machine.phase,
            BrewPhase::Brewing
        );

        let token = h.brew_elapsed.recv().await.unwrap();
        assert!(h.dispatcher.complete_brew(token).await);

        let again = h.dispatcher.dispatch(request("maquina_cafe", "ligar")).await;
        assert_eq!(again, DispatchOutcome::Broadcast(4));
        assert_eq!(
            h.dispatcher.snapshot().states.coffee_machine.phase,
            BrewPhase::Ready
        );
        assert!(h.dispatcher.brew_invariant_holds());
    }

    #[tokio::test(start_paused = true)]
    async fn should_brew_again_after_a_cancelled_brew() {
        let mut h = harness();

        h.dispatcher.dispatch(request("maquina_cafe", "ligar")).await;
        h.dispatcher.dispatch(request("maquina_cafe", "desligar")).await;
        h.dispatcher.dispatch(request("maquina_cafe", "ligar")).await;

        let token = h.brew_elapsed.recv().await.unwrap();
        assert!(h.dispatcher.complete_brew(token).await);
        assert_eq!(
            h.dispatcher.snapshot().states.coffee_machine.phase,
            BrewPhase::Ready
        );
    }
}
