//! Hub — the event loop that owns the state-broadcast core.
//!
//! The [`CommandDispatcher`] (and through it the store and the brew
//! scheduler) lives inside a single tokio task. Commands, snapshot requests
//! and brew-timer expirations are queued on channels and handled one at a
//! time, each to completion, so no two mutations ever overlap even on a
//! multi-threaded runtime.
//!
//! Callers talk to the hub through a cloneable [`HubHandle`]. The loop stops
//! once every handle has been dropped.

use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use homesync_domain::command::CommandRequest;
use homesync_domain::error::HubError;
use homesync_domain::state::{Snapshot, SystemState};

use crate::ports::EventPublisher;
use crate::services::brew_scheduler::{BrewScheduler, BrewToken};
use crate::services::dispatcher::CommandDispatcher;
use crate::services::state_store::StateStore;

/// Tunables for a hub instance.
#[derive(Debug, Clone)]
pub struct HubSettings {
    /// Time from `Brewing` to `Ready`.
    pub brew_delay: Duration,
    /// State the devices start in.
    pub initial_state: SystemState,
    /// Capacity of the request queue.
    pub request_capacity: usize,
}

impl Default for HubSettings {
    fn default() -> Self {
        Self {
            brew_delay: Duration::from_secs(4),
            initial_state: SystemState::default(),
            request_capacity: 64,
        }
    }
}

enum HubRequest {
    Submit(CommandRequest),
    Snapshot(oneshot::Sender<Snapshot>),
}

/// Cloneable handle to a running hub.
#[derive(Clone)]
pub struct HubHandle {
    requests: mpsc::Sender<HubRequest>,
}

impl HubHandle {
    /// Queue a command for dispatch.
    ///
    /// Returns once the command is queued, not once it is applied.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::Closed`] if the hub has stopped.
    pub async fn submit(&self, request: CommandRequest) -> Result<(), HubError> {
        self.requests
            .send(HubRequest::Submit(request))
            .await
            .map_err(|_| HubError::Closed)
    }

    /// Current state, taken after every request queued before this call.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::Closed`] if the hub has stopped.
    pub async fn snapshot(&self) -> Result<Snapshot, HubError> {
        let (reply, rx) = oneshot::channel();
        self.requests
            .send(HubRequest::Snapshot(reply))
            .await
            .map_err(|_| HubError::Closed)?;
        rx.await.map_err(|_| HubError::Closed)
    }
}

/// Start a hub publishing its state changes to `publisher`.
///
/// Must be called from within a tokio runtime.
pub fn spawn<P>(settings: HubSettings, publisher: P) -> (HubHandle, JoinHandle<()>)
where
    P: EventPublisher + Send + Sync + 'static,
{
    let (requests_tx, requests) = mpsc::channel(settings.request_capacity.max(1));
    let (scheduler, brew_elapsed) = BrewScheduler::new(settings.brew_delay);
    let dispatcher = CommandDispatcher::new(
        StateStore::new(settings.initial_state),
        scheduler,
        publisher,
    );

    let hub = Hub {
        dispatcher,
        requests,
        brew_elapsed,
    };
    let task = tokio::spawn(hub.run());

    (
        HubHandle {
            requests: requests_tx,
        },
        task,
    )
}

struct Hub<P> {
    dispatcher: CommandDispatcher<P>,
    requests: mpsc::Receiver<HubRequest>,
    brew_elapsed: mpsc::Receiver<BrewToken>,
}

impl<P: EventPublisher> Hub<P> {
    async fn run(mut self) {
        tracing::info!("hub started");
        loop {
            tokio::select! {
                request = self.requests.recv() => match request {
                    Some(HubRequest::Submit(request)) => {
                        self.dispatcher.dispatch(request).await;
                    }
                    Some(HubRequest::Snapshot(reply)) => {
                        // The requester may have given up; nothing to do then.
                        let _ = reply.send(self.dispatcher.snapshot());
                    }
                    None => break,
                },
                Some(token) = self.brew_elapsed.recv() => {
                    self.dispatcher.complete_brew(token).await;
                }
            }
            debug_assert!(self.dispatcher.brew_invariant_holds());
        }
        tracing::info!("hub stopped");
    }
}
