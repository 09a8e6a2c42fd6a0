//! Brew scheduler — the one delayed, cancellable state transition.
//!
//! Starting a brew spawns a sleeper task. When it wakes it reports its
//! [`BrewToken`] on a channel; the owner then calls
//! [`complete`](BrewScheduler::complete), which only accepts the token of
//! the brew that is still pending. Cancelling aborts the sleeper, and any
//! token that was already in flight is rejected as stale.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Identifies one scheduled brew.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BrewToken(u64);

#[derive(Debug)]
struct PendingBrew {
    token: BrewToken,
    sleeper: JoinHandle<()>,
}

/// Owns at most one pending brew timer.
#[derive(Debug)]
pub struct BrewScheduler {
    delay: Duration,
    next_token: u64,
    pending: Option<PendingBrew>,
    elapsed: mpsc::Sender<BrewToken>,
}

impl BrewScheduler {
    /// Create a scheduler whose brews complete after `delay`.
    ///
    /// Returns the receiving end on which expired tokens are delivered.
    #[must_use]
    pub fn new(delay: Duration) -> (Self, mpsc::Receiver<BrewToken>) {
        let (elapsed, rx) = mpsc::channel(4);
        let scheduler = Self {
            delay,
            next_token: 0,
            pending: None,
            elapsed,
        };
        (scheduler, rx)
    }

    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Whether a brew timer is live.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Start a new brew timer, cancelling any previous one.
    ///
    /// Must be called from within a tokio runtime.
    pub fn schedule(&mut self) -> BrewToken {
        self.cancel();

        self.next_token += 1;
        let token = BrewToken(self.next_token);
        let delay = self.delay;
        let elapsed = self.elapsed.clone();
        let sleeper = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // The receiver only disappears when the hub shuts down.
            let _ = elapsed.send(token).await;
        });

        self.pending = Some(PendingBrew { token, sleeper });
        token
    }

    /// Cancel the pending brew, if any. Returns whether one was pending.
    pub fn cancel(&mut self) -> bool {
        match self.pending.take() {
            Some(pending) => {
                pending.sleeper.abort();
                tracing::debug!(token = pending.token.0, "brew timer cancelled");
                true
            }
            None => false,
        }
    }

    /// Accept an expired token.
    ///
    /// Returns `true` and clears the pending brew only if `token` belongs
    /// to it; stale tokens return `false`.
    pub fn complete(&mut self, token: BrewToken) -> bool {
        match &self.pending {
            Some(pending) if pending.token == token => {
                self.pending = None;
                true
            }
            _ => false,
        }
    }
}

impl Drop for BrewScheduler {
    fn drop(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.sleeper.abort();
        }
    }
}
