//! Event bus port — publish/subscribe for state-change events.

use std::future::Future;

use homesync_domain::error::HubError;
use homesync_domain::event::StateChanged;

/// Publishes state-change events to every current subscriber.
///
/// Delivery is best effort: subscribers that have gone away simply miss
/// the event.
pub trait EventPublisher {
    /// Publish an event to all current subscribers.
    fn publish(&self, event: StateChanged) -> impl Future<Output = Result<(), HubError>> + Send;
}

impl<T: EventPublisher + Send + Sync> EventPublisher for std::sync::Arc<T> {
    fn publish(&self, event: StateChanged) -> impl Future<Output = Result<(), HubError>> + Send {
        (**self).publish(event)
    }
}
