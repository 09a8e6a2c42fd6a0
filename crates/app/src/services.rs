//! Application services — the state-broadcast core.
//!
//! Each service owns its piece of state outright; the dispatcher accepts its
//! event publisher via a generic parameter (constructor injection), keeping
//! this layer decoupled from concrete adapters.

pub mod brew_scheduler;
pub mod dispatcher;
pub mod state_store;
