//! # homesync-app
//!
//! Application layer — the state-broadcast core and its **port definitions**.
//!
//! ## Responsibilities
//! - Define the **port traits** adapters implement or consume:
//!   - `EventPublisher` — fan-out of state-change events
//! - Provide the core services:
//!   - `StateStore` — the single canonical `SystemState`, sole mutator
//!   - `BrewScheduler` — the one delayed, cancellable transition
//!   - `CommandDispatcher` — commands → transitions → broadcasts
//! - Provide **in-process infrastructure** that doesn't need IO:
//!   - `InProcessEventBus` — broadcast channel for state changes
//!   - `hub` — the event loop that owns the services and processes requests
//!     one at a time
//!
//! ## Dependency rule
//! Depends on `homesync-domain` only (plus `tokio` for channels, timers and tasks).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod event_bus;
pub mod hub;
pub mod ports;
pub mod services;
