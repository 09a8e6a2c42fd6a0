//! # homesync-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve the **session gateway**: a WebSocket per client (`/ws`) that
//!   sends the full state on connect, pushes every state change, and
//!   forwards control commands to the hub
//! - Define the JSON **wire protocol** and map domain state into it
//! - Serve a read-only snapshot (`/api/states`) and a health probe
//! - Serve static presentation assets from a directory
//!
//! ## Dependency rule
//! Depends on `homesync-app` (hub handle, event bus) and `homesync-domain`
//! (types used in message mapping). Never leaks axum types into the domain.

pub mod api;
pub mod error;
pub mod gateway;
pub mod protocol;
pub mod router;
pub mod state;
