//! # homesync-domain
//!
//! Pure domain model for the homesync state-synchronization hub.
//!
//! ## Responsibilities
//! - Foundational types: session identifiers, error conventions, timestamps
//! - Define the **Devices** (flashlight, coffee machine, air-conditioner) and
//!   their legal states
//! - Define the **transition rules** each device applies to a command
//! - Define **SystemState**, the canonical snapshot of every device
//! - Define **Commands** (inbound requests) and **Events** (state-change records)
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod command;
pub mod device;
pub mod event;
pub mod state;
