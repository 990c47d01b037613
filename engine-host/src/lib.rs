//! Arcade host shell
//!
//! This crate wires the engine to the outside world: configuration, logging,
//! game registration, hash-route resolution and the fixed-tick frame loop.

pub mod autopilot;
pub mod config;
pub mod host;
pub mod registry_init;
pub mod router;

// Re-export main types
pub use autopilot::Autopilot;
pub use config::Config;
pub use host::{Host, HostError};
pub use router::Router;
