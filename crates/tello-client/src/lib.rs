//! Single-flight command channel and typed flight API for Tello drones.
//!
//! This is the "just works" layer. [`CommandChannel`] turns one UDP transport
//! into a strictly sequential request/response protocol and owns the
//! connection lifecycle. [`Drone`] layers validated, typed operations on top.

pub mod channel;
pub mod config;
pub mod drone;
pub mod error;
pub mod state;

#[cfg(test)]
mod testing;

pub use channel::CommandChannel;
pub use config::{ClientConfig, DEFAULT_POLL_INTERVAL, MIN_POLL_INTERVAL};
pub use drone::Drone;
pub use error::{ClientError, Result};
pub use state::{ConnectionState, MissionPadMode};

pub use tokio_util::sync::CancellationToken;
