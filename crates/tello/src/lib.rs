//! Client-side driver for Tello drones.
//!
//! The drone speaks a line-oriented ASCII protocol over UDP: one command
//! datagram to port 8889, one reply datagram back. Video arrives separately
//! on port 11111 once `streamon` has been acknowledged.
//!
//! # Crate Structure
//!
//! - [`transport`]: bounded-wait UDP control socket
//! - [`protocol`]: command vocabulary, argument validation, reply parsing
//! - [`client`]: single-flight command channel and typed flight API
//! - [`video`]: background capture thread with last-frame access
//!
//! [`Tello`] ties a [`client::Drone`] and a [`video::VideoPipeline`] together
//! behind one owned handle.

mod handle;

/// Re-export transport types.
pub mod transport {
    pub use tello_transport::*;
}

/// Re-export protocol types.
pub mod protocol {
    pub use tello_protocol::*;
}

/// Re-export client types.
pub mod client {
    pub use tello_client::*;
}

/// Re-export video types.
pub mod video {
    pub use tello_video::*;
}

pub use handle::{Tello, TelloConfig};
