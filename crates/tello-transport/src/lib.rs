//! UDP datagram transport for the Tello SDK control port.
//!
//! The drone listens for ASCII commands on UDP port 8889 and answers each one
//! with a single datagram. This crate owns that socket: it sends encoded
//! commands to the drone and blocks, with a bound, for exactly one reply.
//!
//! This is the lowest layer of the workspace. It has no notion of command
//! semantics and never retries; everything else builds on [`UdpTransport`].

pub mod config;
pub mod error;
pub mod udp;

pub use config::{
    TransportConfig, DEFAULT_DRONE_ADDR, DEFAULT_LOCAL_ADDR, DEFAULT_RECV_TIMEOUT,
    MAX_RESPONSE_BYTES,
};
pub use error::{Result, TransportError};
pub use udp::UdpTransport;
