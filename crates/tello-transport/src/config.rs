use std::net::SocketAddr;
use std::time::Duration;

use crate::error::{Result, TransportError};

/// Address of the drone's command endpoint in access-point mode.
pub const DEFAULT_DRONE_ADDR: &str = "192.168.10.1:8889";

/// Local address the control socket binds to.
pub const DEFAULT_LOCAL_ADDR: &str = "0.0.0.0:9000";

/// Upper bound on the size of a single command reply.
pub const MAX_RESPONSE_BYTES: usize = 128;

/// Default bound on waiting for a reply.
pub const DEFAULT_RECV_TIMEOUT: Duration = Duration::from_secs(7);

/// Configuration for the control socket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportConfig {
    /// Local address to bind.
    pub local_addr: SocketAddr,
    /// Drone command endpoint. Replies from any other source are discarded.
    pub drone_addr: SocketAddr,
    /// How long `recv_one` blocks before failing with a timeout. Must be non-zero.
    pub recv_timeout: Duration,
    /// Maximum reply size in bytes, capped at [`MAX_RESPONSE_BYTES`].
    pub max_response_bytes: usize,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            local_addr: SocketAddr::from(([0, 0, 0, 0], 9000)),
            drone_addr: SocketAddr::from(([192, 168, 10, 1], 8889)),
            recv_timeout: DEFAULT_RECV_TIMEOUT,
            max_response_bytes: MAX_RESPONSE_BYTES,
        }
    }
}

impl TransportConfig {
    /// Reject values that would make every receive fail immediately.
    pub fn validate(&self) -> Result<()> {
        if self.recv_timeout.is_zero() {
            return Err(TransportError::InvalidConfig("recv_timeout must be non-zero"));
        }
        if self.max_response_bytes == 0 {
            return Err(TransportError::InvalidConfig("max_response_bytes must be non-zero"));
        }
        Ok(())
    }
}
