use std::net::SocketAddr;
use std::time::Duration;

use crate::error::{Result, VideoError};

/// Local address the drone streams video to.
pub const DEFAULT_VIDEO_ADDR: &str = "0.0.0.0:11111";

/// Size of a full video datagram. A shorter datagram ends an access unit.
pub const DEFAULT_SEGMENT_SIZE: usize = 1460;

/// Configuration for the video pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoConfig {
    /// Local address for the video socket.
    pub bind_addr: SocketAddr,
    /// Socket read timeout. Bounds how long the capture loop goes without
    /// checking its stop flag.
    pub read_timeout: Duration,
    /// How long `stop` waits for the capture thread to exit.
    pub join_timeout: Duration,
    /// Full datagram size used to detect the end of an access unit.
    pub segment_size: usize,
    /// Access units larger than this are dropped as corrupt.
    pub max_unit_size: usize,
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 11111)),
            read_timeout: Duration::from_millis(100),
            join_timeout: Duration::from_secs(2),
            segment_size: DEFAULT_SEGMENT_SIZE,
            max_unit_size: 2 * 1024 * 1024,
        }
    }
}

impl VideoConfig {
    /// Reject values the video socket or the reassembler cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.read_timeout.is_zero() {
            return Err(VideoError::InvalidConfig("read_timeout must be non-zero"));
        }
        if self.segment_size == 0 {
            return Err(VideoError::InvalidConfig("segment_size must be non-zero"));
        }
        if self.max_unit_size < self.segment_size {
            return Err(VideoError::InvalidConfig(
                "max_unit_size must be at least segment_size",
            ));
        }
        Ok(())
    }
}
