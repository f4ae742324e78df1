use std::net::SocketAddr;
use std::time::Duration;

use tello_client::ClientError;

/// Errors that can occur in the video pipeline.
#[derive(Debug, thiserror::Error)]
pub enum VideoError {
    /// Failed to bind the video socket.
    #[error("failed to bind video socket {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        source: std::io::Error,
    },

    /// An I/O error occurred on the video socket.
    #[error("video I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A configuration value is unusable.
    #[error("invalid video config: {0}")]
    InvalidConfig(&'static str),

    /// A datagram or access unit could not be turned into a frame.
    #[error("decode failed: {0}")]
    Decode(String),

    /// `streamon` did not succeed; no capture task was started.
    #[error("stream start failed: {0}")]
    StreamStartFailed(#[source] ClientError),

    /// `streamoff` did not succeed after the capture task stopped.
    #[error("stream stop failed: {0}")]
    StreamStopFailed(#[source] ClientError),

    /// The capture thread could not be spawned.
    #[error("failed to spawn capture thread: {0}")]
    SpawnFailed(std::io::Error),

    /// The capture thread did not exit within the join bound.
    #[error("capture thread did not exit within {0:?}")]
    JoinTimeout(Duration),

    /// The capture thread panicked.
    #[error("capture thread panicked")]
    CapturePanicked,
}

pub type Result<T> = std::result::Result<T, VideoError>;
