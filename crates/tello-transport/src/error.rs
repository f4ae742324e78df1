use std::net::SocketAddr;
use std::time::Duration;

/// Errors that can occur in datagram transport operations.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Failed to bind the local control socket.
    #[error("failed to bind to {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        source: std::io::Error,
    },

    /// The transport was closed (or never opened) when an operation was attempted.
    #[error("transport is not bound")]
    NotBound,

    /// Sending a datagram to the drone failed.
    #[error("failed to send to {peer}: {source}")]
    Send {
        peer: SocketAddr,
        source: std::io::Error,
    },

    /// An I/O error occurred on the socket.
    #[error("transport I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// No reply arrived within the receive bound.
    #[error("no reply within {0:?}")]
    Timeout(Duration),

    /// A configuration value is unusable.
    #[error("invalid transport config: {0}")]
    InvalidConfig(&'static str),

    /// The reply was not valid UTF-8.
    #[error("reply is not valid UTF-8 ({len} bytes)")]
    Decode { len: usize },
}

impl TransportError {
    /// Returns true if this error is a receive timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, TransportError::Timeout(_))
    }
}

pub type Result<T> = std::result::Result<T, TransportError>;
