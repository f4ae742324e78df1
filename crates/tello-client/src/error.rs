use tello_protocol::ProtocolError;
use tello_transport::TransportError;

use crate::state::ConnectionState;

/// Errors that can occur in channel and flight operations.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Transport-level error, including reply timeouts.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Argument validation or reply interpretation error.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// The drone did not answer the SDK handshake with `ok`.
    #[error("handshake failed: drone replied {reply:?}")]
    HandshakeFailed { reply: String },

    /// The command is not allowed in the current connection state.
    #[error("'{command}' requires {required} state (current: {actual})")]
    InvalidState {
        command: String,
        required: ConnectionState,
        actual: ConnectionState,
    },

    /// The wait was cancelled. An emergency stop has been attempted.
    #[error("cancelled while waiting for reply to '{0}'")]
    Cancelled(String),
}

impl ClientError {
    /// Returns true if the drone did not reply in time.
    pub fn is_timeout(&self) -> bool {
        matches!(self, ClientError::Transport(err) if err.is_timeout())
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
