use std::fmt;
use std::io;

use tello::client::ClientError;
use tello::protocol::ProtocolError;
use tello::transport::TransportError;
use tello::video::VideoError;

pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const TRANSPORT_ERROR: i32 = 3;
pub const PERMISSION_DENIED: i32 = 50;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const TIMEOUT: i32 = 124;
pub const INTERNAL: i32 = 125;
pub const CANCELLED: i32 = 130;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => TIMEOUT,
        io::ErrorKind::AddrInUse | io::ErrorKind::AddrNotAvailable => TRANSPORT_ERROR,
        _ => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn transport_error(context: &str, err: TransportError) -> CliError {
    match err {
        TransportError::Bind { .. } | TransportError::Send { .. } => {
            CliError::new(TRANSPORT_ERROR, format!("{context}: {err}"))
        }
        TransportError::Io(source) => io_error(context, source),
        TransportError::Timeout(_) => CliError::new(TIMEOUT, format!("{context}: {err}")),
        TransportError::Decode { .. } => CliError::new(DATA_INVALID, format!("{context}: {err}")),
        TransportError::InvalidConfig(_) => CliError::new(USAGE, format!("{context}: {err}")),
        TransportError::NotBound => CliError::new(INTERNAL, format!("{context}: {err}")),
    }
}

pub fn client_error(context: &str, err: ClientError) -> CliError {
    match err {
        ClientError::Transport(err) => transport_error(context, err),
        ClientError::Protocol(ProtocolError::InvalidArgument { .. })
        | ClientError::InvalidState { .. } => CliError::new(USAGE, format!("{context}: {err}")),
        ClientError::Protocol(ProtocolError::MalformedResponse { .. }) => {
            CliError::new(DATA_INVALID, format!("{context}: {err}"))
        }
        ClientError::Protocol(ProtocolError::CommandRejected { .. })
        | ClientError::HandshakeFailed { .. } => {
            CliError::new(FAILURE, format!("{context}: {err}"))
        }
        ClientError::Cancelled(_) => CliError::new(CANCELLED, format!("{context}: {err}")),
    }
}

pub fn video_error(context: &str, err: VideoError) -> CliError {
    match err {
        VideoError::Bind { .. } => CliError::new(TRANSPORT_ERROR, format!("{context}: {err}")),
        VideoError::Io(source) => io_error(context, source),
        VideoError::StreamStartFailed(err) | VideoError::StreamStopFailed(err) => {
            client_error(context, err)
        }
        VideoError::Decode(_) => CliError::new(DATA_INVALID, format!("{context}: {err}")),
        VideoError::InvalidConfig(_) => CliError::new(USAGE, format!("{context}: {err}")),
        VideoError::JoinTimeout(_) => CliError::new(TIMEOUT, format!("{context}: {err}")),
        other => CliError::new(INTERNAL, format!("{context}: {other}")),
    }
}
