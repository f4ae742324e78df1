use std::time::Instant;

use tello_protocol::{Command, Response};
use tello_transport::{TransportError, UdpTransport};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::state::ConnectionState;

/// Sequential request/response channel over the control socket.
///
/// UDP carries no correlation between a command and its reply, so at most
/// one exchange may be outstanding. `send_and_wait` takes `&mut self`, which
/// makes that a borrow-checked property; to share a channel between threads,
/// wrap it in a `Mutex` so callers queue instead of interleaving.
pub struct CommandChannel {
    transport: Option<UdpTransport>,
    config: ClientConfig,
    state: ConnectionState,
    cancel: CancellationToken,
}

impl CommandChannel {
    /// Create an unconnected channel. The socket is bound by [`start`](Self::start).
    pub fn new(config: ClientConfig) -> Self {
        Self {
            transport: None,
            config,
            state: ConnectionState::Uninitialized,
            cancel: CancellationToken::new(),
        }
    }

    /// Create a channel and perform the SDK handshake.
    pub fn connect(config: ClientConfig) -> Result<Self> {
        let mut channel = Self::new(config);
        channel.start()?;
        Ok(channel)
    }

    /// Use an externally owned cancellation token.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Token that aborts an in-progress wait. Cancelling it while a command
    /// is outstanding triggers a best-effort `emergency`.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub(crate) fn set_state(&mut self, next: ConnectionState) {
        if self.state != next {
            info!(from = %self.state, to = %next, "connection state changed");
            self.state = next;
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Whether a control socket is currently bound.
    pub fn is_bound(&self) -> bool {
        self.transport.is_some()
    }

    /// Borrow the bound transport.
    pub fn transport(&self) -> Option<&UdpTransport> {
        self.transport.as_ref()
    }

    /// Bind the socket if needed and enter SDK mode.
    ///
    /// The state becomes `Ready` only on an exact `ok`. Repeating the
    /// handshake on a connected channel never downgrades its state.
    pub fn start(&mut self) -> Result<()> {
        if self.transport.is_none() {
            self.transport = Some(UdpTransport::bind(self.config.transport.clone())?);
        }

        let command = Command::handshake();
        let response = self.send_and_wait(&command)?;
        if !response.is_ok() {
            warn!(reply = %response.raw(), "drone refused SDK mode");
            return Err(ClientError::HandshakeFailed {
                reply: response.raw().to_string(),
            });
        }

        if self.state == ConnectionState::Uninitialized {
            self.set_state(ConnectionState::Ready);
        }
        Ok(())
    }

    /// Release the control socket. A later [`start`](Self::start) rebinds it.
    pub fn close(&mut self) {
        if self.transport.take().is_some() {
            debug!("control socket closed");
        }
        self.set_state(ConnectionState::Uninitialized);
    }

    /// Fail with `InvalidState` unless the current state satisfies `required`.
    ///
    /// Always passes when flight-state enforcement is disabled.
    pub fn require(&self, command: &Command, required: ConnectionState) -> Result<()> {
        if !self.config.enforce_flight_state || self.state.satisfies(required) {
            return Ok(());
        }
        Err(ClientError::InvalidState {
            command: command.to_string(),
            required,
            actual: self.state,
        })
    }

    /// Send one command and block for its reply.
    ///
    /// Replies that arrived late for an earlier, timed-out command are
    /// discarded before sending so they cannot be taken as this reply.
    pub fn send_and_wait(&mut self, command: &Command) -> Result<Response> {
        if self.cancel.is_cancelled() {
            return Err(ClientError::Cancelled(command.to_string()));
        }

        let transport = self.transport.as_ref().ok_or(TransportError::NotBound)?;

        let stale = transport.drain()?;
        if stale > 0 {
            warn!(stale, command = %command, "discarded late replies before sending");
        }

        transport.send(&command.encode())?;
        debug!(command = %command, "awaiting reply");

        match self.await_reply() {
            Err(ClientError::Cancelled(_)) => {
                self.abort_with_emergency(command);
                Err(ClientError::Cancelled(command.to_string()))
            }
            other => other,
        }
    }

    /// Send a command without waiting for the reply.
    pub fn send_only(&mut self, command: &Command) -> Result<()> {
        let transport = self.transport.as_ref().ok_or(TransportError::NotBound)?;
        transport.send(&command.encode())?;
        debug!(command = %command, "sent without waiting");
        Ok(())
    }

    /// Send `command` and require the `ok` token in reply.
    pub fn request_ok(&mut self, command: &Command) -> Result<()> {
        let response = self.send_and_wait(command)?;
        response.expect_ok(command)?;
        Ok(())
    }

    /// `streamon`: start the video stream to UDP 11111. Requires `Ready`.
    pub fn stream_on(&mut self) -> Result<()> {
        let command = Command::stream_on();
        self.require(&command, ConnectionState::Ready)?;
        self.request_ok(&command)
    }

    /// `streamoff`. Requires `Ready`.
    pub fn stream_off(&mut self) -> Result<()> {
        let command = Command::stream_off();
        self.require(&command, ConnectionState::Ready)?;
        self.request_ok(&command)
    }

    /// Stop the motors immediately. The reply is not awaited.
    pub fn emergency(&mut self) -> Result<()> {
        self.send_only(&Command::emergency())?;
        if self.state == ConnectionState::Flying {
            self.set_state(ConnectionState::Ready);
        }
        Ok(())
    }

    fn await_reply(&self) -> Result<Response> {
        let transport = self.transport.as_ref().ok_or(TransportError::NotBound)?;
        let timeout = transport.config().recv_timeout;
        let max_bytes = transport.config().max_response_bytes;
        let deadline = Instant::now() + timeout;
        let slice = self.config.effective_poll_interval();

        loop {
            if self.cancel.is_cancelled() {
                return Err(ClientError::Cancelled(String::new()));
            }

            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Err(TransportError::Timeout(timeout).into());
            }

            match transport.recv_one_within(max_bytes, remaining.min(slice)) {
                Ok(text) => return Ok(Response::new(text)),
                Err(TransportError::Timeout(_)) => continue,
                Err(err) => return Err(err.into()),
            }
        }
    }

    // Terminal path: errors are logged, not raised.
    fn abort_with_emergency(&mut self, command: &Command) {
        warn!(command = %command, "wait cancelled; sending emergency stop");
        if let Err(err) = self.emergency() {
            warn!(error = %err, "emergency stop could not be sent");
        }
    }
}

impl std::fmt::Debug for CommandChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandChannel")
            .field("transport", &self.transport)
            .field("state", &self.state)
            .field("cancelled", &self.cancel.is_cancelled())
            .finish()
    }
}
