use std::io::ErrorKind;
use std::net::{SocketAddr, UdpSocket};
use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::config::{TransportConfig, MAX_RESPONSE_BYTES};
use crate::error::{Result, TransportError};

/// Smallest read timeout handed to the socket. A zero timeout is rejected by the OS.
const MIN_WAIT: Duration = Duration::from_millis(1);

/// UDP transport bound to the local control port.
///
/// Sends to a single fixed drone address and accepts replies only from that
/// address. Every receive is bounded; there is no way to block forever.
pub struct UdpTransport {
    socket: UdpSocket,
    config: TransportConfig,
}

impl UdpTransport {
    /// Bind the control socket described by `config`.
    pub fn bind(config: TransportConfig) -> Result<Self> {
        config.validate()?;
        let socket = UdpSocket::bind(config.local_addr).map_err(|e| TransportError::Bind {
            addr: config.local_addr,
            source: e,
        })?;

        let local = socket.local_addr()?;
        info!(%local, drone = %config.drone_addr, "control socket bound");

        Ok(Self { socket, config })
    }

    /// Send one datagram to the drone.
    pub fn send(&self, payload: &[u8]) -> Result<()> {
        let peer = self.config.drone_addr;
        let sent = self
            .socket
            .send_to(payload, peer)
            .map_err(|e| TransportError::Send { peer, source: e })?;
        if sent != payload.len() {
            return Err(TransportError::Send {
                peer,
                source: std::io::Error::new(
                    ErrorKind::WriteZero,
                    format!("short send: {sent} of {} bytes", payload.len()),
                ),
            });
        }
        debug!(%peer, size = sent, "sent datagram");
        Ok(())
    }

    /// Block for one reply using the configured receive timeout.
    pub fn recv_one(&self, max_bytes: usize) -> Result<String> {
        self.recv_one_within(max_bytes, self.config.recv_timeout)
    }

    /// Block for one reply, giving up after `wait`.
    ///
    /// Datagrams from addresses other than the drone are discarded and do not
    /// extend the wait.
    pub fn recv_one_within(&self, max_bytes: usize, wait: Duration) -> Result<String> {
        let cap = max_bytes.clamp(1, MAX_RESPONSE_BYTES);
        let mut buf = [0u8; MAX_RESPONSE_BYTES];
        let deadline = Instant::now() + wait;

        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Err(TransportError::Timeout(wait));
            }
            self.socket.set_read_timeout(Some(remaining.max(MIN_WAIT)))?;

            let (len, src) = match self.socket.recv_from(&mut buf[..cap]) {
                Ok(received) => received,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err)
                    if err.kind() == ErrorKind::WouldBlock || err.kind() == ErrorKind::TimedOut =>
                {
                    return Err(TransportError::Timeout(wait));
                }
                Err(err) => return Err(TransportError::Io(err)),
            };

            if src != self.config.drone_addr {
                debug!(%src, size = len, "ignoring datagram from unexpected source");
                continue;
            }

            let text = std::str::from_utf8(&buf[..len])
                .map_err(|_| TransportError::Decode { len })?
                .to_string();
            debug!(size = len, reply = %text.trim(), "received reply");
            return Ok(text);
        }
    }

    /// Discard any datagrams already queued on the socket without blocking.
    ///
    /// Returns the number of datagrams dropped.
    pub fn drain(&self) -> Result<usize> {
        self.socket.set_nonblocking(true)?;
        let mut buf = [0u8; MAX_RESPONSE_BYTES];
        let mut dropped = 0usize;

        let outcome = loop {
            match self.socket.recv_from(&mut buf) {
                Ok((len, src)) => {
                    debug!(%src, size = len, "discarding stale datagram");
                    dropped += 1;
                }
                Err(err) if err.kind() == ErrorKind::WouldBlock => break Ok(dropped),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => break Err(TransportError::Io(err)),
            }
        };

        self.socket.set_nonblocking(false)?;
        outcome
    }

    /// Address the socket is actually bound to.
    pub fn local_addr(&self) -> Result<SocketAddr> {
        self.socket.local_addr().map_err(Into::into)
    }

    /// Drone command endpoint.
    pub fn drone_addr(&self) -> SocketAddr {
        self.config.drone_addr
    }

    /// Active configuration.
    pub fn config(&self) -> &TransportConfig {
        &self.config
    }
}

impl std::fmt::Debug for UdpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UdpTransport")
            .field("local", &self.socket.local_addr().ok())
            .field("drone", &self.config.drone_addr)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loopback_pair(recv_timeout: Duration) -> (UdpTransport, UdpSocket) {
        let drone = UdpSocket::bind("127.0.0.1:0").unwrap();
        let config = TransportConfig {
            local_addr: "127.0.0.1:0".parse().unwrap(),
            drone_addr: drone.local_addr().unwrap(),
            recv_timeout,
            ..TransportConfig::default()
        };
        (UdpTransport::bind(config).unwrap(), drone)
    }

    #[test]
    fn send_and_receive_one_reply() {
        let (transport, drone) = loopback_pair(Duration::from_secs(2));

        transport.send(b"command").unwrap();
        let mut buf = [0u8; 64];
        let (len, client) = drone.recv_from(&mut buf).unwrap();
        assert_eq!(&buf[..len], b"command");

        drone.send_to(b"ok", client).unwrap();
        assert_eq!(transport.recv_one(MAX_RESPONSE_BYTES).unwrap(), "ok");
    }

    #[test]
    fn failed_send_is_returned() {
        // Broadcast without SO_BROADCAST is refused by the kernel.
        let config = TransportConfig {
            local_addr: "0.0.0.0:0".parse().unwrap(),
            drone_addr: "255.255.255.255:8889".parse().unwrap(),
            ..TransportConfig::default()
        };
        let transport = UdpTransport::bind(config).unwrap();

        match transport.send(b"command") {
            Err(TransportError::Send { peer, .. }) => {
                assert_eq!(peer, "255.255.255.255:8889".parse().unwrap());
            }
            other => panic!("expected send error, got {other:?}"),
        }
    }

    #[test]
    fn bind_rejects_zero_timeout() {
        let config = TransportConfig {
            local_addr: "127.0.0.1:0".parse().unwrap(),
            recv_timeout: Duration::ZERO,
            ..TransportConfig::default()
        };
        assert!(matches!(
            UdpTransport::bind(config),
            Err(TransportError::InvalidConfig(_))
        ));
    }

    #[test]
    fn recv_times_out_without_reply() {
        let (transport, _drone) = loopback_pair(Duration::from_millis(50));

        let started = Instant::now();
        let err = transport.recv_one(MAX_RESPONSE_BYTES).unwrap_err();
        assert!(matches!(err, TransportError::Timeout(_)));
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[test]
    fn ignores_datagrams_from_other_sources() {
        let (transport, drone) = loopback_pair(Duration::from_secs(2));
        let stranger = UdpSocket::bind("127.0.0.1:0").unwrap();
        let client = transport.local_addr().unwrap();

        stranger.send_to(b"error", client).unwrap();
        drone.send_to(b"ok", client).unwrap();

        assert_eq!(transport.recv_one(MAX_RESPONSE_BYTES).unwrap(), "ok");
    }

    #[test]
    fn reply_is_truncated_to_cap() {
        let (transport, drone) = loopback_pair(Duration::from_secs(2));
        let client = transport.local_addr().unwrap();

        drone.send_to(&[b'7'; 300], client).unwrap();
        let reply = transport.recv_one(1024).unwrap();
        assert_eq!(reply.len(), MAX_RESPONSE_BYTES);
    }

    #[test]
    fn non_utf8_reply_is_a_decode_error() {
        let (transport, drone) = loopback_pair(Duration::from_secs(2));
        let client = transport.local_addr().unwrap();

        drone.send_to(&[0xff, 0xfe, 0x00], client).unwrap();
        let err = transport.recv_one(MAX_RESPONSE_BYTES).unwrap_err();
        assert!(matches!(err, TransportError::Decode { len: 3 }));
    }

    #[test]
    fn drain_discards_queued_datagrams() {
        let (transport, drone) = loopback_pair(Duration::from_millis(100));
        let client = transport.local_addr().unwrap();

        drone.send_to(b"ok", client).unwrap();
        drone.send_to(b"late", client).unwrap();
        std::thread::sleep(Duration::from_millis(50));

        assert_eq!(transport.drain().unwrap(), 2);
        assert!(transport.recv_one(MAX_RESPONSE_BYTES).unwrap_err().is_timeout());
    }

    #[test]
    fn bind_conflict_reports_address() {
        let (transport, _drone) = loopback_pair(Duration::from_millis(100));
        let taken = transport.local_addr().unwrap();

        let config = TransportConfig {
            local_addr: taken,
            ..TransportConfig::default()
        };
        let err = UdpTransport::bind(config).unwrap_err();
        assert!(matches!(err, TransportError::Bind { addr, .. } if addr == taken));
    }
}
