use std::io::ErrorKind;
use std::net::{SocketAddr, UdpSocket};

use bytes::{Bytes, BytesMut};
use tracing::{debug, info, warn};

use crate::config::VideoConfig;
use crate::decoder::{DecodeSession, FrameDecoder, SessionFactory};
use crate::error::{Result, VideoError};
use crate::frame::VideoFrame;

const MAX_DATAGRAM_SIZE: usize = 2048;

/// Rebuilds access units from the video datagram stream.
///
/// The drone splits each encoded frame into full-size segments followed by
/// one shorter segment; the short segment closes the unit.
#[derive(Debug)]
pub struct AccessUnitAssembler {
    pending: BytesMut,
    segment_size: usize,
    max_unit_size: usize,
}

impl AccessUnitAssembler {
    pub fn new(segment_size: usize, max_unit_size: usize) -> Self {
        Self {
            pending: BytesMut::with_capacity(segment_size * 16),
            segment_size,
            max_unit_size,
        }
    }

    /// Append one datagram. Returns the completed unit, if this datagram closed one.
    pub fn push(&mut self, datagram: &[u8]) -> Option<Bytes> {
        self.pending.extend_from_slice(datagram);

        if self.pending.len() > self.max_unit_size {
            warn!(
                size = self.pending.len(),
                max = self.max_unit_size,
                "dropping oversized access unit"
            );
            self.pending.clear();
            return None;
        }

        if datagram.len() < self.segment_size {
            return Some(self.pending.split().freeze());
        }
        None
    }

    /// Bytes buffered for the unit in progress.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }
}

/// Decode session fed by the drone's UDP video stream.
pub struct UdpVideoSession<D> {
    socket: UdpSocket,
    assembler: AccessUnitAssembler,
    decoder: D,
    buf: Box<[u8; MAX_DATAGRAM_SIZE]>,
}

impl<D: FrameDecoder> UdpVideoSession<D> {
    /// Bind the video socket and attach `decoder`.
    pub fn bind(config: &VideoConfig, decoder: D) -> Result<Self> {
        config.validate()?;
        let socket = UdpSocket::bind(config.bind_addr).map_err(|e| VideoError::Bind {
            addr: config.bind_addr,
            source: e,
        })?;
        socket.set_read_timeout(Some(config.read_timeout))?;
        info!(addr = %socket.local_addr()?, "video socket bound");

        Ok(Self {
            socket,
            assembler: AccessUnitAssembler::new(config.segment_size, config.max_unit_size),
            decoder,
            buf: Box::new([0u8; MAX_DATAGRAM_SIZE]),
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        self.socket.local_addr().map_err(Into::into)
    }
}

impl<D: FrameDecoder> DecodeSession for UdpVideoSession<D> {
    fn next_frame(&mut self) -> Result<Option<VideoFrame>> {
        let len = match self.socket.recv(&mut self.buf[..]) {
            Ok(len) => len,
            Err(err)
                if err.kind() == ErrorKind::WouldBlock
                    || err.kind() == ErrorKind::TimedOut
                    || err.kind() == ErrorKind::Interrupted =>
            {
                return Ok(None);
            }
            Err(err) => return Err(VideoError::Io(err)),
        };

        if len == 0 {
            return Err(VideoError::Decode("empty datagram".to_string()));
        }

        match self.assembler.push(&self.buf[..len]) {
            Some(unit) => {
                debug!(size = unit.len(), "access unit complete");
                self.decoder.decode(unit)
            }
            None => Ok(None),
        }
    }
}

/// Opens a [`UdpVideoSession`] with a fresh decoder from `make_decoder`.
pub struct UdpSessionFactory<F> {
    make_decoder: F,
}

impl<F, D> UdpSessionFactory<F>
where
    F: Fn() -> D + Send + Sync,
    D: FrameDecoder + 'static,
{
    pub fn new(make_decoder: F) -> Self {
        Self { make_decoder }
    }
}

impl<F, D> SessionFactory for UdpSessionFactory<F>
where
    F: Fn() -> D + Send + Sync,
    D: FrameDecoder + 'static,
{
    fn open(&self, config: &VideoConfig) -> Result<Box<dyn DecodeSession>> {
        let session = UdpVideoSession::bind(config, (self.make_decoder)())?;
        Ok(Box::new(session))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::decoder::PassthroughDecoder;
    use crate::frame::PixelFormat;

    fn loopback_config() -> VideoConfig {
        VideoConfig {
            bind_addr: "127.0.0.1:0".parse().unwrap(),
            read_timeout: Duration::from_millis(50),
            segment_size: 8,
            ..VideoConfig::default()
        }
    }

    #[test]
    fn short_segment_closes_unit() {
        let mut assembler = AccessUnitAssembler::new(4, 1024);
        assert!(assembler.push(b"abcd").is_none());
        assert!(assembler.push(b"efgh").is_none());
        assert_eq!(assembler.pending_len(), 8);

        let unit = assembler.push(b"ij").unwrap();
        assert_eq!(unit.as_ref(), b"abcdefghij");
        assert_eq!(assembler.pending_len(), 0);
    }

    #[test]
    fn oversized_unit_is_dropped() {
        let mut assembler = AccessUnitAssembler::new(4, 6);
        assert!(assembler.push(b"abcd").is_none());
        assert!(assembler.push(b"efgh").is_none());
        assert_eq!(assembler.pending_len(), 0);

        assert_eq!(assembler.push(b"xy").unwrap().as_ref(), b"xy");
    }

    #[test]
    fn session_reassembles_datagrams() {
        let mut session = UdpVideoSession::bind(&loopback_config(), PassthroughDecoder).unwrap();
        let addr = session.local_addr().unwrap();
        let drone = UdpSocket::bind("127.0.0.1:0").unwrap();

        drone.send_to(b"12345678", addr).unwrap();
        drone.send_to(b"9", addr).unwrap();

        assert!(session.next_frame().unwrap().is_none());
        let frame = session.next_frame().unwrap().unwrap();
        assert_eq!(frame.format, PixelFormat::Encoded);
        assert_eq!(frame.data.as_ref(), b"123456789");
    }

    #[test]
    fn idle_session_returns_none_within_read_timeout() {
        let mut session = UdpVideoSession::bind(&loopback_config(), PassthroughDecoder).unwrap();
        let started = std::time::Instant::now();
        assert!(session.next_frame().unwrap().is_none());
        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn empty_datagram_is_a_decode_error() {
        let mut session = UdpVideoSession::bind(&loopback_config(), PassthroughDecoder).unwrap();
        let addr = session.local_addr().unwrap();
        UdpSocket::bind("127.0.0.1:0")
            .unwrap()
            .send_to(b"", addr)
            .unwrap();

        assert!(matches!(session.next_frame(), Err(VideoError::Decode(_))));
    }

    #[test]
    fn zero_read_timeout_is_rejected_before_binding() {
        let config = VideoConfig {
            read_timeout: Duration::ZERO,
            ..loopback_config()
        };
        assert!(matches!(
            UdpVideoSession::bind(&config, PassthroughDecoder),
            Err(VideoError::InvalidConfig(_))
        ));
    }

    #[test]
    fn factory_opens_independent_sessions() {
        let factory = UdpSessionFactory::new(|| PassthroughDecoder);
        let first = factory.open(&loopback_config());
        let second = factory.open(&loopback_config());
        assert!(first.is_ok());
        assert!(second.is_ok());
    }
}
