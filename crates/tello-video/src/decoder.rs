use bytes::Bytes;

use crate::config::VideoConfig;
use crate::error::Result;
use crate::frame::VideoFrame;

/// Turns encoded access units into frames.
///
/// Implementations wrap an external decoder. `Ok(None)` means the unit was
/// accepted but produced no picture yet (e.g. parameter sets).
pub trait FrameDecoder: Send {
    fn decode(&mut self, unit: Bytes) -> Result<Option<VideoFrame>>;
}

/// Yields each access unit as an [`Encoded`](crate::PixelFormat::Encoded)
/// frame without decoding it. Useful for recording the raw stream.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughDecoder;

impl FrameDecoder for PassthroughDecoder {
    fn decode(&mut self, unit: Bytes) -> Result<Option<VideoFrame>> {
        if unit.is_empty() {
            return Ok(None);
        }
        Ok(Some(VideoFrame::encoded(unit)))
    }
}

/// An open decode session: a video source plus its decoder.
///
/// `next_frame` must return within a bounded time (one read timeout) so the
/// capture loop can observe its stop flag. Errors are treated as transient.
pub trait DecodeSession: Send {
    fn next_frame(&mut self) -> Result<Option<VideoFrame>>;
}

/// Opens a fresh decode session each time the pipeline starts.
pub trait SessionFactory: Send + Sync {
    fn open(&self, config: &VideoConfig) -> Result<Box<dyn DecodeSession>>;
}

impl<F> SessionFactory for F
where
    F: Fn(&VideoConfig) -> Result<Box<dyn DecodeSession>> + Send + Sync,
{
    fn open(&self, config: &VideoConfig) -> Result<Box<dyn DecodeSession>> {
        self(config)
    }
}
