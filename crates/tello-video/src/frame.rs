use std::sync::{Arc, Mutex, MutexGuard};

use bytes::Bytes;

/// Pixel layout of a frame's data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    /// Packed 8-bit RGB, `width * height * 3` bytes.
    Rgb24,
    /// Packed 8-bit BGR, `width * height * 3` bytes.
    Bgr24,
    /// Planar YUV 4:2:0.
    Yuv420p,
    /// Still-encoded access unit; width and height are unknown (zero).
    Encoded,
}

/// One frame as produced by a decoder.
///
/// Frame data is immutable once built, so a cloned frame can never be
/// changed by the capture thread after it is handed out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoFrame {
    /// Position in publish order, starting at 1. Zero until published.
    pub sequence: u64,
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
    pub data: Bytes,
}

impl VideoFrame {
    pub fn new(width: u32, height: u32, format: PixelFormat, data: impl Into<Bytes>) -> Self {
        Self {
            sequence: 0,
            width,
            height,
            format,
            data: data.into(),
        }
    }

    /// Wrap an encoded access unit.
    pub fn encoded(data: impl Into<Bytes>) -> Self {
        Self::new(0, 0, PixelFormat::Encoded, data)
    }
}

#[derive(Debug, Default)]
struct Slot {
    latest: Option<VideoFrame>,
    published: u64,
}

/// Holds the most recent frame. Last write wins; there is no history.
///
/// Cloning the buffer clones the handle, not the frame.
#[derive(Debug, Clone, Default)]
pub struct FrameBuffer {
    slot: Arc<Mutex<Slot>>,
}

impl FrameBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current frame, stamping it with the next sequence number.
    ///
    /// Returns a copy of the stored frame.
    pub fn publish(&self, mut frame: VideoFrame) -> VideoFrame {
        let mut slot = self.lock();
        slot.published += 1;
        frame.sequence = slot.published;
        slot.latest = Some(frame.clone());
        frame
    }

    /// A copy of the current frame, or `None` if nothing was published yet.
    pub fn snapshot(&self) -> Option<VideoFrame> {
        self.lock().latest.clone()
    }

    /// Number of frames published so far.
    pub fn published(&self) -> u64 {
        self.lock().published
    }

    fn lock(&self) -> MutexGuard<'_, Slot> {
        // A panicking writer cannot leave the slot half-updated.
        self.slot.lock().unwrap_or_else(|e| e.into_inner())
    }
}
