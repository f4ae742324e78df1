use crate::frame::VideoFrame;

/// Receives a notification for every frame the capture thread publishes.
///
/// This is where a renderer, recorder or preview window plugs in. The sink
/// runs on the capture thread, after the frame buffer lock is released, so a
/// slow sink delays the next decode but never blocks `frame()` readers.
pub trait FrameSink: Send {
    fn on_frame(&mut self, frame: &VideoFrame);
}

impl<F> FrameSink for F
where
    F: FnMut(&VideoFrame) + Send,
{
    fn on_frame(&mut self, frame: &VideoFrame) {
        self(frame)
    }
}
