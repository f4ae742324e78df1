use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tello_client::{CommandChannel, Drone};
use tracing::{debug, info, warn};

use crate::config::VideoConfig;
use crate::decoder::{DecodeSession, SessionFactory};
use crate::error::{Result, VideoError};
use crate::frame::{FrameBuffer, VideoFrame};
use crate::sink::FrameSink;

const JOIN_POLL: Duration = Duration::from_millis(5);

/// Pause after a failed pull, capped by the read timeout.
const ERROR_BACKOFF: Duration = Duration::from_millis(10);

/// Consecutive failures between repeated warnings.
const FAILURE_REPORT_EVERY: u64 = 100;

/// Toggles the drone's video stream over the command channel.
pub trait StreamControl {
    fn stream_on(&mut self) -> tello_client::Result<()>;
    fn stream_off(&mut self) -> tello_client::Result<()>;
}

impl StreamControl for CommandChannel {
    fn stream_on(&mut self) -> tello_client::Result<()> {
        CommandChannel::stream_on(self)
    }

    fn stream_off(&mut self) -> tello_client::Result<()> {
        CommandChannel::stream_off(self)
    }
}

impl StreamControl for Drone {
    fn stream_on(&mut self) -> tello_client::Result<()> {
        Drone::stream_on(self)
    }

    fn stream_off(&mut self) -> tello_client::Result<()> {
        Drone::stream_off(self)
    }
}

/// Externally visible pipeline state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Stopped,
    Running,
}

struct CaptureTask {
    stop: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

enum Lifecycle {
    Stopped,
    Running(CaptureTask),
    // Capture thread joined, `streamoff` not yet acknowledged.
    StreamOffPending,
}

impl Lifecycle {
    fn is_stopped(&self) -> bool {
        matches!(self, Lifecycle::Stopped)
    }
}

type SharedSink = Arc<Mutex<Option<Box<dyn FrameSink>>>>;

/// Background frame acquisition with last-frame access.
///
/// `start` and `stop` are idempotent and may be called from different
/// threads. At most one capture thread exists at a time. The only state
/// shared with the capture thread is the [`FrameBuffer`] and the optional
/// [`FrameSink`].
pub struct VideoPipeline {
    factory: Box<dyn SessionFactory>,
    config: VideoConfig,
    buffer: FrameBuffer,
    sink: SharedSink,
    lifecycle: Mutex<Lifecycle>,
    // Mirrors `lifecycle` after each transition, so state reads never wait
    // behind `streamon`/`streamoff` I/O.
    running: AtomicBool,
}

impl VideoPipeline {
    pub fn new(factory: impl SessionFactory + 'static, config: VideoConfig) -> Self {
        Self {
            factory: Box::new(factory),
            config,
            buffer: FrameBuffer::new(),
            sink: Arc::new(Mutex::new(None)),
            lifecycle: Mutex::new(Lifecycle::Stopped),
            running: AtomicBool::new(false),
        }
    }

    /// Notify `sink` of every published frame.
    pub fn with_sink(self, sink: impl FrameSink + 'static) -> Self {
        *lock(&self.sink) = Some(Box::new(sink));
        self
    }

    /// State as of the last completed `start` or `stop`.
    ///
    /// Never blocks. While a transition is in flight this still reports the
    /// previous state.
    pub fn state(&self) -> PipelineState {
        if self.running.load(Ordering::Acquire) {
            PipelineState::Running
        } else {
            PipelineState::Stopped
        }
    }

    pub fn is_running(&self) -> bool {
        self.state() == PipelineState::Running
    }

    pub fn config(&self) -> &VideoConfig {
        &self.config
    }

    /// A copy of the most recent frame, or `None` if none was captured yet.
    pub fn frame(&self) -> Option<VideoFrame> {
        self.buffer.snapshot()
    }

    /// Handle to the frame buffer, for readers on other threads.
    pub fn buffer(&self) -> FrameBuffer {
        self.buffer.clone()
    }

    /// Turn the stream on and launch the capture thread.
    ///
    /// No-op while running. If `streamon` fails nothing is spawned.
    pub fn start<C: StreamControl + ?Sized>(&self, control: &mut C) -> Result<()> {
        let mut lifecycle = lock(&self.lifecycle);
        let result = self.start_locked(&mut lifecycle, control);
        self.running.store(!lifecycle.is_stopped(), Ordering::Release);
        result
    }

    /// Stop the capture thread, wait for it to exit, then turn the stream off.
    ///
    /// No-op while stopped. Blocks for at most the configured join timeout;
    /// on `JoinTimeout` the pipeline stays running and `stop` may be retried.
    pub fn stop<C: StreamControl + ?Sized>(&self, control: &mut C) -> Result<()> {
        let mut lifecycle = lock(&self.lifecycle);
        let result = self.stop_locked(&mut lifecycle, control);
        self.running.store(!lifecycle.is_stopped(), Ordering::Release);
        result
    }

    fn start_locked<C: StreamControl + ?Sized>(
        &self,
        lifecycle: &mut Lifecycle,
        control: &mut C,
    ) -> Result<()> {
        if !lifecycle.is_stopped() {
            debug!("video pipeline already running");
            return Ok(());
        }

        control.stream_on().map_err(VideoError::StreamStartFailed)?;

        let session = match self.factory.open(&self.config) {
            Ok(session) => session,
            Err(err) => {
                release_stream(control);
                return Err(err);
            }
        };

        let stop = Arc::new(AtomicBool::new(false));
        let backoff = ERROR_BACKOFF.min(self.config.read_timeout);
        let spawned = thread::Builder::new().name("tello-video".to_string()).spawn({
            let stop = Arc::clone(&stop);
            let buffer = self.buffer.clone();
            let sink = Arc::clone(&self.sink);
            move || capture_loop(session, buffer, sink, stop, backoff)
        });
        let handle = match spawned {
            Ok(handle) => handle,
            Err(err) => {
                release_stream(control);
                return Err(VideoError::SpawnFailed(err));
            }
        };

        *lifecycle = Lifecycle::Running(CaptureTask { stop, handle });
        info!("video pipeline running");
        Ok(())
    }

    fn stop_locked<C: StreamControl + ?Sized>(
        &self,
        lifecycle: &mut Lifecycle,
        control: &mut C,
    ) -> Result<()> {
        match std::mem::replace(lifecycle, Lifecycle::Stopped) {
            Lifecycle::Stopped => {
                debug!("video pipeline already stopped");
                return Ok(());
            }
            Lifecycle::Running(task) => {
                task.stop.store(true, Ordering::Release);
                if !wait_for_exit(&task.handle, self.config.join_timeout) {
                    *lifecycle = Lifecycle::Running(task);
                    return Err(VideoError::JoinTimeout(self.config.join_timeout));
                }
                if task.handle.join().is_err() {
                    // The thread is gone either way; the stream still has to be released.
                    *lifecycle = Lifecycle::StreamOffPending;
                    release_stream_or_keep_pending(control, lifecycle);
                    return Err(VideoError::CapturePanicked);
                }
            }
            Lifecycle::StreamOffPending => {}
        }

        if let Err(err) = control.stream_off() {
            *lifecycle = Lifecycle::StreamOffPending;
            return Err(VideoError::StreamStopFailed(err));
        }

        info!(frames = self.buffer.published(), "video pipeline stopped");
        Ok(())
    }
}

impl Drop for VideoPipeline {
    fn drop(&mut self) {
        // Without a channel `streamoff` cannot be sent; only the thread is stopped.
        if let Lifecycle::Running(task) =
            std::mem::replace(&mut *lock(&self.lifecycle), Lifecycle::Stopped)
        {
            task.stop.store(true, Ordering::Release);
            if !wait_for_exit(&task.handle, self.config.join_timeout) {
                warn!("capture thread still running at drop");
            } else if task.handle.join().is_err() {
                warn!("capture thread panicked");
            }
        }
    }
}

impl std::fmt::Debug for VideoPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VideoPipeline")
            .field("state", &self.state())
            .field("published", &self.buffer.published())
            .field("config", &self.config)
            .finish()
    }
}

fn capture_loop(
    mut session: Box<dyn DecodeSession>,
    buffer: FrameBuffer,
    sink: SharedSink,
    stop: Arc<AtomicBool>,
    backoff: Duration,
) {
    debug!("capture loop started");
    let mut failures = 0u64;
    let mut consecutive = 0u64;

    while !stop.load(Ordering::Acquire) {
        match session.next_frame() {
            Ok(frame) => {
                if consecutive > 0 {
                    debug!(failed = consecutive, "decode recovered");
                    consecutive = 0;
                }
                if let Some(frame) = frame {
                    let frame = buffer.publish(frame);
                    if let Some(sink) = lock(&sink).as_mut() {
                        sink.on_frame(&frame);
                    }
                }
            }
            Err(err) => {
                failures += 1;
                consecutive += 1;
                if consecutive == 1 {
                    debug!(error = %err, "skipping frame");
                } else if consecutive % FAILURE_REPORT_EVERY == 0 {
                    warn!(error = %err, consecutive, "video source keeps failing");
                }
                thread::sleep(backoff);
            }
        }
    }

    drop(session);
    debug!(published = buffer.published(), failures, "capture loop exited");
}

fn wait_for_exit(handle: &JoinHandle<()>, timeout: Duration) -> bool {
    let deadline = Instant::now() + timeout;
    while !handle.is_finished() {
        if Instant::now() >= deadline {
            warn!(?timeout, "capture thread did not exit in time");
            return false;
        }
        thread::sleep(JOIN_POLL);
    }
    true
}

fn release_stream<C: StreamControl + ?Sized>(control: &mut C) {
    if let Err(err) = control.stream_off() {
        warn!(error = %err, "streamoff failed while abandoning start");
    }
}

fn release_stream_or_keep_pending<C: StreamControl + ?Sized>(
    control: &mut C,
    lifecycle: &mut Lifecycle,
) {
    match control.stream_off() {
        Ok(()) => *lifecycle = Lifecycle::Stopped,
        Err(err) => warn!(error = %err, "streamoff failed after capture panic"),
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}
