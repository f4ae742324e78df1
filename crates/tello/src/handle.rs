use tello_client::{CancellationToken, ClientConfig, ConnectionState, Drone};
use tello_video::{
    FrameDecoder, FrameSink, PipelineState, SessionFactory, UdpSessionFactory, VideoConfig,
    VideoFrame, VideoPipeline,
};
use tracing::warn;

/// Settings for both sockets of a [`Tello`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TelloConfig {
    pub client: ClientConfig,
    pub video: VideoConfig,
}

/// One drone: its command channel and its video pipeline.
///
/// Every piece of session state lives in this value; two `Tello`s never
/// share anything. Dropping it stops the capture thread but does not land
/// the drone.
#[derive(Debug)]
pub struct Tello {
    drone: Drone,
    video: VideoPipeline,
}

impl Tello {
    /// Build a client that decodes video with decoders from `make_decoder`.
    pub fn new<F, D>(config: TelloConfig, make_decoder: F) -> Self
    where
        F: Fn() -> D + Send + Sync + 'static,
        D: FrameDecoder + 'static,
    {
        Self::with_session_factory(config, UdpSessionFactory::new(make_decoder))
    }

    pub fn with_session_factory(
        config: TelloConfig,
        factory: impl SessionFactory + 'static,
    ) -> Self {
        Self {
            drone: Drone::new(config.client),
            video: VideoPipeline::new(factory, config.video),
        }
    }

    /// Notify `sink` of every captured frame.
    pub fn with_frame_sink(mut self, sink: impl FrameSink + 'static) -> Self {
        self.video = self.video.with_sink(sink);
        self
    }

    /// Abort waits through an externally owned token (e.g. a Ctrl-C handler).
    pub fn with_cancellation(self, token: CancellationToken) -> Self {
        let Tello { drone, video } = self;
        let channel = drone.into_channel().with_cancellation(token);
        Self {
            drone: Drone::from_channel(channel),
            video,
        }
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.drone.channel().cancellation_token()
    }

    /// Bind the control socket and enter SDK mode.
    pub fn start(&mut self) -> tello_client::Result<()> {
        self.drone.start()
    }

    pub fn state(&self) -> ConnectionState {
        self.drone.state()
    }

    pub fn drone(&mut self) -> &mut Drone {
        &mut self.drone
    }

    pub fn start_video(&mut self) -> tello_video::Result<()> {
        self.video.start(&mut self.drone)
    }

    pub fn stop_video(&mut self) -> tello_video::Result<()> {
        self.video.stop(&mut self.drone)
    }

    pub fn video_state(&self) -> PipelineState {
        self.video.state()
    }

    /// The latest captured frame, if any.
    pub fn frame(&self) -> Option<VideoFrame> {
        self.video.frame()
    }

    pub fn video(&self) -> &VideoPipeline {
        &self.video
    }

    /// Stop video, if running, and close the control socket.
    pub fn close(&mut self) {
        if self.video.is_running() {
            if let Err(err) = self.video.stop(&mut self.drone) {
                warn!(error = %err, "video did not stop cleanly");
            }
        }
        self.drone.channel_mut().close();
    }
}
