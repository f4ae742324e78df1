//! Background video capture pipeline for Tello drones.
//!
//! After `streamon`, the drone sends its encoded video feed to UDP port
//! 11111, one access unit split across many datagrams. A
//! [`VideoPipeline`] runs a capture thread that pulls decoded frames from a
//! [`DecodeSession`] and publishes the most recent one to a shared
//! [`FrameBuffer`]. The command channel keeps working on its own socket in
//! the meantime.
//!
//! Decoding itself is a black box behind [`FrameDecoder`]; this crate only
//! reassembles access units and hands them over.

pub mod config;
pub mod decoder;
pub mod error;
pub mod frame;
pub mod pipeline;
pub mod session;
pub mod sink;

pub use config::{VideoConfig, DEFAULT_SEGMENT_SIZE, DEFAULT_VIDEO_ADDR};
pub use decoder::{DecodeSession, FrameDecoder, PassthroughDecoder, SessionFactory};
pub use error::{Result, VideoError};
pub use frame::{FrameBuffer, PixelFormat, VideoFrame};
pub use pipeline::{PipelineState, StreamControl, VideoPipeline};
pub use session::{AccessUnitAssembler, UdpSessionFactory, UdpVideoSession};
pub use sink::FrameSink;
