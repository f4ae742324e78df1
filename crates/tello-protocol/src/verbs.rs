//! Command vocabulary.
//!
//! Verbs map one-to-one onto SDK command words. Movement distances are in
//! centimeters and rotations in degrees.

use std::ops::RangeInclusive;

/// Enter SDK mode.
pub const HANDSHAKE: &str = "command";
/// Take off and hover.
pub const TAKEOFF: &str = "takeoff";
/// Land.
pub const LAND: &str = "land";
/// Stop all motors immediately.
pub const EMERGENCY: &str = "emergency";
/// Flip in a direction.
pub const FLIP: &str = "flip";
/// Start the video stream on UDP 11111.
pub const STREAM_ON: &str = "streamon";
/// Stop the video stream.
pub const STREAM_OFF: &str = "streamoff";
/// Enable mission pad detection.
pub const MISSION_PAD_ON: &str = "mon";

/// Valid movement distance in centimeters.
pub const DISTANCE_RANGE_CM: RangeInclusive<i32> = 20..=500;

/// Valid rotation in degrees.
pub const DEGREES_RANGE: RangeInclusive<i32> = 1..=360;

/// Straight-line movement direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Forward,
    Back,
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    pub fn verb(self) -> &'static str {
        match self {
            Direction::Forward => "forward",
            Direction::Back => "back",
            Direction::Left => "left",
            Direction::Right => "right",
            Direction::Up => "up",
            Direction::Down => "down",
        }
    }
}

/// Yaw rotation direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rotation {
    Clockwise,
    Anticlockwise,
}

impl Rotation {
    pub fn verb(self) -> &'static str {
        match self {
            Rotation::Clockwise => "cw",
            Rotation::Anticlockwise => "ccw",
        }
    }
}

/// Flip direction, encoded as a single-letter argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlipDirection {
    Forward,
    Back,
    Left,
    Right,
}

impl FlipDirection {
    pub fn letter(self) -> &'static str {
        match self {
            FlipDirection::Forward => "f",
            FlipDirection::Back => "b",
            FlipDirection::Left => "l",
            FlipDirection::Right => "r",
        }
    }
}

/// Read-only sensor queries. Each verb ends in `?`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Query {
    /// Time-of-flight distance, replied as `<int>mm`.
    Tof,
    /// Battery percentage, replied as a bare integer.
    Battery,
    /// Detected mission pad id, replied as a bare integer.
    MissionPadId,
}

impl Query {
    pub fn verb(self) -> &'static str {
        match self {
            Query::Tof => "tof?",
            Query::Battery => "battery?",
            Query::MissionPadId => "mid?",
        }
    }
}
