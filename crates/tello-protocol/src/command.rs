use std::fmt;
use std::ops::RangeInclusive;

use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{ProtocolError, Result};
use crate::verbs::{
    self, Direction, FlipDirection, Query, Rotation, DEGREES_RANGE, DISTANCE_RANGE_CM,
};

/// One command argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Arg {
    Int(i64),
    Text(String),
}

impl fmt::Display for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arg::Int(value) => write!(f, "{value}"),
            Arg::Text(value) => f.write_str(value),
        }
    }
}

impl From<i32> for Arg {
    fn from(value: i32) -> Self {
        Arg::Int(value.into())
    }
}

impl From<&str> for Arg {
    fn from(value: &str) -> Self {
        Arg::Text(value.to_string())
    }
}

/// An SDK command: a verb plus zero or more arguments.
///
/// Immutable once built. The validated constructors reject out-of-range
/// arguments, so a `Command` for a movement or rotation always carries a
/// value the drone accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    verb: &'static str,
    args: Vec<Arg>,
}

impl Command {
    /// A bare command with no arguments.
    pub fn new(verb: &'static str) -> Self {
        Self {
            verb,
            args: Vec::new(),
        }
    }

    fn with_args(verb: &'static str, args: Vec<Arg>) -> Self {
        Self { verb, args }
    }

    /// `command`: enter SDK mode.
    pub fn handshake() -> Self {
        Self::new(verbs::HANDSHAKE)
    }

    pub fn takeoff() -> Self {
        Self::new(verbs::TAKEOFF)
    }

    pub fn land() -> Self {
        Self::new(verbs::LAND)
    }

    pub fn emergency() -> Self {
        Self::new(verbs::EMERGENCY)
    }

    pub fn stream_on() -> Self {
        Self::new(verbs::STREAM_ON)
    }

    pub fn stream_off() -> Self {
        Self::new(verbs::STREAM_OFF)
    }

    /// `mon`: enable mission pad detection.
    pub fn mission_pad_on() -> Self {
        Self::new(verbs::MISSION_PAD_ON)
    }

    pub fn query(query: Query) -> Self {
        Self::new(query.verb())
    }

    pub fn flip(direction: FlipDirection) -> Self {
        Self::with_args(verbs::FLIP, vec![direction.letter().into()])
    }

    /// Straight-line move of `centimeters` (20-500).
    pub fn movement(direction: Direction, centimeters: i32) -> Result<Self> {
        check_range("distance", centimeters, &DISTANCE_RANGE_CM)?;
        Ok(Self::with_args(direction.verb(), vec![centimeters.into()]))
    }

    /// Yaw rotation of `degrees` (1-360).
    pub fn rotation(rotation: Rotation, degrees: i32) -> Result<Self> {
        check_range("degrees", degrees, &DEGREES_RANGE)?;
        Ok(Self::with_args(rotation.verb(), vec![degrees.into()]))
    }

    /// The command word.
    pub fn verb(&self) -> &'static str {
        self.verb
    }

    pub fn args(&self) -> &[Arg] {
        &self.args
    }

    /// Wire size of the encoded command in bytes.
    pub fn wire_size(&self) -> usize {
        self.to_string().len()
    }

    /// Encode into `dst` as a single space-separated ASCII line.
    pub fn encode_into(&self, dst: &mut BytesMut) {
        let line = self.to_string();
        dst.reserve(line.len());
        dst.put_slice(line.as_bytes());
    }

    /// Encode into a new buffer.
    pub fn encode(&self) -> Bytes {
        let mut buf = BytesMut::new();
        self.encode_into(&mut buf);
        buf.freeze()
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.verb)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

fn check_range(name: &'static str, value: i32, range: &RangeInclusive<i32>) -> Result<()> {
    if range.contains(&value) {
        return Ok(());
    }
    Err(ProtocolError::InvalidArgument {
        name,
        value: value.into(),
        min: (*range.start()).into(),
        max: (*range.end()).into(),
    })
}
