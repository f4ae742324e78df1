//! Tello SDK command encoding and reply parsing.
//!
//! Every command is a single ASCII line of space-separated tokens carried in
//! one UDP datagram, with no trailing delimiter. Replies are short text: a
//! status token (`ok`, `error ...`), a value with a unit suffix (`123mm`), or
//! a bare integer.
//!
//! Argument ranges are checked when a [`Command`] is built, so an invalid
//! command can never reach the wire.

pub mod command;
pub mod error;
pub mod response;
pub mod verbs;

pub use command::{Arg, Command};
pub use error::{ProtocolError, Result};
pub use response::Response;
pub use verbs::{
    Direction, FlipDirection, Query, Rotation, DEGREES_RANGE, DISTANCE_RANGE_CM,
};
