use std::fmt;

/// Lifecycle of the command connection.
///
/// Ordered: `Uninitialized < Ready < Flying`. A command requiring `Ready` is
/// also allowed while `Flying`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum ConnectionState {
    /// No successful handshake yet.
    #[default]
    Uninitialized,
    /// In SDK mode, on the ground.
    Ready,
    /// Airborne after a successful takeoff.
    Flying,
}

impl ConnectionState {
    pub fn as_str(self) -> &'static str {
        match self {
            ConnectionState::Uninitialized => "uninitialized",
            ConnectionState::Ready => "ready",
            ConnectionState::Flying => "flying",
        }
    }

    /// True if this state satisfies a `required` precondition.
    pub fn satisfies(self, required: ConnectionState) -> bool {
        match required {
            ConnectionState::Flying => self == ConnectionState::Flying,
            other => self >= other,
        }
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mission pad detection latch. Turns on once and never reverts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissionPadMode {
    #[default]
    Off,
    On,
}
