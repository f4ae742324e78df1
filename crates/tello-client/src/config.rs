use std::time::Duration;

use tello_transport::TransportConfig;

/// How often a blocked wait wakes up to check for cancellation.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Floor applied to `poll_interval`.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Configuration for a command channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Control socket settings, including the reply timeout.
    pub transport: TransportConfig,
    /// Upper bound on the time between cancellation checks while waiting.
    /// Values below [`MIN_POLL_INTERVAL`] are raised to it.
    pub poll_interval: Duration,
    /// Reject commands that are invalid for the current connection state
    /// (e.g. `forward` before `takeoff`) without sending them.
    pub enforce_flight_state: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            transport: TransportConfig::default(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            enforce_flight_state: true,
        }
    }
}

impl ClientConfig {
    /// `poll_interval`, raised to [`MIN_POLL_INTERVAL`].
    pub fn effective_poll_interval(&self) -> Duration {
        self.poll_interval.max(MIN_POLL_INTERVAL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_poll_interval_is_raised() {
        let config = ClientConfig {
            poll_interval: Duration::ZERO,
            ..ClientConfig::default()
        };
        assert_eq!(config.effective_poll_interval(), MIN_POLL_INTERVAL);
        assert_eq!(
            ClientConfig::default().effective_poll_interval(),
            DEFAULT_POLL_INTERVAL
        );
    }
}
