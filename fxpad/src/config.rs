//! Tunable configuration for the engine.

use embassy_time::Duration;

/// Cadences and limits of the feed poller.
#[derive(Debug, Clone, Copy)]
pub struct FeedConfig {
    /// Interval between feed polls.
    pub poll_interval: Duration,
    /// Interval between link health checks.
    pub health_check_interval: Duration,
    /// Bound on every fetch/acknowledge/connect operation.
    pub network_timeout: Duration,
    /// Reconnect attempts per cycle. The cycle repeats on the next health
    /// check when all attempts fail.
    pub retry_limit: u8,
    /// Fixed delay between reconnect attempts. Not exponential.
    pub retry_delay: Duration,
    /// Acknowledge the backlog accumulated while offline without
    /// enqueueing it, on first connect.
    pub drain_backlog_on_connect: bool,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(2),
            health_check_interval: Duration::from_secs(30),
            network_timeout: Duration::from_secs(10),
            retry_limit: 3,
            retry_delay: Duration::from_secs(2),
            drain_backlog_on_connect: true,
        }
    }
}

/// Timing of synthesized key events inside macro sequences.
#[derive(Debug, Clone, Copy)]
pub struct MacroTimingConfig {
    /// How long a chord entry holds its keys before releasing them.
    pub chord_hold: Duration,
    /// Gap between synthesized press/release pairs in text injection, so
    /// consecutive reports are not coalesced by the host.
    pub text_tap_gap: Duration,
}

impl Default for MacroTimingConfig {
    fn default() -> Self {
        Self {
            chord_hold: Duration::from_millis(50),
            text_tap_gap: Duration::from_millis(2),
        }
    }
}
