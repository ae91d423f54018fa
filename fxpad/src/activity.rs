//! Idle tracking.

use embassy_time::{Duration, Instant};

/// Timestamp of the last tracked event, local or remote.
///
/// The core only records. The idle policy (screensaver, backlight dim)
/// lives with the embedder, which polls [`idle_duration`] at its own pace.
/// Remote command execution counts as activity just like a key press, so
/// a busy feed keeps the device awake. Shared as
/// `&RefCell<ActivityTracker>` under the single-task model.
///
/// [`idle_duration`]: ActivityTracker::idle_duration
pub struct ActivityTracker {
    last_event: Instant,
}

impl ActivityTracker {
    /// Tracker with the idle clock started now.
    pub fn new() -> Self {
        Self {
            last_event: Instant::now(),
        }
    }

    /// Record an activity event, resetting the idle clock.
    pub fn record_event(&mut self) {
        self.last_event = Instant::now();
    }

    /// Time elapsed since the last recorded event.
    pub fn idle_duration(&self) -> Duration {
        self.last_event.elapsed()
    }

    /// When the last event was recorded.
    pub fn last_event(&self) -> Instant {
        self.last_event
    }
}

impl Default for ActivityTracker {
    fn default() -> Self {
        Self::new()
    }
}
