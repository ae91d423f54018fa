//! Event types crossing the engine's boundaries: input edges coming in
//! from the scanner/encoder collaborators, macro events going out to
//! display/LED collaborators.

use fxpad_types::document::Label;

/// A debounced input edge from the physical device.
///
/// Scanning and debouncing happen outside the core; whatever reads the
/// hardware sends these over [`crate::channel::INPUT_EVENT_CHANNEL`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InputEvent {
    /// Pad key edge. `slot` is the physical key index on the current page.
    Key { slot: u8, pressed: bool },
    /// One encoder detent. Rotates the active page.
    EncoderTwist { clockwise: bool },
    /// Encoder push switch edge. Bound to [`crate::ENCODER_SLOT`].
    EncoderPress { pressed: bool },
}

/// Feed link state, published on every transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum LinkState {
    /// No connection has been attempted yet.
    Disconnected = 0,
    /// Initial connect (or reconnect) in progress.
    Connecting = 1,
    /// Connected, waiting for the next poll tick.
    Polling = 2,
    /// Fetching and acknowledging a batch of feed items.
    Draining = 3,
    /// Health check or transfer failed, running the retry cycle.
    Reconnecting = 4,
}

impl From<u8> for LinkState {
    fn from(value: u8) -> Self {
        match value {
            1 => LinkState::Connecting,
            2 => LinkState::Polling,
            3 => LinkState::Draining,
            4 => LinkState::Reconnecting,
            _ => LinkState::Disconnected,
        }
    }
}

/// Events published on [`crate::channel::MACRO_EVENT_CHANNEL`] for
/// external collaborators (status LED, display, host glue). The core
/// never waits on consumers; slow subscribers lose old events.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MacroEvent {
    /// A macro sequence is about to run.
    SequenceStart { label: Label, color: Option<u32> },
    /// A macro sequence finished; `ok` is false when it aborted on a
    /// transmission error.
    SequenceEnd { label: Label, ok: bool },
    /// A remote command was rejected because the queue was full.
    QueueDrop { label: Label },
    /// Queue depth after an enqueue or dequeue.
    QueueDepth { depth: u8 },
    /// Feed link state transition.
    Link(LinkState),
    /// The active page changed (encoder twist).
    PageChange { page: u8 },
}
