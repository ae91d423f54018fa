//! Runtime representation of macro steps.

use embassy_time::Duration;
use fxpad_types::document::{CHORD_KEYS, PATH_LEN, TEXT_LEN};
use fxpad_types::keycode::KeyCode;
use fxpad_types::media::MediaKey;
use fxpad_types::pointer::PointerButtons;
use heapless::{String, Vec};

/// One fully resolved step of a macro sequence.
///
/// Built by [`crate::store::MacroStore`] from the document model: symbolic
/// key names become [`KeyCode`]s and millisecond delays become
/// [`Duration`]s. A closed set; the interpreter matches it exhaustively.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MacroAction {
    /// Press (`pressed == true`) or release one key.
    Key { code: KeyCode, pressed: bool },
    /// Press the keys in order, hold them together, release in reverse
    /// order. The hold time comes from the interpreter's timing config.
    Chord(Vec<KeyCode, CHORD_KEYS>),
    /// Block the whole control loop for the duration.
    Delay(Duration),
    /// Type text through the ASCII layout table, one press/release pair
    /// per character.
    Text(String<TEXT_LEN>),
    /// Single-shot media key, sent then auto-released.
    Media(MediaKey),
    /// One pointer report: button mask plus relative motion.
    Pointer {
        buttons: PointerButtons,
        dx: i8,
        dy: i8,
        wheel: i8,
    },
    /// Set the tone oscillator frequency; 0 stops it.
    Tone { frequency_hz: u16 },
    /// Fire-and-forget audio clip trigger.
    Sound(String<PATH_LEN>),
    /// A step this build cannot express; skipped with a warning at
    /// execution time.
    Unsupported,
}

impl MacroAction {
    /// Press step for `code`.
    pub const fn press(code: KeyCode) -> Self {
        MacroAction::Key { code, pressed: true }
    }

    /// Release step for `code`.
    pub const fn release(code: KeyCode) -> Self {
        MacroAction::Key { code, pressed: false }
    }
}
