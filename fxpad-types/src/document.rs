//! The parsed macro definitions document.
//!
//! The configuration collaborator owns file formats and schema validation;
//! what it hands the core is this already-parsed model. Key and media steps
//! still carry symbolic names at this stage; the core resolves them against
//! the static tables in [`crate::keycode`] and [`crate::media`] when the
//! definition store is built.

use heapless::{String, Vec};
use serde::{Deserialize, Serialize};

/// Max length of a label or symbolic identifier.
pub const LABEL_LEN: usize = 24;
/// Max length of a symbolic key or media name (`SCAN_PREVIOUS_TRACK` fits).
pub const NAME_LEN: usize = 24;
/// Max length of a text injection payload.
pub const TEXT_LEN: usize = 64;
/// Max length of an audio clip path.
pub const PATH_LEN: usize = 64;
/// Max steps per macro after expansion.
pub const STEPS_PER_MACRO: usize = 32;
/// Max keys in one chord entry.
pub const CHORD_KEYS: usize = 6;
/// Entries per page: 12 pad keys plus the encoder slot.
pub const MACROS_PER_PAGE: usize = 13;
/// Max pages in a document.
pub const MAX_PAGES: usize = 8;

pub type Label = String<LABEL_LEN>;
pub type KeyName = String<NAME_LEN>;

/// One parsed step of a macro entry.
///
/// `Key` and `Media` carry symbolic names; `Chord` is the shorthand form
/// (press every named key in order, hold, release in reverse). A parser
/// meeting a step kind it recognizes structurally but cannot express maps
/// it to `Unknown`; the interpreter later skips such steps with a warning
/// instead of rejecting the whole entry, so documents written for richer
/// devices still run their key steps on simpler ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(rename_all = "snake_case")]
pub enum StepSpec {
    Key { name: KeyName, pressed: bool },
    Chord { names: Vec<KeyName, CHORD_KEYS> },
    Delay { millis: u32 },
    Text { text: String<TEXT_LEN> },
    Media { name: KeyName },
    Pointer { buttons: u8, dx: i8, dy: i8, wheel: i8 },
    Tone { frequency_hz: u16 },
    Sound { path: String<PATH_LEN> },
    Unknown,
}

/// One labeled macro entry of a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MacroEntry {
    /// Symbolic identifier used in logs and events; defaults to the label
    /// when absent.
    pub id: Option<Label>,
    /// Lookup key for remote commands and display text for the local UI.
    pub label: Label,
    /// Optional 0xRRGGBB display hint for the key LED.
    pub color: Option<u32>,
    pub steps: Vec<StepSpec, STEPS_PER_MACRO>,
}

/// One page of entries bound to the physical keys, in slot order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PageSpec {
    pub name: Label,
    pub entries: Vec<MacroEntry, MACROS_PER_PAGE>,
}

/// The whole parsed definitions document, pages in rotation order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MacroDocument {
    pub pages: Vec<PageSpec, MAX_PAGES>,
}

impl MacroEntry {
    /// Entry with the given label and steps, no id override and no color.
    pub fn new(label: &str, steps: &[StepSpec]) -> Self {
        Self {
            id: None,
            label: Label::try_from(label).unwrap_or_default(),
            color: None,
            steps: Vec::from_slice(steps).unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn entry_builder_truncates_nothing_within_limits() {
        let entry = MacroEntry::new(
            "copy",
            &[StepSpec::Key {
                name: KeyName::try_from("LCtrl").unwrap(),
                pressed: true,
            }],
        );
        assert_eq!(entry.label.as_str(), "copy");
        assert_eq!(entry.steps.len(), 1);
        assert!(entry.id.is_none());
    }
}
