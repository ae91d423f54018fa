//! Macro definition store.
//!
//! Built once from the parsed definitions document, read-only afterwards.
//! Symbolic key and media names are resolved here against the static
//! tables; a name with no table entry drops that step (with a warning),
//! never the whole entry. Entries are addressable two ways: by label for
//! remote commands, by (page, slot) for the physical keys.

use embassy_time::Duration;
use fxpad_types::document::{
    Label, MacroDocument, MacroEntry, StepSpec, MACROS_PER_PAGE, MAX_PAGES, STEPS_PER_MACRO,
};
use fxpad_types::keycode::KeyCode;
use fxpad_types::media::MediaKey;
use fxpad_types::pointer::PointerButtons;
use heapless::index_map::FnvIndexMap;
use heapless::Vec;

use crate::action::MacroAction;

/// Label index capacity, next power of two above the entry limit.
pub const INDEX_CAPACITY: usize = (MAX_PAGES * MACROS_PER_PAGE).next_power_of_two();

/// Definitions document faults surfaced at load time.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// The document contains no usable entry at all.
    EmptyDocument,
    /// An entry carries an empty label and cannot be addressed.
    MissingLabel,
    /// A symbolic key or media name resolved against no table.
    UnknownName,
}

/// One loaded macro: identity plus its resolved action sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MacroDefinition {
    /// Identifier used in logs and events; the entry's label when the
    /// document gives no separate id.
    pub id: Label,
    /// The key remote commands are matched by.
    pub label: Label,
    /// Optional 0xRRGGBB display hint.
    pub color: Option<u32>,
    /// Steps in execution order.
    pub actions: Vec<MacroAction, STEPS_PER_MACRO>,
}

/// One page of definitions in slot order.
#[derive(Debug, Clone)]
pub struct MacroPage {
    pub name: Label,
    pub entries: Vec<MacroDefinition, MACROS_PER_PAGE>,
}

/// All loaded definitions, label-indexed and page-ordered.
pub struct MacroStore {
    pages: Vec<MacroPage, MAX_PAGES>,
    index: FnvIndexMap<Label, (u8, u8), INDEX_CAPACITY>,
}

impl MacroStore {
    /// Build the store from a parsed document.
    ///
    /// Bad entries are skipped and logged, good ones around them load
    /// normally. Only a document with nothing usable in it is an error.
    /// When two entries share a label, the later one wins the label
    /// lookup; both stay reachable through their (page, slot).
    pub fn from_document(doc: &MacroDocument) -> Result<Self, ConfigError> {
        let mut store = Self {
            pages: Vec::new(),
            index: FnvIndexMap::new(),
        };

        for page_spec in &doc.pages {
            let page_idx = store.pages.len() as u8;
            let mut page = MacroPage {
                name: page_spec.name.clone(),
                entries: Vec::new(),
            };
            for entry in &page_spec.entries {
                match resolve_entry(entry) {
                    Ok(def) => {
                        let slot = page.entries.len() as u8;
                        match store.index.insert(def.label.clone(), (page_idx, slot)) {
                            Ok(Some(_)) => {
                                warn!(
                                    "Duplicate macro label {}, the later definition wins",
                                    def.label.as_str()
                                );
                            }
                            Ok(None) => (),
                            Err(_) => {
                                warn!(
                                    "Macro index full, {} is not addressable by label",
                                    def.label.as_str()
                                );
                            }
                        }
                        page.entries.push(def).ok();
                    }
                    Err(e) => warn!("Skipping macro entry {}: {:?}", entry.label.as_str(), e),
                }
            }
            store.pages.push(page).ok();
        }

        if store.index.is_empty() {
            return Err(ConfigError::EmptyDocument);
        }
        info!(
            "Loaded {} macros across {} pages",
            store.index.len(),
            store.pages.len()
        );
        Ok(store)
    }

    /// Look up a definition by its label. A label too long to store can
    /// never match.
    pub fn get(&self, label: &str) -> Option<&MacroDefinition> {
        let key = Label::try_from(label).ok()?;
        let (page, slot) = self.index.get(&key)?;
        self.at(*page, *slot)
    }

    /// Look up a definition by page and slot.
    pub fn at(&self, page: u8, slot: u8) -> Option<&MacroDefinition> {
        self.pages.get(page as usize)?.entries.get(slot as usize)
    }

    pub fn page_count(&self) -> u8 {
        self.pages.len() as u8
    }

    /// Display name of a page.
    pub fn page_label(&self, page: u8) -> Option<&str> {
        self.pages.get(page as usize).map(|p| p.name.as_str())
    }

    /// Total number of loaded definitions.
    pub fn len(&self) -> usize {
        self.pages.iter().map(|p| p.entries.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn resolve_entry(entry: &MacroEntry) -> Result<MacroDefinition, ConfigError> {
    if entry.label.is_empty() {
        return Err(ConfigError::MissingLabel);
    }
    let id = entry.id.clone().unwrap_or_else(|| entry.label.clone());

    let mut actions = Vec::new();
    for step in &entry.steps {
        match resolve_step(step) {
            Ok(action) => {
                actions.push(action).ok();
            }
            Err(e) => warn!(
                "Skipping step in macro {}: {:?}",
                entry.label.as_str(),
                e
            ),
        }
    }

    Ok(MacroDefinition {
        id,
        label: entry.label.clone(),
        color: entry.color,
        actions,
    })
}

fn resolve_step(step: &StepSpec) -> Result<MacroAction, ConfigError> {
    match step {
        StepSpec::Key { name, pressed } => {
            let code = KeyCode::from_name(name).ok_or(ConfigError::UnknownName)?;
            Ok(MacroAction::Key {
                code,
                pressed: *pressed,
            })
        }
        StepSpec::Chord { names } => {
            let mut keys = Vec::new();
            for name in names {
                match KeyCode::from_name(name) {
                    Some(code) => {
                        keys.push(code).ok();
                    }
                    None => warn!("Unknown key name {} in chord", name.as_str()),
                }
            }
            if keys.is_empty() {
                return Err(ConfigError::UnknownName);
            }
            Ok(MacroAction::Chord(keys))
        }
        StepSpec::Delay { millis } => Ok(MacroAction::Delay(Duration::from_millis(*millis as u64))),
        StepSpec::Text { text } => Ok(MacroAction::Text(text.clone())),
        StepSpec::Media { name } => {
            let key = MediaKey::from_name(name).ok_or(ConfigError::UnknownName)?;
            Ok(MacroAction::Media(key))
        }
        StepSpec::Pointer {
            buttons,
            dx,
            dy,
            wheel,
        } => Ok(MacroAction::Pointer {
            buttons: PointerButtons::from_bits(*buttons),
            dx: *dx,
            dy: *dy,
            wheel: *wheel,
        }),
        StepSpec::Tone { frequency_hz } => Ok(MacroAction::Tone {
            frequency_hz: *frequency_hz,
        }),
        StepSpec::Sound { path } => Ok(MacroAction::Sound(path.clone())),
        StepSpec::Unknown => Ok(MacroAction::Unsupported),
    }
}
