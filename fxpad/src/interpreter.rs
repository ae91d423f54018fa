//! Macro sequence execution.
//!
//! One interpreter instance drives the whole output sink set. Both the
//! local key path and the remote command path run through the same
//! `&mut self` entry point, so two sequences can never interleave on the
//! shared keyboard, pointer and tone state.
//!
//! Whatever happens mid-sequence, control returns with nothing held: keys
//! released, pointer buttons cleared, tone stopped. A transmission failure
//! aborts the remaining steps but still runs that cleanup, and is reported
//! to the caller as non-fatal.

use embassy_time::Timer;
use fxpad_types::keycode::{self, KeyCode};
use fxpad_types::pointer::PointerButtons;

use crate::action::MacroAction;
use crate::channel::{publish_macro_event, MacroEventPub};
use crate::config::MacroTimingConfig;
use crate::event::MacroEvent;
use crate::sink::{AudioTrigger, ConsumerControl, Keyboard, Pointer, SinkError, ToneGenerator};
use crate::store::MacroDefinition;

/// Why a sequence stopped early.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ExecuteError {
    /// An output sink rejected an operation; the remaining steps were
    /// abandoned.
    Sink(SinkError),
}

impl From<SinkError> for ExecuteError {
    fn from(e: SinkError) -> Self {
        ExecuteError::Sink(e)
    }
}

/// Executes one macro definition at a time against the output sinks.
pub struct Interpreter<K: Keyboard, C: ConsumerControl, P: Pointer, T: ToneGenerator, A: AudioTrigger> {
    keyboard: K,
    media: C,
    pointer: P,
    tone: T,
    audio: A,
    timing: MacroTimingConfig,
    events: MacroEventPub,
}

impl<K: Keyboard, C: ConsumerControl, P: Pointer, T: ToneGenerator, A: AudioTrigger>
    Interpreter<K, C, P, T, A>
{
    pub fn new(
        keyboard: K,
        media: C,
        pointer: P,
        tone: T,
        audio: A,
        timing: MacroTimingConfig,
        events: MacroEventPub,
    ) -> Self {
        Self {
            keyboard,
            media,
            pointer,
            tone,
            audio,
            timing,
            events,
        }
    }

    /// Run one definition to completion.
    ///
    /// Steps run in order; a `Delay` blocks the calling loop for its whole
    /// duration. On return, success or not, no key or button is held and
    /// the tone is stopped.
    pub async fn execute(&mut self, def: &MacroDefinition) -> Result<(), ExecuteError> {
        info!("Executing macro {}", def.id.as_str());
        publish_macro_event(
            &self.events,
            MacroEvent::SequenceStart {
                label: def.label.clone(),
                color: def.color,
            },
        );

        let steps = self.run_steps(&def.actions).await;
        let cleanup = self.release_everything().await;
        // The step error is the interesting one; a cleanup failure only
        // surfaces when the steps themselves went through.
        let outcome = match (steps, cleanup) {
            (Err(e), _) => Err(e),
            (Ok(()), Err(e)) => Err(ExecuteError::Sink(e)),
            (Ok(()), Ok(())) => Ok(()),
        };

        if let Err(e) = outcome {
            warn!("Macro {} aborted: {:?}", def.id.as_str(), e);
        }
        publish_macro_event(
            &self.events,
            MacroEvent::SequenceEnd {
                label: def.label.clone(),
                ok: outcome.is_ok(),
            },
        );
        outcome
    }

    async fn run_steps(&mut self, actions: &[MacroAction]) -> Result<(), ExecuteError> {
        for action in actions {
            match action {
                MacroAction::Key { code, pressed } => {
                    if *pressed {
                        self.keyboard.press(&[*code]).await?;
                    } else {
                        self.keyboard.release(&[*code]).await?;
                    }
                }
                MacroAction::Chord(keys) => {
                    for code in keys {
                        self.keyboard.press(&[*code]).await?;
                    }
                    Timer::after(self.timing.chord_hold).await;
                    for code in keys.iter().rev() {
                        self.keyboard.release(&[*code]).await?;
                    }
                }
                MacroAction::Delay(duration) => {
                    // The device's only timer primitive. Blocks the whole
                    // control loop, input and polling included.
                    Timer::after(*duration).await;
                }
                MacroAction::Text(text) => self.type_text(text).await?,
                MacroAction::Media(key) => self.media.send(*key).await?,
                MacroAction::Pointer {
                    buttons,
                    dx,
                    dy,
                    wheel,
                } => {
                    self.pointer.set_buttons(*buttons).await?;
                    if *dx != 0 || *dy != 0 || *wheel != 0 {
                        self.pointer.move_rel(*dx, *dy, *wheel).await?;
                    }
                }
                MacroAction::Tone { frequency_hz } => self.tone.set_frequency(*frequency_hz),
                MacroAction::Sound(path) => self.audio.play(path),
                MacroAction::Unsupported => warn!("Skipping unsupported macro step"),
            }
        }
        Ok(())
    }

    /// Per-character press+release through the ascii layout table.
    /// Unmapped characters are skipped, the rest of the text still types.
    async fn type_text(&mut self, text: &str) -> Result<(), ExecuteError> {
        for ch in text.chars() {
            if !ch.is_ascii() {
                warn!("Text step: skipping non-ascii character");
                continue;
            }
            let (code, shift) = keycode::from_ascii(ch as u8);
            if code == KeyCode::No {
                warn!("Text step: no keycode for character 0x{:x}", ch as u8);
                continue;
            }
            if shift {
                self.keyboard.press(&[KeyCode::LShift, code]).await?;
                self.keyboard.release(&[code, KeyCode::LShift]).await?;
            } else {
                self.keyboard.press(&[code]).await?;
                self.keyboard.release(&[code]).await?;
            }
            Timer::after(self.timing.text_tap_gap).await;
        }
        Ok(())
    }

    /// The guaranteed cleanup path. Every sink that holds state gets its
    /// reset attempted even when an earlier one fails.
    async fn release_everything(&mut self) -> Result<(), SinkError> {
        self.tone.set_frequency(0);
        let keyboard = self.keyboard.release_all().await;
        let pointer = self.pointer.set_buttons(PointerButtons::new()).await;
        keyboard.and(pointer)
    }
}
