//! Output capability traits driven by the interpreter.
//!
//! The core calls these; it never implements them. A USB build backs
//! [`Keyboard`]/[`ConsumerControl`]/[`Pointer`] with its HID writer, a
//! board with a speaker backs [`ToneGenerator`] with a PWM pin, and so
//! on. [`DummySink`] stands in for capabilities a device does not have.

use fxpad_types::keycode::KeyCode;
use fxpad_types::media::MediaKey;
use fxpad_types::pointer::PointerButtons;

/// Transport failure while emitting an output report.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SinkError {
    /// The transport is not connected (USB suspended, link dropped).
    Disconnected,
    /// The transport's outgoing buffer is full.
    BufferOverflow,
    /// The transport accepted the operation but failed to complete it.
    WriteFailed,
}

/// Keyboard key state.
pub trait Keyboard {
    /// Press the given keys, in order.
    async fn press(&mut self, codes: &[KeyCode]) -> Result<(), SinkError>;
    /// Release the given keys, in order.
    async fn release(&mut self, codes: &[KeyCode]) -> Result<(), SinkError>;
    /// Release every key currently held, whatever pressed them.
    async fn release_all(&mut self) -> Result<(), SinkError>;
}

/// Media (consumer page) control. `send` is single-shot: the sink emits
/// the usage and its release together.
pub trait ConsumerControl {
    async fn send(&mut self, key: MediaKey) -> Result<(), SinkError>;
}

/// Relative pointer.
pub trait Pointer {
    /// Replace the held button mask.
    async fn set_buttons(&mut self, buttons: PointerButtons) -> Result<(), SinkError>;
    /// One relative motion/wheel report.
    async fn move_rel(&mut self, dx: i8, dy: i8, wheel: i8) -> Result<(), SinkError>;
}

/// Square-wave tone output. Local hardware, infallible.
pub trait ToneGenerator {
    /// Set the oscillator frequency; 0 stops the tone.
    fn set_frequency(&mut self, frequency_hz: u16);
}

/// Audio clip playback. Fire-and-forget: the collaborator owns decoding
/// and mixing, failures stay on its side of the boundary.
pub trait AudioTrigger {
    fn play(&mut self, path: &str);
}

/// No-op stand-in for absent capabilities.
pub struct DummySink;

impl Keyboard for DummySink {
    async fn press(&mut self, _codes: &[KeyCode]) -> Result<(), SinkError> {
        Ok(())
    }

    async fn release(&mut self, _codes: &[KeyCode]) -> Result<(), SinkError> {
        Ok(())
    }

    async fn release_all(&mut self) -> Result<(), SinkError> {
        Ok(())
    }
}

impl ConsumerControl for DummySink {
    async fn send(&mut self, _key: MediaKey) -> Result<(), SinkError> {
        Ok(())
    }
}

impl Pointer for DummySink {
    async fn set_buttons(&mut self, _buttons: PointerButtons) -> Result<(), SinkError> {
        Ok(())
    }

    async fn move_rel(&mut self, _dx: i8, _dy: i8, _wheel: i8) -> Result<(), SinkError> {
        Ok(())
    }
}

impl ToneGenerator for DummySink {
    fn set_frequency(&mut self, _frequency_hz: u16) {}
}

impl AudioTrigger for DummySink {
    fn play(&mut self, _path: &str) {}
}
