//! Exposed channels shared between the engine, input collaborators and
//! event consumers.

use embassy_sync::channel::Channel;
use embassy_sync::pubsub::{PubSubChannel, Publisher, Subscriber};
pub use embassy_sync::{blocking_mutex, channel, pubsub};

use crate::event::{InputEvent, MacroEvent};
use crate::{
    INPUT_EVENT_CHANNEL_SIZE, MACRO_EVENT_CHANNEL_PUBS, MACRO_EVENT_CHANNEL_SIZE, MACRO_EVENT_CHANNEL_SUBS, RawMutex,
};

pub type MacroEventSub = Subscriber<
    'static,
    RawMutex,
    MacroEvent,
    MACRO_EVENT_CHANNEL_SIZE,
    MACRO_EVENT_CHANNEL_SUBS,
    MACRO_EVENT_CHANNEL_PUBS,
>;
pub type MacroEventPub = Publisher<
    'static,
    RawMutex,
    MacroEvent,
    MACRO_EVENT_CHANNEL_SIZE,
    MACRO_EVENT_CHANNEL_SUBS,
    MACRO_EVENT_CHANNEL_PUBS,
>;

/// Channel for input edges from the scanner/encoder collaborators
pub static INPUT_EVENT_CHANNEL: Channel<RawMutex, InputEvent, INPUT_EVENT_CHANNEL_SIZE> = Channel::new();
/// Channel for macro events to external consumers
pub static MACRO_EVENT_CHANNEL: PubSubChannel<
    RawMutex,
    MacroEvent,
    MACRO_EVENT_CHANNEL_SIZE,
    MACRO_EVENT_CHANNEL_SUBS,
    MACRO_EVENT_CHANNEL_PUBS,
> = PubSubChannel::new();

/// Send the specified `event` to `MACRO_EVENT_CHANNEL`.
pub fn publish_macro_event(publisher: &MacroEventPub, event: MacroEvent) {
    debug!("Publishing MacroEvent: {:?}", event);
    publisher.publish_immediate(event);
}

/// Send the specified `event` to `MACRO_EVENT_CHANNEL` through a one-shot
/// publisher. Do not use this if you publish repeatedly; hold a
/// [`MacroEventPub`] and use [`publish_macro_event`] instead.
pub fn publish_macro_event_new(event: MacroEvent) {
    if let Ok(publisher) = MACRO_EVENT_CHANNEL.publisher() {
        publish_macro_event(&publisher, event);
    }
}
