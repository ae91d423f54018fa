//! Feed link status LED.
//!
//! Steady on while the feed session is up, blinking while a connect or
//! retry cycle runs, off while disconnected. The single-pin rendition of
//! the status colors the original device shows.

use embassy_time::Duration;
use embedded_hal::digital::StatefulOutputPin;

use super::{Controller, PollingController};
use crate::channel::MacroEventSub;
use crate::event::{LinkState, MacroEvent};

const BLINK_INTERVAL: Duration = Duration::from_millis(250);

pub struct LinkLedController<P: StatefulOutputPin> {
    pin: P,
    low_active: bool,
    state: LinkState,
    sub: MacroEventSub,
}

impl<P: StatefulOutputPin> LinkLedController<P> {
    pub fn new(pin: P, low_active: bool, sub: MacroEventSub) -> Self {
        let mut controller = Self {
            pin,
            low_active,
            state: LinkState::Disconnected,
            sub,
        };
        controller.apply();
        controller
    }

    fn set(&mut self, active: bool) {
        if active != self.low_active {
            self.pin.set_high().ok();
        } else {
            self.pin.set_low().ok();
        }
    }

    fn apply(&mut self) {
        match self.state {
            LinkState::Polling | LinkState::Draining => self.set(true),
            LinkState::Disconnected => self.set(false),
            // Transition states start lit; the poll tick blinks them.
            LinkState::Connecting | LinkState::Reconnecting => self.set(true),
        }
    }
}

impl<P: StatefulOutputPin> Controller for LinkLedController<P> {
    type Event = MacroEvent;

    async fn next_message(&mut self) -> MacroEvent {
        self.sub.next_message_pure().await
    }

    async fn process_event(&mut self, event: MacroEvent) {
        if let MacroEvent::Link(state) = event {
            self.state = state;
            self.apply();
        }
    }
}

impl<P: StatefulOutputPin> PollingController for LinkLedController<P> {
    fn interval(&self) -> Duration {
        BLINK_INTERVAL
    }

    async fn update(&mut self) {
        match self.state {
            LinkState::Connecting | LinkState::Reconnecting => {
                self.pin.toggle().ok();
            }
            _ => self.apply(),
        }
    }
}
