//! Output-side collaborators driven by macro events.
//!
//! A controller owns a subscriber on [`crate::channel::MACRO_EVENT_CHANNEL`]
//! and reacts to what the engine publishes: link transitions, sequence
//! start/end, queue pressure, page changes. Controllers run as their own
//! tasks and never feed anything back into the engine.
//!
//! Event-driven controllers implement [`Controller`] and run
//! [`EventController::event_loop`]; ones that also need a periodic tick
//! (blink patterns) implement [`PollingController`] and run
//! [`PollingController::polling_loop`].

pub mod link_led;

use embassy_futures::select::{select, Either};
use embassy_time::{Duration, Instant, Timer};

/// One event consumer on the device event channel.
pub trait Controller {
    /// Type of the received events.
    type Event;

    /// Block until the next event of interest.
    async fn next_message(&mut self) -> Self::Event;

    /// React to one event.
    async fn process_event(&mut self, event: Self::Event);
}

/// Purely event-driven controllers.
pub trait EventController: Controller {
    /// Wait for events and process them, forever.
    async fn event_loop(&mut self) -> ! {
        loop {
            let event = self.next_message().await;
            self.process_event(event).await;
        }
    }
}

impl<T: Controller> EventController for T {}

/// Controllers that need a periodic tick besides events.
pub trait PollingController: Controller {
    /// Interval between [`Self::update`] calls.
    fn interval(&self) -> Duration;

    /// Called periodically, every [`Self::interval`].
    async fn update(&mut self);

    /// Process events and call `update()` at the configured interval.
    async fn polling_loop(&mut self) -> ! {
        let mut last = Instant::now();
        loop {
            let elapsed = last.elapsed();
            match select(
                Timer::after(self.interval().checked_sub(elapsed).unwrap_or(Duration::MIN)),
                self.next_message(),
            )
            .await
            {
                Either::First(_) => {
                    self.update().await;
                    last = Instant::now();
                }
                Either::Second(event) => self.process_event(event).await,
            }
        }
    }
}
