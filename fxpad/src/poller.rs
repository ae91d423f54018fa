//! Feed polling state machine.
//!
//! Runs on the dispatcher's task, never on its own. [`FeedPoller::wait_due`]
//! is the only part meant to be raced against input events; it just waits
//! for the next cadence deadline and is safe to drop. The actual network
//! work happens in [`FeedPoller::service`], which the dispatcher awaits to
//! completion, so a fetch or acknowledge is never cancelled halfway.
//!
//! Link recovery never gives up: a failed retry cycle parks the poller in
//! `Disconnected` and the next health check starts another cycle.

use core::cell::RefCell;
use core::sync::atomic::{AtomicU8, Ordering};

use embassy_time::{Instant, TimeoutError, Timer, with_timeout};
use heapless::Vec;

use crate::channel::{publish_macro_event, MacroEventPub};
use crate::config::FeedConfig;
use crate::event::{LinkState, MacroEvent};
use crate::feed::{FeedError, FeedItem, FeedSource, ItemId, FETCH_BATCH};
use crate::queue::{Command, CommandQueue};
use crate::COMMAND_QUEUE_SIZE;

/// Feed link state as last set by the poller, for synchronous readers
/// (status LED, display) outside the event stream.
static LINK_STATE: AtomicU8 = AtomicU8::new(LinkState::Disconnected as u8);

/// Current feed link state.
pub fn link_state() -> LinkState {
    LinkState::from(LINK_STATE.load(Ordering::Acquire))
}

/// Cadence work owed by the poller, handed out by [`FeedPoller::wait_due`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DueWork {
    /// The poll interval elapsed.
    Poll,
    /// The health check interval elapsed.
    HealthCheck,
}

/// Periodic fetch/acknowledge driver for a [`FeedSource`].
pub struct FeedPoller<'a, S: FeedSource, const N: usize = COMMAND_QUEUE_SIZE> {
    source: S,
    queue: &'a RefCell<CommandQueue<N>>,
    config: FeedConfig,
    state: LinkState,
    next_poll: Instant,
    next_health: Instant,
    backlog_drained: bool,
    events: MacroEventPub,
}

impl<'a, S: FeedSource, const N: usize> FeedPoller<'a, S, N> {
    pub fn new(
        source: S,
        queue: &'a RefCell<CommandQueue<N>>,
        config: FeedConfig,
        events: MacroEventPub,
    ) -> Self {
        let now = Instant::now();
        Self {
            source,
            queue,
            config,
            state: LinkState::Disconnected,
            next_poll: now + config.poll_interval,
            next_health: now + config.health_check_interval,
            backlog_drained: false,
            events,
        }
    }

    pub fn state(&self) -> LinkState {
        self.state
    }

    /// Initial session establishment, run once before the control loop.
    ///
    /// A failure is logged and leaves the poller disconnected; the health
    /// check cadence keeps retrying from there, so the device still comes
    /// up with its local keys working.
    pub async fn connect(&mut self) {
        self.set_state(LinkState::Connecting);
        match self.establish().await {
            Ok(()) => self.set_state(LinkState::Polling),
            Err(e) => {
                warn!("Initial feed connect failed: {:?}", e);
                self.set_state(LinkState::Disconnected);
            }
        }
    }

    /// Wait until the next cadence deadline and claim that work.
    ///
    /// Cancel-safe: dropping the future before it resolves leaves both
    /// deadlines untouched. When both are overdue the health check goes
    /// first; the poll fires on the next call.
    pub async fn wait_due(&mut self) -> DueWork {
        let next = if self.next_health <= self.next_poll {
            self.next_health
        } else {
            self.next_poll
        };
        Timer::at(next).await;

        let now = Instant::now();
        if self.next_health <= now {
            self.next_health = now + self.config.health_check_interval;
            DueWork::HealthCheck
        } else {
            self.next_poll = now + self.config.poll_interval;
            DueWork::Poll
        }
    }

    /// Perform one unit of claimed cadence work. Runs inline on the
    /// control loop; network waits block input handling like any other
    /// step of it.
    pub async fn service(&mut self, work: DueWork) {
        match work {
            DueWork::Poll => self.poll().await,
            DueWork::HealthCheck => self.health_check().await,
        }
    }

    async fn poll(&mut self) {
        if self.state != LinkState::Polling {
            debug!("Skipping poll while {:?}", self.state);
            return;
        }
        if let Err(e) = self.fetch_pending().await {
            warn!("Feed poll failed: {:?}", e);
            self.reconnect_cycle().await;
        }
    }

    async fn health_check(&mut self) {
        match self.state {
            LinkState::Polling => {
                match flatten(with_timeout(self.config.network_timeout, self.source.healthy()).await) {
                    Ok(true) => debug!("Feed link healthy"),
                    Ok(false) => {
                        warn!("Feed link reported unhealthy");
                        self.reconnect_cycle().await;
                    }
                    Err(e) => {
                        warn!("Feed health check failed: {:?}", e);
                        self.reconnect_cycle().await;
                    }
                }
            }
            LinkState::Disconnected => self.reconnect_cycle().await,
            _ => (),
        }
    }

    /// Fetch and take every currently pending item, oldest first.
    async fn fetch_pending(&mut self) -> Result<(), FeedError> {
        loop {
            let items = self.bounded_fetch().await?;
            if items.is_empty() {
                break;
            }
            self.set_state(LinkState::Draining);
            info!("Fetched {} feed items", items.len());
            for item in items {
                self.take_item(item).await?;
            }
        }
        self.set_state(LinkState::Polling);
        Ok(())
    }

    /// Queue one fetched item, then acknowledge it no matter what: a
    /// command dropped for lack of queue space is gone, not redelivered.
    async fn take_item(&mut self, item: FeedItem) -> Result<(), FeedError> {
        let id = item.id.clone();
        let label = item.value.clone();
        debug!(
            "Feed item {} -> {} (created at {})",
            id.as_str(),
            label.as_str(),
            item.created_at
        );

        let accepted = self.queue.borrow_mut().enqueue(Command::from_item(item));
        if accepted {
            let depth = self.queue.borrow().len() as u8;
            publish_macro_event(&self.events, MacroEvent::QueueDepth { depth });
        } else {
            publish_macro_event(&self.events, MacroEvent::QueueDrop { label });
        }

        self.bounded_ack(&id).await
    }

    /// Fixed-delay retry cycle: up to `retry_limit` attempts spaced
    /// `retry_delay` apart. Exhaustion parks the link in `Disconnected`
    /// until the next health check.
    async fn reconnect_cycle(&mut self) {
        self.set_state(LinkState::Reconnecting);
        for attempt in 1..=self.config.retry_limit {
            info!("Reconnect attempt {}/{}", attempt, self.config.retry_limit);
            match self.establish().await {
                Ok(()) => {
                    self.set_state(LinkState::Polling);
                    return;
                }
                Err(e) => {
                    warn!("Reconnect attempt {} failed: {:?}", attempt, e);
                    if attempt < self.config.retry_limit {
                        Timer::after(self.config.retry_delay).await;
                    }
                }
            }
        }
        warn!("Reconnect cycle exhausted, retrying on the next health check");
        self.set_state(LinkState::Disconnected);
    }

    /// Open the session. On the first success only, discard whatever
    /// piled up on the feed before this device was listening.
    async fn establish(&mut self) -> Result<(), FeedError> {
        flatten(with_timeout(self.config.network_timeout, self.source.connect()).await)?;
        if self.config.drain_backlog_on_connect && !self.backlog_drained {
            let discarded = self.drain_backlog().await?;
            if discarded > 0 {
                info!("Discarded {} stale feed items from before connect", discarded);
            }
            self.backlog_drained = true;
        }
        Ok(())
    }

    /// Acknowledge every pending item without queueing any of them.
    async fn drain_backlog(&mut self) -> Result<usize, FeedError> {
        let mut discarded = 0;
        loop {
            let items = self.bounded_fetch().await?;
            if items.is_empty() {
                return Ok(discarded);
            }
            for item in items {
                self.bounded_ack(&item.id).await?;
                discarded += 1;
            }
        }
    }

    async fn bounded_fetch(&mut self) -> Result<Vec<FeedItem, FETCH_BATCH>, FeedError> {
        flatten(with_timeout(self.config.network_timeout, self.source.fetch()).await)
    }

    async fn bounded_ack(&mut self, id: &ItemId) -> Result<(), FeedError> {
        flatten(with_timeout(self.config.network_timeout, self.source.acknowledge(id)).await)
    }

    fn set_state(&mut self, next: LinkState) {
        if next == self.state {
            return;
        }
        info!("Feed link {:?} -> {:?}", self.state, next);
        self.state = next;
        LINK_STATE.store(next as u8, Ordering::Release);
        publish_macro_event(&self.events, MacroEvent::Link(next));
    }
}

fn flatten<T>(result: Result<Result<T, FeedError>, TimeoutError>) -> Result<T, FeedError> {
    match result {
        Ok(inner) => inner,
        Err(TimeoutError) => Err(FeedError::Timeout),
    }
}
