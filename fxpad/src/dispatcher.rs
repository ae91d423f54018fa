//! The single control loop tying everything together.
//!
//! One task owns the store, the interpreter with its sinks, the poller
//! and the queue. Local key edges, poller cadence work and queued remote
//! commands all take turns on this loop, one at a time; while a macro
//! runs (delays included), nothing else is serviced. That is the point:
//! with exactly one `&mut` path into the interpreter, two sequences can
//! never interleave on the shared output state.

use core::cell::RefCell;

use embassy_futures::select::{select, Either};

use crate::activity::ActivityTracker;
use crate::channel::{publish_macro_event, MacroEventPub, INPUT_EVENT_CHANNEL};
use crate::event::{InputEvent, MacroEvent};
use crate::feed::FeedSource;
use crate::interpreter::Interpreter;
use crate::poller::FeedPoller;
use crate::queue::{Command, CommandQueue};
use crate::sink::{AudioTrigger, ConsumerControl, Keyboard, Pointer, ToneGenerator};
use crate::store::MacroStore;
use crate::{Runnable, COMMAND_QUEUE_SIZE, ENCODER_SLOT};

/// Local dispatch plus the remote drain, one loop pass at a time.
pub struct Dispatcher<'a, K, C, P, T, A, S, const N: usize = COMMAND_QUEUE_SIZE>
where
    K: Keyboard,
    C: ConsumerControl,
    P: Pointer,
    T: ToneGenerator,
    A: AudioTrigger,
    S: FeedSource,
{
    store: MacroStore,
    interpreter: Interpreter<K, C, P, T, A>,
    poller: FeedPoller<'a, S, N>,
    queue: &'a RefCell<CommandQueue<N>>,
    activity: &'a RefCell<ActivityTracker>,
    page: u8,
    events: MacroEventPub,
}

impl<'a, K, C, P, T, A, S, const N: usize> Dispatcher<'a, K, C, P, T, A, S, N>
where
    K: Keyboard,
    C: ConsumerControl,
    P: Pointer,
    T: ToneGenerator,
    A: AudioTrigger,
    S: FeedSource,
{
    pub fn new(
        store: MacroStore,
        interpreter: Interpreter<K, C, P, T, A>,
        poller: FeedPoller<'a, S, N>,
        queue: &'a RefCell<CommandQueue<N>>,
        activity: &'a RefCell<ActivityTracker>,
        events: MacroEventPub,
    ) -> Self {
        Self {
            store,
            interpreter,
            poller,
            queue,
            activity,
            page: 0,
            events,
        }
    }

    /// The active page index.
    pub fn page(&self) -> u8 {
        self.page
    }

    /// Establish the feed session. Failure is non-fatal: the device comes
    /// up with local keys working and the poller retrying in background
    /// cadence.
    pub async fn connect(&mut self) {
        self.poller.connect().await;
    }

    /// One pass of the control loop: drain one queued command if any,
    /// otherwise wait for whichever comes first of a local input edge or
    /// the poller's next deadline.
    pub async fn step(&mut self) {
        let pending = self.queue.borrow_mut().dequeue();
        if let Some(command) = pending {
            let depth = self.queue.borrow().len() as u8;
            publish_macro_event(&self.events, MacroEvent::QueueDepth { depth });
            self.run_command(command).await;
            return;
        }

        match select(INPUT_EVENT_CHANNEL.receive(), self.poller.wait_due()).await {
            Either::First(event) => self.handle_input(event).await,
            Either::Second(work) => self.poller.service(work).await,
        }
    }

    async fn handle_input(&mut self, event: InputEvent) {
        // Every edge counts as activity, releases included.
        self.activity.borrow_mut().record_event();
        match event {
            InputEvent::Key { slot, pressed } => {
                if pressed {
                    self.run_slot(slot).await;
                }
            }
            InputEvent::EncoderTwist { clockwise } => self.rotate_page(clockwise),
            InputEvent::EncoderPress { pressed } => {
                if pressed {
                    self.run_slot(ENCODER_SLOT).await;
                }
            }
        }
    }

    async fn run_slot(&mut self, slot: u8) {
        match self.store.at(self.page, slot) {
            Some(def) => {
                // Errors are logged by the interpreter and non-fatal here.
                let _ = self.interpreter.execute(def).await;
            }
            None => debug!("No macro bound to page {} slot {}", self.page, slot),
        }
    }

    async fn run_command(&mut self, command: Command) {
        match self.store.get(command.label.as_str()) {
            Some(def) => {
                info!(
                    "Remote command {} -> macro {}",
                    command.id.as_str(),
                    def.id.as_str()
                );
                let _ = self.interpreter.execute(def).await;
                self.activity.borrow_mut().record_event();
            }
            None => {
                warn!(
                    "Label not found: {}, discarding remote command",
                    command.label.as_str()
                );
            }
        }
    }

    fn rotate_page(&mut self, clockwise: bool) {
        let count = self.store.page_count();
        if count < 2 {
            return;
        }
        self.page = if clockwise {
            (self.page + 1) % count
        } else {
            (self.page + count - 1) % count
        };
        info!(
            "Active page {} ({})",
            self.page,
            self.store.page_label(self.page).unwrap_or("")
        );
        publish_macro_event(&self.events, MacroEvent::PageChange { page: self.page });
    }
}

impl<'a, K, C, P, T, A, S, const N: usize> Runnable for Dispatcher<'a, K, C, P, T, A, S, N>
where
    K: Keyboard,
    C: ConsumerControl,
    P: Pointer,
    T: ToneGenerator,
    A: AudioTrigger,
    S: FeedSource,
{
    async fn run(&mut self) {
        self.connect().await;
        info!(
            "Dispatcher running: {} macros on {} pages",
            self.store.len(),
            self.store.page_count()
        );
        loop {
            self.step().await;
        }
    }
}
