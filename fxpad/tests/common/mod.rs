#![allow(dead_code)]

use core::cell::RefCell;
use core::future::Future;
use core::pin::pin;
use core::task::{Context, Poll, Waker};
use std::rc::Rc;

use embassy_time::{Duration, MockDriver};
use fxpad::action::MacroAction;
use fxpad::channel::{MacroEventSub, MACRO_EVENT_CHANNEL};
use fxpad::config::MacroTimingConfig;
use fxpad::event::{LinkState, MacroEvent};
use fxpad::feed::{FeedError, FeedItem, FeedSource, ItemId, FETCH_BATCH};
use fxpad::interpreter::Interpreter;
use fxpad::sink::{AudioTrigger, ConsumerControl, Keyboard, Pointer, SinkError, ToneGenerator};
use fxpad::store::MacroDefinition;
use fxpad::types::document::Label;
use fxpad::types::keycode::KeyCode;
use fxpad::types::media::MediaKey;
use fxpad::types::pointer::PointerButtons;

// Init logger for tests
#[ctor::ctor]
pub fn init_log() {
    let _ = env_logger::builder()
        .filter_level(log::LevelFilter::Debug)
        .is_test(true)
        .try_init();
}

/// Simulated time budget per test.
const MAX_TEST_TIMEOUT: Duration = Duration::from_secs(120);
/// Mock clock step taken whenever the future under test stalls.
const TIME_STEP: Duration = Duration::from_millis(1);

/// Drive a future to completion against the mock clock.
///
/// Every time the future returns `Pending`, simulated time advances one
/// step, which fires whichever timer is due next. The clock never moves
/// while the future is runnable, so delays take exactly their nominal
/// simulated duration. Panics when the future is still pending after
/// `MAX_TEST_TIMEOUT` of simulated time.
pub fn run_test<F: Future>(fut: F) -> F::Output {
    let mut fut = pin!(fut);
    let mut cx = Context::from_waker(Waker::noop());
    let mut spent = Duration::from_ticks(0);
    loop {
        match fut.as_mut().poll(&mut cx) {
            Poll::Ready(output) => return output,
            Poll::Pending => {
                if spent >= MAX_TEST_TIMEOUT {
                    panic!("Test timeout reached");
                }
                MockDriver::get().advance(TIME_STEP);
                spent += TIME_STEP;
            }
        }
    }
}

/// One recorded output call, in emission order across all sinks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkCall {
    Press(Vec<KeyCode>),
    Release(Vec<KeyCode>),
    ReleaseAll,
    Media(MediaKey),
    Buttons(u8),
    Move { dx: i8, dy: i8, wheel: i8 },
    Tone(u16),
    Sound(String),
}

/// Recording backend shared by every clone of a [`MockSink`].
#[derive(Default)]
pub struct SinkLog {
    /// Every call, in order.
    pub calls: Vec<SinkCall>,
    /// Keys currently held down.
    pub held: Vec<KeyCode>,
    /// Current pointer button mask.
    pub buttons: u8,
    /// Current tone frequency, 0 when silent.
    pub tone_hz: u16,
    /// Reject any press containing this key. The rejected call is not
    /// recorded, like a transport that never accepted it.
    pub fail_press_of: Option<KeyCode>,
    /// Reject release_all calls. The attempt is still recorded.
    pub fail_release_all: bool,
}

/// Implements every output capability over one shared [`SinkLog`], so a
/// test can hand clones to the interpreter and keep one for assertions.
#[derive(Clone, Default)]
pub struct MockSink {
    log: Rc<RefCell<SinkLog>>,
}

impl MockSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<SinkCall> {
        self.log.borrow().calls.clone()
    }

    /// Keyboard traffic only: press, release, release_all.
    pub fn key_calls(&self) -> Vec<SinkCall> {
        self.log
            .borrow()
            .calls
            .iter()
            .filter(|call| matches!(call, SinkCall::Press(_) | SinkCall::Release(_) | SinkCall::ReleaseAll))
            .cloned()
            .collect()
    }

    pub fn held(&self) -> Vec<KeyCode> {
        self.log.borrow().held.clone()
    }

    pub fn buttons(&self) -> u8 {
        self.log.borrow().buttons
    }

    pub fn tone_hz(&self) -> u16 {
        self.log.borrow().tone_hz
    }

    pub fn fail_press_of(&self, code: KeyCode) {
        self.log.borrow_mut().fail_press_of = Some(code);
    }

    pub fn fail_release_all(&self) {
        self.log.borrow_mut().fail_release_all = true;
    }
}

impl Keyboard for MockSink {
    async fn press(&mut self, codes: &[KeyCode]) -> Result<(), SinkError> {
        let mut log = self.log.borrow_mut();
        if let Some(bad) = log.fail_press_of {
            if codes.contains(&bad) {
                return Err(SinkError::WriteFailed);
            }
        }
        log.calls.push(SinkCall::Press(codes.to_vec()));
        for code in codes {
            if !log.held.contains(code) {
                log.held.push(*code);
            }
        }
        Ok(())
    }

    async fn release(&mut self, codes: &[KeyCode]) -> Result<(), SinkError> {
        let mut log = self.log.borrow_mut();
        log.calls.push(SinkCall::Release(codes.to_vec()));
        for code in codes {
            log.held.retain(|held| held != code);
        }
        Ok(())
    }

    async fn release_all(&mut self) -> Result<(), SinkError> {
        let mut log = self.log.borrow_mut();
        log.calls.push(SinkCall::ReleaseAll);
        if log.fail_release_all {
            return Err(SinkError::WriteFailed);
        }
        log.held.clear();
        Ok(())
    }
}

impl ConsumerControl for MockSink {
    async fn send(&mut self, key: MediaKey) -> Result<(), SinkError> {
        self.log.borrow_mut().calls.push(SinkCall::Media(key));
        Ok(())
    }
}

impl Pointer for MockSink {
    async fn set_buttons(&mut self, buttons: PointerButtons) -> Result<(), SinkError> {
        let mut log = self.log.borrow_mut();
        log.calls.push(SinkCall::Buttons(buttons.into_bits()));
        log.buttons = buttons.into_bits();
        Ok(())
    }

    async fn move_rel(&mut self, dx: i8, dy: i8, wheel: i8) -> Result<(), SinkError> {
        self.log.borrow_mut().calls.push(SinkCall::Move { dx, dy, wheel });
        Ok(())
    }
}

impl ToneGenerator for MockSink {
    fn set_frequency(&mut self, frequency_hz: u16) {
        let mut log = self.log.borrow_mut();
        log.calls.push(SinkCall::Tone(frequency_hz));
        log.tone_hz = frequency_hz;
    }
}

impl AudioTrigger for MockSink {
    fn play(&mut self, path: &str) {
        self.log.borrow_mut().calls.push(SinkCall::Sound(path.to_string()));
    }
}

/// Interpreter wired to five clones of the same mock sink, with default
/// timing and its own event publisher.
pub fn interpreter_over(sink: &MockSink) -> Interpreter<MockSink, MockSink, MockSink, MockSink, MockSink> {
    Interpreter::new(
        sink.clone(),
        sink.clone(),
        sink.clone(),
        sink.clone(),
        sink.clone(),
        MacroTimingConfig::default(),
        MACRO_EVENT_CHANNEL.publisher().unwrap(),
    )
}

/// Server-side state of a [`MockFeed`], shared by every clone.
#[derive(Default)]
pub struct FeedState {
    /// Items not yet acknowledged, oldest first.
    pub pending: Vec<FeedItem>,
    /// Every acknowledged id, in order, repeats included.
    pub acks: Vec<ItemId>,
    pub connect_calls: usize,
    pub fetch_calls: usize,
    pub health_calls: usize,
    /// Fail this many connect calls before succeeding again.
    pub fail_connects: usize,
    /// Fail this many fetch calls before succeeding again.
    pub fail_fetches: usize,
    /// Fail this many acknowledge calls before succeeding again.
    pub fail_acks: usize,
    /// Never resolve this many fetch calls, for timeout tests.
    pub hang_fetches: usize,
    /// Report `Ok(false)` from this many health probes.
    pub unhealthy_reports: usize,
    next_id: usize,
}

/// Scriptable in-memory feed. Fetch hands out pending items without
/// removing them; only acknowledge removes, so unacknowledged items are
/// redelivered like on the real source.
#[derive(Clone, Default)]
pub struct MockFeed {
    state: Rc<RefCell<FeedState>>,
}

impl MockFeed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> Rc<RefCell<FeedState>> {
        self.state.clone()
    }

    /// Append one pending item carrying `label`, returning its id.
    pub fn push(&self, label: &str) -> ItemId {
        let mut state = self.state.borrow_mut();
        state.next_id += 1;
        let mut id = ItemId::new();
        core::fmt::write(&mut id, format_args!("item-{}", state.next_id)).unwrap();
        let item = FeedItem {
            id: id.clone(),
            value: Label::try_from(label).unwrap(),
            created_at: state.next_id as u64,
        };
        state.pending.push(item);
        id
    }

    pub fn pending_len(&self) -> usize {
        self.state.borrow().pending.len()
    }

    pub fn acks(&self) -> Vec<ItemId> {
        self.state.borrow().acks.clone()
    }
}

impl FeedSource for MockFeed {
    async fn connect(&mut self) -> Result<(), FeedError> {
        let mut state = self.state.borrow_mut();
        state.connect_calls += 1;
        if state.fail_connects > 0 {
            state.fail_connects -= 1;
            return Err(FeedError::Transport);
        }
        Ok(())
    }

    async fn fetch(&mut self) -> Result<heapless::Vec<FeedItem, FETCH_BATCH>, FeedError> {
        {
            let mut state = self.state.borrow_mut();
            state.fetch_calls += 1;
            if state.fail_fetches > 0 {
                state.fail_fetches -= 1;
                return Err(FeedError::Transport);
            }
            if state.hang_fetches == 0 {
                let mut batch = heapless::Vec::new();
                for item in state.pending.iter().take(FETCH_BATCH) {
                    batch.push(item.clone()).ok();
                }
                return Ok(batch);
            }
            state.hang_fetches -= 1;
        }
        core::future::pending::<()>().await;
        Ok(heapless::Vec::new())
    }

    async fn acknowledge(&mut self, id: &ItemId) -> Result<(), FeedError> {
        let mut state = self.state.borrow_mut();
        if state.fail_acks > 0 {
            state.fail_acks -= 1;
            return Err(FeedError::Transport);
        }
        if let Some(pos) = state.pending.iter().position(|item| &item.id == id) {
            state.pending.remove(pos);
        }
        state.acks.push(id.clone());
        Ok(())
    }

    async fn healthy(&mut self) -> Result<bool, FeedError> {
        let mut state = self.state.borrow_mut();
        state.health_calls += 1;
        if state.unhealthy_reports > 0 {
            state.unhealthy_reports -= 1;
            return Ok(false);
        }
        Ok(true)
    }
}

/// Definition with the given label (doubling as its id) and steps.
pub fn definition(label: &str, actions: &[MacroAction]) -> MacroDefinition {
    MacroDefinition {
        id: Label::try_from(label).unwrap(),
        label: Label::try_from(label).unwrap(),
        color: None,
        actions: heapless::Vec::from_slice(actions).unwrap(),
    }
}

/// Chord step over the given keys.
pub fn chord(codes: &[KeyCode]) -> MacroAction {
    MacroAction::Chord(heapless::Vec::from_slice(codes).unwrap())
}

/// Collect everything currently readable from an event subscriber.
pub fn drain_events(sub: &mut MacroEventSub) -> Vec<MacroEvent> {
    let mut events = Vec::new();
    while let Some(event) = sub.try_next_message_pure() {
        events.push(event);
    }
    events
}

/// The link transitions among `events`, in order.
pub fn link_transitions(events: &[MacroEvent]) -> Vec<LinkState> {
    events
        .iter()
        .filter_map(|event| match event {
            MacroEvent::Link(state) => Some(*state),
            _ => None,
        })
        .collect()
}
