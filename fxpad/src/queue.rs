//! Pending remote commands.

use embassy_time::Instant;
use fxpad_types::document::Label;
use heapless::Deque;

use crate::feed::{FeedItem, ItemId};
use crate::COMMAND_QUEUE_SIZE;

/// One remote command waiting its turn.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Command {
    /// Source-assigned item id, for logs.
    pub id: ItemId,
    /// Resolved against the definition store when dequeued.
    pub label: Label,
    /// When the poller queued it.
    pub enqueued_at: Instant,
}

impl Command {
    /// Command from a fetched feed item, stamped now.
    pub fn from_item(item: FeedItem) -> Self {
        Self {
            id: item.id,
            label: item.value,
            enqueued_at: Instant::now(),
        }
    }
}

/// Fixed-capacity FIFO of pending remote commands.
///
/// A plain single-owner structure with no internal locking: the producer
/// call site (poller) and consumer call site (dispatcher loop) live on
/// the same task and never run concurrently. When full, the incoming
/// command is rejected, never an already-queued one.
pub struct CommandQueue<const N: usize = COMMAND_QUEUE_SIZE> {
    items: Deque<Command, N>,
}

impl<const N: usize> CommandQueue<N> {
    pub const fn new() -> Self {
        Self { items: Deque::new() }
    }

    /// Append a command. Returns `false` and drops it when the queue is
    /// full.
    pub fn enqueue(&mut self, command: Command) -> bool {
        match self.items.push_back(command) {
            Ok(()) => {
                debug!("Remote command queued, depth {}", self.items.len());
                true
            }
            Err(rejected) => {
                warn!(
                    "Remote command queue full, dropping {}",
                    rejected.label.as_str()
                );
                false
            }
        }
    }

    /// Remove and return the oldest pending command.
    pub fn dequeue(&mut self) -> Option<Command> {
        self.items.pop_front()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.items.is_full()
    }
}
