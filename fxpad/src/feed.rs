//! Remote command source contract.
//!
//! The source is an append-only feed owned by a network collaborator; the
//! core never opens sockets itself. [`crate::poller::FeedPoller`] drives
//! this trait on a fixed cadence and treats every error the same way:
//! log, tear the session down, reconnect.

use fxpad_types::document::Label;
use heapless::{String, Vec};

/// Max length of a source-assigned item id.
pub const ITEM_ID_LEN: usize = 32;
/// Most items a single `fetch` call hands back.
pub const FETCH_BATCH: usize = 8;

pub type ItemId = String<ITEM_ID_LEN>;

/// Failure talking to the command source.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FeedError {
    /// The operation did not complete in time.
    Timeout,
    /// The transport failed underneath the session.
    Transport,
    /// The source answered with something the client cannot use.
    Protocol,
}

/// One pending item on the feed.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FeedItem {
    /// Source-assigned identifier, echoed back in `acknowledge`.
    pub id: ItemId,
    /// The payload: a macro label.
    pub value: Label,
    /// Source-side creation time, epoch seconds. Opaque to the core,
    /// logged for diagnosis of stale backlogs.
    pub created_at: u64,
}

/// An ordered remote feed of macro labels.
///
/// Implementations hold the network session. Every operation must settle
/// eventually on its own; the poller additionally bounds each call with
/// its configured network timeout.
pub trait FeedSource {
    /// Establish or re-establish the session with the source.
    async fn connect(&mut self) -> Result<(), FeedError>;

    /// Fetch pending items, oldest first. An empty result is a normal
    /// quiet poll, not an error.
    async fn fetch(&mut self) -> Result<Vec<FeedItem, FETCH_BATCH>, FeedError>;

    /// Remove one item from the source so it is never handed out again.
    async fn acknowledge(&mut self, id: &ItemId) -> Result<(), FeedError>;

    /// Cheap link-health probe, `false` when the link is up but degraded.
    async fn healthy(&mut self) -> Result<bool, FeedError>;
}

/// Feed stand-in for devices without the remote path. Always connected,
/// never has items.
pub struct EmptyFeed;

impl FeedSource for EmptyFeed {
    async fn connect(&mut self) -> Result<(), FeedError> {
        Ok(())
    }

    async fn fetch(&mut self) -> Result<Vec<FeedItem, FETCH_BATCH>, FeedError> {
        Ok(Vec::new())
    }

    async fn acknowledge(&mut self, _id: &ItemId) -> Result<(), FeedError> {
        Ok(())
    }

    async fn healthy(&mut self) -> Result<bool, FeedError> {
        Ok(true)
    }
}
