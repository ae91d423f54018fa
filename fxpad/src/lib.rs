//! Shared macro engine for pad devices: one action interpreter driven by
//! local key presses and by a polled remote command feed.
//!
//! The engine is strictly single-task. The [`dispatcher::Dispatcher`] loop
//! alternates between local input edges, the feed poller's cadence work and
//! draining the command queue; a running macro blocks all three, which is
//! what keeps the shared keyboard/pointer/tone state race-free without
//! locks.
//!
//! ## Feature flags
#![doc = document_features::document_features!()]
#![no_std]
#![allow(async_fn_in_trait)]

#[macro_use]
mod fmt;

pub mod action;
pub mod activity;
pub mod channel;
pub mod config;
pub mod controller;
pub mod dispatcher;
pub mod event;
pub mod feed;
pub mod interpreter;
pub mod poller;
pub mod queue;
pub mod sink;
pub mod store;

pub use fxpad_types as types;

/// Raw mutex type used by all static channels.
pub type RawMutex = embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;

/// Capacity of the remote command queue.
pub const COMMAND_QUEUE_SIZE: usize = 50;
/// Size of the input event channel.
pub const INPUT_EVENT_CHANNEL_SIZE: usize = 16;
/// Size of the macro event pub/sub channel.
pub const MACRO_EVENT_CHANNEL_SIZE: usize = 8;
/// Max subscribers of the macro event channel.
pub const MACRO_EVENT_CHANNEL_SUBS: usize = 4;
/// Max publishers of the macro event channel.
pub const MACRO_EVENT_CHANNEL_PUBS: usize = 4;
/// Slot triggered by an encoder press, after the 12 pad keys.
pub const ENCODER_SLOT: u8 = 12;

/// A long-running component of the device.
///
/// Implementors are driven as embassy tasks; the core itself runs the
/// whole engine as the single [`dispatcher::Dispatcher`] task.
pub trait Runnable {
    /// Run the component.
    async fn run(&mut self);
}
