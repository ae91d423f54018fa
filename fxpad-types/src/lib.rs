//! # fxpad types
//!
//! Fundamental type definitions shared between the fxpad core and the
//! tooling around it.
//!
//! - [`keycode`] - HID keycode definitions, the symbolic name table and the
//!   ASCII layout table
//! - [`media`] - consumer-page (media control) usage codes
//! - [`pointer`] - pointer button state
//! - [`document`] - the parsed macro definitions document handed to the
//!   core by the configuration collaborator
//!
//! Configuration parsing produces these types; the core firmware logic
//! consumes them.

#![no_std]

pub mod document;
pub mod keycode;
pub mod media;
pub mod pointer;
