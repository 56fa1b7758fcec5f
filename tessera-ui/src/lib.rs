//! Console UI widgets for Tessera
//!
//! This crate provides:
//! - `KeyEvent` for unified keyboard and board-button input
//! - `KeyQueue`, a bounded FIFO decoupling input polling from consumption
//! - `ListView`, a keyboard-driven list-selection widget with page-aligned
//!   scrolling and a two-phase (armed -> confirmed) selection commit
//!
//! Widgets render through a `tessera_term::Term` by writing the same
//! escape subset applications use, so they need no privileged access to
//! the display.

#![no_std]
#![deny(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

pub mod keys;
pub mod listview;

// Re-export key types
pub use keys::{shortcut_index, KeyEvent, KeyQueue, SHORTCUT_KEYS};
pub use listview::{ListView, SELECT_SETTLE_MS};
