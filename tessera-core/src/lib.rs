//! Display-agnostic application framework for Tessera
//!
//! This crate contains the pieces that do not depend on any display or
//! input hardware:
//!
//! - `AppDef`, the descriptor trait every sub-application implements
//! - `AppHandler`, a per-application state machine keyed by state-function
//!   identity
//! - `AppManager`, owner of the single live descriptor, mediating switches
//!   through a user-supplied resolver callback
//!
//! The shared environment (screens, input queues, clock) is an opaque type
//! parameter `E` threaded explicitly through every call; there are no
//! process-wide singletons.

#![no_std]
#![deny(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

pub mod app;
pub mod handler;
pub mod manager;

// Re-export key types
pub use app::{AppDef, APP_ID_NONE, NEXT_APP_DEFAULT};
pub use handler::{AppHandler, HandlerEvent, StateDriven, StateFn};
pub use manager::{AppManager, SwitchFn, SwitchRequest};
