//! Reference shell for Tessera
//!
//! Wires the framework into a running menu system: a screen set split
//! over one pixel surface, a root menu application, a serial console
//! viewer, the application switcher, and the cooperative tick that the
//! host's main loop drives.
//!
//! The host (firmware main or desktop emulation layer) owns the pixel
//! surface, the font registry and the clock. Each iteration it decodes
//! input into [`ShellEnv::keys`] / [`ShellEnv::uart`] and calls
//! [`shell_tick`]; nothing in here blocks.

#![no_std]
#![deny(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

pub mod apps;
pub mod env;
pub mod screens;
pub mod switcher;
pub mod tick;

// Re-export key types
pub use apps::{AboutApp, ConsoleApp, RootMenuApp};
pub use env::{ByteQueue, ShellEnv};
pub use screens::{ScreenSet, REFRESH_BUDGET_MS};
pub use switcher::{app_id, change_app};
pub use tick::shell_tick;
