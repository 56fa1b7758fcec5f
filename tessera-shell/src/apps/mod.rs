//! The shell's applications
//!
//! Each application is an [`tessera_core::AppDef`] over [`ShellEnv`],
//! its internal flow expressed as handler state functions.

mod about;
mod console;
mod root_menu;

pub use about::AboutApp;
pub use console::ConsoleApp;
pub use root_menu::RootMenuApp;
