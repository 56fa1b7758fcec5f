//! Virtual console surface for Tessera
//!
//! This crate provides:
//! - `PixelSurface` trait for pixel-addressable drawing targets (LCD
//!   framebuffers, desktop emulation windows)
//! - `FontSource` trait for glyph bitmap lookup
//! - `Term`, a character-grid console with cursor, color and scroll state
//!   driven through a small escape-sequence subset
//!
//! # Architecture
//!
//! Applications write text (and escape sequences) into a `Term`. The grid
//! tracks which lines changed; `Term::refresh` repaints only those lines
//! through a `PixelSurface`, so the caller can throttle repaints to a fixed
//! budget. Hardware drivers and the desktop emulation layer implement
//! `PixelSurface` outside this crate - the console only blits glyphs.

#![no_std]
#![deny(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

pub mod backend;
pub mod cell;
pub mod escape;
pub mod term;

// Re-export key types
pub use backend::{
    BufferSurface, FontRegistry, FontSource, Glyph, PixelSurface, Rgb565, SurfaceError,
};
pub use cell::{Cell, CellAttrs};
pub use escape::{EscParser, TermAction};
pub use term::{CursorMode, Rect, Term, TermConfig};
