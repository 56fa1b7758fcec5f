//! Per-application state machine keyed by state-function identity
//!
//! There is no state enum: a state *is* a function, and the active state
//! is the stored function pointer. Transitions deliver an `Exit` event to
//! the outgoing state before the incoming state sees `Setup`, so no state
//! is ever abandoned without its cleanup running. All higher-level
//! per-application flow (menus, wizards) is expressed as chains of state
//! functions calling [`StateDriven::new_hndlr`] on themselves.
//!
//! ```
//! use tessera_core::{AppHandler, HandlerEvent, StateDriven};
//!
//! struct Wizard {
//!     hndlr: AppHandler<Wizard, ()>,
//!     done: bool,
//! }
//!
//! impl StateDriven<()> for Wizard {
//!     fn handler(&mut self) -> &mut AppHandler<Wizard, ()> {
//!         &mut self.hndlr
//!     }
//! }
//!
//! impl Wizard {
//!     fn st_first(&mut self, _ctx: &mut (), ev: HandlerEvent, _arg: u32) {
//!         if ev == HandlerEvent::Loop {
//!             self.new_hndlr(&mut (), Wizard::st_second, 0);
//!         }
//!     }
//!
//!     fn st_second(&mut self, _ctx: &mut (), ev: HandlerEvent, _arg: u32) {
//!         if ev == HandlerEvent::Setup {
//!             self.done = true;
//!         }
//!     }
//! }
//!
//! let mut w = Wizard { hndlr: AppHandler::new(), done: false };
//! w.new_hndlr(&mut (), Wizard::st_first, 0);
//! w.hndlr_loop(&mut (), 0);
//! assert!(w.done);
//! w.shutdown(&mut ());
//! ```

/// Pseudo-events delivered to a state function
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HandlerEvent {
    /// The state was just entered; the transition argument is passed along
    Setup,
    /// One cooperative tick while the state is active
    Loop,
    /// The state is being left (transition or teardown)
    Exit,
}

/// A state function: identity of the state and its behavior in one
pub type StateFn<T, C> = fn(&mut T, &mut C, HandlerEvent, u32);

/// Holds the active state function of one application
///
/// `T` is the owning application, `C` the context passed through to state
/// functions (the shared environment, typically).
pub struct AppHandler<T, C> {
    state: Option<StateFn<T, C>>,
}

impl<T, C> AppHandler<T, C> {
    pub const fn new() -> Self {
        Self { state: None }
    }

    /// True while a state is active
    pub fn is_active(&self) -> bool {
        self.state.is_some()
    }

    /// The active state function, for identity comparison
    pub fn current(&self) -> Option<StateFn<T, C>> {
        self.state
    }
}

impl<T, C> Default for AppHandler<T, C> {
    fn default() -> Self {
        Self::new()
    }
}

/// Drives an [`AppHandler`] embedded in `Self`
///
/// Implementors provide `handler()`; the transition and dispatch logic
/// comes with the trait. Call [`shutdown`](Self::shutdown) from the
/// application's teardown path so the final state receives `Exit`.
pub trait StateDriven<C>: Sized {
    /// Access the embedded handler
    fn handler(&mut self) -> &mut AppHandler<Self, C>;

    /// Transition to `next`
    ///
    /// The outgoing state receives `Exit` first - also when `next` is the
    /// same function, so re-entering a state re-runs its `Setup`. The new
    /// state then receives `Setup` with `arg`.
    fn new_hndlr(&mut self, ctx: &mut C, next: StateFn<Self, C>, arg: u32) {
        if let Some(prev) = self.handler().state.take() {
            prev(self, ctx, HandlerEvent::Exit, 0);
        }
        self.handler().state = Some(next);
        next(self, ctx, HandlerEvent::Setup, arg);
    }

    /// Deliver one `Loop` tick to the active state
    fn hndlr_loop(&mut self, ctx: &mut C, arg: u32) {
        if let Some(f) = self.handler().state {
            f(self, ctx, HandlerEvent::Loop, arg);
        }
    }

    /// Deliver `Exit` to the active state, exactly once
    ///
    /// Idempotent: a second call finds no active state and does nothing.
    fn shutdown(&mut self, ctx: &mut C) {
        if let Some(f) = self.handler().state.take() {
            f(self, ctx, HandlerEvent::Exit, 0);
        }
    }
}
