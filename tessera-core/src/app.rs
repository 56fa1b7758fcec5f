//! Application descriptor trait

use core::any::Any;

use crate::manager::SwitchRequest;

/// "No application requested" marker in a switch request
pub const APP_ID_NONE: i32 = 0;

/// Requests a return to the root/default application
pub const NEXT_APP_DEFAULT: i32 = -1;

/// A sub-application with a setup/loop lifecycle
///
/// Exactly one descriptor is live at a time, owned by
/// [`AppManager`](crate::manager::AppManager). `E` is the shared
/// environment (screens, input queues, clock) the integrator defines and
/// threads through every call.
///
/// A descriptor never aborts the process on an unrecoverable condition;
/// it requests a return to the default application through
/// [`SwitchRequest::exit`] instead.
pub trait AppDef<E> {
    /// Called once, right after the manager takes ownership
    fn setup(&mut self, env: &mut E);

    /// One cooperative tick; must not block
    ///
    /// Switch requests made through `req` are resolved by the manager
    /// only after this call returns.
    fn loop_tick(&mut self, env: &mut E, req: &mut SwitchRequest);

    /// Called by the manager before the descriptor is destroyed
    ///
    /// The one guaranteed cleanup hook: release attached resources and
    /// shut down any active handler state here.
    fn teardown(&mut self, _env: &mut E) {}

    /// Opaque object exposed for cross-application queries
    ///
    /// The host's clipboard-copy path downcasts this to whatever the
    /// concrete application publishes (a capture buffer, for instance).
    fn query_obj(&self) -> Option<&dyn Any> {
        None
    }
}
