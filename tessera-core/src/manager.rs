//! Owner of the single live application descriptor
//!
//! The manager holds exactly one boxed [`AppDef`] and mediates switches
//! between applications that know nothing about each other. A descriptor
//! requests a switch during its tick; the manager resolves it through the
//! registered switcher callback only *after* the tick returns, so a
//! descriptor is never destroyed while its own stack frame is live.

use alloc::boxed::Box;

use crate::app::{AppDef, APP_ID_NONE, NEXT_APP_DEFAULT};

/// Pending switch request, written by the running descriptor
///
/// Repeated [`exit`](Self::exit) calls within one tick overwrite each
/// other; the last one wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SwitchRequest {
    next_app: i32,
    exit_code: i32,
}

impl Default for SwitchRequest {
    fn default() -> Self {
        Self::new()
    }
}

impl SwitchRequest {
    /// An empty request with nothing pending
    pub fn new() -> Self {
        Self {
            next_app: APP_ID_NONE,
            exit_code: 0,
        }
    }

    /// Request a switch to the root/default application
    pub fn exit(&mut self, exit_code: i32) {
        self.exit_to(exit_code, NEXT_APP_DEFAULT);
    }

    /// Request a switch to a specific application id
    pub fn exit_to(&mut self, exit_code: i32, next_app: i32) {
        self.next_app = next_app;
        self.exit_code = exit_code;
    }

    /// True once any switch has been requested
    pub fn is_pending(&self) -> bool {
        self.next_app != APP_ID_NONE
    }
}

/// Resolves a requested application id to a concrete descriptor
///
/// Called from [`AppManager::loop_tick`] after the requesting tick has
/// returned. The callback constructs the next descriptor via
/// [`AppManager::new_app`] and returns the id it actually installed.
/// `requested == NEXT_APP_DEFAULT` means "no explicit id, pick the
/// default application".
pub type SwitchFn<E> = fn(
    mgr: &mut AppManager<E>,
    env: &mut E,
    requested: i32,
    previous: i32,
    exit_code: i32,
) -> i32;

/// Manager for sub-applications with a setup/loop lifecycle
pub struct AppManager<E> {
    the_app: Option<Box<dyn AppDef<E>>>,
    pending: SwitchRequest,
    app_sel: i32,
    change_app: Option<SwitchFn<E>>,
}

impl<E> AppManager<E> {
    pub fn new() -> Self {
        Self {
            the_app: None,
            pending: SwitchRequest::new(),
            app_sel: 0,
            change_app: None,
        }
    }

    /// Register the process-wide switch resolver; called once at boot
    pub fn setup(&mut self, change_app: SwitchFn<E>) {
        self.change_app = Some(change_app);
    }

    /// Install a new descriptor, replacing and destroying any previous one
    ///
    /// The outgoing descriptor's [`AppDef::teardown`] runs before the new
    /// descriptor is installed - teardown ordering is explicit, not left
    /// to drop order. The new descriptor's `setup` runs last. This is the
    /// only way a descriptor becomes live.
    pub fn new_app<T>(&mut self, env: &mut E, app: T)
    where
        T: AppDef<E> + 'static,
    {
        if let Some(mut old) = self.the_app.take() {
            old.teardown(env);
        }
        let mut boxed: Box<dyn AppDef<E>> = Box::new(app);
        boxed.setup(env);
        self.the_app = Some(boxed);
    }

    /// Deliver one tick to the live descriptor, then resolve any switch
    /// it requested
    ///
    /// With no registered switcher the current id falls back to 0.
    pub fn loop_tick(&mut self, env: &mut E) {
        if let Some(app) = self.the_app.as_mut() {
            app.loop_tick(env, &mut self.pending);
        }

        if self.pending.is_pending() {
            let requested = self.pending.next_app;
            let exit_code = self.pending.exit_code;
            let previous = self.app_sel;

            self.app_sel = match self.change_app {
                Some(change) => change(self, env, requested, previous, exit_code),
                None => 0,
            };
            self.pending = SwitchRequest::new();
        }
    }

    /// Request a switch from outside the running descriptor
    ///
    /// Takes effect after the next tick, like an in-tick request.
    pub fn set_next_app(&mut self, next_app: i32) {
        self.pending.next_app = next_app;
    }

    /// Id of the currently active application
    pub fn app_id(&self) -> i32 {
        self.app_sel
    }

    /// True while a descriptor is installed
    pub fn has_app(&self) -> bool {
        self.the_app.is_some()
    }

    /// The live descriptor, for cross-application queries
    pub fn query_appobj(&self) -> Option<&dyn AppDef<E>> {
        self.the_app.as_deref()
    }

    /// Tear down the live descriptor explicitly (process shutdown)
    pub fn shutdown(&mut self, env: &mut E) {
        if let Some(mut old) = self.the_app.take() {
            old.teardown(env);
        }
    }
}

impl<E> Default for AppManager<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::rc::Rc;
    use alloc::vec::Vec;
    use core::cell::RefCell;

    /// Shared journal standing in for the integrator's environment
    #[derive(Default)]
    struct Env {
        journal: Rc<RefCell<Vec<&'static str>>>,
        counter: u32,
    }

    impl Env {
        fn log(&self, s: &'static str) {
            self.journal.borrow_mut().push(s);
        }
    }

    struct FirstApp;

    impl AppDef<Env> for FirstApp {
        fn setup(&mut self, env: &mut Env) {
            env.log("first.setup");
        }

        fn loop_tick(&mut self, env: &mut Env, req: &mut SwitchRequest) {
            env.log("first.loop");
            req.exit_to(42, 2);
            // The switch must not happen until this tick has returned
            env.counter += 1;
        }

        fn teardown(&mut self, env: &mut Env) {
            env.log("first.teardown");
        }
    }

    struct SecondApp;

    impl AppDef<Env> for SecondApp {
        fn setup(&mut self, env: &mut Env) {
            env.log("second.setup");
        }

        fn loop_tick(&mut self, env: &mut Env, _req: &mut SwitchRequest) {
            env.log("second.loop");
        }

        fn teardown(&mut self, env: &mut Env) {
            env.log("second.teardown");
        }
    }

    fn switcher(
        mgr: &mut AppManager<Env>,
        env: &mut Env,
        requested: i32,
        _previous: i32,
        exit_code: i32,
    ) -> i32 {
        // The requesting tick ran to completion before we were called
        assert_eq!(env.counter, 1);
        assert_eq!(exit_code, 42);
        match requested {
            2 => {
                mgr.new_app(env, SecondApp);
                2
            }
            _ => {
                mgr.new_app(env, FirstApp);
                1
            }
        }
    }

    #[test]
    fn test_switch_is_deferred_and_ordered() {
        let mut env = Env::default();
        let mut mgr = AppManager::new();
        mgr.setup(switcher);
        mgr.new_app(&mut env, FirstApp);
        assert!(mgr.has_app());

        mgr.loop_tick(&mut env);
        assert_eq!(mgr.app_id(), 2);

        mgr.loop_tick(&mut env);
        assert_eq!(
            *env.journal.borrow(),
            [
                "first.setup",
                "first.loop",
                "first.teardown",
                "second.setup",
                "second.loop",
            ]
        );
    }

    #[test]
    fn test_no_switcher_falls_back_to_zero() {
        let mut env = Env::default();
        let mut mgr = AppManager::new();
        mgr.new_app(&mut env, FirstApp);

        mgr.loop_tick(&mut env);
        assert_eq!(mgr.app_id(), 0);
        mgr.loop_tick(&mut env);
        assert_eq!(mgr.app_id(), 0);
    }

    #[test]
    fn test_last_exit_call_wins() {
        struct Fickle;

        impl AppDef<Env> for Fickle {
            fn setup(&mut self, _env: &mut Env) {}

            fn loop_tick(&mut self, env: &mut Env, req: &mut SwitchRequest) {
                req.exit_to(1, 5);
                req.exit_to(9, 2);
                env.counter += 1;
            }
        }

        fn expect_last(
            mgr: &mut AppManager<Env>,
            env: &mut Env,
            requested: i32,
            _previous: i32,
            exit_code: i32,
        ) -> i32 {
            assert_eq!(requested, 2);
            assert_eq!(exit_code, 9);
            mgr.new_app(env, SecondApp);
            2
        }

        let mut env = Env::default();
        let mut mgr = AppManager::new();
        mgr.setup(expect_last);
        mgr.new_app(&mut env, Fickle);
        mgr.loop_tick(&mut env);
        assert_eq!(mgr.app_id(), 2);
    }

    #[test]
    fn test_exit_default_requests_root() {
        let mut req = SwitchRequest::new();
        assert!(!req.is_pending());
        req.exit(3);
        assert!(req.is_pending());

        struct ToRoot;

        impl AppDef<Env> for ToRoot {
            fn setup(&mut self, _env: &mut Env) {}

            fn loop_tick(&mut self, _env: &mut Env, req: &mut SwitchRequest) {
                req.exit(0);
            }
        }

        fn expect_default(
            mgr: &mut AppManager<Env>,
            env: &mut Env,
            requested: i32,
            _previous: i32,
            _exit_code: i32,
        ) -> i32 {
            assert_eq!(requested, NEXT_APP_DEFAULT);
            mgr.new_app(env, FirstApp);
            0
        }

        let mut env = Env::default();
        let mut mgr = AppManager::new();
        mgr.setup(expect_default);
        mgr.new_app(&mut env, ToRoot);
        mgr.loop_tick(&mut env);
        assert_eq!(mgr.app_id(), 0);
    }

    #[test]
    fn test_new_app_tears_down_outgoing_first() {
        let mut env = Env::default();
        let mut mgr = AppManager::new();
        mgr.new_app(&mut env, FirstApp);
        mgr.new_app(&mut env, SecondApp);

        assert_eq!(
            *env.journal.borrow(),
            ["first.setup", "first.teardown", "second.setup"]
        );
    }

    #[test]
    fn test_manager_shutdown_runs_teardown() {
        let mut env = Env::default();
        let mut mgr = AppManager::new();
        mgr.new_app(&mut env, FirstApp);
        mgr.shutdown(&mut env);
        assert!(!mgr.has_app());
        assert_eq!(*env.journal.borrow(), ["first.setup", "first.teardown"]);
    }

    #[test]
    fn test_set_next_app_switches_after_tick() {
        fn to_second(
            mgr: &mut AppManager<Env>,
            env: &mut Env,
            requested: i32,
            _previous: i32,
            _exit_code: i32,
        ) -> i32 {
            assert_eq!(requested, 2);
            mgr.new_app(env, SecondApp);
            2
        }

        let mut env = Env::default();
        let mut mgr = AppManager::new();
        mgr.setup(to_second);
        mgr.new_app(&mut env, SecondApp);
        mgr.set_next_app(2);
        mgr.loop_tick(&mut env);
        assert_eq!(mgr.app_id(), 2);
    }
}
