//! The application switcher
//!
//! The one place that knows which application id maps to which concrete
//! descriptor. Registered with the manager at boot; every switch request
//! lands here after the requesting tick has returned.

use tessera_core::AppManager;

use crate::apps::{AboutApp, ConsoleApp, RootMenuApp};
use crate::env::ShellEnv;

/// Application ids
pub mod app_id {
    /// Root menu; also the default target
    pub const ROOT: i32 = 0;
    pub const CONSOLE: i32 = 1;
    pub const ABOUT: i32 = 2;
}

/// Resolve a requested application id, installing the next descriptor
///
/// Unknown ids and the default request fall back to the root menu, which
/// receives the exit code so it can restore the cursor onto the entry of
/// the application that just returned.
#[cfg_attr(not(feature = "defmt"), allow(unused_variables))]
pub fn change_app(
    mgr: &mut AppManager<ShellEnv>,
    env: &mut ShellEnv,
    requested: i32,
    previous: i32,
    exit_code: i32,
) -> i32 {
    #[cfg(feature = "defmt")]
    defmt::debug!(
        "app switch: requested={} previous={} exit_code={}",
        requested,
        previous,
        exit_code
    );

    match requested {
        app_id::CONSOLE => {
            mgr.new_app(env, ConsoleApp::new());
            app_id::CONSOLE
        }
        app_id::ABOUT => {
            mgr.new_app(env, AboutApp::new());
            app_id::ABOUT
        }
        _ => {
            mgr.new_app(env, RootMenuApp::new(exit_code));
            app_id::ROOT
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessera_core::NEXT_APP_DEFAULT;

    #[test]
    fn test_known_ids_resolve() {
        let mut env = ShellEnv::new(320, 240);
        let mut mgr = AppManager::new();

        assert_eq!(
            change_app(&mut mgr, &mut env, app_id::CONSOLE, 0, 0),
            app_id::CONSOLE
        );
        assert!(mgr.has_app());
        assert_eq!(
            change_app(&mut mgr, &mut env, app_id::ABOUT, 0, 0),
            app_id::ABOUT
        );
    }

    #[test]
    fn test_default_and_unknown_fall_back_to_root() {
        let mut env = ShellEnv::new(320, 240);
        let mut mgr = AppManager::new();

        assert_eq!(
            change_app(&mut mgr, &mut env, NEXT_APP_DEFAULT, 0, 0),
            app_id::ROOT
        );
        assert_eq!(change_app(&mut mgr, &mut env, 77, 0, 0), app_id::ROOT);
    }
}
