//! The cooperative tick
//!
//! The host's main loop runs a fixed sequence each iteration: decode
//! input into the environment queues, then call [`shell_tick`]. One tick
//! delivers one `loop_tick` to the active application and runs the
//! throttled screen refresh. Nothing here blocks; every delay in the
//! system is a timestamp comparison against `now_ms`.

use tessera_core::AppManager;
use tessera_term::{FontRegistry, PixelSurface, SurfaceError};

use crate::env::ShellEnv;

/// Run one iteration of the shell
///
/// `now_ms` is the host's monotonic millisecond clock; it drives the
/// selection settle timer, cursor blink and the refresh throttle.
pub fn shell_tick<S, R>(
    mgr: &mut AppManager<ShellEnv>,
    env: &mut ShellEnv,
    surface: &mut S,
    fonts: &R,
    now_ms: u32,
) -> Result<(), SurfaceError>
where
    S: PixelSurface,
    R: FontRegistry,
{
    env.now_ms = now_ms;
    mgr.loop_tick(env);
    env.screens.check_for_refresh(surface, fonts, now_ms)
}
