//! About screen
//!
//! Shows version information and returns to the menu on any key.

use core::fmt::Write as _;

use tessera_core::{AppDef, AppHandler, HandlerEvent, StateDriven, SwitchRequest};

use crate::env::ShellEnv;
use crate::switcher::app_id;

pub struct AboutApp {
    hndlr: AppHandler<Self, ShellEnv>,
    exit_code: Option<i32>,
}

impl StateDriven<ShellEnv> for AboutApp {
    fn handler(&mut self) -> &mut AppHandler<Self, ShellEnv> {
        &mut self.hndlr
    }
}

impl Default for AboutApp {
    fn default() -> Self {
        Self::new()
    }
}

impl AboutApp {
    pub fn new() -> Self {
        Self {
            hndlr: AppHandler::new(),
            exit_code: None,
        }
    }

    fn st_show(&mut self, env: &mut ShellEnv, ev: HandlerEvent, _arg: u32) {
        match ev {
            HandlerEvent::Setup => {
                let scr = &mut env.screens;
                scr.top.clear_screen();
                scr.top.put_str("About");
                scr.main.clear_screen();
                let _ = write!(
                    scr.main,
                    "Tessera {}\n\nConsole and menu framework\nfor small LCD boards\n\n\
                     any key: back to menu",
                    env!("CARGO_PKG_VERSION"),
                );
            }
            HandlerEvent::Loop => {
                if env.keys.pop().is_some() {
                    self.exit_code = Some(app_id::ABOUT);
                }
            }
            HandlerEvent::Exit => {}
        }
    }
}

impl AppDef<ShellEnv> for AboutApp {
    fn setup(&mut self, env: &mut ShellEnv) {
        self.new_hndlr(env, Self::st_show, 0);
    }

    fn loop_tick(&mut self, env: &mut ShellEnv, req: &mut SwitchRequest) {
        self.hndlr_loop(env, 0);
        if let Some(code) = self.exit_code.take() {
            req.exit(code);
        }
    }

    fn teardown(&mut self, env: &mut ShellEnv) {
        self.shutdown(env);
    }
}
