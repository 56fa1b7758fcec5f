//! Root menu application
//!
//! The application the shell boots into and every other application
//! returns to. Presents the application list through a `ListView`;
//! confirming an entry requests a switch to that application. When an
//! application exits back here with its own id as the exit code, the
//! cursor is restored onto its menu entry.

use tessera_core::{AppDef, AppHandler, HandlerEvent, StateDriven, SwitchRequest};
use tessera_ui::{KeyEvent, ListView};

use crate::env::ShellEnv;
use crate::switcher::app_id;

pub struct RootMenuApp {
    hndlr: AppHandler<Self, ShellEnv>,
    menu: ListView<i32>,
    /// App id whose entry the cursor starts on (the app we came back from)
    restore_app: i32,
    /// Exit code pending delivery to the manager
    exit_req: Option<(i32, i32)>,
}

impl StateDriven<ShellEnv> for RootMenuApp {
    fn handler(&mut self) -> &mut AppHandler<Self, ShellEnv> {
        &mut self.hndlr
    }
}

impl RootMenuApp {
    /// `restore_app` is the exit code of the application that just
    /// returned control, 0 on first boot
    pub fn new(restore_app: i32) -> Self {
        Self {
            hndlr: AppHandler::new(),
            menu: ListView::new(),
            restore_app,
            exit_req: None,
        }
    }

    fn st_init(&mut self, env: &mut ShellEnv, ev: HandlerEvent, _arg: u32) {
        match ev {
            HandlerEvent::Setup => {
                let scr = &mut env.screens;
                scr.top.clear_screen();
                scr.top.put_str("Tessera");
                scr.status.clear_screen();
                scr.status
                    .put_str("\nUP/DOWN: move  ENTER: open\nB: font  C: color");
                scr.main.clear_screen();

                self.menu.clear();
                self.menu.push("Console", app_id::CONSOLE);
                self.menu.push("About", app_id::ABOUT);
                self.menu.attach_term(&scr.main);

                // Put the cursor back on the entry we returned from
                let mut start = 0;
                for i in 0..self.menu.len() {
                    if let Some((_, &tag)) = self.menu.get(i) {
                        if tag == self.restore_app {
                            start = i as i32;
                        }
                    }
                }
                self.menu.update_selection_absolute(&mut scr.main, start);
            }
            HandlerEvent::Loop => {
                self.new_hndlr(env, Self::st_browse, 0);
            }
            HandlerEvent::Exit => {}
        }
    }

    fn st_browse(&mut self, env: &mut ShellEnv, ev: HandlerEvent, _arg: u32) {
        if ev != HandlerEvent::Loop {
            return;
        }

        // Settle timer runs on every tick, not only on key arrival
        self.menu.tick(env.now_ms);

        while let Some(key) = env.keys.pop() {
            match key {
                KeyEvent::ButtonB => {
                    env.screens.cycle_font();
                    self.menu.render(&mut env.screens.main);
                }
                KeyEvent::ButtonC => {
                    env.screens.toggle_color();
                    self.menu.render(&mut env.screens.main);
                }
                k => {
                    self.menu.key_event(&mut env.screens.main, k, env.now_ms);
                }
            }
        }

        if self.menu.is_confirmed() {
            if let Some(&app) = self.menu.selected_tag() {
                self.exit_req = Some((0, app));
            }
            self.menu.reset_confirm();
        }
    }
}

impl AppDef<ShellEnv> for RootMenuApp {
    fn setup(&mut self, env: &mut ShellEnv) {
        self.new_hndlr(env, Self::st_init, 0);
    }

    fn loop_tick(&mut self, env: &mut ShellEnv, req: &mut SwitchRequest) {
        self.hndlr_loop(env, 0);
        if let Some((code, next)) = self.exit_req.take() {
            req.exit_to(code, next);
        }
    }

    fn teardown(&mut self, env: &mut ShellEnv) {
        self.shutdown(env);
    }
}
