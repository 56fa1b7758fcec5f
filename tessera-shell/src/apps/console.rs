//! Serial console viewer
//!
//! Streams received serial bytes onto the main screen through the escape
//! interpreter, so a remote device can clear, position and color its
//! output. Typed characters are echoed locally. Received text is kept in
//! a capture buffer exposed through the descriptor's query object - the
//! host's clipboard-copy path downcasts it to `String`.

use core::any::Any;

use alloc::string::String;

use tessera_core::{AppDef, AppHandler, HandlerEvent, StateDriven, SwitchRequest};
use tessera_term::{EscParser, TermAction};
use tessera_ui::KeyEvent;

use crate::env::ShellEnv;
use crate::switcher::app_id;

/// Capture buffer bound in bytes; the oldest text falls off
pub const CAPTURE_MAX: usize = 3072;

pub struct ConsoleApp {
    hndlr: AppHandler<Self, ShellEnv>,
    capture: String,
    /// Mirror parser classifying the byte stream, so only text that
    /// actually prints lands in the capture buffer
    classifier: EscParser,
    exit_code: Option<i32>,
}

impl StateDriven<ShellEnv> for ConsoleApp {
    fn handler(&mut self) -> &mut AppHandler<Self, ShellEnv> {
        &mut self.hndlr
    }
}

impl Default for ConsoleApp {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsoleApp {
    pub fn new() -> Self {
        Self {
            hndlr: AppHandler::new(),
            capture: String::new(),
            classifier: EscParser::new(),
            exit_code: None,
        }
    }

    /// Received text since entry, oldest first
    pub fn captured(&self) -> &str {
        &self.capture
    }

    fn capture_char(&mut self, ch: char) {
        self.capture.push(ch);
        if self.capture.len() > CAPTURE_MAX {
            let excess = self.capture.len() - CAPTURE_MAX;
            self.capture.drain(..excess);
        }
    }

    fn st_init(&mut self, env: &mut ShellEnv, ev: HandlerEvent, _arg: u32) {
        match ev {
            HandlerEvent::Setup => {
                let scr = &mut env.screens;
                scr.top.clear_screen();
                scr.top.put_str("Console");
                scr.status.clear_screen();
                scr.status.put_str("\nA long press: back to menu");
                scr.main.clear_screen();
            }
            HandlerEvent::Loop => {
                self.new_hndlr(env, Self::st_running, 0);
            }
            HandlerEvent::Exit => {}
        }
    }

    fn st_running(&mut self, env: &mut ShellEnv, ev: HandlerEvent, _arg: u32) {
        if ev != HandlerEvent::Loop {
            return;
        }

        // Serial bytes drive the screen through the escape interpreter.
        // The stream is ASCII; anything else shows as '?'
        while let Some(b) = env.uart.pop() {
            let ch = if b.is_ascii() { b as char } else { '?' };
            env.screens.main.putc(ch);
            match self.classifier.feed(ch) {
                Some(TermAction::Print(c)) => self.capture_char(c),
                Some(TermAction::Newline) => self.capture_char('\n'),
                _ => {}
            }
        }

        while let Some(key) = env.keys.pop() {
            match key {
                KeyEvent::ButtonALong => {
                    self.exit_code = Some(app_id::CONSOLE);
                }
                KeyEvent::Char(c) if c.is_ascii() => {
                    // Local echo; the transmit side is the host's business
                    env.screens.main.putc(c);
                }
                KeyEvent::Enter => {
                    env.screens.main.putc('\n');
                }
                _ => {}
            }
        }
    }
}

impl AppDef<ShellEnv> for ConsoleApp {
    fn setup(&mut self, env: &mut ShellEnv) {
        self.new_hndlr(env, Self::st_init, 0);
    }

    fn loop_tick(&mut self, env: &mut ShellEnv, req: &mut SwitchRequest) {
        self.hndlr_loop(env, 0);
        if let Some(code) = self.exit_code.take() {
            // Back to the root menu; the exit code restores our entry
            req.exit(code);
        }
    }

    fn teardown(&mut self, env: &mut ShellEnv) {
        self.shutdown(env);
    }

    fn query_obj(&self) -> Option<&dyn Any> {
        Some(&self.capture)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::format;

    fn booted() -> (ShellEnv, ConsoleApp, SwitchRequest) {
        let mut e = ShellEnv::new(320, 240);
        let mut app = ConsoleApp::new();
        app.setup(&mut e);
        let mut req = SwitchRequest::new();
        app.loop_tick(&mut e, &mut req); // st_init -> st_running
        (e, app, req)
    }

    #[test]
    fn test_stream_reaches_screen_and_capture() {
        let (mut e, mut app, mut req) = booted();

        e.uart.push_slice(b"ping \x1b[31mRED\x1b[0m ok");
        app.loop_tick(&mut e, &mut req);

        let text = e.screens.main.contents();
        assert!(text.contains("ping RED ok"));
        assert_eq!(app.captured(), "ping RED ok");
    }

    #[test]
    fn test_query_obj_exposes_capture() {
        let (mut e, mut app, mut req) = booted();
        e.uart.push_slice(b"copy me");
        app.loop_tick(&mut e, &mut req);

        let obj = app.query_obj().unwrap();
        let text = obj.downcast_ref::<String>().unwrap();
        assert_eq!(text, "copy me");
    }

    #[test]
    fn test_long_press_requests_menu() {
        let (mut e, mut app, mut req) = booted();
        e.keys.push(KeyEvent::ButtonALong);
        app.loop_tick(&mut e, &mut req);
        assert!(req.is_pending());
    }

    #[test]
    fn test_capture_is_bounded() {
        let (mut e, mut app, mut req) = booted();
        for chunk in 0..40 {
            e.uart.push_slice(format!("{chunk:0128}").as_bytes());
            app.loop_tick(&mut e, &mut req);
        }
        assert!(app.captured().len() <= CAPTURE_MAX);
    }
}
