//! Screen construction and throttled refresh
//!
//! Three consoles share the one physical display: a one-line title bar,
//! the main screen applications draw on, and a short status band at the
//! bottom. Repaints are throttled to one pass per redraw budget so a
//! chatty application cannot saturate the link to the panel.

use core::fmt::Write as _;

use tessera_term::{CursorMode, FontRegistry, PixelSurface, Rect, Rgb565, SurfaceError, Term};

/// Minimum interval between repaint passes
pub const REFRESH_BUDGET_MS: u32 = 32;

/// Title bar geometry (cells)
pub const TOP_COLS: u16 = 64;
pub const TOP_ROWS: u16 = 1;

/// Main screen geometry (cells)
pub const MAIN_COLS: u16 = 64;
pub const MAIN_ROWS: u16 = 20;

/// Status band geometry (cells)
pub const STATUS_COLS: u16 = 64;
pub const STATUS_ROWS: u16 = 4;

/// Font ids the main screen cycles through
pub const FONT_CYCLE: [u8; 4] = [10, 11, 12, 13];

/// Font id of the fixed bars
pub const BAR_FONT: u8 = 1;

const TOP_BAND_PX: u16 = 18;
const STATUS_BAND_PX: u16 = 30;

/// The console set over one physical display
pub struct ScreenSet {
    /// Title bar
    pub top: Term,
    /// Main application screen
    pub main: Term,
    /// Status / diagnostics band
    pub status: Term,
    last_refresh_ms: u32,
    font_idx: usize,
    alt_colors: bool,
    default_fg: Rgb565,
    default_bg: Rgb565,
}

impl ScreenSet {
    /// Lay out the three consoles over a `width` x `height` panel
    pub fn new(width: u16, height: u16) -> Self {
        let main_px = height.saturating_sub(TOP_BAND_PX + STATUS_BAND_PX);

        let default_fg = Rgb565::new(250, 250, 250);
        let default_bg = Rgb565::new(90, 0, 50);

        let mut top = Term::new(TOP_COLS, TOP_ROWS, Rect::new(0, 0, width, TOP_BAND_PX));
        top.set_font(BAR_FONT);
        top.set_color(default_bg, default_fg); // inverted bar
        top.set_cursor(CursorMode::Hidden);

        let mut main = Term::new(
            MAIN_COLS,
            MAIN_ROWS,
            Rect::new(0, TOP_BAND_PX, width, main_px),
        );
        main.set_font(FONT_CYCLE[0]);
        main.set_color(default_fg, default_bg);
        main.set_cursor(CursorMode::Blink);

        let mut status = Term::new(
            STATUS_COLS,
            STATUS_ROWS,
            Rect::new(0, TOP_BAND_PX + main_px, width, STATUS_BAND_PX),
        );
        status.set_font(BAR_FONT);
        status.set_color(Rgb565::new(80, 80, 80), Rgb565::new(20, 20, 20));
        status.set_cursor(CursorMode::Hidden);

        Self {
            top,
            main,
            status,
            last_refresh_ms: 0,
            font_idx: 0,
            alt_colors: false,
            default_fg,
            default_bg,
        }
    }

    /// Repaint dirty lines of all screens, at most once per budget window
    pub fn check_for_refresh<S, R>(
        &mut self,
        surface: &mut S,
        fonts: &R,
        now_ms: u32,
    ) -> Result<(), SurfaceError>
    where
        S: PixelSurface,
        R: FontRegistry,
    {
        if now_ms.wrapping_sub(self.last_refresh_ms) > REFRESH_BUDGET_MS {
            let id = self.main.font_id();
            self.main.refresh(surface, fonts.font(id), now_ms)?;
            let id = self.status.font_id();
            self.status.refresh(surface, fonts.font(id), now_ms)?;
            let id = self.top.font_id();
            self.top.refresh(surface, fonts.font(id), now_ms)?;
            self.last_refresh_ms = now_ms;
        }
        Ok(())
    }

    /// Switch the main screen to the next font in the cycle
    ///
    /// Clears the screen; the active application redraws on its next tick.
    pub fn cycle_font(&mut self) {
        self.font_idx = (self.font_idx + 1) % FONT_CYCLE.len();
        let id = FONT_CYCLE[self.font_idx];

        self.main.set_font(id);
        self.main.clear_screen();

        self.status.clear_screen();
        let _ = write!(self.status, "\nFont: id={}", id);
    }

    /// Toggle the main screen between default and alternate colors
    pub fn toggle_color(&mut self) {
        self.alt_colors = !self.alt_colors;
        if self.alt_colors {
            self.main
                .set_color(Rgb565::new(255, 165, 0), Rgb565::new(0x20, 0x20, 0x20));
        } else {
            self.main.set_color(self.default_fg, self.default_bg);
        }
        self.main.clear_screen();
    }
}
