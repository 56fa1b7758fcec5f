//! The character-grid console
//!
//! A `Term` owns a cols x rows grid of cells, a cursor, the current write
//! attributes and per-line dirty flags. Applications write text and escape
//! sequences into it; `refresh` repaints dirty lines through a
//! [`PixelSurface`] using glyphs from a [`FontSource`].
//!
//! The grid is deliberately decoupled from pixel geometry: a 64-column
//! console over a 320 px panel simply clips the columns that do not fit,
//! so the same application text works across panel sizes and fonts.

use core::fmt;

use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;

use crate::backend::{FontSource, PixelSurface, Rgb565, SurfaceError, ANSI_PALETTE};
use crate::cell::{Cell, CellAttrs};
use crate::escape::{EscParser, TermAction};

/// Cursor display mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CursorMode {
    /// No cursor drawn
    #[default]
    Hidden,
    /// Solid reversed cell
    Block,
    /// Reversed cell on alternating 500 ms phases
    Blink,
}

/// Pixel viewport of a console on its surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    pub x: u16,
    pub y: u16,
    pub w: u16,
    pub h: u16,
}

impl Rect {
    pub const fn new(x: u16, y: u16, w: u16, h: u16) -> Self {
        Self { x, y, w, h }
    }
}

/// Resolved console configuration
///
/// Produced by whatever owns settings persistence; the console itself
/// never reads or writes preferences.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TermConfig {
    pub cols: u16,
    pub rows: u16,
    pub viewport: Rect,
    pub fg: Rgb565,
    pub bg: Rgb565,
    pub font_id: u8,
    pub cursor: CursorMode,
}

/// Character-grid console bound to a pixel viewport
pub struct Term {
    cols: u16,
    rows: u16,
    cells: Vec<Cell>,
    cur_col: u16,
    cur_row: u16,
    attrs: CellAttrs,
    fg: Rgb565,
    bg: Rgb565,
    cursor_mode: CursorMode,
    font_id: u8,
    viewport: Rect,
    dirty: Vec<bool>,
    parser: EscParser,
    blink_phase: bool,
}

impl Term {
    /// Create a console of `cols` x `rows` cells over a pixel viewport
    ///
    /// `cols` and `rows` are clamped to at least 1.
    pub fn new(cols: u16, rows: u16, viewport: Rect) -> Self {
        let cols = cols.max(1);
        let rows = rows.max(1);
        Self {
            cols,
            rows,
            cells: vec![Cell::BLANK; cols as usize * rows as usize],
            cur_col: 0,
            cur_row: 0,
            attrs: CellAttrs::default(),
            fg: Rgb565::WHITE,
            bg: Rgb565::BLACK,
            cursor_mode: CursorMode::Hidden,
            font_id: 0,
            viewport,
            dirty: vec![true; rows as usize],
            parser: EscParser::new(),
            blink_phase: false,
        }
    }

    /// Create a console from a resolved configuration
    pub fn with_config(cfg: &TermConfig) -> Self {
        let mut t = Self::new(cfg.cols, cfg.rows, cfg.viewport);
        t.fg = cfg.fg;
        t.bg = cfg.bg;
        t.font_id = cfg.font_id;
        t.cursor_mode = cfg.cursor;
        t
    }

    /// Grid width in cells
    pub fn cols(&self) -> u16 {
        self.cols
    }

    /// Grid height in cells
    pub fn rows(&self) -> u16 {
        self.rows
    }

    /// Current cursor position (col, row)
    pub fn cursor(&self) -> (u16, u16) {
        (self.cur_col, self.cur_row)
    }

    /// Active font id; rendering resolves it to a [`FontSource`] elsewhere
    pub fn font_id(&self) -> u8 {
        self.font_id
    }

    /// Select the font id, effective at the next repaint
    pub fn set_font(&mut self, id: u8) {
        if self.font_id != id {
            self.font_id = id;
            self.mark_all_dirty();
        }
    }

    /// Set default foreground/background colors, effective at next repaint
    pub fn set_color(&mut self, fg: Rgb565, bg: Rgb565) {
        if self.fg != fg || self.bg != bg {
            self.fg = fg;
            self.bg = bg;
            self.mark_all_dirty();
        }
    }

    /// Default colors (fg, bg)
    pub fn colors(&self) -> (Rgb565, Rgb565) {
        (self.fg, self.bg)
    }

    /// Set the cursor display mode
    pub fn set_cursor(&mut self, mode: CursorMode) {
        if self.cursor_mode != mode {
            self.cursor_mode = mode;
            self.mark_line_dirty(self.cur_row);
        }
    }

    /// Blank the grid, home the cursor, reset write attributes
    pub fn clear_screen(&mut self) {
        self.cells.fill(Cell::BLANK);
        self.cur_col = 0;
        self.cur_row = 0;
        self.attrs.reset();
        self.parser.reset();
        self.mark_all_dirty();
    }

    /// Write a string, interpreting the escape subset
    pub fn put_str(&mut self, s: &str) {
        for ch in s.chars() {
            self.putc(ch);
        }
    }

    /// Write one character, interpreting the escape subset
    pub fn putc(&mut self, ch: char) {
        if let Some(action) = self.parser.feed(ch) {
            self.apply(action);
        }
    }

    fn apply(&mut self, action: TermAction) {
        match action {
            TermAction::Print(ch) => self.print_char(ch),
            TermAction::Newline => {
                self.cur_col = 0;
                self.advance_row();
            }
            TermAction::CarriageReturn => {
                self.cur_col = 0;
            }
            TermAction::ClearScreen => self.clear_screen(),
            TermAction::CursorHome => {
                self.mark_line_dirty(self.cur_row);
                self.cur_col = 0;
                self.cur_row = 0;
            }
            TermAction::CursorPos { row, col } => {
                // 1-based escape coordinates; malformed positions clamp
                self.mark_line_dirty(self.cur_row);
                self.cur_row = row.saturating_sub(1).min(self.rows - 1);
                self.cur_col = col.saturating_sub(1).min(self.cols - 1);
            }
            TermAction::ClearToEol => {
                let row = self.cur_row;
                for col in self.cur_col..self.cols {
                    self.cell_set(col, row, Cell::BLANK);
                }
                self.mark_line_dirty(row);
            }
            TermAction::ResetAttrs => self.attrs.reset(),
            TermAction::Reverse => {
                self.attrs.reverse = true;
                self.attrs.bold = false;
            }
            TermAction::ReverseBold => {
                self.attrs.reverse = true;
                self.attrs.bold = true;
            }
            TermAction::SetFg(idx) => {
                self.attrs.fg = Some(idx);
            }
        }
    }

    fn print_char(&mut self, ch: char) {
        let cell = Cell {
            ch,
            attrs: self.attrs,
        };
        let (col, row) = (self.cur_col, self.cur_row);
        self.cell_set(col, row, cell);
        self.mark_line_dirty(row);

        self.cur_col += 1;
        if self.cur_col >= self.cols {
            // Wrap to the next row
            self.cur_col = 0;
            self.advance_row();
        }
    }

    /// Move the cursor down one row, scrolling at the bottom edge
    fn advance_row(&mut self) {
        if self.cur_row + 1 < self.rows {
            self.cur_row += 1;
        } else {
            self.scroll_up();
        }
    }

    /// Shift the grid up one line, discarding the top line
    fn scroll_up(&mut self) {
        let cols = self.cols as usize;
        self.cells.copy_within(cols.., 0);
        let blank_start = self.cells.len() - cols;
        self.cells[blank_start..].fill(Cell::BLANK);
        self.mark_all_dirty();
    }

    fn cell_index(&self, col: u16, row: u16) -> usize {
        row as usize * self.cols as usize + col as usize
    }

    fn cell_set(&mut self, col: u16, row: u16, cell: Cell) {
        let i = self.cell_index(col, row);
        self.cells[i] = cell;
    }

    /// Read a cell back (host tests, emulation overlays)
    pub fn cell(&self, col: u16, row: u16) -> Option<&Cell> {
        if col < self.cols && row < self.rows {
            Some(&self.cells[self.cell_index(col, row)])
        } else {
            None
        }
    }

    fn mark_line_dirty(&mut self, row: u16) {
        if let Some(f) = self.dirty.get_mut(row as usize) {
            *f = true;
        }
    }

    fn mark_all_dirty(&mut self) {
        self.dirty.fill(true);
    }

    /// True if any line changed since the last repaint
    pub fn is_dirty(&self) -> bool {
        self.dirty.iter().any(|&f| f)
    }

    /// Repaint lines changed since the last call
    ///
    /// `now_ms` drives the cursor blink phase. Does nothing (and skips the
    /// present) when no line is dirty and the blink phase is unchanged; the
    /// caller is expected to throttle calls to its redraw budget.
    pub fn refresh<S, F>(&mut self, surface: &mut S, font: &F, now_ms: u32) -> Result<(), SurfaceError>
    where
        S: PixelSurface,
        F: FontSource + ?Sized,
    {
        let phase = matches!(self.cursor_mode, CursorMode::Blink) && (now_ms / 500) & 1 == 1;
        if phase != self.blink_phase {
            self.blink_phase = phase;
            self.mark_line_dirty(self.cur_row);
        }

        if !self.is_dirty() {
            return Ok(());
        }

        for row in 0..self.rows {
            if self.dirty[row as usize] {
                self.paint_line(surface, font, row);
                self.dirty[row as usize] = false;
            }
        }
        surface.present()
    }

    /// Mark every line dirty, then repaint
    pub fn force_refresh<S, F>(
        &mut self,
        surface: &mut S,
        font: &F,
        now_ms: u32,
    ) -> Result<(), SurfaceError>
    where
        S: PixelSurface,
        F: FontSource + ?Sized,
    {
        self.mark_all_dirty();
        self.refresh(surface, font, now_ms)
    }

    fn paint_line<S, F>(&self, surface: &mut S, font: &F, row: u16)
    where
        S: PixelSurface,
        F: FontSource + ?Sized,
    {
        let (cw, chh) = font.cell_size();
        let (cw, chh) = (cw as u16, chh as u16);
        if cw == 0 || chh == 0 {
            return;
        }

        let y0 = self.viewport.y + row * chh;
        if y0 + chh > self.viewport.y + self.viewport.h {
            return; // row below the viewport
        }

        for col in 0..self.cols {
            let x0 = self.viewport.x + col * cw;
            if x0 + cw > self.viewport.x + self.viewport.w {
                break; // columns beyond the viewport clip
            }

            let cell = &self.cells[self.cell_index(col, row)];
            let (fg, bg) = self.resolve_colors(cell, col, row);

            match font.glyph(cell.ch) {
                Some(g) => {
                    let gw = (g.width as u16).min(cw);
                    for (dy, bits) in g.rows.iter().take(chh as usize).enumerate() {
                        for dx in 0..cw {
                            let on = dx < gw && (bits >> (7 - dx)) & 1 == 1;
                            surface.set_pt(x0 + dx, y0 + dy as u16, if on { fg } else { bg });
                        }
                    }
                    // Pad rows the glyph does not cover
                    for dy in g.rows.len() as u16..chh {
                        for dx in 0..cw {
                            surface.set_pt(x0 + dx, y0 + dy, bg);
                        }
                    }
                }
                None => surface.fill_rect(x0, y0, cw, chh, bg),
            }
        }
    }

    fn resolve_colors(&self, cell: &Cell, col: u16, row: u16) -> (Rgb565, Rgb565) {
        let mut fg = match cell.attrs.fg {
            Some(i) => ANSI_PALETTE[i as usize & 7],
            None => self.fg,
        };
        if cell.attrs.bold {
            fg = Rgb565::WHITE;
        }

        let mut reversed = cell.attrs.reverse;

        // Cursor cell renders reversed in Block mode and on odd blink phases
        let at_cursor = col == self.cur_col && row == self.cur_row;
        if at_cursor {
            match self.cursor_mode {
                CursorMode::Block => reversed = !reversed,
                CursorMode::Blink if self.blink_phase => reversed = !reversed,
                _ => {}
            }
        }

        if reversed {
            (self.bg, fg)
        } else {
            (fg, self.bg)
        }
    }

    /// Serialize the visible grid as text
    ///
    /// Trailing blanks on each line and trailing blank lines are trimmed.
    /// This feeds the host-side clipboard copy of a console's contents.
    pub fn contents(&self) -> String {
        let mut lines: Vec<String> = Vec::with_capacity(self.rows as usize);
        for row in 0..self.rows {
            let line: String = (0..self.cols)
                .map(|col| self.cells[self.cell_index(col, row)].ch)
                .collect();
            lines.push(String::from(line.trim_end()));
        }
        while lines.last().is_some_and(|l| l.is_empty()) {
            lines.pop();
        }
        lines.join("\n")
    }
}

impl fmt::Write for Term {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.put_str(s);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{BufferSurface, FontSource, Glyph};
    use core::fmt::Write as _;

    /// 1x1-cell font: any non-space character lights its single pixel
    struct DotFont;

    impl FontSource for DotFont {
        fn cell_size(&self) -> (u8, u8) {
            (1, 1)
        }

        fn glyph(&self, ch: char) -> Option<Glyph<'_>> {
            if ch == ' ' {
                None
            } else {
                Some(Glyph {
                    width: 1,
                    height: 1,
                    rows: &[0x80],
                })
            }
        }
    }

    fn term_4x3() -> Term {
        Term::new(4, 3, Rect::new(0, 0, 4, 3))
    }

    fn row_text(t: &Term, row: u16) -> String {
        (0..t.cols()).map(|c| t.cell(c, row).unwrap().ch).collect()
    }

    #[test]
    fn test_write_and_wrap() {
        let mut t = term_4x3();
        t.put_str("abcdef");
        assert_eq!(row_text(&t, 0), "abcd");
        assert_eq!(row_text(&t, 1), "ef  ");
        assert_eq!(t.cursor(), (2, 1));
    }

    #[test]
    fn test_scroll_preserves_unshifted_lines() {
        let mut t = term_4x3();
        t.put_str("aaaabbbbcccc"); // fills all three rows, cursor wrapped to a fresh scrolled row
        assert_eq!(row_text(&t, 0), "bbbb");
        assert_eq!(row_text(&t, 1), "cccc");
        assert_eq!(row_text(&t, 2), "    ");
        assert_eq!(t.cursor(), (0, 2));

        t.put_str("dd");
        assert_eq!(row_text(&t, 2), "dd  ");
    }

    #[test]
    fn test_cursor_position_and_clamp() {
        let mut t = term_4x3();
        t.put_str("\x1b[2;3Hx");
        assert_eq!(t.cell(2, 1).unwrap().ch, 'x');

        // Malformed positions clamp to the grid instead of erroring
        t.put_str("\x1b[99;99Hy");
        assert_eq!(t.cell(3, 2).unwrap().ch, 'y');
    }

    #[test]
    fn test_clear_screen_escape() {
        let mut t = term_4x3();
        t.put_str("abc\x1b[2J");
        assert_eq!(row_text(&t, 0), "    ");
        assert_eq!(t.cursor(), (0, 0));
    }

    #[test]
    fn test_clear_to_eol() {
        let mut t = term_4x3();
        t.put_str("abcd\x1b[1;2H\x1b[K");
        assert_eq!(row_text(&t, 0), "a   ");
    }

    #[test]
    fn test_attrs_applied_to_cells() {
        let mut t = term_4x3();
        t.put_str("\x1b[31mr\x1b[7mv\x1b[0mn");
        assert_eq!(t.cell(0, 0).unwrap().attrs.fg, Some(1));
        assert!(t.cell(1, 0).unwrap().attrs.reverse);
        assert_eq!(t.cell(2, 0).unwrap().attrs, CellAttrs::default());
    }

    #[test]
    fn test_unknown_escape_is_noop() {
        let mut t = term_4x3();
        t.put_str("a\x1b[5Bb");
        assert_eq!(row_text(&t, 0), "ab  ");
    }

    #[test]
    fn test_dirty_lines_and_refresh() {
        let mut t = term_4x3();
        let mut s = BufferSurface::new(4, 3);
        t.refresh(&mut s, &DotFont, 0).unwrap();
        assert!(!t.is_dirty());
        assert_eq!(s.present_count(), 1);

        // Nothing dirty: refresh skips the present entirely
        t.refresh(&mut s, &DotFont, 0).unwrap();
        assert_eq!(s.present_count(), 1);

        t.put_str("x");
        assert!(t.is_dirty());
        t.refresh(&mut s, &DotFont, 0).unwrap();
        assert_eq!(s.present_count(), 2);
        assert_eq!(s.get_pt(0, 0), Rgb565::WHITE);
    }

    #[test]
    fn test_force_refresh_repaints_all() {
        let mut t = term_4x3();
        let mut s = BufferSurface::new(4, 3);
        t.put_str("x");
        t.refresh(&mut s, &DotFont, 0).unwrap();

        // Paint over the surface behind the console's back
        s.fill_rect(0, 0, 4, 3, Rgb565::new(0, 255, 0));
        t.refresh(&mut s, &DotFont, 0).unwrap();
        assert_eq!(s.get_pt(0, 0), Rgb565::new(0, 255, 0));

        t.force_refresh(&mut s, &DotFont, 0).unwrap();
        assert_eq!(s.get_pt(0, 0), Rgb565::WHITE);
        assert_eq!(s.get_pt(3, 2), Rgb565::BLACK);
    }

    #[test]
    fn test_set_color_marks_dirty() {
        let mut t = term_4x3();
        let mut s = BufferSurface::new(4, 3);
        t.refresh(&mut s, &DotFont, 0).unwrap();
        t.set_color(Rgb565::new(255, 128, 0), Rgb565::BLACK);
        assert!(t.is_dirty());
    }

    #[test]
    fn test_cursor_block_rendering() {
        let mut t = term_4x3();
        let mut s = BufferSurface::new(4, 3);
        t.set_cursor(CursorMode::Block);
        t.refresh(&mut s, &DotFont, 0).unwrap();
        // Cursor at (0,0) over a blank cell: reversed blank = foreground fill
        assert_eq!(s.get_pt(0, 0), Rgb565::WHITE);
    }

    #[test]
    fn test_cursor_blink_phases() {
        let mut t = term_4x3();
        let mut s = BufferSurface::new(4, 3);
        t.set_cursor(CursorMode::Blink);
        t.refresh(&mut s, &DotFont, 0).unwrap();
        assert_eq!(s.get_pt(0, 0), Rgb565::BLACK); // even phase: cell as-is

        t.refresh(&mut s, &DotFont, 600).unwrap();
        assert_eq!(s.get_pt(0, 0), Rgb565::WHITE); // odd phase: reversed

        t.refresh(&mut s, &DotFont, 1100).unwrap();
        assert_eq!(s.get_pt(0, 0), Rgb565::BLACK);
    }

    #[test]
    fn test_contents_round_trip() {
        let mut t = Term::new(8, 4, Rect::new(0, 0, 8, 4));
        write!(t, "menu\n\nok").unwrap();
        assert_eq!(t.contents(), "menu\n\nok");
    }

    #[test]
    fn test_contents_trims_trailing_blanks() {
        let mut t = Term::new(8, 4, Rect::new(0, 0, 8, 4));
        t.put_str("hi");
        assert_eq!(t.contents(), "hi");
    }

    mod properties {
        use crate::term::{Rect, Term};
        use proptest::prelude::*;

        proptest! {
            /// Arbitrary byte soup never panics the console and never
            /// drives the cursor out of the grid
            #[test]
            fn prop_any_stream_is_safe(bytes in proptest::collection::vec(any::<u8>(), 0..512)) {
                let mut t = Term::new(6, 4, Rect::new(0, 0, 6, 4));
                for b in bytes {
                    t.putc(char::from(b));
                    let (col, row) = t.cursor();
                    prop_assert!(col < t.cols() && row < t.rows());
                }
            }
        }
    }

    #[test]
    fn test_with_config() {
        let cfg = TermConfig {
            cols: 10,
            rows: 2,
            viewport: Rect::new(0, 0, 40, 12),
            fg: Rgb565::new(255, 255, 255),
            bg: Rgb565::new(90, 0, 50),
            font_id: 11,
            cursor: CursorMode::Blink,
        };
        let t = Term::with_config(&cfg);
        assert_eq!((t.cols(), t.rows()), (10, 2));
        assert_eq!(t.font_id(), 11);
        assert_eq!(t.colors().1, Rgb565::new(90, 0, 50));
    }
}
