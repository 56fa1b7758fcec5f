//! Keyboard-driven list-selection widget
//!
//! `ListView` presents an ordered list of labels on a console, one page at
//! a time. Navigation scrolls by whole pages (the view start is always
//! page-aligned), wrapping from the last page back to the first and the
//! other way around. Selection commits in two phases: a performed
//! selection first arms the widget (highlight switches to the emphasized
//! reverse style) and only after a settle delay does it confirm, which
//! filters out double-activation from bouncy input devices.
//!
//! Rendering goes through the owning console as ordinary escape-sequence
//! writes; intra-page cursor moves repaint just the two affected rows.

use core::cmp::Ordering;
use core::fmt::Write as _;

use alloc::string::String;
use alloc::vec::Vec;

use tessera_term::Term;

use crate::keys::{shortcut_index, KeyEvent, SHORTCUT_KEYS};

/// Settle delay between an armed selection and its confirmation
pub const SELECT_SETTLE_MS: u32 = 300;

/// Two-phase selection commit state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
enum Confirm {
    /// Accepting navigation
    Idle,
    /// Selection performed, waiting out the settle delay
    Armed { since_ms: u32 },
    /// Selection committed; owner reads it and resets the widget
    Done,
}

#[derive(Debug, Clone)]
struct ListItem<T> {
    label: String,
    tag: T,
}

/// List-selection widget over an ordered sequence of labeled records
///
/// `T` is an opaque per-item tag carried through sorting and selection
/// (an application id, a port handle, ...).
#[derive(Debug, Clone)]
pub struct ListView<T = ()> {
    items: Vec<ListItem<T>>,
    view_start: i32,
    view_rows: i32,
    view_cols: i32,
    /// Populated rows on the current page, maintained by rendering;
    /// shortcut keys only reach rows below this count
    view_rows_disp: i32,
    /// Highlighted row within the view, -1 = none
    view_selected: i32,
    /// Absolute selected index, -1 = none
    selected: i32,
    confirm: Confirm,
    enabled: bool,
}

impl<T> Default for ListView<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ListView<T> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            view_start: 0,
            view_rows: 0,
            view_cols: 0,
            view_rows_disp: 0,
            view_selected: -1,
            selected: -1,
            confirm: Confirm::Idle,
            enabled: true,
        }
    }

    /// Derive view geometry from a console
    ///
    /// Must be called before the first navigation call.
    pub fn attach_term(&mut self, term: &Term) {
        self.view_cols = term.cols() as i32;
        self.view_rows = term.rows() as i32;
    }

    /// Append an item
    pub fn push(&mut self, label: impl Into<String>, tag: T) {
        self.items.push(ListItem {
            label: label.into(),
            tag,
        });
    }

    /// Drop all items and reset selection state
    pub fn clear(&mut self) {
        self.items.clear();
        self.view_start = 0;
        self.view_rows_disp = 0;
        self.view_selected = -1;
        self.selected = -1;
        self.confirm = Confirm::Idle;
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Label and tag of an item
    pub fn get(&self, index: usize) -> Option<(&str, &T)> {
        self.items.get(index).map(|it| (it.label.as_str(), &it.tag))
    }

    /// Absolute index of the current selection
    pub fn selected(&self) -> Option<usize> {
        if self.selected >= 0 {
            Some(self.selected as usize)
        } else {
            None
        }
    }

    /// Label of the current selection
    pub fn selected_label(&self) -> Option<&str> {
        self.selected()
            .and_then(|i| self.items.get(i))
            .map(|it| it.label.as_str())
    }

    /// Tag of the current selection
    pub fn selected_tag(&self) -> Option<&T> {
        self.selected().and_then(|i| self.items.get(i)).map(|it| &it.tag)
    }

    /// First index of the visible page
    pub fn view_start(&self) -> usize {
        self.view_start.max(0) as usize
    }

    /// Rows per page, as derived by [`attach_term`](Self::attach_term)
    pub fn view_rows(&self) -> usize {
        self.view_rows.max(0) as usize
    }

    /// Highlighted row within the visible page
    pub fn view_selected(&self) -> Option<usize> {
        if self.view_selected >= 0 {
            Some(self.view_selected as usize)
        } else {
            None
        }
    }

    /// True while a performed selection waits out the settle delay
    pub fn is_armed(&self) -> bool {
        matches!(self.confirm, Confirm::Armed { .. })
    }

    /// True once a selection has committed
    pub fn is_confirmed(&self) -> bool {
        matches!(self.confirm, Confirm::Done)
    }

    /// Return the widget to the idle phase after a confirmed selection
    pub fn reset_confirm(&mut self) {
        self.confirm = Confirm::Idle;
    }

    /// Advance the settle timer; true when the confirmation commits
    ///
    /// Called from the owner's poll loop so a confirmation does not wait
    /// for the next key press.
    pub fn tick(&mut self, now_ms: u32) -> bool {
        if let Confirm::Armed { since_ms } = self.confirm {
            if now_ms.wrapping_sub(since_ms) >= SELECT_SETTLE_MS {
                self.confirm = Confirm::Done;
                return true;
            }
        }
        false
    }

    /// Move the highlight to a row of the current view
    ///
    /// `requested` may lie outside the page; the widget then pages
    /// forward/backward with wraparound as described on the type. Returns
    /// the absolute selected index, or `None` when the widget is
    /// disabled, empty, or unattached.
    pub fn update_selection(&mut self, term: &mut Term, requested: i32) -> Option<usize> {
        if !self.enabled || self.items.is_empty() || self.view_rows <= 0 {
            return None;
        }

        let len = self.items.len() as i32;
        let sel_prev = self.view_selected;
        let mut sel = requested;
        let mut full = false;

        // Past the bottom of the view: clamp or page forward
        if sel >= self.view_rows {
            if len <= self.view_rows {
                sel = len - 1;
            } else {
                self.view_start += self.view_rows;
                if self.view_start > len - 1 {
                    self.view_start = 0;
                }
                sel = 0;
                full = true;
            }
        }

        // Above the top of the view: clamp or page backward
        if sel < 0 {
            if len <= self.view_rows {
                sel = 0;
            } else {
                self.view_start -= self.view_rows;
                if self.view_start < 0 {
                    // Wrap to the last page, landing on its last row
                    self.view_start = (len - 1) / self.view_rows * self.view_rows;
                    sel = len - self.view_start - 1;
                } else {
                    sel = self.view_rows - 1;
                }
                full = true;
            }
        }

        // Overshot the partial last page
        if self.view_start + sel >= len {
            if len <= self.view_rows {
                sel = len - self.view_start - 1;
            } else {
                sel = 0;
                self.view_start = 0;
                full = true;
            }
        }

        self.view_selected = sel;
        self.selected = self.view_start + sel;
        self.update_view(term, full, sel_prev, sel);

        Some(self.selected as usize)
    }

    /// Jump to an absolute index, repaging as needed; always a full redraw
    pub fn update_selection_absolute(&mut self, term: &mut Term, index: i32) -> Option<usize> {
        if self.view_rows > 0 && index >= 0 && (index as usize) < self.items.len() {
            let page = index / self.view_rows;
            self.view_start = page * self.view_rows;
            self.view_selected = index - self.view_start;
            self.selected = index;

            self.update_view(term, true, -1, self.view_selected);

            Some(index as usize)
        } else {
            None
        }
    }

    /// Process one key event; true when the widget consumed it
    pub fn key_event(&mut self, term: &mut Term, key: KeyEvent, now_ms: u32) -> bool {
        if !self.enabled {
            return false;
        }

        match self.confirm {
            Confirm::Armed { .. } => {
                // Settling: swallow everything until the delay elapses
                self.tick(now_ms);
                true
            }
            Confirm::Done => false,
            Confirm::Idle => {
                let mut handled = false;
                let mut performed = false;

                match key {
                    KeyEvent::Char(c) => {
                        if let Some(idx) = shortcut_index(c) {
                            if (idx as i32) < self.view_rows_disp {
                                self.update_selection(term, idx as i32);
                                performed = true;
                            }
                        }
                    }
                    KeyEvent::Down => {
                        let s = self.view_selected;
                        self.update_selection(term, s + 1);
                        handled = true;
                    }
                    KeyEvent::Up => {
                        let s = self.view_selected;
                        self.update_selection(term, s - 1);
                        handled = true;
                    }
                    KeyEvent::Enter => {
                        if self.items.is_empty() || self.view_selected < 0 {
                            handled = true;
                        } else {
                            let s = self.view_selected;
                            self.update_selection(term, s);
                            performed = true;
                        }
                    }
                    _ => {}
                }

                if performed {
                    handled = self.apply_selection_performed(term, now_ms) || handled;
                }
                handled
            }
        }
    }

    /// Redraw the whole visible page
    pub fn render(&mut self, term: &mut Term) {
        let sel = self.view_selected;
        self.update_view(term, true, -1, sel);
    }

    fn apply_selection_performed(&mut self, term: &mut Term, now_ms: u32) -> bool {
        if self.selected >= 0 && (self.selected as usize) < self.items.len() {
            self.confirm = Confirm::Armed { since_ms: now_ms };
            self.update_view(term, true, -1, self.view_selected);
            true
        } else {
            // The bounds checks upstream should make this unreachable;
            // recover anyway so a bad index can never stick
            self.selected = -1;
            self.view_selected = -1;
            self.update_selection(term, -1);
            false
        }
    }

    /// Stable sort by label; tags travel with their labels
    pub fn sort_items(&mut self, case_insensitive: bool) {
        if case_insensitive {
            self.items
                .sort_by(|a, b| cmp_ascii_nocase(&a.label, &b.label));
        } else {
            self.items.sort_by(|a, b| a.label.cmp(&b.label));
        }
    }

    fn update_view(&mut self, term: &mut Term, full: bool, sel_prev: i32, sel_now: i32) {
        if !self.enabled {
            return;
        }

        if full {
            term.put_str("\x1b[2J");
        }

        // "1: " prefix leaves this much room for the label itself
        let avail = (self.view_cols - 3).max(0) as usize;

        let len = self.items.len() as i32;
        let mut i = 0;
        self.view_rows_disp = 0;
        while i < self.view_rows && self.view_start + i < len {
            if full || sel_prev == i || sel_now == i {
                let shortcut = SHORTCUT_KEYS.get(i as usize).copied().unwrap_or(' ');
                let _ = write!(term, "\x1b[{};1H\x1b[K\x1b[7m{}\x1b[0m: ", i + 1, shortcut);

                if i == sel_now {
                    term.put_str(if self.is_armed() {
                        "\x1b[7;1m"
                    } else {
                        "\x1b[7m"
                    });
                }
                // Clip so a long label cannot wrap into the next row
                let label = self.items[(self.view_start + i) as usize].label.as_str();
                let label = match label.char_indices().nth(avail) {
                    Some((cut, _)) => &label[..cut],
                    None => label,
                };
                term.put_str(label);
                if i == sel_now {
                    term.put_str("\x1b[0m");
                }
            }
            i += 1;
            self.view_rows_disp += 1;
        }
    }
}

/// Byte-wise comparison with ASCII case folding
fn cmp_ascii_nocase(a: &str, b: &str) -> Ordering {
    let fa = a.bytes().map(|c| c.to_ascii_lowercase());
    let fb = b.bytes().map(|c| c.to_ascii_lowercase());
    fa.cmp(fb)
}
