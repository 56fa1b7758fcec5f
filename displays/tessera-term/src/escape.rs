//! Escape-sequence interpreter
//!
//! A character-fed state machine that turns a text stream into console
//! actions. Only the small subset the framework emits is interpreted:
//!
//! - `ESC [ 2 J` clear screen
//! - `ESC [ H` / `ESC [ r ; c H` cursor home / position (1-based)
//! - `ESC [ K` clear to end of line
//! - `ESC [ 0 m` reset attributes
//! - `ESC [ 7 m` / `ESC [ 7 ; 1 m` reverse video (plain / emphasized)
//! - `ESC [ 3x m` foreground color index x
//!
//! Anything else is consumed silently. Console output is best-effort UI
//! text, so a malformed sequence must never surface as an error.

use heapless::Vec;

/// Maximum CSI parameters retained per sequence
const MAX_CSI_PARAMS: usize = 4;

/// Actions produced by the interpreter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TermAction {
    /// Print a character at the cursor
    Print(char),
    /// Move to column 0 of the next row, scrolling at the bottom
    Newline,
    /// Move to column 0 of the current row
    CarriageReturn,
    /// Blank the grid and home the cursor
    ClearScreen,
    /// Move the cursor to (0, 0)
    CursorHome,
    /// Move the cursor to a 1-based row/column
    CursorPos { row: u16, col: u16 },
    /// Blank from the cursor to the end of the row
    ClearToEol,
    /// Reset attributes to default
    ResetAttrs,
    /// Reverse video on
    Reverse,
    /// Reverse video, emphasized
    ReverseBold,
    /// Select an ANSI foreground index (0-7)
    SetFg(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    /// Plain text
    Ground,
    /// Got ESC, waiting for '['
    Esc,
    /// Accumulating CSI parameters
    Csi,
}

/// Escape-sequence parser state
#[derive(Debug, Clone)]
pub struct EscParser {
    state: ParseState,
    params: Vec<u16, MAX_CSI_PARAMS>,
    current: u16,
    has_current: bool,
    /// Set when a sequence exceeds the parameter budget; the terminator
    /// is then swallowed without producing an action
    overflowed: bool,
}

impl Default for EscParser {
    fn default() -> Self {
        Self::new()
    }
}

impl EscParser {
    /// Create a parser in the ground state
    pub fn new() -> Self {
        Self {
            state: ParseState::Ground,
            params: Vec::new(),
            current: 0,
            has_current: false,
            overflowed: false,
        }
    }

    /// Reset to the ground state
    pub fn reset(&mut self) {
        self.state = ParseState::Ground;
        self.params.clear();
        self.current = 0;
        self.has_current = false;
        self.overflowed = false;
    }

    /// Feed one character
    ///
    /// Returns the action it completes, if any. Unrecognized input is
    /// consumed and yields `None`.
    pub fn feed(&mut self, ch: char) -> Option<TermAction> {
        match self.state {
            ParseState::Ground => match ch {
                '\x1b' => {
                    self.state = ParseState::Esc;
                    None
                }
                '\n' => Some(TermAction::Newline),
                '\r' => Some(TermAction::CarriageReturn),
                c if (c as u32) < 0x20 => None, // other C0 controls ignored
                c => Some(TermAction::Print(c)),
            },
            ParseState::Esc => {
                if ch == '[' {
                    self.state = ParseState::Csi;
                    self.params.clear();
                    self.current = 0;
                    self.has_current = false;
                    self.overflowed = false;
                    None
                } else {
                    // Unsupported ESC sequence, drop it
                    self.state = ParseState::Ground;
                    None
                }
            }
            ParseState::Csi => match ch {
                '0'..='9' => {
                    let d = ch as u16 - '0' as u16;
                    self.current = self.current.saturating_mul(10).saturating_add(d);
                    self.has_current = true;
                    None
                }
                ';' => {
                    self.push_param();
                    None
                }
                '\x1b' => {
                    // A fresh ESC restarts sequence recognition
                    self.reset();
                    self.state = ParseState::Esc;
                    None
                }
                '\x40'..='\x7e' => {
                    self.push_param();
                    let action = if self.overflowed {
                        None
                    } else {
                        self.terminate(ch)
                    };
                    self.state = ParseState::Ground;
                    action
                }
                '\x20'..='\x3f' => {
                    // Private markers and intermediates are outside the
                    // subset: swallow the sequence through its final byte
                    self.overflowed = true;
                    None
                }
                _ => {
                    // Control bytes abandon the sequence
                    self.reset();
                    None
                }
            },
        }
    }

    fn push_param(&mut self) {
        if self.has_current && self.params.push(self.current).is_err() {
            self.overflowed = true;
        }
        self.current = 0;
        self.has_current = false;
    }

    fn terminate(&mut self, final_byte: char) -> Option<TermAction> {
        let params = &self.params;
        match final_byte {
            'J' => match params.first() {
                Some(2) => Some(TermAction::ClearScreen),
                _ => None,
            },
            'H' => match (params.first(), params.get(1)) {
                (None, _) => Some(TermAction::CursorHome),
                (Some(&row), Some(&col)) => Some(TermAction::CursorPos { row, col }),
                _ => None,
            },
            'K' => Some(TermAction::ClearToEol),
            'm' => match params.as_slice() {
                [] | [0] => Some(TermAction::ResetAttrs),
                [7] => Some(TermAction::Reverse),
                [7, 1] => Some(TermAction::ReverseBold),
                [n @ 30..=37] => Some(TermAction::SetFg((n - 30) as u8)),
                _ => None,
            },
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec as AVec;

    fn run(input: &str) -> AVec<TermAction> {
        let mut p = EscParser::new();
        input.chars().filter_map(|c| p.feed(c)).collect()
    }

    #[test]
    fn test_plain_text() {
        assert_eq!(
            run("hi"),
            [TermAction::Print('h'), TermAction::Print('i')]
        );
    }

    #[test]
    fn test_clear_and_home() {
        assert_eq!(run("\x1b[2J"), [TermAction::ClearScreen]);
        assert_eq!(run("\x1b[H"), [TermAction::CursorHome]);
    }

    #[test]
    fn test_cursor_position() {
        assert_eq!(
            run("\x1b[3;12H"),
            [TermAction::CursorPos { row: 3, col: 12 }]
        );
    }

    #[test]
    fn test_sgr_subset() {
        assert_eq!(run("\x1b[0m"), [TermAction::ResetAttrs]);
        assert_eq!(run("\x1b[m"), [TermAction::ResetAttrs]);
        assert_eq!(run("\x1b[7m"), [TermAction::Reverse]);
        assert_eq!(run("\x1b[7;1m"), [TermAction::ReverseBold]);
        assert_eq!(run("\x1b[31m"), [TermAction::SetFg(1)]);
        assert_eq!(run("\x1b[37m"), [TermAction::SetFg(7)]);
    }

    #[test]
    fn test_unrecognized_sequences_are_silent() {
        // Unsupported CSI finals, SGR codes, and ESC sequences all vanish
        assert!(run("\x1b[5A").is_empty());
        assert!(run("\x1b[42m").is_empty());
        assert!(run("\x1b(B").is_empty());
        assert!(run("\x1b[1J").is_empty());
        // Private-mode sequences are swallowed whole
        assert!(run("\x1b[?25l").is_empty());
        // ...and parsing resumes cleanly afterwards
        assert_eq!(run("\x1b[9Zx"), [TermAction::Print('x')]);
        assert_eq!(run("\x1b[\x1b[2J"), [TermAction::ClearScreen]);
    }

    #[test]
    fn test_param_overflow_abandons_sequence() {
        assert!(run("\x1b[1;2;3;4;5;6H").is_empty());
        assert_eq!(run("\x1b[1;2;3;4;5;6Hok")[0], TermAction::Print('o'));
    }

    #[test]
    fn test_newline_and_cr() {
        assert_eq!(
            run("a\r\nb"),
            [
                TermAction::Print('a'),
                TermAction::CarriageReturn,
                TermAction::Newline,
                TermAction::Print('b'),
            ]
        );
    }

    #[test]
    fn test_huge_param_saturates() {
        // A hostile parameter must not wrap into a valid one
        assert_eq!(run("\x1b[99999999999;1H").len(), 1);
    }
}
