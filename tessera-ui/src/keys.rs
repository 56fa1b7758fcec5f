//! Key events and the shortcut keymap

use heapless::Deque;

/// Depth of the input queue
pub const KEY_QUEUE_DEPTH: usize = 32;

/// A discrete input event
///
/// Character keys carry their character; arrows and Enter are decoded by
/// the input layer. The board buttons are forwarded opaquely - what they
/// mean is up to the application that receives them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum KeyEvent {
    Up,
    Down,
    Enter,
    Char(char),
    /// Left physical button, short press
    ButtonA,
    /// Middle physical button, short press
    ButtonB,
    /// Right physical button, short press
    ButtonC,
    /// Left physical button, long press
    ButtonALong,
    /// Middle physical button, long press
    ButtonBLong,
    /// Right physical button, long press
    ButtonCLong,
}

impl KeyEvent {
    /// True for the opaque physical-button events
    pub fn is_button(&self) -> bool {
        matches!(
            self,
            KeyEvent::ButtonA
                | KeyEvent::ButtonB
                | KeyEvent::ButtonC
                | KeyEvent::ButtonALong
                | KeyEvent::ButtonBLong
                | KeyEvent::ButtonCLong
        )
    }

    /// True for Up/Down/Enter list navigation
    pub fn is_navigation(&self) -> bool {
        matches!(self, KeyEvent::Up | KeyEvent::Down | KeyEvent::Enter)
    }
}

/// Row-shortcut keys, in row order
///
/// Row 0 selects with '1', row 9 with '0', row 10 with 'q' and so on.
/// Rows past the end of this table are reachable only with Up/Down.
pub const SHORTCUT_KEYS: [char; 20] = [
    '1', '2', '3', '4', '5', '6', '7', '8', '9', '0', //
    'q', 'w', 'e', 'r', 't', 'y', 'u', 'i', 'o', 'p',
];

/// Map a character to its row index in the shortcut table
pub fn shortcut_index(ch: char) -> Option<usize> {
    SHORTCUT_KEYS.iter().position(|&k| k == ch)
}

/// Bounded input FIFO
///
/// The host's poll loop pushes decoded events; the active application
/// drains them on its next tick. Events past the queue depth are dropped.
#[derive(Debug, Default)]
pub struct KeyQueue {
    queue: Deque<KeyEvent, KEY_QUEUE_DEPTH>,
}

impl KeyQueue {
    pub fn new() -> Self {
        Self {
            queue: Deque::new(),
        }
    }

    /// Push an event; returns false (dropping the event) when full
    pub fn push(&mut self, ev: KeyEvent) -> bool {
        self.queue.push_back(ev).is_ok()
    }

    /// Pop the oldest pending event
    pub fn pop(&mut self) -> Option<KeyEvent> {
        self.queue.pop_front()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn clear(&mut self) {
        self.queue.clear();
    }
}
