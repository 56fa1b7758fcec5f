//! The shared shell environment
//!
//! One explicitly-constructed instance is threaded through every
//! application call; applications share the screens and input queues
//! without any global state.

use heapless::Deque;

use crate::screens::ScreenSet;
use tessera_ui::KeyQueue;

/// Depth of the serial receive queue in bytes
pub const UART_QUEUE_DEPTH: usize = 512;

/// Bounded byte FIFO for the serial receive path
///
/// The host pushes raw bytes as they arrive; the console application
/// drains them on its tick. Bytes past the queue depth are dropped.
#[derive(Debug, Default)]
pub struct ByteQueue {
    queue: Deque<u8, UART_QUEUE_DEPTH>,
}

impl ByteQueue {
    pub fn new() -> Self {
        Self {
            queue: Deque::new(),
        }
    }

    /// Push a received byte; returns false (dropping it) when full
    pub fn push(&mut self, byte: u8) -> bool {
        self.queue.push_back(byte).is_ok()
    }

    /// Push a whole chunk, dropping what does not fit
    pub fn push_slice(&mut self, bytes: &[u8]) {
        for &b in bytes {
            if !self.push(b) {
                break;
            }
        }
    }

    pub fn pop(&mut self) -> Option<u8> {
        self.queue.pop_front()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }
}

/// Everything the applications share
pub struct ShellEnv {
    /// The console set over the one physical display
    pub screens: ScreenSet,
    /// Decoded keyboard and button events
    pub keys: KeyQueue,
    /// Raw serial receive bytes
    pub uart: ByteQueue,
    /// Monotonic milliseconds, updated by the host each tick
    pub now_ms: u32,
}

impl ShellEnv {
    /// Build the environment for a display of the given pixel size
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            screens: ScreenSet::new(width, height),
            keys: KeyQueue::new(),
            uart: ByteQueue::new(),
            now_ms: 0,
        }
    }
}
