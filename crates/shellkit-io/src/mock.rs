//! Mock console implementations for testing

use std::collections::VecDeque;
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::{AnsiOutput, ByteSource, ConsoleInput, ConsoleResult, RawModeGuard};

const PLATFORM_NAME: &str = "Mock";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MockInput {
    Byte(u8),
    /// Longer than any escape timeout
    Pause,
}

/// Scripted console input.
///
/// Clones share the same queue and raw-mode state, so a test can keep a
/// handle after moving the input into a shell. Separate `new()` instances are
/// independent terminals.
#[derive(Debug, Clone)]
pub struct MockConsoleInput {
    input_queue: Arc<Mutex<VecDeque<MockInput>>>,
    is_tty: bool,
    window_size: (u16, u16),
    raw: Arc<AtomicBool>,
    enable_count: Arc<AtomicUsize>,
    restore_count: Arc<AtomicUsize>,
}

impl Default for MockConsoleInput {
    fn default() -> Self {
        Self::new()
    }
}

impl MockConsoleInput {
    /// An interactive 80x24 terminal with no queued input
    pub fn new() -> Self {
        Self {
            input_queue: Arc::new(Mutex::new(VecDeque::new())),
            is_tty: true,
            window_size: (80, 24),
            raw: Arc::new(AtomicBool::new(false)),
            enable_count: Arc::new(AtomicUsize::new(0)),
            restore_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Input that behaves like a pipe: raw mode is a no-op
    pub fn piped() -> Self {
        Self {
            is_tty: false,
            ..Self::new()
        }
    }

    pub fn with_window_size(mut self, cols: u16, rows: u16) -> Self {
        self.window_size = (cols, rows);
        self
    }

    /// Queue raw bytes for the decoder
    pub fn queue_bytes(&self, bytes: &[u8]) {
        if let Ok(mut queue) = self.input_queue.lock() {
            queue.extend(bytes.iter().copied().map(MockInput::Byte));
        }
    }

    /// Queue the UTF-8 encoding of `text`
    pub fn queue_text(&self, text: &str) {
        self.queue_bytes(text.as_bytes());
    }

    /// Queue a gap in the input: a timed read at this point times out
    pub fn queue_pause(&self) {
        if let Ok(mut queue) = self.input_queue.lock() {
            queue.push_back(MockInput::Pause);
        }
    }

    pub fn is_raw(&self) -> bool {
        self.raw.load(Ordering::SeqCst)
    }

    /// Times raw mode was actually entered
    pub fn enable_count(&self) -> usize {
        self.enable_count.load(Ordering::SeqCst)
    }

    /// Times a saved configuration was restored
    pub fn restore_count(&self) -> usize {
        self.restore_count.load(Ordering::SeqCst)
    }

    fn pop(&self) -> Option<MockInput> {
        self.input_queue.lock().ok()?.pop_front()
    }
}

impl ByteSource for MockConsoleInput {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        loop {
            match self.pop() {
                Some(MockInput::Byte(b)) => return Ok(Some(b)),
                Some(MockInput::Pause) => continue,
                None => return Ok(None),
            }
        }
    }

    fn read_byte_timeout(&mut self, _timeout: Duration) -> io::Result<Option<u8>> {
        match self.pop() {
            Some(MockInput::Byte(b)) => Ok(Some(b)),
            Some(MockInput::Pause) | None => Ok(None),
        }
    }
}

impl ConsoleInput for MockConsoleInput {
    fn is_terminal(&self) -> bool {
        self.is_tty
    }

    fn enable_raw_mode(&self) -> ConsoleResult<RawModeGuard> {
        if !self.is_tty || self.raw.swap(true, Ordering::SeqCst) {
            return Ok(RawModeGuard::noop(PLATFORM_NAME.to_string()));
        }
        self.enable_count.fetch_add(1, Ordering::SeqCst);

        let raw = Arc::clone(&self.raw);
        let restore_count = Arc::clone(&self.restore_count);
        Ok(RawModeGuard::new(
            move || {
                if raw.swap(false, Ordering::SeqCst) {
                    restore_count.fetch_add(1, Ordering::SeqCst);
                }
            },
            PLATFORM_NAME.to_string(),
        ))
    }

    fn get_window_size(&self) -> ConsoleResult<(u16, u16)> {
        Ok(self.window_size)
    }

    fn platform_name(&self) -> &str {
        PLATFORM_NAME
    }
}

/// In-memory byte sink shared between clones
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer {
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl SharedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bytes(&self) -> Vec<u8> {
        self.bytes.lock().map(|b| b.clone()).unwrap_or_default()
    }

    /// Captured output as text
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.bytes()).into_owned()
    }

    pub fn clear(&self) {
        if let Ok(mut bytes) = self.bytes.lock() {
            bytes.clear();
        }
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut bytes = self
            .bytes
            .lock()
            .map_err(|_| io::Error::other("output buffer lock poisoned"))?;
        bytes.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// VT output captured in memory
pub type MockConsoleOutput = AnsiOutput<SharedBuffer>;

/// A capturing output and a handle to read what it flushed
pub fn mock_output() -> (MockConsoleOutput, SharedBuffer) {
    let buffer = SharedBuffer::new();
    (AnsiOutput::new(buffer.clone()), buffer)
}
