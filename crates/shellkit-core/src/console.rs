//! Console input/output abstraction traits and types
//!
//! This module provides the traits the line editor and the shell loop talk to,
//! the ANSI control-sequence writer shared by every VT backend, and the RAII
//! guard that owns a terminal's raw-mode session.

use std::fmt::Write as _;
use std::io::Write;

use crate::error::ConsoleResult;
use crate::key_decoder::ByteSource;

/// Terminal input: a byte source plus raw-mode control and size queries.
pub trait ConsoleInput: ByteSource {
    /// Whether the input stream is an interactive terminal
    fn is_terminal(&self) -> bool;

    /// Enable raw terminal mode with automatic restoration.
    ///
    /// Non-terminal input yields an inactive guard rather than an error.
    fn enable_raw_mode(&self) -> ConsoleResult<RawModeGuard>;

    /// Get current terminal window size (columns, rows)
    fn get_window_size(&self) -> ConsoleResult<(u16, u16)>;

    fn platform_name(&self) -> &str;
}

impl<T: ConsoleInput + ?Sized> ConsoleInput for Box<T> {
    fn is_terminal(&self) -> bool {
        (**self).is_terminal()
    }

    fn enable_raw_mode(&self) -> ConsoleResult<RawModeGuard> {
        (**self).enable_raw_mode()
    }

    fn get_window_size(&self) -> ConsoleResult<(u16, u16)> {
        (**self).get_window_size()
    }

    fn platform_name(&self) -> &str {
        (**self).platform_name()
    }
}

/// Terminal output primitives.
///
/// Implementations may buffer; nothing is guaranteed to reach the terminal
/// before [`flush`](ConsoleOutput::flush).
pub trait ConsoleOutput {
    /// Write text at current cursor position
    fn write_text(&mut self, text: &str) -> ConsoleResult<()>;

    /// Write text with specific styling, resetting the style afterwards
    fn write_styled_text(&mut self, text: &str, style: &TextStyle) -> ConsoleResult<()>;

    /// Move cursor to specific position (0-based coordinates: row, col)
    /// Note: API uses 0-based coordinates, but ANSI sequences use 1-based
    fn move_cursor_to(&mut self, row: u16, col: u16) -> ConsoleResult<()>;

    fn move_cursor_left(&mut self, n: u16) -> ConsoleResult<()>;

    fn move_cursor_right(&mut self, n: u16) -> ConsoleResult<()>;

    /// Move to a 0-based column on the current line
    fn move_cursor_to_column(&mut self, col: u16) -> ConsoleResult<()>;

    /// Clear screen or specific areas
    fn clear(&mut self, clear_type: ClearType) -> ConsoleResult<()>;

    fn save_cursor(&mut self) -> ConsoleResult<()>;

    fn restore_cursor(&mut self) -> ConsoleResult<()>;

    /// Show/hide cursor
    fn set_cursor_visible(&mut self, visible: bool) -> ConsoleResult<()>;

    /// Ring the terminal bell
    fn bell(&mut self) -> ConsoleResult<()>;

    /// Flush buffered output to terminal
    fn flush(&mut self) -> ConsoleResult<()>;
}

impl<T: ConsoleOutput + ?Sized> ConsoleOutput for Box<T> {
    fn write_text(&mut self, text: &str) -> ConsoleResult<()> {
        (**self).write_text(text)
    }

    fn write_styled_text(&mut self, text: &str, style: &TextStyle) -> ConsoleResult<()> {
        (**self).write_styled_text(text, style)
    }

    fn move_cursor_to(&mut self, row: u16, col: u16) -> ConsoleResult<()> {
        (**self).move_cursor_to(row, col)
    }

    fn move_cursor_left(&mut self, n: u16) -> ConsoleResult<()> {
        (**self).move_cursor_left(n)
    }

    fn move_cursor_right(&mut self, n: u16) -> ConsoleResult<()> {
        (**self).move_cursor_right(n)
    }

    fn move_cursor_to_column(&mut self, col: u16) -> ConsoleResult<()> {
        (**self).move_cursor_to_column(col)
    }

    fn clear(&mut self, clear_type: ClearType) -> ConsoleResult<()> {
        (**self).clear(clear_type)
    }

    fn save_cursor(&mut self) -> ConsoleResult<()> {
        (**self).save_cursor()
    }

    fn restore_cursor(&mut self) -> ConsoleResult<()> {
        (**self).restore_cursor()
    }

    fn set_cursor_visible(&mut self, visible: bool) -> ConsoleResult<()> {
        (**self).set_cursor_visible(visible)
    }

    fn bell(&mut self) -> ConsoleResult<()> {
        (**self).bell()
    }

    fn flush(&mut self) -> ConsoleResult<()> {
        (**self).flush()
    }
}

/// RAII guard for terminal raw mode.
///
/// Holds the closure that puts the terminal back into its saved
/// configuration. The closure runs at most once: on [`restore`](Self::restore)
/// or on drop, whichever comes first, so unwinding out of a read loop still
/// leaves the terminal usable.
pub struct RawModeGuard {
    restore_fn: Option<Box<dyn FnOnce() + Send>>,
    platform_info: String,
}

impl RawModeGuard {
    pub fn new<F>(restore_fn: F, platform_info: String) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self {
            restore_fn: Some(Box::new(restore_fn)),
            platform_info,
        }
    }

    /// A guard with nothing to restore (non-terminal input, or raw mode was
    /// already active)
    pub fn noop(platform_info: String) -> Self {
        Self {
            restore_fn: None,
            platform_info,
        }
    }

    pub fn platform_info(&self) -> &str {
        &self.platform_info
    }

    /// Whether this guard still has a configuration to restore
    pub fn is_active(&self) -> bool {
        self.restore_fn.is_some()
    }

    /// Restore the terminal now. Calling this more than once is harmless.
    pub fn restore(&mut self) {
        if let Some(restore_fn) = self.restore_fn.take() {
            restore_fn();
        }
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        self.restore();
    }
}

impl std::fmt::Debug for RawModeGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RawModeGuard")
            .field("platform_info", &self.platform_info)
            .field("active", &self.is_active())
            .finish()
    }
}

/// Text styling configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextStyle {
    pub foreground: Option<Color>,
    pub bold: bool,
    pub dim: bool,
    pub underline: bool,
    pub reverse: bool,
}

impl TextStyle {
    /// Dim style used for ghost text
    pub const fn muted() -> Self {
        Self {
            foreground: None,
            bold: false,
            dim: true,
            underline: false,
            reverse: false,
        }
    }

    pub const fn fg(color: Color) -> Self {
        Self {
            foreground: Some(color),
            bold: false,
            dim: false,
            underline: false,
            reverse: false,
        }
    }

    /// SGR sequence selecting this style, or an empty string for the default
    pub fn to_ansi(&self) -> String {
        let mut codes: Vec<String> = Vec::new();
        if let Some(fg) = self.foreground {
            codes.push(fg.fg_code());
        }
        if self.bold {
            codes.push("1".to_string());
        }
        if self.dim {
            codes.push("2".to_string());
        }
        if self.underline {
            codes.push("4".to_string());
        }
        if self.reverse {
            codes.push("7".to_string());
        }

        if codes.is_empty() {
            String::new()
        } else {
            format!("\x1b[{}m", codes.join(";"))
        }
    }
}

/// Color specification for text styling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    Ansi256(u8),
}

impl Color {
    fn fg_code(self) -> String {
        match self {
            Color::Black => "30".to_string(),
            Color::Red => "31".to_string(),
            Color::Green => "32".to_string(),
            Color::Yellow => "33".to_string(),
            Color::Blue => "34".to_string(),
            Color::Magenta => "35".to_string(),
            Color::Cyan => "36".to_string(),
            Color::White => "37".to_string(),
            Color::Ansi256(n) => format!("38;5;{n}"),
        }
    }
}

/// Screen clearing options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearType {
    /// Clear entire screen and home the cursor
    All,
    /// Clear current line and return to column 0
    CurrentLine,
    /// Clear from cursor to end of line
    ToEndOfLine,
}

impl ClearType {
    pub fn as_ansi(self) -> &'static str {
        match self {
            ClearType::All => "\x1b[2J\x1b[H",
            ClearType::CurrentLine => "\x1b[2K\r",
            ClearType::ToEndOfLine => "\x1b[K",
        }
    }
}

const SGR_RESET: &str = "\x1b[0m";

/// VT100/ANSI [`ConsoleOutput`] over any writer.
///
/// Sequences accumulate in memory and reach the writer in a single
/// `write_all` on [`flush`](ConsoleOutput::flush), so a full line redraw
/// lands on the terminal at once.
#[derive(Debug)]
pub struct AnsiOutput<W: Write> {
    writer: W,
    pending: String,
}

impl<W: Write> AnsiOutput<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            pending: String::new(),
        }
    }

    /// Output queued since the last flush
    pub fn pending(&self) -> &str {
        &self.pending
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }

    pub fn into_writer(self) -> W {
        self.writer
    }
}

impl<W: Write> ConsoleOutput for AnsiOutput<W> {
    fn write_text(&mut self, text: &str) -> ConsoleResult<()> {
        self.pending.push_str(text);
        Ok(())
    }

    fn write_styled_text(&mut self, text: &str, style: &TextStyle) -> ConsoleResult<()> {
        let sgr = style.to_ansi();
        if sgr.is_empty() {
            self.pending.push_str(text);
        } else {
            self.pending.push_str(&sgr);
            self.pending.push_str(text);
            self.pending.push_str(SGR_RESET);
        }
        Ok(())
    }

    fn move_cursor_to(&mut self, row: u16, col: u16) -> ConsoleResult<()> {
        let _ = write!(
            self.pending,
            "\x1b[{};{}H",
            u32::from(row) + 1,
            u32::from(col) + 1
        );
        Ok(())
    }

    fn move_cursor_left(&mut self, n: u16) -> ConsoleResult<()> {
        if n > 0 {
            let _ = write!(self.pending, "\x1b[{n}D");
        }
        Ok(())
    }

    fn move_cursor_right(&mut self, n: u16) -> ConsoleResult<()> {
        if n > 0 {
            let _ = write!(self.pending, "\x1b[{n}C");
        }
        Ok(())
    }

    fn move_cursor_to_column(&mut self, col: u16) -> ConsoleResult<()> {
        self.pending.push('\r');
        self.move_cursor_right(col)
    }

    fn clear(&mut self, clear_type: ClearType) -> ConsoleResult<()> {
        self.pending.push_str(clear_type.as_ansi());
        Ok(())
    }

    fn save_cursor(&mut self) -> ConsoleResult<()> {
        self.pending.push_str("\x1b[s");
        Ok(())
    }

    fn restore_cursor(&mut self) -> ConsoleResult<()> {
        self.pending.push_str("\x1b[u");
        Ok(())
    }

    fn set_cursor_visible(&mut self, visible: bool) -> ConsoleResult<()> {
        self.pending
            .push_str(if visible { "\x1b[?25h" } else { "\x1b[?25l" });
        Ok(())
    }

    fn bell(&mut self) -> ConsoleResult<()> {
        self.pending.push('\x07');
        Ok(())
    }

    fn flush(&mut self) -> ConsoleResult<()> {
        if !self.pending.is_empty() {
            self.writer.write_all(self.pending.as_bytes())?;
            self.pending.clear();
        }
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn flushed(f: impl FnOnce(&mut AnsiOutput<Vec<u8>>)) -> String {
        let mut out = AnsiOutput::new(Vec::new());
        f(&mut out);
        out.flush().unwrap();
        String::from_utf8(out.into_writer()).unwrap()
    }

    #[test]
    fn test_raw_mode_guard_restores_once() {
        let count = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&count);
        let mut guard = RawModeGuard::new(
            move || {
                counter.fetch_add(1, Ordering::SeqCst);
            },
            "Test".to_string(),
        );
        assert!(guard.is_active());
        assert_eq!(guard.platform_info(), "Test");

        guard.restore();
        assert!(!guard.is_active());
        guard.restore();
        drop(guard);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_raw_mode_guard_restores_on_drop() {
        let count = Arc::new(AtomicUsize::new(0));
        {
            let counter = Arc::clone(&count);
            let _guard = RawModeGuard::new(
                move || {
                    counter.fetch_add(1, Ordering::SeqCst);
                },
                "Test".to_string(),
            );
        }
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_raw_mode_guard_restores_on_panic() {
        let count = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&count);
        let result = std::panic::catch_unwind(move || {
            let _guard = RawModeGuard::new(
                move || {
                    counter.fetch_add(1, Ordering::SeqCst);
                },
                "Test".to_string(),
            );
            panic!("boom");
        });
        assert!(result.is_err());
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_noop_guard() {
        let mut guard = RawModeGuard::noop("Pipe".to_string());
        assert!(!guard.is_active());
        guard.restore();
    }

    #[test]
    fn test_style_to_ansi() {
        assert_eq!(TextStyle::default().to_ansi(), "");
        assert_eq!(TextStyle::muted().to_ansi(), "\x1b[2m");
        assert_eq!(TextStyle::fg(Color::Red).to_ansi(), "\x1b[31m");

        let style = TextStyle {
            foreground: Some(Color::Ansi256(42)),
            bold: true,
            underline: true,
            ..TextStyle::default()
        };
        assert_eq!(style.to_ansi(), "\x1b[38;5;42;1;4m");
    }

    #[test]
    fn test_clear_sequences() {
        assert_eq!(flushed(|o| o.clear(ClearType::All).unwrap()), "\x1b[2J\x1b[H");
        assert_eq!(flushed(|o| o.clear(ClearType::CurrentLine).unwrap()), "\x1b[2K\r");
        assert_eq!(flushed(|o| o.clear(ClearType::ToEndOfLine).unwrap()), "\x1b[K");
    }

    #[test]
    fn test_cursor_sequences() {
        assert_eq!(flushed(|o| o.move_cursor_to(0, 0).unwrap()), "\x1b[1;1H");
        assert_eq!(flushed(|o| o.move_cursor_to(4, 9).unwrap()), "\x1b[5;10H");
        assert_eq!(flushed(|o| o.move_cursor_left(3).unwrap()), "\x1b[3D");
        assert_eq!(flushed(|o| o.move_cursor_right(2).unwrap()), "\x1b[2C");
        assert_eq!(flushed(|o| o.move_cursor_right(0).unwrap()), "");
        assert_eq!(flushed(|o| o.move_cursor_to_column(0).unwrap()), "\r");
        assert_eq!(flushed(|o| o.move_cursor_to_column(7).unwrap()), "\r\x1b[7C");
        assert_eq!(flushed(|o| o.save_cursor().unwrap()), "\x1b[s");
        assert_eq!(flushed(|o| o.restore_cursor().unwrap()), "\x1b[u");
        assert_eq!(flushed(|o| o.set_cursor_visible(false).unwrap()), "\x1b[?25l");
        assert_eq!(flushed(|o| o.set_cursor_visible(true).unwrap()), "\x1b[?25h");
        assert_eq!(flushed(|o| o.bell().unwrap()), "\x07");
    }

    #[test]
    fn test_styled_text_resets() {
        let out = flushed(|o| {
            o.write_text("ab").unwrap();
            o.write_styled_text("cd", &TextStyle::muted()).unwrap();
            o.write_styled_text("ef", &TextStyle::default()).unwrap();
        });
        assert_eq!(out, "ab\x1b[2mcd\x1b[0mef");
    }

    #[test]
    fn test_output_is_buffered_until_flush() {
        let mut out = AnsiOutput::new(Vec::new());
        out.write_text("hello").unwrap();
        assert_eq!(out.pending(), "hello");
        assert!(out.writer().is_empty());

        out.flush().unwrap();
        assert_eq!(out.pending(), "");
        assert_eq!(out.writer().as_slice(), b"hello");
    }

    #[test]
    fn test_boxed_output() {
        let mut boxed: Box<dyn ConsoleOutput> = Box::new(AnsiOutput::new(Vec::new()));
        boxed.write_text("x").unwrap();
        boxed.bell().unwrap();
        boxed.flush().unwrap();
    }
}
