//! Single-line editor: buffer, cursor, prompt and key dispatch.
//!
//! The buffer is a sequence of code points and the cursor is a gap index into
//! it, always within `0..=len`. Every editing operation is total: operations
//! that cannot apply at the current position do nothing.

use log::trace;

use crate::console::{ClearType, ConsoleOutput, TextStyle};
use crate::error::ConsoleResult;
use crate::key::{Key, KeyCode, KeyEvent};
use crate::suggestion::SuggestionProvider;
use crate::unicode::display_width;

/// Editable input line with an optional attached renderer.
///
/// # Examples
///
/// ```
/// use shellkit_core::{Key, KeyEvent, LineEditor};
///
/// let mut editor = LineEditor::new("$ ");
/// for ch in "hello world".chars() {
///     editor.handle_key(KeyEvent::rune(ch));
/// }
/// editor.handle_key(KeyEvent::special(Key::ControlW).with_ctrl());
/// assert_eq!(editor.text(), "hello ");
/// assert!(editor.handle_key(KeyEvent::special(Key::Enter)));
/// ```
#[derive(Default)]
pub struct LineEditor {
    buffer: Vec<char>,
    cursor: usize,
    prompt: String,
    output: Option<Box<dyn ConsoleOutput>>,
    suggester: Option<Box<dyn SuggestionProvider>>,
}

impl LineEditor {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Self::default()
        }
    }

    /// Current text as a string
    pub fn text(&self) -> String {
        self.buffer.iter().collect()
    }

    /// Current text as code points
    pub fn chars(&self) -> &[char] {
        &self.buffer
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Length in code points
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Hand the line to the caller
    pub fn into_text(self) -> String {
        self.text()
    }

    /// Replace the whole buffer. The cursor moves to the end of the new text.
    pub fn set_buffer(&mut self, text: &str) {
        self.buffer = text.chars().collect();
        self.cursor = self.buffer.len();
    }

    /// Set the cursor, clamped to `[0, len]`
    pub fn set_cursor(&mut self, pos: usize) {
        self.cursor = pos.min(self.buffer.len());
    }

    pub fn set_prompt(&mut self, prompt: impl Into<String>) {
        self.prompt = prompt.into();
    }

    pub fn attach_output(&mut self, output: Box<dyn ConsoleOutput>) {
        self.output = Some(output);
    }

    pub fn detach_output(&mut self) -> Option<Box<dyn ConsoleOutput>> {
        self.output.take()
    }

    pub fn has_output(&self) -> bool {
        self.output.is_some()
    }

    pub fn set_suggestion_provider(&mut self, provider: Box<dyn SuggestionProvider>) {
        self.suggester = Some(provider);
    }

    pub fn clear_suggestion_provider(&mut self) {
        self.suggester = None;
    }

    pub fn insert(&mut self, ch: char) {
        self.buffer.insert(self.cursor, ch);
        self.cursor += 1;
    }

    pub fn insert_str(&mut self, text: &str) {
        let at = self.cursor;
        let before = self.buffer.len();
        self.buffer.splice(at..at, text.chars());
        self.cursor += self.buffer.len() - before;
    }

    /// Remove the code point before the cursor
    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            self.buffer.remove(self.cursor);
        }
    }

    /// Remove the code point under the cursor
    pub fn delete(&mut self) {
        if self.cursor < self.buffer.len() {
            self.buffer.remove(self.cursor);
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.buffer.len() {
            self.cursor += 1;
        }
    }

    pub fn move_to_start(&mut self) {
        self.cursor = 0;
    }

    pub fn move_to_end(&mut self) {
        self.cursor = self.buffer.len();
    }

    pub fn move_word_left(&mut self) {
        self.cursor = self.word_start_before(self.cursor);
    }

    pub fn move_word_right(&mut self) {
        let mut pos = self.cursor;
        while pos < self.buffer.len() && !self.buffer[pos].is_whitespace() {
            pos += 1;
        }
        while pos < self.buffer.len() && self.buffer[pos].is_whitespace() {
            pos += 1;
        }
        self.cursor = pos;
    }

    /// Kill from the cursor to the end of the line
    pub fn delete_to_end(&mut self) {
        self.buffer.truncate(self.cursor);
    }

    /// Kill from the start of the line to the cursor
    pub fn delete_to_start(&mut self) {
        self.buffer.drain(..self.cursor);
        self.cursor = 0;
    }

    /// Delete back to where [`move_word_left`](Self::move_word_left) would
    /// land, taking the whitespace before the cursor along with the word.
    pub fn delete_word_backward(&mut self) {
        let start = self.word_start_before(self.cursor);
        self.buffer.drain(start..self.cursor);
        self.cursor = start;
    }

    /// Delete the word at the cursor but not the whitespace after it.
    ///
    /// Unlike [`move_word_right`](Self::move_word_right) this stops at the
    /// first whitespace, so the separator before the next word survives.
    pub fn delete_word_forward(&mut self) {
        let mut end = self.cursor;
        while end < self.buffer.len() && !self.buffer[end].is_whitespace() {
            end += 1;
        }
        self.buffer.drain(self.cursor..end);
    }

    fn word_start_before(&self, from: usize) -> usize {
        let mut pos = from;
        while pos > 0 && self.buffer[pos - 1].is_whitespace() {
            pos -= 1;
        }
        while pos > 0 && !self.buffer[pos - 1].is_whitespace() {
            pos -= 1;
        }
        pos
    }

    /// Apply one key. Returns true when the line is finished: Enter, or
    /// Ctrl+D on an empty buffer (end of input).
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Special(special) => match special {
                Key::Enter => return true,
                Key::Backspace => self.backspace(),
                Key::Delete => self.delete(),
                Key::Left | Key::ControlB => self.move_left(),
                Key::Right | Key::ControlF => self.move_right(),
                Key::Home | Key::ControlA => self.move_to_start(),
                Key::End | Key::ControlE => self.move_to_end(),
                Key::ControlK => self.delete_to_end(),
                Key::ControlU => self.delete_to_start(),
                Key::ControlW => self.delete_word_backward(),
                Key::ControlLeft => self.move_word_left(),
                Key::ControlRight => self.move_word_right(),
                Key::ControlD => {
                    if self.buffer.is_empty() {
                        return true;
                    }
                    self.delete();
                }
                Key::Escape
                | Key::ControlC
                | Key::ControlL
                | Key::ControlN
                | Key::ControlP
                | Key::ControlR
                | Key::Up
                | Key::Down
                | Key::Tab => {}
            },
            KeyCode::Rune(ch) if key.alt => match ch {
                'b' => self.move_word_left(),
                'f' => self.move_word_right(),
                'd' => self.delete_word_forward(),
                _ => {}
            },
            KeyCode::Rune(ch) if key.is_plain_rune() => self.insert(ch),
            KeyCode::Rune(_) => {}
        }
        false
    }

    /// Ghost text for the current buffer, if the provider offers any
    pub fn suggestion(&self) -> Option<String> {
        let provider = self.suggester.as_ref()?;
        provider.suggest(&self.text()).filter(|s| !s.is_empty())
    }

    /// Append the ghost text to the line and move to the end. Returns false
    /// when there was nothing to accept.
    pub fn accept_suggestion(&mut self) -> bool {
        match self.suggestion() {
            Some(ghost) => {
                self.move_to_end();
                self.insert_str(&ghost);
                true
            }
            None => false,
        }
    }

    /// Redraw through the attached output. Without one this does nothing.
    pub fn render(&mut self) -> ConsoleResult<()> {
        let Some(mut output) = self.output.take() else {
            return Ok(());
        };
        let result = self.render_to(output.as_mut());
        self.output = Some(output);
        result
    }

    /// Redraw the line on `out`: prompt, buffer, dimmed ghost text, then the
    /// cursor at `display_width(prompt) + cursor`.
    pub fn render_to(&self, out: &mut dyn ConsoleOutput) -> ConsoleResult<()> {
        let text = self.text();
        let ghost = self.suggestion();
        trace!(
            "render: cursor={} len={} ghost={:?}",
            self.cursor,
            self.buffer.len(),
            ghost
        );

        out.clear(ClearType::CurrentLine)?;
        out.write_text(&self.prompt)?;
        out.write_text(&text)?;
        if let Some(ghost) = ghost.as_deref() {
            out.write_styled_text(ghost, &TextStyle::muted())?;
        }
        let column = display_width(&self.prompt) + self.cursor;
        out.move_cursor_to_column(u16::try_from(column).unwrap_or(u16::MAX))?;
        out.flush()
    }
}

impl std::fmt::Debug for LineEditor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LineEditor")
            .field("buffer", &self.text())
            .field("cursor", &self.cursor)
            .field("prompt", &self.prompt)
            .field("has_output", &self.output.is_some())
            .field("has_suggester", &self.suggester.is_some())
            .finish()
    }
}
