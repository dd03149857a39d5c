//! The interactive read-edit-execute loop

use log::{debug, info};

use shellkit_core::{
    ClearType, ConsoleInput, ConsoleOutput, DecodeError, Key, KeyDecoder, KeyEvent, LineEditor,
};

use crate::cli::ShellConfig;
use crate::error::Result;
use crate::exec::{self, Outcome};
use crate::history::{History, HistoryCursor, HistorySuggester};

/// Shell session over one terminal.
///
/// Raw mode is held only while a line is being edited, so commands run with
/// the terminal in its normal configuration.
pub struct Shell<I> {
    decoder: KeyDecoder<I>,
    output: Box<dyn ConsoleOutput>,
    config: ShellConfig,
    history: History,
    last_status: i32,
}

/// What a key does before it reaches the editor
enum LineControl {
    Pass,
    Handled,
}

impl<I: ConsoleInput> Shell<I> {
    pub fn new(input: I, output: Box<dyn ConsoleOutput>, config: ShellConfig) -> Self {
        let decoder = KeyDecoder::new(input).with_escape_timeout(config.escape_timeout);
        let history = History::new(config.history_size);
        Self {
            decoder,
            output,
            config,
            history,
            last_status: 0,
        }
    }

    pub fn config(&self) -> &ShellConfig {
        &self.config
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut History {
        &mut self.history
    }

    pub fn input(&self) -> &I {
        self.decoder.source()
    }

    /// Exit status of the last command line
    pub fn last_status(&self) -> i32 {
        self.last_status
    }

    /// Read and execute lines until `exit` or end of input. Returns the
    /// status the process should exit with.
    pub fn run(&mut self) -> Result<i32> {
        info!(
            "shell started on {} (terminal: {})",
            self.input().platform_name(),
            self.input().is_terminal()
        );
        while let Some(line) = self.read_line()? {
            self.history.add(&line);
            match exec::execute(&line, self.last_status) {
                Ok(Outcome::Continue(status)) => self.last_status = status,
                Ok(Outcome::Exit(code)) => return Ok(code),
                Err(e) => {
                    eprintln!("shellkit: {e}");
                    self.last_status = e.status();
                }
            }
        }
        Ok(self.last_status)
    }

    /// Edit one line in raw mode.
    ///
    /// Returns `Ok(Some(line))` on Enter and `Ok(None)` at end of input
    /// (Ctrl+D on an empty line, or the input stream closing).
    pub fn read_line(&mut self) -> Result<Option<String>> {
        let _raw = self.decoder.source().enable_raw_mode()?;

        let mut editor = LineEditor::new(self.config.prompt.clone());
        if self.config.suggestions {
            editor.set_suggestion_provider(Box::new(HistorySuggester::from_history(
                &self.history,
            )));
        }
        let mut browsing = HistoryCursor::default();
        editor.render_to(self.output.as_mut())?;

        loop {
            let key = match self.decoder.read_key() {
                Ok(key) => key,
                Err(DecodeError::EndOfStream) => {
                    debug!("input closed");
                    self.finish_line(&mut editor)?;
                    return Ok(None);
                }
                Err(e) => return Err(e.into()),
            };

            if let LineControl::Pass = self.line_control(&mut editor, &mut browsing, key)? {
                let before = editor.chars().to_vec();
                let done = editor.handle_key(key);
                if browsing.is_browsing() && editor.chars() != before.as_slice() {
                    browsing.reset();
                }
                if done {
                    self.finish_line(&mut editor)?;
                    if key.is(Key::Enter) {
                        return Ok(Some(editor.into_text()));
                    }
                    return Ok(None);
                }
            }
            editor.render_to(self.output.as_mut())?;
        }
    }

    /// Keys the shell handles around the editor: interrupt, clear screen,
    /// suggestion acceptance and history.
    fn line_control(
        &mut self,
        editor: &mut LineEditor,
        browsing: &mut HistoryCursor,
        key: KeyEvent,
    ) -> Result<LineControl> {
        let Some(special) = key.special_key() else {
            return Ok(LineControl::Pass);
        };
        match special {
            Key::ControlC => {
                self.output.write_text("^C")?;
                self.new_line()?;
                editor.set_buffer("");
                browsing.reset();
            }
            Key::ControlL => {
                self.output.clear(ClearType::All)?;
            }
            Key::Tab => {
                if !editor.accept_suggestion() {
                    self.output.bell()?;
                }
            }
            Key::Right if editor.cursor() == editor.len() && editor.suggestion().is_some() => {
                editor.accept_suggestion();
            }
            Key::Up | Key::ControlP => match browsing.older(&self.history, &editor.text()) {
                Some(entry) => editor.set_buffer(entry),
                None => self.output.bell()?,
            },
            Key::Down | Key::ControlN => {
                if let Some(entry) = browsing.newer(&self.history) {
                    editor.set_buffer(&entry);
                }
            }
            _ => return Ok(LineControl::Pass),
        }
        Ok(LineControl::Handled)
    }

    /// Redraw the line as submitted, without ghost text, and move below it.
    fn finish_line(&mut self, editor: &mut LineEditor) -> Result<()> {
        editor.clear_suggestion_provider();
        editor.render_to(self.output.as_mut())?;
        self.new_line()
    }

    fn new_line(&mut self) -> Result<()> {
        self.output.write_text("\r\n")?;
        self.output.flush()?;
        Ok(())
    }
}
