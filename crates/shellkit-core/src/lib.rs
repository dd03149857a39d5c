//! Shell Core Library
//!
//! This crate provides the terminal input and editing core of the shell: a
//! byte-level key decoder for raw terminal input, a code-point based line
//! editor, and the console traits the editor renders through. It performs no
//! terminal I/O itself; platform backends live in `shellkit-io`.

pub mod key;
pub mod key_decoder;

pub mod error;
pub mod line_editor;
pub mod suggestion;
pub mod unicode;

// Console I/O abstraction
pub mod console;

// Re-export commonly used types for convenience
pub use key::{Key, KeyCode, KeyEvent};
pub use key_decoder::{
    decode_all, ByteSource, DecodeState, KeyDecoder, ReaderSource, Step, DEFAULT_ESCAPE_TIMEOUT,
};

pub use error::{ConsoleError, ConsoleResult, DecodeError};
pub use line_editor::LineEditor;
pub use suggestion::{PrefixSuggester, SuggestionProvider};
pub use unicode::display_width;

// Re-export console types
pub use console::{
    AnsiOutput, ClearType, Color, ConsoleInput, ConsoleOutput, RawModeGuard, TextStyle,
};
