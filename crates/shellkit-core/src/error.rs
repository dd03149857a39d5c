//! Error types for key decoding and console operations.

use std::io;
use thiserror::Error;

/// Errors returned by [`KeyDecoder::read_key`](crate::key_decoder::KeyDecoder::read_key).
///
/// Malformed escape sequences are never reported here; they decode to
/// [`Key::Escape`](crate::key::Key::Escape).
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The input stream closed before any byte of a new key was read
    #[error("end of input stream")]
    EndOfStream,

    /// The input stream closed in the middle of a multi-byte character
    #[error("input ended inside a UTF-8 sequence")]
    TruncatedUtf8,

    #[error("input I/O error: {0}")]
    Io(#[from] io::Error),
}

impl DecodeError {
    /// True for a clean end of input, as opposed to a failure
    pub fn is_end_of_stream(&self) -> bool {
        matches!(self, DecodeError::EndOfStream)
    }
}

/// Console operation errors
#[derive(Debug, Error)]
pub enum ConsoleError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Terminal setup/teardown error
    #[error("Terminal error: {0}")]
    TerminalError(String),

    #[error("Feature '{feature}' not supported on platform '{platform}'")]
    UnsupportedFeature { feature: String, platform: String },
}

/// Result type for console operations
pub type ConsoleResult<T> = Result<T, ConsoleError>;
