//! State machine-based key decoder for raw terminal input.
//!
//! Bytes are pulled one at a time from a [`ByteSource`]. Every intermediate
//! position inside an escape sequence is an explicit [`DecodeState`], and
//! [`DecodeState::advance`] is a pure function from a state and a byte to the
//! next state or a finished [`KeyEvent`]. Unrecognized or truncated escape
//! sequences degrade to [`Key::Escape`]; they are never errors.

use std::io::{self, Read};
use std::time::Duration;

use log::debug;

use crate::error::DecodeError;
use crate::key::{Key, KeyEvent};

/// How long to wait for the rest of an escape sequence after ESC
pub const DEFAULT_ESCAPE_TIMEOUT: Duration = Duration::from_millis(50);

const ESC: u8 = 0x1b;
const DEL: u8 = 0x7f;

/// A blocking source of input bytes.
pub trait ByteSource {
    /// Block until one byte is available. `Ok(None)` means the stream closed.
    fn read_byte(&mut self) -> io::Result<Option<u8>>;

    /// Wait at most `timeout` for one byte. `Ok(None)` means nothing arrived
    /// in time or the stream closed. Sources without timeout support block.
    fn read_byte_timeout(&mut self, timeout: Duration) -> io::Result<Option<u8>> {
        let _ = timeout;
        self.read_byte()
    }
}

impl<S: ByteSource + ?Sized> ByteSource for &mut S {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        (**self).read_byte()
    }

    fn read_byte_timeout(&mut self, timeout: Duration) -> io::Result<Option<u8>> {
        (**self).read_byte_timeout(timeout)
    }
}

impl<S: ByteSource + ?Sized> ByteSource for Box<S> {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        (**self).read_byte()
    }

    fn read_byte_timeout(&mut self, timeout: Duration) -> io::Result<Option<u8>> {
        (**self).read_byte_timeout(timeout)
    }
}

/// Adapts any [`Read`] implementation into a [`ByteSource`].
#[derive(Debug)]
pub struct ReaderSource<R> {
    reader: R,
}

impl<R: Read> ReaderSource<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    pub fn into_inner(self) -> R {
        self.reader
    }
}

impl<R: Read> ByteSource for ReaderSource<R> {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        let mut byte = [0u8; 1];
        loop {
            match self.reader.read(&mut byte) {
                Ok(0) => return Ok(None),
                Ok(_) => return Ok(Some(byte[0])),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }
}

/// Decoder position between two bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeState {
    /// No bytes of the current key consumed yet
    Ground,
    /// After ESC
    Escape,
    /// After ESC O
    Ss3,
    /// After ESC [
    Csi,
    /// After ESC [ 1
    CsiOne,
    /// After ESC [ 1 ;
    CsiModifier,
    /// After ESC [ 1 ; <modifier>
    CsiModified(u8),
    /// After ESC [ 3/4/7/8, waiting for `~` to produce the key
    CsiTilde(Key),
    /// After ESC [ 5/6 (Page Up/Down), one byte left to discard
    CsiDiscard,
    /// Inside a multi-byte UTF-8 character
    Utf8 { bytes: [u8; 4], len: u8, need: u8 },
}

/// Result of feeding one byte to a [`DecodeState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// A complete key was decoded
    Emit(KeyEvent),
    /// More bytes are needed
    Next(DecodeState),
    /// A key was decoded, and the byte belongs to the next key
    EmitThen(KeyEvent, u8),
}

impl DecodeState {
    /// Feed one byte and return the next state or a finished key.
    pub fn advance(self, byte: u8) -> Step {
        match self {
            DecodeState::Ground => Self::ground(byte),
            DecodeState::Escape => match byte {
                b'[' => Step::Next(DecodeState::Csi),
                b'O' => Step::Next(DecodeState::Ss3),
                0x20..=0x7e => Step::Emit(KeyEvent::rune(char::from(byte)).with_alt()),
                // The byte after ESC is consumed with it, even another ESC
                _ => self.degrade(byte),
            },
            DecodeState::Ss3 => match cursor_key(byte) {
                Some(key) => Step::Emit(KeyEvent::special(key)),
                None => self.degrade(byte),
            },
            DecodeState::Csi => match byte {
                b'1' => Step::Next(DecodeState::CsiOne),
                b'3' => Step::Next(DecodeState::CsiTilde(Key::Delete)),
                b'4' => Step::Next(DecodeState::CsiTilde(Key::End)),
                b'5' | b'6' => Step::Next(DecodeState::CsiDiscard),
                b'7' => Step::Next(DecodeState::CsiTilde(Key::Home)),
                b'8' => Step::Next(DecodeState::CsiTilde(Key::End)),
                _ => match cursor_key(byte) {
                    Some(key) => Step::Emit(KeyEvent::special(key)),
                    None => self.degrade(byte),
                },
            },
            DecodeState::CsiOne => match byte {
                b'~' => Step::Emit(KeyEvent::special(Key::Home)),
                b';' => Step::Next(DecodeState::CsiModifier),
                _ => self.degrade(byte),
            },
            DecodeState::CsiModifier => Step::Next(DecodeState::CsiModified(byte)),
            DecodeState::CsiModified(modifier) => match (modifier, byte) {
                (b'5', b'C') => Step::Emit(KeyEvent::special(Key::ControlRight).with_ctrl()),
                (b'5', b'D') => Step::Emit(KeyEvent::special(Key::ControlLeft).with_ctrl()),
                _ => match cursor_key(byte) {
                    Some(key) => Step::Emit(KeyEvent::special(key)),
                    None => self.degrade(byte),
                },
            },
            DecodeState::CsiTilde(key) => {
                if byte == b'~' {
                    Step::Emit(KeyEvent::special(key))
                } else {
                    self.degrade(byte)
                }
            }
            // Page Up/Down are not supported
            DecodeState::CsiDiscard => self.degrade(byte),
            DecodeState::Utf8 {
                mut bytes,
                len,
                need,
            } => {
                if !is_continuation(byte) {
                    debug!("invalid UTF-8 continuation byte {byte:#04x}");
                    return Step::EmitThen(KeyEvent::rune(char::REPLACEMENT_CHARACTER), byte);
                }
                bytes[usize::from(len)] = byte;
                let len = len + 1;
                if len < need {
                    return Step::Next(DecodeState::Utf8 { bytes, len, need });
                }
                let ch = std::str::from_utf8(&bytes[..usize::from(len)])
                    .ok()
                    .and_then(|s| s.chars().next())
                    .unwrap_or(char::REPLACEMENT_CHARACTER);
                Step::Emit(KeyEvent::rune(ch))
            }
        }
    }

    /// Resolve the state when no further byte arrives (end of stream or
    /// escape timeout).
    pub fn at_end(self) -> Result<KeyEvent, DecodeError> {
        match self {
            DecodeState::Ground => Err(DecodeError::EndOfStream),
            DecodeState::Utf8 { .. } => Err(DecodeError::TruncatedUtf8),
            _ => Ok(KeyEvent::special(Key::Escape)),
        }
    }

    /// Whether this state is inside an escape sequence, where the next byte
    /// is read with the escape timeout.
    pub fn in_escape_sequence(&self) -> bool {
        !matches!(self, DecodeState::Ground | DecodeState::Utf8 { .. })
    }

    fn ground(byte: u8) -> Step {
        match byte {
            ESC => Step::Next(DecodeState::Escape),
            0x00..=0x1f => Step::Emit(control_key(byte)),
            DEL => Step::Emit(KeyEvent::special(Key::Backspace)),
            0x20..=0x7e => Step::Emit(KeyEvent::rune(char::from(byte))),
            _ => match utf8_width(byte) {
                Some(need) => Step::Next(DecodeState::Utf8 {
                    bytes: [byte, 0, 0, 0],
                    len: 1,
                    need,
                }),
                None => {
                    debug!("invalid UTF-8 lead byte {byte:#04x}");
                    Step::Emit(KeyEvent::rune(char::REPLACEMENT_CHARACTER))
                }
            },
        }
    }

    fn degrade(self, byte: u8) -> Step {
        debug!("unrecognized sequence in state {self:?} at byte {byte:#04x}; decoding as Escape");
        Step::Emit(KeyEvent::special(Key::Escape))
    }
}

/// Map a control byte (other than ESC) to its key.
fn control_key(byte: u8) -> KeyEvent {
    let ctrl = |key| KeyEvent::special(key).with_ctrl();
    match byte {
        1 => ctrl(Key::ControlA),
        2 => ctrl(Key::ControlB),
        3 => ctrl(Key::ControlC),
        4 => ctrl(Key::ControlD),
        5 => ctrl(Key::ControlE),
        6 => ctrl(Key::ControlF),
        9 => KeyEvent::special(Key::Tab),
        10 | 13 => KeyEvent::special(Key::Enter),
        11 => ctrl(Key::ControlK),
        12 => ctrl(Key::ControlL),
        14 => ctrl(Key::ControlN),
        16 => ctrl(Key::ControlP),
        18 => ctrl(Key::ControlR),
        21 => ctrl(Key::ControlU),
        23 => ctrl(Key::ControlW),
        // Ctrl+letter is sent as letter - 64
        other => KeyEvent::rune(char::from(other + 64)).with_ctrl(),
    }
}

/// Final byte shared by the SS3 and CSI cursor-key forms.
fn cursor_key(byte: u8) -> Option<Key> {
    match byte {
        b'A' => Some(Key::Up),
        b'B' => Some(Key::Down),
        b'C' => Some(Key::Right),
        b'D' => Some(Key::Left),
        b'H' => Some(Key::Home),
        b'F' => Some(Key::End),
        _ => None,
    }
}

fn utf8_width(lead: u8) -> Option<u8> {
    match lead {
        0xc2..=0xdf => Some(2),
        0xe0..=0xef => Some(3),
        0xf0..=0xf4 => Some(4),
        _ => None,
    }
}

fn is_continuation(byte: u8) -> bool {
    byte & 0xc0 == 0x80
}

/// Reads one logical key at a time from a [`ByteSource`].
#[derive(Debug)]
pub struct KeyDecoder<S> {
    source: S,
    escape_timeout: Duration,
    pending: Option<u8>,
}

impl<S: ByteSource> KeyDecoder<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            escape_timeout: DEFAULT_ESCAPE_TIMEOUT,
            pending: None,
        }
    }

    /// Set how long to wait for the bytes following ESC
    pub fn with_escape_timeout(mut self, timeout: Duration) -> Self {
        self.escape_timeout = timeout;
        self
    }

    pub fn escape_timeout(&self) -> Duration {
        self.escape_timeout
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn into_source(self) -> S {
        self.source
    }

    /// Read exactly one key, blocking until it is complete.
    ///
    /// # Errors
    ///
    /// [`DecodeError::EndOfStream`] if the source closes before the first
    /// byte, [`DecodeError::TruncatedUtf8`] if it closes inside a character,
    /// and [`DecodeError::Io`] for any read failure.
    pub fn read_key(&mut self) -> Result<KeyEvent, DecodeError> {
        let mut state = DecodeState::Ground;
        loop {
            let Some(byte) = self.next_byte(&state)? else {
                return state.at_end();
            };
            match state.advance(byte) {
                Step::Emit(key) => return Ok(key),
                Step::EmitThen(key, byte) => {
                    self.pending = Some(byte);
                    return Ok(key);
                }
                Step::Next(next) => state = next,
            }
        }
    }

    fn next_byte(&mut self, state: &DecodeState) -> Result<Option<u8>, DecodeError> {
        if let Some(byte) = self.pending.take() {
            return Ok(Some(byte));
        }
        if !state.in_escape_sequence() {
            return Ok(self.source.read_byte()?);
        }
        match self.source.read_byte_timeout(self.escape_timeout) {
            Ok(byte) => Ok(byte),
            Err(e) if matches!(e.kind(), io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut) => {
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }
}

impl<R: Read> KeyDecoder<ReaderSource<R>> {
    /// Decode keys from any reader
    pub fn from_reader(reader: R) -> Self {
        Self::new(ReaderSource::new(reader))
    }
}

/// Decode every key in `bytes` until the input is exhausted.
///
/// # Errors
///
/// Returns [`DecodeError::TruncatedUtf8`] if `bytes` ends inside a character.
pub fn decode_all(bytes: &[u8]) -> Result<Vec<KeyEvent>, DecodeError> {
    let mut decoder = KeyDecoder::from_reader(bytes);
    let mut keys = Vec::new();
    loop {
        match decoder.read_key() {
            Ok(key) => keys.push(key),
            Err(DecodeError::EndOfStream) => return Ok(keys),
            Err(e) => return Err(e),
        }
    }
}
