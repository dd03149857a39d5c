//! Key Input Debug Example - prints each decoded key with the bytes it came from
//!
//! Usage: cargo run -p shellkit-io --example debug_key_input
//! Press Ctrl+C to exit.

use shellkit_core::{ByteSource, Key, KeyDecoder, KeyEvent};
use shellkit_io::{ConsoleInput, ConsoleOutput};
use std::io;
use std::time::Duration;

/// Byte source that remembers what the decoder consumed
struct RecordingSource<S> {
    inner: S,
    seen: Vec<u8>,
}

impl<S> RecordingSource<S> {
    fn new(inner: S) -> Self {
        Self {
            inner,
            seen: Vec::new(),
        }
    }

    fn take_seen(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.seen)
    }
}

impl<S: ByteSource> ByteSource for RecordingSource<S> {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        let byte = self.inner.read_byte()?;
        self.seen.extend(byte);
        Ok(byte)
    }

    fn read_byte_timeout(&mut self, timeout: Duration) -> io::Result<Option<u8>> {
        let byte = self.inner.read_byte_timeout(timeout)?;
        self.seen.extend(byte);
        Ok(byte)
    }
}

/// Format raw bytes for display
fn format_bytes(bytes: &[u8]) -> String {
    let hex: String = bytes
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect::<Vec<_>>()
        .join(" ");

    let ascii: String = bytes
        .iter()
        .map(|&b| {
            if b.is_ascii_graphic() || b == b' ' {
                b as char
            } else {
                '.'
            }
        })
        .collect();

    format!("[{}] \"{}\"", hex, ascii)
}

fn describe(event: &KeyEvent) -> String {
    let mut text = format!("{:?}", event.code);
    if event.ctrl {
        text.push_str(" +ctrl");
    }
    if event.alt {
        text.push_str(" +alt");
    }
    text
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    if let Some(path) = shellkit_io::debug::init_debug_logger()? {
        eprintln!("shellkit debug log enabled: {}", path.display());
    }

    let (input, mut output) = shellkit_io::create_console_io()?;
    output.write_text("Key Input Debug Tool\r\nPress keys to see their events. Press Ctrl+C to exit.\r\n")?;

    let (cols, rows) = input.get_window_size()?;
    let _raw = input.enable_raw_mode()?;
    output.write_text(&format!(
        "[{}] window size cols={cols}, rows={rows}\r\nReady for input...\r\n",
        input.platform_name()
    ))?;
    output.flush()?;

    let mut decoder = KeyDecoder::new(RecordingSource::new(input));
    loop {
        let event = match decoder.read_key() {
            Ok(event) => event,
            Err(e) if e.is_end_of_stream() => break,
            Err(e) => {
                output.write_text(&format!("Input error: {e}\r\n"))?;
                break;
            }
        };
        let raw = decoder.source_mut().take_seen();
        output.write_text(&format!(
            "Key: {} | Raw: {}\r\n",
            describe(&event),
            format_bytes(&raw)
        ))?;
        output.flush()?;

        if event.is(Key::ControlC) {
            output.write_text("Received Ctrl+C, shutting down...\r\n")?;
            break;
        }
    }

    output.write_text("Done. Goodbye!\r\n")?;
    output.flush()?;
    Ok(())
}
