//! Terminal backends for the shell.
//!
//! Provides the platform implementations of the console traits from
//! `shellkit-core`:
//! - `UnixConsoleInput` / `UnixConsoleOutput` (POSIX termios + VT sequences)
//! - `MockConsoleInput` / `MockConsoleOutput` (scripted, in-memory; for tests)
//!
//! plus the file-backed `log` backend in [`debug`].

// Re-export core types and traits
pub use shellkit_core::{
    AnsiOutput, ByteSource, ClearType, Color, ConsoleError, ConsoleInput, ConsoleOutput,
    ConsoleResult, RawModeGuard, TextStyle,
};

pub mod debug;
pub mod mock;

#[cfg(unix)]
pub mod unix;

pub use mock::{MockConsoleInput, MockConsoleOutput, SharedBuffer};

#[cfg(unix)]
pub use unix::{FdWriter, UnixConsoleInput, UnixConsoleOutput};

/// Create both console input and output for the current platform
pub fn create_console_io() -> ConsoleResult<(Box<dyn ConsoleInput>, Box<dyn ConsoleOutput>)> {
    let input = create_console_input()?;
    let output = create_console_output()?;
    Ok((input, output))
}

/// Create console input for the current platform
pub fn create_console_input() -> ConsoleResult<Box<dyn ConsoleInput>> {
    #[cfg(unix)]
    {
        Ok(Box::new(unix::UnixConsoleInput::new()))
    }

    #[cfg(not(unix))]
    {
        Err(unsupported("console input"))
    }
}

/// Create console output for the current platform
pub fn create_console_output() -> ConsoleResult<Box<dyn ConsoleOutput>> {
    #[cfg(unix)]
    {
        Ok(Box::new(unix::stdout_output()))
    }

    #[cfg(not(unix))]
    {
        Err(unsupported("console output"))
    }
}

#[cfg(not(unix))]
fn unsupported(feature: &str) -> ConsoleError {
    ConsoleError::UnsupportedFeature {
        feature: feature.to_string(),
        platform: std::env::consts::OS.to_string(),
    }
}
