//! Debug logging backend for shellkit
//!
//! The libraries log through the `log` facade. Writing those records to the
//! terminal would corrupt the line being edited, so when enabled they are
//! appended to a file instead:
//!
//! ```text
//! SHELLKIT_DEBUG=1 SHELLKIT_DEBUG_FILE=/tmp/sk.log shellkit
//! ```

use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use log::{Level, LevelFilter, Log, Metadata, Record};

const ENV_ENABLE_LOG: &str = "SHELLKIT_DEBUG";
const ENV_LOG_FILE: &str = "SHELLKIT_DEBUG_FILE";
const DEFAULT_LOG_PATH: &str = "/tmp/shellkit-debug.log";

/// `log` backend appending one line per record to a file
pub struct FileLogger {
    file: Mutex<File>,
    level: LevelFilter,
}

impl FileLogger {
    pub fn open(path: &Path, level: LevelFilter) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
            level,
        })
    }
}

impl Log for FileLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        let line = format_line(timestamp, record.level(), record.target(), record.args());

        if let Ok(mut file) = self.file.lock() {
            if let Err(e) = writeln!(file, "{line}") {
                eprintln!("Failed to write to debug log: {e}");
            } else {
                let _ = file.flush();
            }
        }
    }

    fn flush(&self) {
        if let Ok(mut file) = self.file.lock() {
            let _ = file.flush();
        }
    }
}

fn format_line(timestamp: u64, level: Level, target: &str, message: &fmt::Arguments) -> String {
    format!("[{timestamp}] {level:<5} {target}: {message}")
}

fn is_enabled_value(value: &str) -> bool {
    value == "1" || value == "true"
}

/// Log file location: `$SHELLKIT_DEBUG_FILE`, else `/tmp/shellkit-debug.log`
pub fn log_path_from_env() -> PathBuf {
    std::env::var_os(ENV_LOG_FILE)
        .filter(|p| !p.is_empty())
        .map_or_else(|| PathBuf::from(DEFAULT_LOG_PATH), PathBuf::from)
}

/// Install a [`FileLogger`] as the global logger.
///
/// Fails if the file cannot be opened or a logger is already installed.
pub fn install(path: &Path, level: LevelFilter) -> io::Result<()> {
    let logger = FileLogger::open(path, level)?;
    log::set_boxed_logger(Box::new(logger)).map_err(|e| io::Error::other(e.to_string()))?;
    log::set_max_level(level);
    Ok(())
}

/// Install the file logger if `SHELLKIT_DEBUG` is `1` or `true`.
///
/// Returns the log path when logging was enabled.
pub fn init_debug_logger() -> io::Result<Option<PathBuf>> {
    match std::env::var(ENV_ENABLE_LOG) {
        Ok(value) if is_enabled_value(&value) => {}
        _ => return Ok(None),
    }
    let path = log_path_from_env();
    install(&path, LevelFilter::Trace)?;
    Ok(Some(path))
}
