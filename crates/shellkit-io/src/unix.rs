use std::io::{self, Write};
use std::os::unix::io::RawFd;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use log::{debug, warn};

use crate::{AnsiOutput, ByteSource, ConsoleError, ConsoleInput, ConsoleResult, RawModeGuard};

const PLATFORM_NAME: &str = "Unix VT";

/// Size reported when the terminal cannot be queried
pub const FALLBACK_WINDOW_SIZE: (u16, u16) = (80, 24);

enum RawModeState {
    Normal,
    Raw { original: libc::termios },
}

/// Terminal input on a Unix file descriptor (stdin by default).
///
/// Each instance tracks its own raw-mode state, so the saved termios is
/// restored exactly once no matter how many guards were handed out.
pub struct UnixConsoleInput {
    fd: RawFd,
    state: Arc<Mutex<RawModeState>>,
}

impl Default for UnixConsoleInput {
    fn default() -> Self {
        Self::new()
    }
}

impl UnixConsoleInput {
    pub fn new() -> Self {
        Self::from_fd(libc::STDIN_FILENO)
    }

    pub fn from_fd(fd: RawFd) -> Self {
        Self {
            fd,
            state: Arc::new(Mutex::new(RawModeState::Normal)),
        }
    }

    pub fn is_raw(&self) -> bool {
        matches!(
            self.state.lock().as_deref(),
            Ok(RawModeState::Raw { .. })
        )
    }

    fn enter_raw_mode(fd: RawFd) -> io::Result<libc::termios> {
        let mut original: libc::termios = unsafe { std::mem::zeroed() };
        if unsafe { libc::tcgetattr(fd, &mut original) } != 0 {
            return Err(io::Error::last_os_error());
        }
        let mut raw = original;
        raw.c_lflag &= !(libc::ICANON | libc::ECHO | libc::ISIG | libc::IEXTEN);
        raw.c_iflag &= !(libc::IXON | libc::ICRNL | libc::BRKINT | libc::INPCK | libc::ISTRIP);
        raw.c_oflag &= !libc::OPOST;
        raw.c_cflag &= !libc::CSIZE;
        raw.c_cflag |= libc::CS8;
        // Blocking reads of at least one byte
        raw.c_cc[libc::VMIN] = 1;
        raw.c_cc[libc::VTIME] = 0;
        if unsafe { libc::tcsetattr(fd, libc::TCSANOW, &raw) } != 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(original)
    }
}

fn restore_termios(fd: RawFd, original: &libc::termios) -> io::Result<()> {
    if unsafe { libc::tcsetattr(fd, libc::TCSANOW, original) } != 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

/// Put back the saved configuration if this instance is still raw.
fn restore_saved(fd: RawFd, state: &Mutex<RawModeState>) {
    // Restore even if a panic poisoned the lock
    let mut state = state.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    if let RawModeState::Raw { original } = std::mem::replace(&mut *state, RawModeState::Normal) {
        match restore_termios(fd, &original) {
            Ok(()) => debug!("raw mode disabled on fd {fd}"),
            Err(e) => warn!("failed to restore terminal mode on fd {fd}: {e}"),
        }
    }
}

fn read_one(fd: RawFd) -> io::Result<Option<u8>> {
    let mut byte = 0u8;
    loop {
        let n = unsafe { libc::read(fd, (&mut byte as *mut u8).cast::<libc::c_void>(), 1) };
        match n {
            1 => return Ok(Some(byte)),
            0 => return Ok(None),
            _ => {
                let err = io::Error::last_os_error();
                if err.kind() == io::ErrorKind::Interrupted {
                    continue;
                }
                return Err(err);
            }
        }
    }
}

/// Wait until `fd` is readable. Returns false on timeout.
fn wait_readable(fd: RawFd, timeout: Duration) -> io::Result<bool> {
    let mut pfd = libc::pollfd {
        fd,
        events: libc::POLLIN,
        revents: 0,
    };
    let millis = libc::c_int::try_from(timeout.as_millis()).unwrap_or(libc::c_int::MAX);
    loop {
        let n = unsafe { libc::poll(&mut pfd, 1, millis) };
        if n >= 0 {
            return Ok(n > 0);
        }
        let err = io::Error::last_os_error();
        if err.kind() != io::ErrorKind::Interrupted {
            return Err(err);
        }
    }
}

fn query_window_size(fd: RawFd) -> io::Result<Option<(u16, u16)>> {
    let mut ws: libc::winsize = unsafe { std::mem::zeroed() };
    if unsafe { libc::ioctl(fd, libc::TIOCGWINSZ, &mut ws) } == -1 {
        return Err(io::Error::last_os_error());
    }
    if ws.ws_col == 0 || ws.ws_row == 0 {
        return Ok(None);
    }
    Ok(Some((ws.ws_col, ws.ws_row)))
}

impl ByteSource for UnixConsoleInput {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        read_one(self.fd)
    }

    fn read_byte_timeout(&mut self, timeout: Duration) -> io::Result<Option<u8>> {
        if !wait_readable(self.fd, timeout)? {
            return Ok(None);
        }
        read_one(self.fd)
    }
}

impl ConsoleInput for UnixConsoleInput {
    fn is_terminal(&self) -> bool {
        unsafe { libc::isatty(self.fd) == 1 }
    }

    fn enable_raw_mode(&self) -> ConsoleResult<RawModeGuard> {
        if !self.is_terminal() {
            debug!("fd {} is not a terminal; raw mode skipped", self.fd);
            return Ok(RawModeGuard::noop(PLATFORM_NAME.to_string()));
        }

        let mut state = self
            .state
            .lock()
            .map_err(|_| ConsoleError::TerminalError("raw mode state lock poisoned".to_string()))?;
        if matches!(*state, RawModeState::Raw { .. }) {
            return Ok(RawModeGuard::noop(PLATFORM_NAME.to_string()));
        }
        let original = Self::enter_raw_mode(self.fd)?;
        *state = RawModeState::Raw { original };
        drop(state);
        debug!("raw mode enabled on fd {}", self.fd);

        let fd = self.fd;
        let shared = Arc::clone(&self.state);
        Ok(RawModeGuard::new(
            move || restore_saved(fd, &shared),
            PLATFORM_NAME.to_string(),
        ))
    }

    fn get_window_size(&self) -> ConsoleResult<(u16, u16)> {
        match query_window_size(libc::STDOUT_FILENO) {
            Ok(Some(size)) => Ok(size),
            Ok(None) => Ok(FALLBACK_WINDOW_SIZE),
            Err(e) => {
                debug!("TIOCGWINSZ failed: {e}; using {FALLBACK_WINDOW_SIZE:?}");
                Ok(FALLBACK_WINDOW_SIZE)
            }
        }
    }

    fn platform_name(&self) -> &str {
        PLATFORM_NAME
    }
}

/// Unbuffered writer over a raw file descriptor.
///
/// Writes go straight to `write(2)`, bypassing `std::io::Stdout`'s line
/// buffer, which would otherwise hold back a redraw with no trailing newline.
#[derive(Debug, Clone, Copy)]
pub struct FdWriter {
    fd: RawFd,
}

impl FdWriter {
    pub fn new(fd: RawFd) -> Self {
        Self { fd }
    }

    pub fn stdout() -> Self {
        Self::new(libc::STDOUT_FILENO)
    }
}

impl Write for FdWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        loop {
            let n = unsafe { libc::write(self.fd, buf.as_ptr().cast::<libc::c_void>(), buf.len()) };
            if n >= 0 {
                return Ok(n as usize);
            }
            let err = io::Error::last_os_error();
            if err.kind() != io::ErrorKind::Interrupted {
                return Err(err);
            }
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// VT output on a Unix file descriptor
pub type UnixConsoleOutput = AnsiOutput<FdWriter>;

/// VT output on stdout
pub fn stdout_output() -> UnixConsoleOutput {
    AnsiOutput::new(FdWriter::stdout())
}
