use std::io;
use std::path::PathBuf;

use shellkit_core::{ConsoleError, DecodeError};
use thiserror::Error;

/// Fatal shell errors; these end the session
#[derive(Debug, Error)]
pub enum ShellError {
    #[error("Console error: {0}")]
    Console(#[from] ConsoleError),

    #[error("Input error: {0}")]
    Decode(#[from] DecodeError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Errors from running one command line. Reported, then the shell goes on.
#[derive(Debug, Error)]
pub enum ExecError {
    #[error("{0}: command not found")]
    NotFound(String),

    #[error("{command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("exit: {0}: numeric argument required")]
    InvalidExitCode(String),

    #[error("cd: too many arguments")]
    TooManyArguments,

    #[error("cd: HOME not set")]
    HomeNotSet,

    #[error("cd: {}: {source}", .path.display())]
    ChangeDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ExecError {
    /// Exit status a POSIX shell would report for this failure
    pub fn status(&self) -> i32 {
        match self {
            ExecError::NotFound(_) => 127,
            ExecError::Spawn { .. } => 126,
            ExecError::InvalidExitCode(_) => 2,
            ExecError::TooManyArguments
            | ExecError::HomeNotSet
            | ExecError::ChangeDirectory { .. } => 1,
        }
    }
}

pub type Result<T, E = ShellError> = std::result::Result<T, E>;
