//! Minimal command dispatch: `exit` and `cd` builtins, everything else is
//! spawned as an external program with the words of the line as arguments.

use std::io;
use std::path::PathBuf;
use std::process::Command;

use log::debug;

use crate::error::ExecError;

/// What the shell does after a line ran
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Keep reading; carries the exit status of the line
    Continue(i32),
    /// Leave the shell with this status
    Exit(i32),
}

/// Run one submitted line. `last_status` is what a bare `exit` returns.
pub fn execute(line: &str, last_status: i32) -> Result<Outcome, ExecError> {
    let mut words = line.split_whitespace();
    let Some(program) = words.next() else {
        return Ok(Outcome::Continue(last_status));
    };
    let args: Vec<&str> = words.collect();

    match program {
        "exit" => exit(&args, last_status),
        "cd" => change_directory(&args).map(|()| Outcome::Continue(0)),
        _ => spawn(program, &args).map(Outcome::Continue),
    }
}

fn exit(args: &[&str], last_status: i32) -> Result<Outcome, ExecError> {
    match args.first() {
        None => Ok(Outcome::Exit(last_status)),
        Some(code) => code
            .parse::<i32>()
            .map(Outcome::Exit)
            .map_err(|_| ExecError::InvalidExitCode((*code).to_string())),
    }
}

fn change_directory(args: &[&str]) -> Result<(), ExecError> {
    let target = match args {
        [] => std::env::var_os("HOME")
            .map(PathBuf::from)
            .ok_or(ExecError::HomeNotSet)?,
        [dir] => PathBuf::from(dir),
        _ => return Err(ExecError::TooManyArguments),
    };
    std::env::set_current_dir(&target).map_err(|source| ExecError::ChangeDirectory {
        path: target.clone(),
        source,
    })?;
    debug!("cwd is now {}", target.display());
    Ok(())
}

fn spawn(program: &str, args: &[&str]) -> Result<i32, ExecError> {
    debug!("spawning {program} {args:?}");
    let status = Command::new(program)
        .args(args)
        .status()
        .map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => ExecError::NotFound(program.to_string()),
            _ => ExecError::Spawn {
                command: program.to_string(),
                source,
            },
        })?;
    Ok(exit_code(status))
}

#[cfg(unix)]
fn exit_code(status: std::process::ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;
    status
        .code()
        .or_else(|| status.signal().map(|signal| 128 + signal))
        .unwrap_or(1)
}

#[cfg(not(unix))]
fn exit_code(status: std::process::ExitStatus) -> i32 {
    status.code().unwrap_or(1)
}
