pub mod cli;
pub mod error;
pub mod exec;
pub mod history;
pub mod shell;

pub use cli::{Cli, ShellConfig};
pub use error::{ExecError, Result, ShellError};
pub use exec::Outcome;
pub use history::{History, HistoryCursor, HistorySuggester};
pub use shell::Shell;
