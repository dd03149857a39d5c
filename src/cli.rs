use clap::Parser;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "shellkit")]
#[command(about = "Interactive shell with line editing and inline history suggestions")]
#[command(version)]
pub struct Cli {
    /// Prompt text, may contain ANSI color sequences
    #[arg(long, default_value = "$ ")]
    pub prompt: String,

    /// Milliseconds to wait for the rest of an escape sequence after ESC
    #[arg(long, default_value_t = 50)]
    pub escape_timeout_ms: u64,

    /// Disable inline suggestions from history
    #[arg(long)]
    pub no_suggestions: bool,

    /// Maximum number of history entries kept in memory
    #[arg(long, default_value_t = 500)]
    pub history_size: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellConfig {
    pub prompt: String,
    pub escape_timeout: Duration,
    pub suggestions: bool,
    pub history_size: usize,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            prompt: "$ ".to_string(),
            escape_timeout: shellkit_core::DEFAULT_ESCAPE_TIMEOUT,
            suggestions: true,
            history_size: 500,
        }
    }
}

impl ShellConfig {
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            prompt: cli.prompt.clone(),
            escape_timeout: Duration::from_millis(cli.escape_timeout_ms),
            suggestions: !cli.no_suggestions,
            history_size: cli.history_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_config_default() {
        let cli = Cli::try_parse_from(["shellkit"]).unwrap();
        assert_eq!(ShellConfig::from_cli(&cli), ShellConfig::default());
    }

    #[test]
    fn test_all_flags() {
        let cli = Cli::try_parse_from([
            "shellkit",
            "--prompt",
            "> ",
            "--escape-timeout-ms",
            "10",
            "--no-suggestions",
            "--history-size",
            "3",
        ])
        .unwrap();
        let config = ShellConfig::from_cli(&cli);
        assert_eq!(config.prompt, "> ");
        assert_eq!(config.escape_timeout, Duration::from_millis(10));
        assert!(!config.suggestions);
        assert_eq!(config.history_size, 3);
    }

    #[test]
    fn test_invalid_number_is_rejected() {
        assert!(Cli::try_parse_from(["shellkit", "--history-size", "lots"]).is_err());
    }
}
