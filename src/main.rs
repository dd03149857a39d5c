use clap::Parser;
use shellkit::{Cli, Result, Shell, ShellConfig};
use std::process;

fn main() {
    match run() {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

fn run() -> Result<i32> {
    let cli = Cli::parse();

    if let Some(path) = shellkit_io::debug::init_debug_logger()? {
        eprintln!("shellkit debug log enabled: {}", path.display());
    }

    let config = ShellConfig::from_cli(&cli);
    let (input, output) = shellkit_io::create_console_io()?;
    let mut shell = Shell::new(input, output, config);
    shell.run()
}
