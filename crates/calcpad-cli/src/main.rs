//! Calcpad CLI
//!
//! ## Usage
//!
//! ```bash
//! calcpad eval "2+3*4"              # prints 14
//! calcpad eval "1/0" --json         # {"expression":"1/0","display":"Error","ok":false}
//! calcpad keys 9 / 2 Enter          # replays key presses
//! calcpad keys = @1500 --steps      # lets the error clear itself
//! calcpad tui                       # interactive keypad
//! ```

use std::process::ExitCode;

use calcpad_cli::{
    handlers,
    logging::{self, LogTarget},
    Cli, CliConfig, CliResult, Commands,
};
use clap::Parser;
use tracing::debug;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> CliResult<()> {
    let cli = Cli::parse();
    let config = CliConfig::from_cli(&cli)?;

    config.color.apply();
    let interactive = matches!(cli.command, Commands::Tui);
    logging::init(config.verbosity, LogTarget::select(&config, interactive))?;
    debug!(?config, "configuration loaded");

    let mut stdout = std::io::stdout().lock();
    match &cli.command {
        Commands::Eval(args) => handlers::execute_eval(&config, args, &mut stdout),
        Commands::Keys(args) => handlers::execute_keys(&config, args, &mut stdout),
        Commands::Tui => {
            drop(stdout);
            handlers::execute_tui(&config)
        }
    }
}
