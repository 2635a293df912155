//! CLI command definitions using clap

use std::path::PathBuf;

use calcpad::config::AutoClearPolicy;
use clap::{Args, Parser, Subcommand, ValueEnum};

/// Calcpad: a keypad calculator for the terminal
#[derive(Parser, Debug)]
#[command(name = "calcpad")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (log errors only; results are still printed)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output (auto, always, never)
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorArg,

    /// YAML configuration file
    #[arg(long, global = true, env = "CALCPAD_CONFIG")]
    pub config: Option<PathBuf>,

    /// Delay before an error clears itself, in milliseconds
    #[arg(long, global = true)]
    pub auto_clear_ms: Option<u64>,

    /// What a pending auto-clear does when the user types first
    #[arg(long, global = true)]
    pub policy: Option<PolicyArg>,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Evaluate one expression and print the display text
    Eval(EvalArgs),

    /// Replay a sequence of key presses and print the display
    Keys(KeysArgs),

    /// Run the interactive terminal calculator
    Tui,
}

/// Arguments for `eval`
#[derive(Args, Debug)]
pub struct EvalArgs {
    /// Expression using digits, `.`, `+ - * /` and parentheses
    #[arg(allow_hyphen_values = true)]
    pub expression: String,

    /// Print a JSON object instead of the display text
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `keys`
#[derive(Args, Debug)]
pub struct KeysArgs {
    /// Browser key names (`7`, `+`, `Enter`, `Backspace`, `Escape`);
    /// `@<ms>` lets that much time pass
    #[arg(required = true)]
    pub keys: Vec<String>,

    /// Print the display after every key
    #[arg(long)]
    pub steps: bool,
}

/// Auto-clear policy argument
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum PolicyArg {
    /// Typing, deleting or clearing cancels the pending auto-clear
    CancelOnInput,
    /// The auto-clear always fires, even over newer input
    Unconditional,
}

impl From<PolicyArg> for AutoClearPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::CancelOnInput => Self::CancelOnInput,
            PolicyArg::Unconditional => Self::Unconditional,
        }
    }
}

/// Color argument for CLI
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum ColorArg {
    /// Automatic color detection
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

impl From<ColorArg> for crate::config::ColorChoice {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Auto => Self::Auto,
            ColorArg::Always => Self::Always,
            ColorArg::Never => Self::Never,
        }
    }
}
