//! Calcpad CLI library
//!
//! Argument parsing, configuration layering, logging setup and the
//! subcommand handlers behind the `calcpad` binary.

#![warn(missing_docs)]

mod commands;
mod config;
mod error;
pub mod handlers;
pub mod logging;

pub use commands::{Cli, ColorArg, Commands, EvalArgs, KeysArgs, PolicyArg};
pub use config::{CliConfig, ColorChoice, Verbosity};
pub use error::{CliError, CliResult};
