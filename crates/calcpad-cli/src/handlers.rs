//! Subcommand implementations

use std::io::Write;
use std::time::Duration;

use calcpad::clock::ManualClock;
use calcpad::controller::{DisplayController, DisplayState};
use calcpad::input::route_key;
use console::style;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::commands::{EvalArgs, KeysArgs};
use crate::config::CliConfig;
use crate::error::{CliError, CliResult};

/// JSON shape printed by `eval --json`
#[derive(Debug, Serialize)]
pub struct EvalOutput<'a> {
    /// Expression as given
    pub expression: &'a str,
    /// What the calculator display shows afterwards
    pub display: &'a str,
    /// Whether evaluation produced a number
    pub ok: bool,
}

/// `calcpad eval`
pub fn execute_eval<W: Write>(config: &CliConfig, args: &EvalArgs, out: &mut W) -> CliResult<()> {
    let mut calc = DisplayController::with_clock(ManualClock::new(), config.calculator.clone());
    calc.append(&args.expression);
    let result = calc.evaluate();

    if args.json {
        let output = EvalOutput {
            expression: &args.expression,
            display: calc.display(),
            ok: result.is_ok(),
        };
        writeln!(out, "{}", serde_json::to_string(&output)?)?;
    } else if result.is_ok() {
        writeln!(out, "{}", calc.display())?;
    } else {
        writeln!(out, "{}", style(calc.display()).red())?;
    }

    result
        .map(|value| info!(expression = %args.expression, value, "evaluated"))
        .map_err(|source| CliError::evaluation(&args.expression, source))
}

/// One step of a scripted session
#[derive(Debug, Clone, PartialEq, Eq)]
enum Step<'a> {
    Key(&'a str),
    Wait(Duration),
}

impl<'a> Step<'a> {
    fn parse(token: &'a str) -> Self {
        token
            .strip_prefix('@')
            .and_then(|ms| ms.parse().ok())
            .map_or(Self::Key(token), |ms| Self::Wait(Duration::from_millis(ms)))
    }
}

/// `calcpad keys`
pub fn execute_keys<W: Write>(config: &CliConfig, args: &KeysArgs, out: &mut W) -> CliResult<()> {
    let clock = ManualClock::new();
    let mut calc = DisplayController::with_clock(clock.clone(), config.calculator.clone());

    for token in &args.keys {
        match Step::parse(token) {
            Step::Key(key) => {
                let route = route_key(key);
                match route.command {
                    Some(command) => {
                        debug!(key, ?command, "key");
                        calc.execute(command);
                    }
                    None => warn!(key, "ignored key"),
                }
            }
            Step::Wait(by) => {
                clock.advance(by);
                calc.tick();
            }
        }

        if args.steps {
            writeln!(out, "{token}\t{}", render(&calc))?;
        }
    }

    if !args.steps {
        writeln!(out, "{}", render(&calc))?;
    }
    Ok(())
}

/// `calcpad tui`
pub fn execute_tui(config: &CliConfig) -> CliResult<()> {
    calcpad::tui::run(config.calculator.clone())?;
    Ok(())
}

fn render(calc: &DisplayController<ManualClock>) -> String {
    if calc.state() == DisplayState::ErrorDisplay {
        style(calc.display()).red().to_string()
    } else {
        calc.display().to_string()
    }
}
