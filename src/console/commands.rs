//! Command handlers
//!
//! Output goes through `core::fmt::Write` with plain `\n` line endings;
//! the interpreter wraps the UART in a `CrlfWriter`.

use core::fmt::Write;
use core::str::FromStr;

use super::parser::ParsedCommand;
use super::ConsoleError;
use crate::config::{
    find_param, find_params_matching, AdcRequest, ADC_MAX_CHANNEL, ADC_MAX_FREQ_HZ,
    ADC_MAX_SAMPLES, ADC_MIN_FREQ_HZ, CONFIG, PARAMS,
};

/// Command descriptor
pub struct CommandDescriptor {
    pub name: &'static str,
    pub usage: &'static str,
    pub brief: &'static str,
    pub handler: fn(&ParsedCommand<'_>, &mut dyn Write) -> Result<(), ConsoleError>,
}

/// Top-level commands
pub static COMMANDS: &[CommandDescriptor] = &[
    CommandDescriptor { name: "help", usage: "[set|get|run]", brief: "List commands", handler: cmd_help },
    CommandDescriptor { name: "set", usage: "<param> <value>", brief: "Set parameter value", handler: cmd_set },
    CommandDescriptor { name: "get", usage: "[param|pattern*]", brief: "Show parameters", handler: cmd_get },
    CommandDescriptor { name: "run", usage: "<task> [args]", brief: "Run a task", handler: cmd_run },
];

/// Tasks reachable through `run`
///
/// Handlers see the task name as `arg(0)`, its arguments from `arg(1)` on.
pub static RUN_COMMANDS: &[CommandDescriptor] = &[
    CommandDescriptor {
        name: "adcCollect",
        usage: "<channel> <freq> <samples>",
        brief: "Queue an ADC capture",
        handler: run_adc_collect,
    },
    CommandDescriptor {
        name: "ledToggler",
        usage: "<period ms>",
        brief: "Start periodic LED toggle",
        handler: run_led_toggler,
    },
    CommandDescriptor { name: "ledDisabler", usage: "", brief: "Stop LED toggle", handler: run_led_disabler },
];

/// Execute a parsed command
pub fn execute(cmd: &ParsedCommand<'_>, out: &mut dyn Write) -> Result<(), ConsoleError> {
    if cmd.command.is_empty() {
        return Ok(()); // Whitespace-only line
    }

    let handler = find_command(COMMANDS, cmd.command).ok_or(ConsoleError::UnknownCommand)?;

    (handler.handler)(cmd, out)
}

/// Top-level command names
pub fn command_names() -> impl Iterator<Item = &'static str> {
    COMMANDS.iter().map(|c| c.name)
}

fn find_command(table: &'static [CommandDescriptor], name: &str) -> Option<&'static CommandDescriptor> {
    table.iter().find(|c| c.name == name)
}

/// Parse argument `idx` as a number within `min..=max`
fn parse_arg<T>(cmd: &ParsedCommand<'_>, idx: usize, min: T, max: T) -> Result<T, ConsoleError>
where
    T: FromStr + PartialOrd,
{
    let text = cmd.arg(idx).ok_or(ConsoleError::MissingArg)?;
    let value: T = text.parse().map_err(|_| ConsoleError::InvalidValue)?;
    if value < min || value > max {
        return Err(ConsoleError::OutOfRange);
    }
    Ok(value)
}

// --- Command Implementations ---

fn cmd_help(cmd: &ParsedCommand<'_>, out: &mut dyn Write) -> Result<(), ConsoleError> {
    match cmd.arg(0) {
        None => {
            let _ = writeln!(out, "Available commands:");
            for c in COMMANDS {
                let _ = writeln!(out, "  {} {:<18} {}", c.name, c.usage, c.brief);
            }
        }
        Some("set") | Some("get") => {
            for p in PARAMS {
                let _ = writeln!(out, "  {:<12} {}", p.name, p.brief);
            }
        }
        Some("run") => {
            for r in RUN_COMMANDS {
                let _ = writeln!(out, "  {} {:<26} {}", r.name, r.usage, r.brief);
            }
        }
        Some(_) => return Err(ConsoleError::UnknownCommand),
    }
    Ok(())
}

fn cmd_set(cmd: &ParsedCommand<'_>, out: &mut dyn Write) -> Result<(), ConsoleError> {
    let name = cmd.arg(0).ok_or(ConsoleError::MissingArg)?;
    let text = cmd.arg(1).ok_or(ConsoleError::MissingArg)?;

    let param = find_param(name).ok_or(ConsoleError::UnknownCommand)?;
    let value = param.set_from_str(text)?;

    let _ = writeln!(out, "{}={}", param.name, value);
    Ok(())
}

fn cmd_get(cmd: &ParsedCommand<'_>, out: &mut dyn Write) -> Result<(), ConsoleError> {
    let Some(pattern) = cmd.arg(0) else {
        for p in PARAMS {
            let _ = writeln!(out, "{}={}", p.name, p.get());
        }
        return Ok(());
    };

    let mut matched = false;
    for p in find_params_matching(pattern) {
        matched = true;
        let _ = writeln!(out, "{}={}", p.name, p.get());
    }

    if matched {
        Ok(())
    } else {
        Err(ConsoleError::UnknownCommand)
    }
}

fn cmd_run(cmd: &ParsedCommand<'_>, out: &mut dyn Write) -> Result<(), ConsoleError> {
    let task = cmd.arg(0).ok_or(ConsoleError::MissingArg)?;
    let handler = find_command(RUN_COMMANDS, task).ok_or(ConsoleError::UnknownCommand)?;
    (handler.handler)(cmd, out)
}

fn run_adc_collect(cmd: &ParsedCommand<'_>, out: &mut dyn Write) -> Result<(), ConsoleError> {
    let req = AdcRequest {
        channel: parse_arg(cmd, 1, 0, ADC_MAX_CHANNEL)?,
        freq_hz: parse_arg(cmd, 2, ADC_MIN_FREQ_HZ, ADC_MAX_FREQ_HZ)?,
        samples: parse_arg(cmd, 3, 1, ADC_MAX_SAMPLES)?,
    };
    CONFIG.request_adc(req);

    let _ = writeln!(
        out,
        "adcCollect: ch={} freq={}Hz samples={} queued",
        req.channel, req.freq_hz, req.samples
    );
    Ok(())
}

fn run_led_toggler(cmd: &ParsedCommand<'_>, out: &mut dyn Write) -> Result<(), ConsoleError> {
    let period_ms: u32 = parse_arg(cmd, 1, 1, 10_000)?;
    CONFIG.set_led(true, period_ms);

    let _ = writeln!(out, "ledToggler: period={}ms", period_ms);
    Ok(())
}

fn run_led_disabler(_cmd: &ParsedCommand<'_>, out: &mut dyn Write) -> Result<(), ConsoleError> {
    let period_ms = CONFIG.led_period_ms.load(core::sync::atomic::Ordering::Relaxed);
    CONFIG.set_led(false, period_ms);

    let _ = writeln!(out, "ledDisabler: led off");
    Ok(())
}
