//! The `step` command: run a file one control item at a time and print a
//! trace of the machine.

use std::process::ExitCode;

use pyx_eval::{repr, stdout_handler, MachineState};

use super::{prepare, RunOptions, Sources, Stage};
use crate::CliError;

/// Print each executed item. `--verbose` adds the Stash after every step;
/// `--step-limit` caps how many steps are shown.
pub fn step_file(options: &RunOptions) -> Result<ExitCode, CliError> {
    let sources = Sources::read(options)?;
    let (interpreter, mut ctx) =
        match prepare(&sources.text, sources.prelude_text(), stdout_handler()) {
            Ok(prepared) => prepared,
            Err(failure) => {
                sources.emit(failure.stage(), &failure.to_diagnostic(), options.color);
                return Ok(ExitCode::FAILURE);
            }
        };

    let limit = options.limits.step_limit.unwrap_or(usize::MAX);
    let mut shown = 0;
    while shown < limit {
        let Some(record) = interpreter.step(&mut ctx) else {
            break;
        };
        shown += 1;
        println!("{:>6}  {}", record.index, record.item);
        if options.verbose {
            let stash = ctx.snapshot().stash.join(", ");
            println!("        stash: [{stash}]");
        }
    }

    match ctx.state() {
        MachineState::Errored => {
            if let Some(err) = ctx.error() {
                sources.emit(Stage::Program, &err.to_diagnostic(), options.color);
            }
            return Ok(ExitCode::FAILURE);
        }
        MachineState::Finished => {
            let value = ctx.result();
            println!(
                "=> {}",
                repr(&value, ctx.runtime.objects(), interpreter.interner())
            );
        }
        _ => println!("-- stopped after {shown} steps"),
    }
    if options.count {
        eprintln!("steps: {}", ctx.steps());
    }
    Ok(ExitCode::SUCCESS)
}
