//! The `run` command: evaluate a file to a result.

use std::process::ExitCode;

use pyx_eval::{stdout_handler, Outcome, RunLimits, SharedPrintHandler, Value};
use tracing::info;

use super::{prepare, Failure, RunOptions, Sources, Stage};
use crate::CliError;

/// A run that stopped without an error.
#[derive(Clone, Debug, PartialEq)]
pub struct Evaluation {
    /// `Finished` or `Suspended`.
    pub outcome: Outcome,
    pub steps: usize,
}

/// Evaluate `source` after `prelude` under `limits`.
pub fn evaluate_source(
    source: &str,
    prelude: Option<&str>,
    limits: RunLimits,
    print: SharedPrintHandler,
) -> Result<Evaluation, Failure> {
    let (interpreter, mut ctx) = prepare(source, prelude, print)?;
    match interpreter.run(&mut ctx, limits) {
        Outcome::Error(err) => Err(Failure::Runtime(Stage::Program, err)),
        outcome => Ok(Evaluation {
            outcome,
            steps: ctx.steps(),
        }),
    }
}

/// Run a file, printing its final value unless it is `None`.
///
/// A spent step budget is reported as a warning and is not a failure.
pub fn run_file(options: &RunOptions) -> Result<ExitCode, CliError> {
    let sources = Sources::read(options)?;
    let result = evaluate_source(
        &sources.text,
        sources.prelude_text(),
        options.limits,
        stdout_handler(),
    );

    match result {
        Ok(evaluation) => {
            match &evaluation.outcome {
                Outcome::Finished {
                    value,
                    representation,
                } => {
                    if *value != Value::None {
                        println!("{representation}");
                    }
                }
                Outcome::Suspended { reason, steps } => {
                    info!(steps, "run suspended");
                    sources.emit(
                        Stage::Program,
                        &reason.to_error().to_diagnostic(),
                        options.color,
                    );
                }
                Outcome::Error(_) => {}
            }
            if options.count {
                eprintln!("steps: {}", evaluation.steps);
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(failure) => {
            sources.emit(failure.stage(), &failure.to_diagnostic(), options.color);
            Ok(ExitCode::FAILURE)
        }
    }
}
