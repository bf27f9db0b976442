//! Command handlers for the Pyx CLI.
//!
//! Shared pieces live here: option parsing, file reading, building an
//! interpreter with an optional prelude, and diagnostic rendering.

mod explain;
mod parse;
mod run;
mod step;

use std::io::IsTerminal;

use pyx_diagnostic::emitter::{ColorMode, DiagnosticEmitter, TerminalEmitter};
use pyx_diagnostic::Diagnostic;
use pyx_eval::{Context, EvalError, Interpreter, RunLimits, SharedPrintHandler};
use pyx_ir::SharedInterner;
use pyx_parse::ParseError;

use crate::CliError;

pub use explain::explain_error;
pub use parse::parse_file;
pub use run::{evaluate_source, run_file, Evaluation};
pub use step::step_file;

/// Options shared by `run` and `step`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunOptions {
    pub path: String,
    pub limits: RunLimits,
    /// File run before the program in the same context.
    pub prelude: Option<String>,
    pub color: ColorMode,
    pub verbose: bool,
    /// Report the number of steps taken on stderr.
    pub count: bool,
}

impl RunOptions {
    /// Parse the arguments after the command name. The first non-option
    /// argument is the program path.
    pub fn parse(args: &[String]) -> Result<Self, CliError> {
        let mut options = RunOptions::default();
        let mut path = None;
        for arg in args {
            if let Some(value) = arg.strip_prefix("--step-limit=") {
                options.limits.step_limit = Some(parse_count("--step-limit", value)?);
            } else if let Some(value) = arg.strip_prefix("--env-steps=") {
                options.limits.env_steps = Some(parse_count("--env-steps", value)?);
            } else if let Some(value) = arg.strip_prefix("--prelude=") {
                options.prelude = Some(value.to_string());
            } else if let Some(value) = arg.strip_prefix("--color=") {
                options.color = parse_color(value)?;
            } else if arg == "--verbose" || arg == "-v" {
                options.verbose = true;
            } else if arg == "--count" {
                options.count = true;
            } else if arg.starts_with('-') {
                return Err(CliError::UnknownOption(arg.clone()));
            } else if path.is_none() {
                path = Some(arg.clone());
            }
        }
        options.path = path.ok_or(CliError::Missing { what: "file path" })?;
        Ok(options)
    }
}

fn parse_count(flag: &'static str, value: &str) -> Result<usize, CliError> {
    value.parse().map_err(|_| CliError::InvalidNumber {
        flag,
        value: value.to_string(),
    })
}

fn parse_color(value: &str) -> Result<ColorMode, CliError> {
    match value {
        "auto" => Ok(ColorMode::Auto),
        "always" => Ok(ColorMode::Always),
        "never" => Ok(ColorMode::Never),
        other => Err(CliError::InvalidColor(other.to_string())),
    }
}

pub(crate) fn read_file(path: &str) -> Result<String, CliError> {
    std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_string(),
        source,
    })
}

/// Which source a failure points into.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Stage {
    Prelude,
    Program,
}

/// A program that could not run to a result.
#[derive(Clone, Debug, PartialEq)]
pub enum Failure {
    Parse(Stage, ParseError),
    Runtime(Stage, EvalError),
}

impl Failure {
    pub fn stage(&self) -> Stage {
        match self {
            Failure::Parse(stage, _) | Failure::Runtime(stage, _) => *stage,
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            Failure::Parse(_, err) => err.to_diagnostic(),
            Failure::Runtime(_, err) => err.to_diagnostic(),
        }
    }
}

/// Parse the prelude and the program with one interner, build the
/// interpreter, and load the program into a fresh context.
pub fn prepare(
    source: &str,
    prelude: Option<&str>,
    print: SharedPrintHandler,
) -> Result<(Interpreter, Context), Failure> {
    let interner = SharedInterner::new();
    let mut builder = Interpreter::builder()
        .interner(interner.clone())
        .print_handler(print);
    if let Some(prelude) = prelude {
        let program =
            pyx_parse::parse(prelude, &interner).map_err(|e| Failure::Parse(Stage::Prelude, e))?;
        builder = builder.prelude(program);
    }
    let interpreter = builder.build();

    let program =
        pyx_parse::parse(source, &interner).map_err(|e| Failure::Parse(Stage::Program, e))?;
    let mut ctx = interpreter
        .new_context()
        .map_err(|e| Failure::Runtime(Stage::Prelude, e))?;
    interpreter.load(&mut ctx, program);
    Ok((interpreter, ctx))
}

/// The program source and, when given, the prelude source.
pub(crate) struct Sources {
    pub path: String,
    pub text: String,
    pub prelude: Option<(String, String)>,
}

impl Sources {
    pub(crate) fn read(options: &RunOptions) -> Result<Self, CliError> {
        let text = read_file(&options.path)?;
        let prelude = match &options.prelude {
            Some(path) => Some((path.clone(), read_file(path)?)),
            None => None,
        };
        Ok(Sources {
            path: options.path.clone(),
            text,
            prelude,
        })
    }

    pub(crate) fn prelude_text(&self) -> Option<&str> {
        self.prelude.as_ref().map(|(_, text)| text.as_str())
    }

    /// Render `diagnostic` against the source it points into.
    pub(crate) fn emit(&self, stage: Stage, diagnostic: &Diagnostic, color: ColorMode) {
        let (path, text) = match (stage, &self.prelude) {
            (Stage::Prelude, Some((path, text))) => (path.as_str(), text.as_str()),
            _ => (self.path.as_str(), self.text.as_str()),
        };
        let is_tty = std::io::stderr().is_terminal();
        let mut emitter = TerminalEmitter::with_color_mode(std::io::stderr(), color, is_tty)
            .with_source(text)
            .with_file_path(path);
        emitter.emit(diagnostic);
        if diagnostic.is_error() {
            emitter.emit_summary(1, 0);
        }
        emitter.flush();
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
