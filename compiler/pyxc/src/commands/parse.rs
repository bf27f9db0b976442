//! The `parse` command: print the tree the evaluator would receive.

use std::process::ExitCode;

use pyx_diagnostic::emitter::ColorMode;
use pyx_ir::{dump_tree, StringInterner};

use super::{read_file, Sources, Stage};
use crate::CliError;

pub fn parse_file(path: &str, color: ColorMode) -> Result<ExitCode, CliError> {
    let text = read_file(path)?;
    let interner = StringInterner::new();
    match pyx_parse::parse(&text, &interner) {
        Ok(program) => {
            print!("{}", dump_tree(&program, &interner));
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            let sources = Sources {
                path: path.to_string(),
                text,
                prelude: None,
            };
            sources.emit(Stage::Program, &err.to_diagnostic(), color);
            Ok(ExitCode::FAILURE)
        }
    }
}
