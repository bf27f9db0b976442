//! Pyx CLI
//!
//! Explicit-control evaluator for a teaching subset of Python.

use std::process::ExitCode;

use pyxc::commands::{explain_error, parse_file, run_file, step_file, RunOptions};
use pyxc::{tracing_setup, CliError};

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();

    let Some(command) = args.get(1) else {
        print_usage();
        return ExitCode::SUCCESS;
    };
    let rest = &args[2..];

    let result = match command.as_str() {
        "run" => run_options(rest).and_then(|options| run_file(&options)),
        "step" => run_options(rest).and_then(|options| step_file(&options)),
        "parse" => run_options(rest).and_then(|options| parse_file(&options.path, options.color)),
        "explain" | "--explain" => match rest.first() {
            Some(code) => explain_error(code).map(|doc| {
                println!("{doc}");
                ExitCode::SUCCESS
            }),
            None => Err(CliError::Missing { what: "error code" }),
        },
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(ExitCode::SUCCESS)
        }
        "version" | "--version" | "-V" => {
            println!("Pyx {}", env!("CARGO_PKG_VERSION"));
            Ok(ExitCode::SUCCESS)
        }
        _ => {
            // A bare `.py` path runs it.
            if std::path::Path::new(command)
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("py"))
            {
                run_options(&args[1..]).and_then(|options| run_file(&options))
            } else {
                eprintln!("Unknown command: {command}");
                eprintln!();
                print_usage();
                return ExitCode::FAILURE;
            }
        }
    };

    match result {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run_options(args: &[String]) -> Result<RunOptions, CliError> {
    let options = RunOptions::parse(args)?;
    tracing_setup::init(options.verbose);
    Ok(options)
}

fn print_usage() {
    println!("Pyx: a stepping evaluator for a teaching subset of Python");
    println!();
    println!("Usage: pyx <command> [options]");
    println!();
    println!("Commands:");
    println!("  run <file.py>        Evaluate a program and print its value");
    println!("  step <file.py>       Print every machine step");
    println!("  parse <file.py>      Print the parsed tree");
    println!("  explain <code>       Explain an error code (e.g., E6001)");
    println!("  help                 Show this help message");
    println!("  version              Show version information");
    println!();
    println!("Options:");
    println!("  --step-limit=<n>     Stop after n steps");
    println!("  --env-steps=<n>      Stop after n environment changes");
    println!("  --prelude=<file>     Run <file> first, in the same context");
    println!("  --color=<when>       auto, always or never");
    println!("  --count              Report the number of steps on stderr");
    println!("  --verbose, -v        Debug logging; `step` also prints the stash");
    println!();
    println!("Logging follows RUST_LOG, e.g. RUST_LOG=pyx_eval=trace.");
}
