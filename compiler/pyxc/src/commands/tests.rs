use pretty_assertions::assert_eq;
use pyx_eval::{buffer_handler, EvalErrorKind, Outcome, SuspendReason};

use super::*;

fn args(list: &[&str]) -> Vec<String> {
    list.iter().map(ToString::to_string).collect()
}

#[test]
fn test_parse_run_options() {
    let options = RunOptions::parse(&args(&[
        "--step-limit=50",
        "prog.py",
        "--env-steps=3",
        "--prelude=lib.py",
        "--color=never",
        "--count",
        "-v",
    ]))
    .unwrap();
    assert_eq!(
        options,
        RunOptions {
            path: "prog.py".to_string(),
            limits: RunLimits::steps(50).with_env_steps(3),
            prelude: Some("lib.py".to_string()),
            color: ColorMode::Never,
            verbose: true,
            count: true,
        }
    );
}

#[test]
fn test_option_errors() {
    assert!(matches!(
        RunOptions::parse(&args(&["--count"])),
        Err(CliError::Missing { what: "file path" })
    ));
    assert!(matches!(
        RunOptions::parse(&args(&["a.py", "--fast"])),
        Err(CliError::UnknownOption(opt)) if opt == "--fast"
    ));
    let err = RunOptions::parse(&args(&["a.py", "--step-limit=-1"])).unwrap_err();
    assert_eq!(
        err.to_string(),
        "option '--step-limit' expects a non-negative integer, got '-1'"
    );
    assert!(matches!(
        RunOptions::parse(&args(&["a.py", "--color=sometimes"])),
        Err(CliError::InvalidColor(_))
    ));
}

#[test]
fn test_evaluate_source_finishes() {
    let print = buffer_handler();
    let evaluation =
        evaluate_source("print(1)\n2 ** 10\n", None, RunLimits::default(), print.clone()).unwrap();
    assert!(matches!(
        evaluation.outcome,
        Outcome::Finished { ref representation, .. } if representation == "1024"
    ));
    assert!(evaluation.steps > 0);
    assert_eq!(print.get_output(), "1\n");
}

#[test]
fn test_evaluate_source_with_prelude() {
    let prelude = "def square(x):\n    return x * x\n";
    let evaluation = evaluate_source(
        "square(12)",
        Some(prelude),
        RunLimits::default(),
        buffer_handler(),
    )
    .unwrap();
    assert!(matches!(
        evaluation.outcome,
        Outcome::Finished { ref representation, .. } if representation == "144"
    ));
}

#[test]
fn test_evaluate_source_suspends() {
    let evaluation =
        evaluate_source("1 + 2 + 3", None, RunLimits::steps(2), buffer_handler()).unwrap();
    assert_eq!(
        evaluation.outcome,
        Outcome::Suspended {
            reason: SuspendReason::StepLimit { limit: 2 },
            steps: 2,
        }
    );
    assert_eq!(evaluation.steps, 2);
}

#[test]
fn test_failures_name_their_stage() {
    let failure =
        evaluate_source("1 +", None, RunLimits::default(), buffer_handler()).unwrap_err();
    assert!(matches!(failure, Failure::Parse(Stage::Program, _)));
    assert!(failure.to_diagnostic().is_error());

    let failure = evaluate_source("1", Some("x = ("), RunLimits::default(), buffer_handler())
        .unwrap_err();
    assert_eq!(failure.stage(), Stage::Prelude);

    let failure = evaluate_source("1", Some("x = 1 / 0\n"), RunLimits::default(), buffer_handler())
        .unwrap_err();
    assert!(matches!(
        failure,
        Failure::Runtime(Stage::Prelude, ref err)
            if matches!(err.kind, EvalErrorKind::ZeroDivision { .. })
    ));

    let failure =
        evaluate_source("undefined_name", None, RunLimits::default(), buffer_handler())
            .unwrap_err();
    assert!(matches!(failure, Failure::Runtime(Stage::Program, _)));
}

#[test]
fn test_explain_known_and_unknown_codes() {
    assert!(explain_error("e6001").unwrap().contains("E6001"));
    assert!(matches!(
        explain_error("E42"),
        Err(CliError::UnknownCode(code)) if code == "E42"
    ));
}
