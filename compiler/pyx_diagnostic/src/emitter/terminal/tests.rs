use super::*;
use crate::ErrorCode;
use pretty_assertions::assert_eq;
use pyx_ir::Span;

fn sample_diagnostic() -> Diagnostic {
    Diagnostic::error(ErrorCode::E6011)
        .with_message("can only concatenate str (not \"int\") to str")
        .with_label(Span::new(10, 15), "cannot add `str` and `int`")
        .with_secondary_label(Span::new(0, 5), "defined here")
        .with_note("only str + str concatenates")
        .with_suggestion("convert with `str(...)`")
}

fn render(source: Option<&str>, diag: &Diagnostic) -> String {
    let mut output = Vec::new();
    {
        let mut emitter = TerminalEmitter::with_color_mode(&mut output, ColorMode::Never, false);
        if let Some(source) = source {
            emitter = emitter.with_source(source).with_file_path("demo.py");
        }
        emitter.emit(diag);
        emitter.flush();
    }
    String::from_utf8(output).unwrap()
}

// Fallback (no source)

#[test]
fn test_terminal_emitter_no_color() {
    let text = render(None, &sample_diagnostic());
    assert!(text.contains("error"));
    assert!(text.contains("[E6011]"));
    assert!(text.contains("can only concatenate"));
    assert!(text.contains("cannot add `str` and `int`"));
    assert!(text.contains("= note: only str + str concatenates"));
    assert!(text.contains("= help: convert with `str(...)`"));
}

#[test]
fn test_terminal_emitter_with_color() {
    let mut output = Vec::new();
    let mut emitter = TerminalEmitter::with_color_mode(&mut output, ColorMode::Always, false);
    emitter.emit(&sample_diagnostic());
    emitter.flush();

    let text = String::from_utf8(output).unwrap();
    assert!(text.contains("\x1b["));
    assert!(text.contains("E6011"));
}

#[test]
fn test_fallback_without_source() {
    let diag = Diagnostic::error(ErrorCode::E6020)
        .with_message("name 'y' is not defined")
        .with_label(Span::new(10, 15), "not found in this scope");
    let text = render(None, &diag);
    assert!(text.contains("10..15"), "Expected byte range, got:\n{text}");
    assert!(!text.contains(" | "), "Unexpected gutter, got:\n{text}");
}

#[test]
fn test_emit_all() {
    let mut output = Vec::new();
    let mut emitter = TerminalEmitter::with_color_mode(&mut output, ColorMode::Never, false);
    emitter.emit_all(&[
        Diagnostic::error(ErrorCode::E1001).with_message("error 1"),
        Diagnostic::error(ErrorCode::E6001).with_message("error 2"),
    ]);
    emitter.flush();

    let text = String::from_utf8(output).unwrap();
    assert!(text.contains("error 1"));
    assert!(text.contains("error 2"));
}

#[test]
fn test_emit_summary() {
    let summary = |errors, warnings| {
        let mut output = Vec::new();
        let mut emitter = TerminalEmitter::with_color_mode(&mut output, ColorMode::Never, false);
        emitter.emit_summary(errors, warnings);
        emitter.flush();
        String::from_utf8(output).unwrap()
    };

    assert_eq!(summary(0, 0), "");
    assert_eq!(summary(1, 0), "error: aborting due to previous error\n");
    assert_eq!(
        summary(2, 1),
        "error: aborting due to 2 previous errors; 1 warning emitted\n"
    );
    assert_eq!(summary(0, 3), "warning: 3 warnings emitted\n");
}

// ColorMode

#[test]
fn test_color_mode_resolution() {
    assert!(ColorMode::Auto.should_use_colors(true));
    assert!(!ColorMode::Auto.should_use_colors(false));
    assert!(ColorMode::Always.should_use_colors(false));
    assert!(!ColorMode::Never.should_use_colors(true));
    assert_eq!(ColorMode::default(), ColorMode::Auto);
}

#[test]
fn test_with_color_mode_never_ignores_tty() {
    let mut output = Vec::new();
    let mut emitter = TerminalEmitter::with_color_mode(&mut output, ColorMode::Never, true);
    emitter.emit(&sample_diagnostic());
    emitter.flush();
    assert!(!String::from_utf8(output).unwrap().contains("\x1b["));
}

// Snippets

#[test]
fn test_snippet_exact_layout() {
    let source = "x = 1\ny = \"a\" + x";
    let diag = Diagnostic::error(ErrorCode::E6011)
        .with_message("can only concatenate str (not \"int\") to str")
        .with_label(Span::new(10, 17), "cannot add `str` and `int`")
        .with_suggestion("convert with `str(...)`");

    let expected = "\
error [E6011]: can only concatenate str (not \"int\") to str
 --> demo.py:2:5
  |
2 | y = \"a\" + x
  |     ^~~~~~~ cannot add `str` and `int`
  |
  = help: convert with `str(...)`

";
    assert_eq!(render(Some(source), &diag), expected);
}

#[test]
fn test_snippet_point_span() {
    let source = "print(x";
    let diag = Diagnostic::error(ErrorCode::E1003)
        .with_message("unclosed delimiter")
        .with_label(Span::new(7, 7), "expected `)`");
    let text = render(Some(source), &diag);
    assert!(text.contains("1 | print(x"), "got:\n{text}");
    assert!(text.contains("       ^ expected `)`"), "got:\n{text}");
}

#[test]
fn test_snippet_secondary_label_uses_dashes() {
    let source = "def f(a, b):\n    return a\nf(1)";
    let diag = Diagnostic::error(ErrorCode::E6030)
        .with_message("f() missing 1 required positional argument: 'b'")
        .with_label(Span::new(26, 30), "called here")
        .with_secondary_label(Span::new(4, 5), "defined here");
    let text = render(Some(source), &diag);

    assert!(text.contains("--> demo.py:3:1"), "got:\n{text}");
    assert!(text.contains("1 | def f(a, b):"), "got:\n{text}");
    assert!(text.contains("3 | f(1)"), "got:\n{text}");
    assert!(text.contains("- defined here"), "got:\n{text}");
    assert!(text.contains("^~~~ called here"), "got:\n{text}");
    // Labels are listed in source order.
    let first = text.find("defined here").unwrap();
    let second = text.find("called here").unwrap();
    assert!(first < second);
}

#[test]
fn test_snippet_multiline_span_clamped_to_first_line() {
    let source = "if x:\n    pass";
    let diag = Diagnostic::error(ErrorCode::E6013)
        .with_message("expected a bool")
        .with_label(Span::new(0, 14), "");
    let text = render(Some(source), &diag);
    assert!(text.contains("  | ^~~~~\n"), "got:\n{text}");
}

#[test]
fn test_snippet_without_file_path_uses_placeholder() {
    let mut output = Vec::new();
    {
        let mut emitter = TerminalEmitter::with_color_mode(&mut output, ColorMode::Never, false)
            .with_source("x");
        emitter.emit(
            &Diagnostic::error(ErrorCode::E6020)
                .with_message("name 'x' is not defined")
                .with_label(Span::new(0, 1), ""),
        );
    }
    let text = String::from_utf8(output).unwrap();
    assert!(text.contains("--> <input>:1:1"), "got:\n{text}");
}

#[test]
fn test_digit_count() {
    assert_eq!(digit_count(0), 1);
    assert_eq!(digit_count(9), 1);
    assert_eq!(digit_count(10), 2);
    assert_eq!(digit_count(999), 3);
    assert_eq!(digit_count(1000), 4);
}
