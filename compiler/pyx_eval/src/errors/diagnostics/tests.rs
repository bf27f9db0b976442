use pretty_assertions::assert_eq;
use pyx_diagnostic::{ErrorCode, Severity};
use pyx_ir::Span;

use crate::builtins::Arity;
use crate::errors::{self, EvalNote};

#[test]
fn test_zero_division_maps_to_e6001() {
    let diag = errors::zero_division("division by zero").to_diagnostic();
    assert_eq!(diag.code, ErrorCode::E6001);
    assert_eq!(diag.message, "ZeroDivisionError: division by zero");
    assert!(diag.is_error());
}

#[test]
fn test_user_error_has_no_class_prefix() {
    let diag = errors::user_error("bad input").to_diagnostic();
    assert_eq!(diag.code, ErrorCode::E6050);
    assert_eq!(diag.message, "bad input");
}

#[test]
fn test_span_produces_primary_label() {
    let diag = errors::undefined_variable("x")
        .with_span(Span::new(10, 11))
        .to_diagnostic();
    assert_eq!(diag.labels.len(), 1);
    assert_eq!(diag.labels[0].span, Span::new(10, 11));
    assert_eq!(diag.labels[0].message, "not found in this scope");
    assert_eq!(diag.suggestions, vec!["define `x` before using it".to_string()]);
}

#[test]
fn test_no_span_produces_no_label() {
    let diag = errors::math_domain_error().to_diagnostic();
    assert!(diag.labels.is_empty());
    assert_eq!(diag.message, "ValueError: math domain error");
}

#[test]
fn test_notes_become_labels_or_notes() {
    let diag = errors::missing_arguments("f", vec!["b".into()])
        .with_span(Span::new(20, 24))
        .with_note(EvalNote::with_span("`f` defined here", Span::new(0, 8)))
        .with_note(EvalNote::new("called with 1 argument"))
        .to_diagnostic();
    assert_eq!(diag.labels.len(), 2);
    assert!(!diag.labels[1].is_primary);
    assert_eq!(diag.notes, vec!["called with 1 argument".to_string()]);
}

#[test]
fn test_step_limit_is_a_warning() {
    let diag = errors::step_limit_exceeded(100).to_diagnostic();
    assert_eq!(diag.code, ErrorCode::E6070);
    assert_eq!(diag.severity, Severity::Warning);
}

#[test]
fn test_builtin_arity_code_depends_on_direction() {
    let few = errors::builtin_arity("round", Arity::Range(1, 2), 0);
    let many = errors::builtin_arity("round", Arity::Range(1, 2), 3);
    assert_eq!(few.kind.error_code(), ErrorCode::E6030);
    assert_eq!(many.kind.error_code(), ErrorCode::E6031);
}

#[test]
fn test_every_kind_has_explanation_and_label() {
    let samples = [
        errors::zero_division("division by zero"),
        errors::value_error("invalid literal for int() with base 10: 'x'"),
        errors::overflow("math range error"),
        errors::concatenation_type("int"),
        errors::not_a_bool("as a condition", "int"),
        errors::builtin_type_error("object of type 'int' has no len()"),
        errors::bad_subscript("'int' object is not subscriptable"),
        errors::variable_redeclaration("x"),
        errors::constant_reassignment("math_pi"),
        errors::too_many_arguments("f", 1, 2),
        errors::not_callable("int"),
        errors::internal("stash empty"),
    ];
    for err in samples {
        let diag = err.with_span(Span::new(0, 1)).to_diagnostic();
        assert!(!diag.message.is_empty());
        assert!(!diag.labels[0].message.is_empty());
        assert!(diag.code.is_eval_error() || diag.code.is_internal_error());
    }
}
