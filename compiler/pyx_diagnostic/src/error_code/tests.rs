use super::*;
use std::str::FromStr;

#[test]
fn test_error_code_display() {
    assert_eq!(ErrorCode::E6001.to_string(), "E6001");
    assert_eq!(ErrorCode::E1001.as_str(), "E1001");
}

#[test]
fn test_all_variants_classified() {
    for code in ErrorCode::ALL {
        let phases = [
            code.is_lexer_error(),
            code.is_parser_error(),
            code.is_eval_error(),
            code.is_internal_error(),
        ];
        assert_eq!(
            phases.iter().filter(|p| **p).count(),
            1,
            "{code} must belong to exactly one phase"
        );
    }
}

#[test]
fn test_from_str_round_trips_every_code() {
    for code in ErrorCode::ALL {
        assert_eq!(ErrorCode::from_str(code.as_str()), Ok(*code));
    }
    assert_eq!(ErrorCode::from_str("e6020"), Ok(ErrorCode::E6020));
    assert_eq!(ErrorCode::from_str("E4242"), Err(()));
}

#[test]
fn test_python_class() {
    assert_eq!(ErrorCode::E6001.python_class(), Some("ZeroDivisionError"));
    assert_eq!(ErrorCode::E6011.python_class(), Some("TypeError"));
    assert_eq!(ErrorCode::E6020.python_class(), Some("NameError"));
    assert_eq!(ErrorCode::E1001.python_class(), None);
}
