//! Lexer and parser errors.
//!
//! Parsing stops at the first error, so a program produces at most one.

use pyx_diagnostic::{Diagnostic, ErrorCode};
use pyx_ir::Span;

use crate::lexer::TokenKind;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseError {
    pub code: ErrorCode,
    pub message: String,
    pub span: Span,
    pub hint: Option<String>,
}

impl ParseError {
    #[cold]
    pub fn new(code: ErrorCode, message: impl Into<String>, span: Span) -> Self {
        ParseError {
            code,
            message: message.into(),
            span,
            hint: None,
        }
    }

    #[must_use]
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    #[cold]
    pub fn unterminated_string(span: Span) -> Self {
        Self::new(
            ErrorCode::E0001,
            "unterminated string literal",
            span,
        )
        .with_hint("close the string with a matching quote on the same line")
    }

    #[cold]
    pub fn invalid_character(span: Span, text: &str) -> Self {
        Self::new(
            ErrorCode::E0002,
            format!("invalid character `{text}` in source"),
            span,
        )
    }

    #[cold]
    pub fn invalid_number(span: Span, text: &str) -> Self {
        Self::new(
            ErrorCode::E0003,
            format!("invalid number literal `{text}`"),
            span,
        )
    }

    #[cold]
    pub fn inconsistent_dedent(span: Span) -> Self {
        Self::new(
            ErrorCode::E0004,
            "unindent does not match any outer indentation level",
            span,
        )
        .with_hint("indent every line of a block by the same amount")
    }

    #[cold]
    pub fn unexpected_indent(span: Span) -> Self {
        Self::new(ErrorCode::E1001, "unexpected indent", span)
    }

    #[cold]
    pub fn unexpected(expected: &str, found: &TokenKind, span: Span) -> Self {
        Self::new(
            ErrorCode::E1001,
            format!("expected {expected}, found {found}"),
            span,
        )
    }

    #[cold]
    pub fn expected_expression(found: &TokenKind, span: Span) -> Self {
        Self::new(
            ErrorCode::E1002,
            format!("expected expression, found {found}"),
            span,
        )
    }

    #[cold]
    pub fn unclosed_delimiter(open: char, span: Span) -> Self {
        let close = if open == '(' { ')' } else { ']' };
        Self::new(
            ErrorCode::E1003,
            format!("this `{open}` is never closed"),
            span,
        )
        .with_hint(format!("add a matching `{close}`"))
    }

    #[cold]
    pub fn unmatched_close(close: char, span: Span) -> Self {
        Self::new(
            ErrorCode::E1001,
            format!("unmatched `{close}`"),
            span,
        )
    }

    #[cold]
    pub fn invalid_assignment_target(span: Span) -> Self {
        Self::new(
            ErrorCode::E1004,
            "cannot assign to expression",
            span,
        )
        .with_hint("only variable names can appear on the left of `=`")
    }

    #[cold]
    pub fn return_outside_function(span: Span) -> Self {
        Self::new(
            ErrorCode::E1005,
            "'return' outside function",
            span,
        )
    }

    #[cold]
    pub fn nonlocal_at_top_level(span: Span) -> Self {
        Self::new(
            ErrorCode::E1006,
            "nonlocal declaration not allowed at module level",
            span,
        )
    }

    #[cold]
    pub fn nonlocal_after_use(name: &str, span: Span) -> Self {
        Self::new(
            ErrorCode::E1006,
            format!("name '{name}' is assigned to before nonlocal declaration"),
            span,
        )
        .with_hint(format!("move `nonlocal {name}` to the top of the function"))
    }

    #[cold]
    pub fn nonlocal_parameter(name: &str, span: Span) -> Self {
        Self::new(
            ErrorCode::E1006,
            format!("name '{name}' is parameter and nonlocal"),
            span,
        )
    }

    #[cold]
    pub fn duplicate_parameter(name: &str, span: Span) -> Self {
        Self::new(
            ErrorCode::E1001,
            format!("duplicate argument '{name}' in function definition"),
            span,
        )
    }

    #[cold]
    pub fn rest_not_last(span: Span) -> Self {
        Self::new(
            ErrorCode::E1001,
            "a `*` parameter must be the last parameter",
            span,
        )
    }

    #[cold]
    pub fn chained_comparison(span: Span) -> Self {
        Self::new(
            ErrorCode::E1007,
            "chained comparisons are not supported",
            span,
        )
        .with_hint("split the chain with `and`, as in `a < b and b < c`")
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        let label = match self.code {
            ErrorCode::E1003 => "unclosed delimiter",
            ErrorCode::E1005 => "not inside a `def`",
            ErrorCode::E1007 => "second comparison here",
            _ => "here",
        };
        let diag = Diagnostic::error(self.code)
            .with_message(&self.message)
            .with_label(self.span, label);
        match &self.hint {
            Some(hint) => diag.with_suggestion(hint),
            None => diag,
        }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for ParseError {}
