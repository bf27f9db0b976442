//! Runtime error to diagnostic conversion.
//!
//! Every kind yields the same three parts: a message explaining what went
//! wrong (prefixed with the Python exception class where one applies), a
//! primary label at the failing node, and a suggestion when a fix is known.
//!
//! # Error Code Ranges (E6xxx)
//!
//! - E6001–E6009: Arithmetic (division by zero, domain, value, overflow)
//! - E6010–E6019: Operator and argument types
//! - E6020–E6029: Bindings and indexing
//! - E6030–E6039: Calls
//! - E6050: `error(...)` raised by the program
//! - E6070: Step limit (a warning, not a failure)

use pyx_diagnostic::{Diagnostic, ErrorCode};

use super::{EvalError, EvalErrorKind};

impl EvalErrorKind {
    pub fn error_code(&self) -> ErrorCode {
        match self {
            Self::ZeroDivision { .. } => ErrorCode::E6001,
            Self::MathDomain => ErrorCode::E6002,
            Self::ValueError { .. } => ErrorCode::E6003,
            Self::Overflow { .. } => ErrorCode::E6004,

            Self::UnsupportedOperand { .. } => ErrorCode::E6010,
            Self::ConcatenationType { .. } => ErrorCode::E6011,
            Self::BadUnaryOperand { .. } => ErrorCode::E6012,
            Self::NotABool { .. } => ErrorCode::E6013,
            Self::OrderingNotSupported { .. } => ErrorCode::E6014,
            Self::BuiltinTypeError { .. } => ErrorCode::E6015,
            Self::BadSubscript { .. } => ErrorCode::E6016,

            Self::UndefinedVariable { .. } => ErrorCode::E6020,
            Self::UnassignedVariable { .. } => ErrorCode::E6021,
            Self::VariableRedeclaration { .. } => ErrorCode::E6022,
            Self::ConstantReassignment { .. } => ErrorCode::E6023,
            Self::IndexOutOfRange { .. } => ErrorCode::E6024,

            Self::MissingArguments { .. } => ErrorCode::E6030,
            Self::TooManyArguments { .. } => ErrorCode::E6031,
            Self::BuiltinArity { arity, given, .. } => {
                if *given < arity.min() {
                    ErrorCode::E6030
                } else {
                    ErrorCode::E6031
                }
            }
            Self::NotCallable { .. } => ErrorCode::E6032,

            Self::UserError { .. } => ErrorCode::E6050,
            Self::StepLimitExceeded { .. } => ErrorCode::E6070,
            Self::Internal { .. } => ErrorCode::E9001,
        }
    }

    /// Text for the label under the failing expression.
    pub fn primary_label(&self) -> &'static str {
        match self {
            Self::ZeroDivision { .. } => "divisor is zero",
            Self::MathDomain => "argument outside the function's domain",
            Self::ValueError { .. } => "invalid value",
            Self::Overflow { .. } => "result out of range",
            Self::UnsupportedOperand { .. } => "unsupported operand types",
            Self::ConcatenationType { .. } => "`str` mixed with another type",
            Self::BadUnaryOperand { .. } => "bad operand",
            Self::NotABool { .. } => "expected a `bool` here",
            Self::OrderingNotSupported { .. } => "these values cannot be ordered",
            Self::BuiltinTypeError { .. } => "argument has the wrong type",
            Self::BadSubscript { .. } => "cannot index this way",
            Self::UndefinedVariable { .. } => "not found in this scope",
            Self::UnassignedVariable { .. } => "read before assignment",
            Self::VariableRedeclaration { .. } => "declared twice",
            Self::ConstantReassignment { .. } => "cannot assign here",
            Self::IndexOutOfRange { .. } => "index out of range",
            Self::MissingArguments { .. } => "missing arguments",
            Self::TooManyArguments { .. } => "too many arguments",
            Self::BuiltinArity { .. } => "wrong number of arguments",
            Self::NotCallable { .. } => "not a function",
            Self::UserError { .. } => "raised here",
            Self::StepLimitExceeded { .. } => "evaluation paused here",
            Self::Internal { .. } => "while evaluating this",
        }
    }

    pub fn suggestion(&self) -> Option<String> {
        match self {
            Self::ZeroDivision { .. } => {
                Some("check that the divisor is non-zero before dividing".to_string())
            }
            Self::MathDomain => Some("check the argument range of the math function".to_string()),
            Self::ConcatenationType { other } => Some(format!(
                "convert the `{other}` with `str(...)` before concatenating"
            )),
            Self::UnsupportedOperand { .. } => Some(
                "convert one operand explicitly, for example with `float(...)`".to_string(),
            ),
            Self::NotABool { .. } => {
                Some("use a comparison such as `x != 0` to produce a `bool`".to_string())
            }
            Self::UndefinedVariable { name } => Some(format!("define `{name}` before using it")),
            Self::UnassignedVariable { name } => Some(format!(
                "assign `{name}` before reading it, or declare it `nonlocal` to use the enclosing binding"
            )),
            Self::VariableRedeclaration { .. } => Some("rename one of the bindings".to_string()),
            Self::IndexOutOfRange { .. } => {
                Some("valid indices run from `-len(xs)` to `len(xs) - 1`".to_string())
            }
            Self::MissingArguments { missing, .. } => Some(format!(
                "pass a value for {}",
                missing
                    .iter()
                    .map(|m| format!("`{m}`"))
                    .collect::<Vec<_>>()
                    .join(", ")
            )),
            Self::TooManyArguments { expected, .. } => Some(format!(
                "pass exactly {expected} argument{}",
                if *expected == 1 { "" } else { "s" }
            )),
            Self::StepLimitExceeded { .. } => {
                Some("run again with a larger `--step-limit` to continue".to_string())
            }
            Self::Internal { .. } => {
                Some("this is a bug in the evaluator; please report it".to_string())
            }
            _ => None,
        }
    }
}

impl EvalError {
    /// Convert to a `Diagnostic` for rendering.
    ///
    /// The step-limit condition becomes a warning; every other kind is an
    /// error.
    #[cold]
    pub fn to_diagnostic(&self) -> Diagnostic {
        let code = self.kind.error_code();
        let message = match code.python_class() {
            Some(class) => format!("{class}: {}", self.message),
            None => self.message.clone(),
        };
        let mut diag = match self.kind {
            EvalErrorKind::StepLimitExceeded { .. } => Diagnostic::warning(code),
            _ => Diagnostic::error(code),
        }
        .with_message(message);

        if let Some(span) = self.span {
            diag = diag.with_label(span, self.kind.primary_label());
        }

        for note in &self.notes {
            diag = match note.span {
                Some(span) => diag.with_secondary_label(span, &note.message),
                None => diag.with_note(&note.message),
            };
        }

        if let Some(suggestion) = self.kind.suggestion() {
            diag = diag.with_suggestion(suggestion);
        }

        diag
    }
}

#[cfg(test)]
mod tests;
