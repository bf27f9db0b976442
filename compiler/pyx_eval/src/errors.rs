//! Runtime errors raised by the machine.
//!
//! `EvalErrorKind` carries the structured data of each failure; its
//! `Display` impl produces the Python-worded message. Factory functions
//! (e.g. `zero_division()`) are the public way to build errors and fill in
//! both `kind` and `message`.
//!
//! Conversion to a renderable `Diagnostic` lives in `diagnostics`.

mod diagnostics;

use std::fmt;

use pyx_ir::{BinaryOp, Span, UnaryOp};

use crate::builtins::Arity;

/// Result of a single handler or operator.
pub type EvalResult<T> = Result<T, EvalError>;

/// Typed error category.
///
/// Each variant maps to one `ErrorCode`; see `error_code()`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EvalErrorKind {
    // Arithmetic
    ZeroDivision {
        message: &'static str,
    },
    MathDomain,
    ValueError {
        message: String,
    },
    Overflow {
        message: String,
    },

    // Operators and types
    UnsupportedOperand {
        op: &'static str,
        left: &'static str,
        right: &'static str,
    },
    ConcatenationType {
        other: &'static str,
    },
    BadUnaryOperand {
        op: &'static str,
        operand: &'static str,
    },
    NotABool {
        context: &'static str,
        got: &'static str,
    },
    OrderingNotSupported {
        op: &'static str,
        left: &'static str,
        right: &'static str,
    },
    BuiltinTypeError {
        message: String,
    },
    BadSubscript {
        message: String,
    },

    // Bindings
    UndefinedVariable {
        name: String,
    },
    UnassignedVariable {
        name: String,
    },
    VariableRedeclaration {
        name: String,
    },
    ConstantReassignment {
        name: String,
    },
    IndexOutOfRange {
        container: &'static str,
    },

    // Calls
    MissingArguments {
        function: String,
        missing: Vec<String>,
    },
    TooManyArguments {
        function: String,
        expected: usize,
        given: usize,
    },
    BuiltinArity {
        function: &'static str,
        arity: Arity,
        given: usize,
    },
    NotCallable {
        type_name: &'static str,
    },

    UserError {
        message: String,
    },
    StepLimitExceeded {
        limit: usize,
    },
    /// A machine invariant did not hold.
    Internal {
        message: String,
    },
}

/// `'a'`, `'a' and 'b'`, `'a', 'b', and 'c'`.
fn quoted_list(names: &[String]) -> String {
    let quoted: Vec<String> = names.iter().map(|n| format!("'{n}'")).collect();
    match quoted.as_slice() {
        [] => String::new(),
        [one] => one.clone(),
        [first, second] => format!("{first} and {second}"),
        [init @ .., last] => format!("{}, and {last}", init.join(", ")),
    }
}

fn plural(n: usize) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}

impl fmt::Display for EvalErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroDivision { message } => write!(f, "{message}"),
            Self::MathDomain => write!(f, "math domain error"),
            Self::ValueError { message }
            | Self::Overflow { message }
            | Self::BuiltinTypeError { message }
            | Self::BadSubscript { message }
            | Self::UserError { message } => write!(f, "{message}"),
            Self::UnsupportedOperand { op, left, right } => {
                write!(f, "unsupported operand type(s) for {op}: '{left}' and '{right}'")
            }
            Self::ConcatenationType { other } => {
                write!(f, "can only concatenate str (not \"{other}\") to str")
            }
            Self::BadUnaryOperand { op, operand } => {
                write!(f, "bad operand type for unary {op}: '{operand}'")
            }
            Self::NotABool { context, got } => {
                write!(f, "expected a bool {context}, got '{got}'")
            }
            Self::OrderingNotSupported { op, left, right } => write!(
                f,
                "'{op}' not supported between instances of '{left}' and '{right}'"
            ),
            Self::UndefinedVariable { name } => write!(f, "name '{name}' is not defined"),
            Self::UnassignedVariable { name } => write!(
                f,
                "cannot access local variable '{name}' where it is not associated with a value"
            ),
            Self::VariableRedeclaration { name } => {
                write!(f, "name '{name}' is already declared in this scope")
            }
            Self::ConstantReassignment { name } => {
                write!(f, "cannot assign to constant '{name}'")
            }
            Self::IndexOutOfRange { container } => write!(f, "{container} index out of range"),
            Self::MissingArguments { function, missing } => write!(
                f,
                "{function}() missing {} required positional argument{}: {}",
                missing.len(),
                plural(missing.len()),
                quoted_list(missing)
            ),
            Self::TooManyArguments {
                function,
                expected,
                given,
            } => write!(
                f,
                "{function}() takes {expected} positional argument{} but {given} {} given",
                plural(*expected),
                if *given == 1 { "was" } else { "were" }
            ),
            Self::BuiltinArity {
                function,
                arity,
                given,
            } => write!(f, "{function}() takes {arity} ({given} given)"),
            Self::NotCallable { type_name } => write!(f, "'{type_name}' object is not callable"),
            Self::StepLimitExceeded { limit } => write!(f, "step limit of {limit} reached"),
            Self::Internal { message } => write!(f, "internal error: {message}"),
        }
    }
}

/// Secondary information attached to an error, such as where the called
/// function was defined.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EvalNote {
    pub message: String,
    pub span: Option<Span>,
}

impl EvalNote {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            span: None,
        }
    }

    pub fn with_span(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span: Some(span),
        }
    }
}

/// Evaluation error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EvalError {
    pub kind: EvalErrorKind,
    /// Equals `kind.to_string()` for factory-built errors.
    pub message: String,
    /// Source location of the node or instruction that failed.
    pub span: Option<Span>,
    pub notes: Vec<EvalNote>,
}

impl EvalError {
    fn from_kind(kind: EvalErrorKind) -> Self {
        let message = kind.to_string();
        Self {
            kind,
            message,
            span: None,
            notes: Vec::new(),
        }
    }

    /// Attach a source span unless one is already set.
    ///
    /// Builtins raise errors without location; the machine fills in the
    /// span of the call when the error surfaces.
    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        self.span.get_or_insert(span);
        self
    }

    #[must_use]
    pub fn with_note(mut self, note: EvalNote) -> Self {
        self.notes.push(note);
        self
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for EvalError {}

// Arithmetic

#[cold]
pub fn zero_division(message: &'static str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::ZeroDivision { message })
}

#[cold]
pub fn math_domain_error() -> EvalError {
    EvalError::from_kind(EvalErrorKind::MathDomain)
}

#[cold]
pub fn value_error(message: impl Into<String>) -> EvalError {
    EvalError::from_kind(EvalErrorKind::ValueError {
        message: message.into(),
    })
}

#[cold]
pub fn overflow(message: impl Into<String>) -> EvalError {
    EvalError::from_kind(EvalErrorKind::Overflow {
        message: message.into(),
    })
}

// Operators

#[cold]
pub fn unsupported_operand(op: BinaryOp, left: &'static str, right: &'static str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UnsupportedOperand {
        op: op.as_symbol(),
        left,
        right,
    })
}

/// `str + x` or `x + str` where `x` is not a string.
#[cold]
pub fn concatenation_type(other: &'static str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::ConcatenationType { other })
}

#[cold]
pub fn bad_unary_operand(op: UnaryOp, operand: &'static str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::BadUnaryOperand {
        op: op.as_symbol(),
        operand,
    })
}

#[cold]
pub fn not_a_bool(context: &'static str, got: &'static str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NotABool { context, got })
}

#[cold]
pub fn ordering_not_supported(op: BinaryOp, left: &'static str, right: &'static str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::OrderingNotSupported {
        op: op.as_symbol(),
        left,
        right,
    })
}

#[cold]
pub fn builtin_type_error(message: impl Into<String>) -> EvalError {
    EvalError::from_kind(EvalErrorKind::BuiltinTypeError {
        message: message.into(),
    })
}

#[cold]
pub fn bad_subscript(message: impl Into<String>) -> EvalError {
    EvalError::from_kind(EvalErrorKind::BadSubscript {
        message: message.into(),
    })
}

// Bindings

#[cold]
pub fn undefined_variable(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UndefinedVariable {
        name: name.to_string(),
    })
}

#[cold]
pub fn unassigned_variable(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UnassignedVariable {
        name: name.to_string(),
    })
}

#[cold]
pub fn variable_redeclaration(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::VariableRedeclaration {
        name: name.to_string(),
    })
}

#[cold]
pub fn constant_reassignment(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::ConstantReassignment {
        name: name.to_string(),
    })
}

/// `container` is `"list"` or `"string"`.
#[cold]
pub fn index_out_of_range(container: &'static str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::IndexOutOfRange { container })
}

// Calls

#[cold]
pub fn missing_arguments(function: &str, missing: Vec<String>) -> EvalError {
    EvalError::from_kind(EvalErrorKind::MissingArguments {
        function: function.to_string(),
        missing,
    })
}

#[cold]
pub fn too_many_arguments(function: &str, expected: usize, given: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::TooManyArguments {
        function: function.to_string(),
        expected,
        given,
    })
}

#[cold]
pub fn builtin_arity(function: &'static str, arity: Arity, given: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::BuiltinArity {
        function,
        arity,
        given,
    })
}

#[cold]
pub fn not_callable(type_name: &'static str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NotCallable { type_name })
}

#[cold]
pub fn user_error(message: impl Into<String>) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UserError {
        message: message.into(),
    })
}

#[cold]
pub fn step_limit_exceeded(limit: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::StepLimitExceeded { limit })
}

#[cold]
pub fn internal(message: impl Into<String>) -> EvalError {
    EvalError::from_kind(EvalErrorKind::Internal {
        message: message.into(),
    })
}
