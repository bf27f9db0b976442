//! Error codes for every Pyx diagnostic.
//!
//! The first digit names the phase that reports the error.

use std::fmt;

/// Error codes, formatted `E####`:
/// - E0xxx: lexer errors
/// - E1xxx: parser errors
/// - E6xxx: runtime errors raised by the machine
/// - E9xxx: internal errors
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    // Lexer Errors (E0xxx)
    /// Unterminated string literal
    E0001,
    /// Invalid character in source
    E0002,
    /// Invalid number literal
    E0003,
    /// Dedent does not match any outer indentation level
    E0004,

    // Parser Errors (E1xxx)
    /// Unexpected token
    E1001,
    /// Expected expression
    E1002,
    /// Unclosed delimiter
    E1003,
    /// Invalid assignment target
    E1004,
    /// `return` outside a function
    E1005,
    /// Misplaced `nonlocal` declaration
    E1006,
    /// Chained comparison
    E1007,

    // Arithmetic (E600x)
    /// Division or modulo by zero
    E6001,
    /// Math domain error
    E6002,
    /// Malformed value passed to a conversion
    E6003,
    /// Numeric result out of range
    E6004,

    // Operators and types (E601x)
    /// Unsupported operand types for a binary operator
    E6010,
    /// String concatenated with a non-string
    E6011,
    /// Bad operand type for a unary operator
    E6012,
    /// Condition is not a bool
    E6013,
    /// Ordering comparison between unsupported types
    E6014,
    /// Builtin called with an argument of the wrong type
    E6015,
    /// Subscript of a non-sequence, or with a non-integer index
    E6016,

    // Bindings (E602x)
    /// Undefined variable
    E6020,
    /// Variable read before assignment
    E6021,
    /// Variable declared twice in one scope
    E6022,
    /// Assignment to a constant
    E6023,
    /// List index out of range
    E6024,

    // Calls (E603x)
    /// Missing required positional arguments
    E6030,
    /// Too many positional arguments
    E6031,
    /// Called a value that is not a function
    E6032,

    /// Error raised by user code
    E6050,

    /// Step limit reached (reported as a warning)
    E6070,

    // Internal Errors (E9xxx)
    /// Machine invariant violated
    E9001,
}

impl ErrorCode {
    /// Every variant, for exhaustive lookups and tests.
    pub const ALL: &[ErrorCode] = &[
        ErrorCode::E0001,
        ErrorCode::E0002,
        ErrorCode::E0003,
        ErrorCode::E0004,
        ErrorCode::E1001,
        ErrorCode::E1002,
        ErrorCode::E1003,
        ErrorCode::E1004,
        ErrorCode::E1005,
        ErrorCode::E1006,
        ErrorCode::E1007,
        ErrorCode::E6001,
        ErrorCode::E6002,
        ErrorCode::E6003,
        ErrorCode::E6004,
        ErrorCode::E6010,
        ErrorCode::E6011,
        ErrorCode::E6012,
        ErrorCode::E6013,
        ErrorCode::E6014,
        ErrorCode::E6015,
        ErrorCode::E6016,
        ErrorCode::E6020,
        ErrorCode::E6021,
        ErrorCode::E6022,
        ErrorCode::E6023,
        ErrorCode::E6024,
        ErrorCode::E6030,
        ErrorCode::E6031,
        ErrorCode::E6032,
        ErrorCode::E6050,
        ErrorCode::E6070,
        ErrorCode::E9001,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E0001 => "E0001",
            ErrorCode::E0002 => "E0002",
            ErrorCode::E0003 => "E0003",
            ErrorCode::E0004 => "E0004",
            ErrorCode::E1001 => "E1001",
            ErrorCode::E1002 => "E1002",
            ErrorCode::E1003 => "E1003",
            ErrorCode::E1004 => "E1004",
            ErrorCode::E1005 => "E1005",
            ErrorCode::E1006 => "E1006",
            ErrorCode::E1007 => "E1007",
            ErrorCode::E6001 => "E6001",
            ErrorCode::E6002 => "E6002",
            ErrorCode::E6003 => "E6003",
            ErrorCode::E6004 => "E6004",
            ErrorCode::E6010 => "E6010",
            ErrorCode::E6011 => "E6011",
            ErrorCode::E6012 => "E6012",
            ErrorCode::E6013 => "E6013",
            ErrorCode::E6014 => "E6014",
            ErrorCode::E6015 => "E6015",
            ErrorCode::E6016 => "E6016",
            ErrorCode::E6020 => "E6020",
            ErrorCode::E6021 => "E6021",
            ErrorCode::E6022 => "E6022",
            ErrorCode::E6023 => "E6023",
            ErrorCode::E6024 => "E6024",
            ErrorCode::E6030 => "E6030",
            ErrorCode::E6031 => "E6031",
            ErrorCode::E6032 => "E6032",
            ErrorCode::E6050 => "E6050",
            ErrorCode::E6070 => "E6070",
            ErrorCode::E9001 => "E9001",
        }
    }

    /// Python exception class the error corresponds to, shown in headers.
    pub fn python_class(&self) -> Option<&'static str> {
        match self {
            ErrorCode::E6001 => Some("ZeroDivisionError"),
            ErrorCode::E6002 | ErrorCode::E6003 => Some("ValueError"),
            ErrorCode::E6004 => Some("OverflowError"),
            ErrorCode::E6010
            | ErrorCode::E6011
            | ErrorCode::E6012
            | ErrorCode::E6013
            | ErrorCode::E6014
            | ErrorCode::E6015
            | ErrorCode::E6016
            | ErrorCode::E6030
            | ErrorCode::E6031
            | ErrorCode::E6032 => Some("TypeError"),
            ErrorCode::E6020 => Some("NameError"),
            ErrorCode::E6021 => Some("UnboundLocalError"),
            ErrorCode::E6024 => Some("IndexError"),
            _ => None,
        }
    }

    pub fn is_lexer_error(&self) -> bool {
        self.as_str().starts_with("E0")
    }

    pub fn is_parser_error(&self) -> bool {
        self.as_str().starts_with("E1")
    }

    pub fn is_eval_error(&self) -> bool {
        self.as_str().starts_with("E6")
    }

    pub fn is_internal_error(&self) -> bool {
        matches!(self, ErrorCode::E9001)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Parse a code such as `"E6001"`, case-insensitively.
impl std::str::FromStr for ErrorCode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_uppercase();
        Self::ALL
            .iter()
            .find(|code| code.as_str() == upper)
            .copied()
            .ok_or(())
    }
}

#[cfg(test)]
mod tests;
