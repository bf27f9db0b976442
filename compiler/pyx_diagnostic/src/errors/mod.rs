//! Long-form explanations for `pyx explain`.
//!
//! Each code has a markdown page in this directory, embedded at compile
//! time. To document a new code, add `EXXXX.md` here and list it in `DOCS`.

use crate::ErrorCode;

/// Registry of embedded error documentation.
pub struct ErrorDocs;

impl ErrorDocs {
    /// Markdown explanation for `code`, if one is written.
    ///
    /// ```
    /// use pyx_diagnostic::{ErrorCode, ErrorDocs};
    ///
    /// let doc = ErrorDocs::get(ErrorCode::E6001);
    /// assert!(doc.is_some_and(|d| d.contains("ZeroDivisionError")));
    /// ```
    pub fn get(code: ErrorCode) -> Option<&'static str> {
        DOCS.iter().find(|(c, _)| *c == code).map(|(_, doc)| *doc)
    }

    pub fn all_codes() -> impl Iterator<Item = ErrorCode> {
        DOCS.iter().map(|(code, _)| *code)
    }

    pub fn has_docs(code: ErrorCode) -> bool {
        DOCS.iter().any(|(c, _)| *c == code)
    }
}

static DOCS: &[(ErrorCode, &str)] = &[
    // Lexer errors (E0xxx)
    (ErrorCode::E0001, include_str!("E0001.md")),
    (ErrorCode::E0002, include_str!("E0002.md")),
    (ErrorCode::E0003, include_str!("E0003.md")),
    (ErrorCode::E0004, include_str!("E0004.md")),
    // Parser errors (E1xxx)
    (ErrorCode::E1001, include_str!("E1001.md")),
    (ErrorCode::E1002, include_str!("E1002.md")),
    (ErrorCode::E1003, include_str!("E1003.md")),
    (ErrorCode::E1004, include_str!("E1004.md")),
    (ErrorCode::E1005, include_str!("E1005.md")),
    (ErrorCode::E1006, include_str!("E1006.md")),
    (ErrorCode::E1007, include_str!("E1007.md")),
    // Arithmetic (E600x)
    (ErrorCode::E6001, include_str!("E6001.md")),
    (ErrorCode::E6002, include_str!("E6002.md")),
    (ErrorCode::E6003, include_str!("E6003.md")),
    (ErrorCode::E6004, include_str!("E6004.md")),
    // Operand types (E601x)
    (ErrorCode::E6010, include_str!("E6010.md")),
    (ErrorCode::E6011, include_str!("E6011.md")),
    (ErrorCode::E6012, include_str!("E6012.md")),
    (ErrorCode::E6013, include_str!("E6013.md")),
    (ErrorCode::E6014, include_str!("E6014.md")),
    (ErrorCode::E6015, include_str!("E6015.md")),
    (ErrorCode::E6016, include_str!("E6016.md")),
    // Names and bindings (E602x)
    (ErrorCode::E6020, include_str!("E6020.md")),
    (ErrorCode::E6021, include_str!("E6021.md")),
    (ErrorCode::E6022, include_str!("E6022.md")),
    (ErrorCode::E6023, include_str!("E6023.md")),
    (ErrorCode::E6024, include_str!("E6024.md")),
    // Calls (E603x)
    (ErrorCode::E6030, include_str!("E6030.md")),
    (ErrorCode::E6031, include_str!("E6031.md")),
    (ErrorCode::E6032, include_str!("E6032.md")),
    (ErrorCode::E6050, include_str!("E6050.md")),
    (ErrorCode::E6070, include_str!("E6070.md")),
    // Internal errors (E9xxx)
    (ErrorCode::E9001, include_str!("E9001.md")),
];
