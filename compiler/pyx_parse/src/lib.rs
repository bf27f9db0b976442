//! Frontend for the Pyx teaching subset of Python.
//!
//! [`parse`] lexes and parses source text into a `Program` node ready for
//! the evaluator. Assigned names are already hoisted into their scope's
//! declarations and every function body ends in a `return`.

mod cursor;
mod error;
pub mod lexer;
mod parser;

use std::rc::Rc;

use pyx_ir::{Node, StringInterner};

pub use error::ParseError;
pub use parser::Parser;

/// Parse a whole program. Stops at the first error.
#[tracing::instrument(level = "debug", skip_all, fields(len = source.len()))]
pub fn parse(source: &str, interner: &StringInterner) -> Result<Rc<Node>, ParseError> {
    let tokens = lexer::lex(source, interner)?;
    tracing::debug!(tokens = tokens.len(), "lexed");
    Parser::new(tokens, interner).parse_program()
}
