//! Pyx IR: spans, interned names, and the statement/expression tree.
//!
//! The parser produces this tree and the evaluator consumes it. Nodes are
//! `Rc`-shared and immutable apart from a lazily cached environment
//! dependence flag.

pub mod ast;
mod interner;
mod name;
mod span;
pub mod stack;

pub use ast::{
    dump_tree, BinaryOp, Declaration, Function, Literal, Node, NodeKind, Param, UnaryOp,
};
pub use interner::{InternError, SharedInterner, StringInterner};
pub use name::Name;
pub use span::{Span, SpanError};
