//! Instructions: the synthetic control items handlers push alongside
//! source nodes.
//!
//! Each instruction records the span of the node it was lowered from, so
//! that a failure while executing it points at source text.

use std::rc::Rc;

use pyx_ir::{BinaryOp, Name, Node, Span, StringInterner, UnaryOp};

use crate::environment::EnvId;

#[derive(Clone, Debug)]
pub enum InstrKind {
    /// Discard the Stash top.
    Pop,
    /// Bind the Stash top to `symbol`.
    Assignment {
        symbol: Name,
        constant: bool,
        declaration: bool,
    },
    UnaryOp(UnaryOp),
    BinaryOp(BinaryOp),
    /// Call the callee below `arg_count` arguments on the Stash.
    Application {
        arg_count: usize,
    },
    /// Pop a `bool` and continue with one of the branches.
    Branch {
        consequent: Rc<Node>,
        alternate: Option<Rc<Node>>,
    },
    /// Pop environments until `target` is current.
    EnvironmentRestore {
        target: EnvId,
    },
    /// Bottom of a call frame's body.
    Marker,
    /// Unwind Control through the nearest `Marker`.
    Reset,
    /// Collect `len` Stash values into a list.
    ArrayLiteral {
        len: usize,
    },
    /// Pop an index and a sequence and push the element.
    ArrayAccess,
}

#[derive(Clone, Debug)]
pub struct Instr {
    pub kind: InstrKind,
    pub span: Span,
}

impl Instr {
    fn new(kind: InstrKind, span: Span) -> Self {
        Instr { kind, span }
    }

    pub fn pop(span: Span) -> Self {
        Self::new(InstrKind::Pop, span)
    }

    pub fn assignment(symbol: Name, constant: bool, declaration: bool, span: Span) -> Self {
        Self::new(
            InstrKind::Assignment {
                symbol,
                constant,
                declaration,
            },
            span,
        )
    }

    pub fn unary_op(op: UnaryOp, span: Span) -> Self {
        Self::new(InstrKind::UnaryOp(op), span)
    }

    pub fn binary_op(op: BinaryOp, span: Span) -> Self {
        Self::new(InstrKind::BinaryOp(op), span)
    }

    pub fn application(arg_count: usize, span: Span) -> Self {
        Self::new(InstrKind::Application { arg_count }, span)
    }

    pub fn branch(consequent: Rc<Node>, alternate: Option<Rc<Node>>, span: Span) -> Self {
        Self::new(
            InstrKind::Branch {
                consequent,
                alternate,
            },
            span,
        )
    }

    pub fn environment_restore(target: EnvId, span: Span) -> Self {
        Self::new(InstrKind::EnvironmentRestore { target }, span)
    }

    pub fn marker(span: Span) -> Self {
        Self::new(InstrKind::Marker, span)
    }

    pub fn reset(span: Span) -> Self {
        Self::new(InstrKind::Reset, span)
    }

    pub fn array_literal(len: usize, span: Span) -> Self {
        Self::new(InstrKind::ArrayLiteral { len }, span)
    }

    pub fn array_access(span: Span) -> Self {
        Self::new(InstrKind::ArrayAccess, span)
    }

    /// Whether executing this needs the current environment to be the one
    /// it was pushed under.
    pub fn is_env_dependent(&self) -> bool {
        match &self.kind {
            InstrKind::Assignment { .. } => true,
            InstrKind::Branch {
                consequent,
                alternate,
            } => {
                consequent.is_env_dependent()
                    || alternate.as_ref().is_some_and(|a| a.is_env_dependent())
            }
            InstrKind::Pop
            | InstrKind::UnaryOp(_)
            | InstrKind::BinaryOp(_)
            | InstrKind::Application { .. }
            | InstrKind::EnvironmentRestore { .. }
            | InstrKind::Marker
            | InstrKind::Reset
            | InstrKind::ArrayLiteral { .. }
            | InstrKind::ArrayAccess => false,
        }
    }

    pub fn is_restore(&self) -> bool {
        matches!(self.kind, InstrKind::EnvironmentRestore { .. })
    }

    /// The environment an `EnvironmentRestore` returns to.
    pub fn restore_target(&self) -> Option<EnvId> {
        match self.kind {
            InstrKind::EnvironmentRestore { target } => Some(target),
            _ => None,
        }
    }

    /// One-line description for step records and snapshots.
    pub fn describe(&self, interner: &StringInterner) -> String {
        match &self.kind {
            InstrKind::Pop => "Pop".to_string(),
            InstrKind::Assignment { symbol, .. } => {
                format!("Assignment {}", interner.lookup(*symbol))
            }
            InstrKind::UnaryOp(op) => format!("UnaryOp {}", op.as_symbol()),
            InstrKind::BinaryOp(op) => format!("BinaryOp {}", op.as_symbol()),
            InstrKind::Application { arg_count } => format!("Application({arg_count})"),
            InstrKind::Branch { .. } => "Branch".to_string(),
            InstrKind::EnvironmentRestore { target } => format!("EnvironmentRestore {target}"),
            InstrKind::Marker => "Marker".to_string(),
            InstrKind::Reset => "Reset".to_string(),
            InstrKind::ArrayLiteral { len } => format!("ArrayLiteral({len})"),
            InstrKind::ArrayAccess => "ArrayAccess".to_string(),
        }
    }
}
