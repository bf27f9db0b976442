//! The statement/expression tree consumed by the evaluator.
//!
//! Nodes are reference counted: the evaluator pushes the same `Rc<Node>`
//! onto its control stack many times (loops through recursion, repeated
//! calls), and closures keep their function body alive after the program
//! tree is otherwise dropped.

mod dump;
mod operators;

use std::cell::OnceCell;
use std::rc::Rc;

use num_bigint::BigInt;

use crate::stack::ensure_sufficient_stack;
use crate::{Name, Span};

pub use dump::dump_tree;
pub use operators::{BinaryOp, UnaryOp};

/// Literal constant.
#[derive(Clone, Debug, PartialEq)]
pub enum Literal {
    None,
    Bool(bool),
    Int(BigInt),
    Float(f64),
    /// Imaginary literal such as `2j`; the payload is the imaginary part.
    Imag(f64),
    Str(Rc<str>),
}

/// A formal parameter. `rest` marks a `*args` parameter, which must be last.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Param {
    pub name: Name,
    pub rest: bool,
    pub span: Span,
}

/// A name introduced by a program or block, declared before the body runs.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Declaration {
    pub name: Name,
    pub constant: bool,
}

/// A `def` or `lambda` body with its parameters.
#[derive(Debug, PartialEq)]
pub struct Function {
    /// `None` for lambdas.
    pub name: Option<Name>,
    pub params: Vec<Param>,
    /// Always a `Block`.
    pub body: Rc<Node>,
    /// Names declared directly in the body.
    pub locals: Vec<Name>,
}

impl Function {
    /// The rest parameter, if the last parameter is one.
    pub fn rest_param(&self) -> Option<&Param> {
        self.params.last().filter(|p| p.rest)
    }

    /// Parameters that must be supplied positionally.
    pub fn required_params(&self) -> &[Param] {
        match self.rest_param() {
            Some(_) => &self.params[..self.params.len() - 1],
            None => &self.params,
        }
    }

    /// The returned expression when the body is exactly `return <expr>`
    /// with no local declarations.
    pub fn single_return(&self) -> Option<&Rc<Node>> {
        let NodeKind::Block { body, declarations } = &self.body.kind else {
            return None;
        };
        if !declarations.is_empty() || body.len() != 1 {
            return None;
        }
        match &body[0].kind {
            NodeKind::Return(Some(expr)) => Some(expr),
            _ => None,
        }
    }
}

#[derive(Debug, PartialEq)]
pub enum NodeKind {
    // Statements and containers
    Program {
        body: Vec<Rc<Node>>,
        declarations: Vec<Declaration>,
    },
    Block {
        body: Vec<Rc<Node>>,
        declarations: Vec<Declaration>,
    },
    /// A block that introduces no bindings.
    StatementSequence {
        body: Vec<Rc<Node>>,
    },
    ExpressionStatement(Rc<Node>),
    /// `target = value`. `declaration` binds in the current frame; otherwise
    /// the assignment walks the scope chain (parameters, `nonlocal` names).
    Assign {
        target: Name,
        value: Rc<Node>,
        declaration: bool,
    },
    FunctionDef {
        name: Name,
        function: Rc<Function>,
        declaration: bool,
    },
    Return(Option<Rc<Node>>),
    If {
        test: Rc<Node>,
        consequent: Rc<Node>,
        alternate: Option<Rc<Node>>,
    },
    Pass,

    // Expressions
    Literal(Literal),
    Identifier(Name),
    Unary {
        op: UnaryOp,
        operand: Rc<Node>,
    },
    Binary {
        op: BinaryOp,
        left: Rc<Node>,
        right: Rc<Node>,
    },
    Conditional {
        test: Rc<Node>,
        consequent: Rc<Node>,
        alternate: Rc<Node>,
    },
    Lambda(Rc<Function>),
    Call {
        callee: Rc<Node>,
        args: Vec<Rc<Node>>,
    },
    List(Vec<Rc<Node>>),
    Subscript {
        value: Rc<Node>,
        index: Rc<Node>,
    },
}

impl NodeKind {
    /// Discriminator name, used in control-stack snapshots and tree dumps.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Program { .. } => "Program",
            Self::Block { .. } => "Block",
            Self::StatementSequence { .. } => "StatementSequence",
            Self::ExpressionStatement(_) => "ExpressionStatement",
            Self::Assign { .. } => "Assign",
            Self::FunctionDef { .. } => "FunctionDef",
            Self::Return(_) => "Return",
            Self::If { .. } => "If",
            Self::Pass => "Pass",
            Self::Literal(_) => "Literal",
            Self::Identifier(_) => "Identifier",
            Self::Unary { .. } => "Unary",
            Self::Binary { .. } => "Binary",
            Self::Conditional { .. } => "Conditional",
            Self::Lambda(_) => "Lambda",
            Self::Call { .. } => "Call",
            Self::List(_) => "List",
            Self::Subscript { .. } => "Subscript",
        }
    }
}

/// A tree node with its source span.
#[derive(Debug)]
pub struct Node {
    pub kind: NodeKind,
    pub span: Span,
    env_dependent: OnceCell<bool>,
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.span == other.span
    }
}

impl Node {
    pub fn new(kind: NodeKind, span: Span) -> Self {
        Node {
            kind,
            span,
            env_dependent: OnceCell::new(),
        }
    }

    /// Convenience for building trees by hand.
    pub fn rc(kind: NodeKind, span: Span) -> Rc<Node> {
        Rc::new(Node::new(kind, span))
    }

    /// Declarations of a `Program` or `Block`; empty for everything else.
    pub fn declarations(&self) -> &[Declaration] {
        match &self.kind {
            NodeKind::Program { declarations, .. } | NodeKind::Block { declarations, .. } => {
                declarations
            }
            _ => &[],
        }
    }

    /// Whether evaluating this node reads or writes the current environment.
    ///
    /// Computed on first use and cached. Literals and `pass` are independent;
    /// names, assignments, and function creation are dependent; everything
    /// else is dependent when any child is.
    pub fn is_env_dependent(&self) -> bool {
        *self
            .env_dependent
            .get_or_init(|| ensure_sufficient_stack(|| self.compute_env_dependent()))
    }

    fn compute_env_dependent(&self) -> bool {
        fn any(nodes: &[Rc<Node>]) -> bool {
            nodes.iter().any(|n| n.is_env_dependent())
        }

        match &self.kind {
            NodeKind::Literal(_) | NodeKind::Pass => false,
            NodeKind::Identifier(_)
            | NodeKind::Assign { .. }
            | NodeKind::FunctionDef { .. }
            | NodeKind::Lambda(_) => true,
            NodeKind::Program { body, declarations } | NodeKind::Block { body, declarations } => {
                !declarations.is_empty() || any(body)
            }
            NodeKind::StatementSequence { body } | NodeKind::List(body) => any(body),
            NodeKind::ExpressionStatement(expr) => expr.is_env_dependent(),
            NodeKind::Return(expr) => expr.as_ref().is_some_and(|e| e.is_env_dependent()),
            NodeKind::If {
                test,
                consequent,
                alternate,
            } => {
                test.is_env_dependent()
                    || consequent.is_env_dependent()
                    || alternate.as_ref().is_some_and(|a| a.is_env_dependent())
            }
            NodeKind::Conditional {
                test,
                consequent,
                alternate,
            } => {
                test.is_env_dependent()
                    || consequent.is_env_dependent()
                    || alternate.is_env_dependent()
            }
            NodeKind::Unary { operand, .. } => operand.is_env_dependent(),
            NodeKind::Binary { left, right, .. } => {
                left.is_env_dependent() || right.is_env_dependent()
            }
            NodeKind::Call { callee, args } => callee.is_env_dependent() || any(args),
            NodeKind::Subscript { value, index } => {
                value.is_env_dependent() || index.is_env_dependent()
            }
        }
    }
}

#[cfg(test)]
mod tests;
