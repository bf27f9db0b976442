//! Indented text rendering of a tree, for `pyx parse`.

use std::fmt::Write;

use super::{Function, Literal, Node, NodeKind};
use crate::StringInterner;

/// Render `node` and its children, one node per line.
pub fn dump_tree(node: &Node, interner: &StringInterner) -> String {
    let mut out = String::new();
    Dumper {
        out: &mut out,
        interner,
    }
    .node(node, 0);
    out
}

struct Dumper<'a> {
    out: &'a mut String,
    interner: &'a StringInterner,
}

impl Dumper<'_> {
    fn line(&mut self, depth: usize, text: &str) {
        let _ = writeln!(self.out, "{:indent$}{text}", "", indent = depth * 2);
    }

    fn node(&mut self, node: &Node, depth: usize) {
        let header = format!("{} @{}", self.describe(&node.kind), node.span);
        self.line(depth, &header);
        let child = depth + 1;
        match &node.kind {
            NodeKind::Program { body, .. }
            | NodeKind::Block { body, .. }
            | NodeKind::StatementSequence { body }
            | NodeKind::List(body) => {
                for n in body {
                    self.node(n, child);
                }
            }
            NodeKind::ExpressionStatement(e)
            | NodeKind::Return(Some(e))
            | NodeKind::Assign { value: e, .. }
            | NodeKind::Unary { operand: e, .. } => self.node(e, child),
            NodeKind::FunctionDef { function, .. } | NodeKind::Lambda(function) => {
                self.function(function, child);
            }
            NodeKind::If {
                test,
                consequent,
                alternate,
            } => {
                self.node(test, child);
                self.node(consequent, child);
                if let Some(alt) = alternate {
                    self.node(alt, child);
                }
            }
            NodeKind::Conditional {
                test,
                consequent,
                alternate,
            } => {
                self.node(test, child);
                self.node(consequent, child);
                self.node(alternate, child);
            }
            NodeKind::Binary { left, right, .. } => {
                self.node(left, child);
                self.node(right, child);
            }
            NodeKind::Call { callee, args } => {
                self.node(callee, child);
                for a in args {
                    self.node(a, child);
                }
            }
            NodeKind::Subscript { value, index } => {
                self.node(value, child);
                self.node(index, child);
            }
            NodeKind::Return(None)
            | NodeKind::Pass
            | NodeKind::Literal(_)
            | NodeKind::Identifier(_) => {}
        }
    }

    fn function(&mut self, function: &Function, depth: usize) {
        let params: Vec<String> = function
            .params
            .iter()
            .map(|p| {
                let name = self.interner.lookup(p.name);
                if p.rest {
                    format!("*{name}")
                } else {
                    name.to_string()
                }
            })
            .collect();
        self.line(depth, &format!("params ({})", params.join(", ")));
        self.node(&function.body, depth);
    }

    fn names(&self, names: impl Iterator<Item = crate::Name>) -> String {
        names
            .map(|n| self.interner.lookup(n))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn describe(&self, kind: &NodeKind) -> String {
        match kind {
            NodeKind::Program { declarations, .. } | NodeKind::Block { declarations, .. }
                if !declarations.is_empty() =>
            {
                let names = self.names(declarations.iter().map(|d| d.name));
                format!("{} [{names}]", kind.name())
            }
            NodeKind::Assign {
                target,
                declaration,
                ..
            } => format!(
                "Assign {}{}",
                self.interner.lookup(*target),
                if *declaration { "" } else { " (outer)" }
            ),
            NodeKind::FunctionDef { name, .. } => {
                format!("FunctionDef {}", self.interner.lookup(*name))
            }
            NodeKind::Identifier(name) => format!("Identifier {}", self.interner.lookup(*name)),
            NodeKind::Unary { op, .. } => format!("Unary {}", op.as_symbol()),
            NodeKind::Binary { op, .. } => format!("Binary {}", op.as_symbol()),
            NodeKind::Literal(lit) => match lit {
                Literal::None => "Literal None".to_string(),
                Literal::Bool(b) => format!("Literal {}", if *b { "True" } else { "False" }),
                Literal::Int(i) => format!("Literal {i}"),
                Literal::Float(f) => format!("Literal {f:?}"),
                Literal::Imag(f) => format!("Literal {f:?}j"),
                Literal::Str(s) => format!("Literal {s:?}"),
            },
            _ => kind.name().to_string(),
        }
    }
}
