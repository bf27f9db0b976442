//! Control and Stash.
//!
//! Control holds pending work: source nodes and instructions, top last.
//! It keeps a running count of environment-dependent items so that
//! handlers can tell in O(1) whether an `EnvironmentRestore` is needed.

use std::rc::Rc;

use pyx_ir::{Node, NodeKind, Span, StringInterner};

use crate::environment::EnvId;
use crate::instr::Instr;
use crate::stack::Stack;
use crate::value::Value;

/// The operand stack.
pub type Stash = Stack<Value>;

#[derive(Clone, Debug)]
pub enum ControlItem {
    Node {
        node: Rc<Node>,
        /// Set when the pusher has already arranged the environment, so a
        /// block need not push its own restore.
        skip_env: bool,
    },
    Instr(Instr),
}

impl ControlItem {
    pub fn node(node: Rc<Node>) -> Self {
        ControlItem::Node {
            node,
            skip_env: false,
        }
    }

    /// Source span of the node, or of the node the instruction came from.
    pub fn span(&self) -> Span {
        match self {
            ControlItem::Node { node, .. } => node.span,
            ControlItem::Instr(instr) => instr.span,
        }
    }

    pub fn is_env_dependent(&self) -> bool {
        match self {
            ControlItem::Node { node, .. } => node.is_env_dependent(),
            ControlItem::Instr(instr) => instr.is_env_dependent(),
        }
    }

    pub fn is_restore(&self) -> bool {
        matches!(self, ControlItem::Instr(instr) if instr.is_restore())
    }

    pub fn restore_target(&self) -> Option<EnvId> {
        match self {
            ControlItem::Instr(instr) => instr.restore_target(),
            ControlItem::Node { .. } => None,
        }
    }

    pub fn describe(&self, interner: &StringInterner) -> String {
        match self {
            ControlItem::Node { node, .. } => {
                let what = match &node.kind {
                    NodeKind::Identifier(name) => format!("Identifier {}", interner.lookup(*name)),
                    NodeKind::Binary { op, .. } => format!("Binary {}", op.as_symbol()),
                    NodeKind::Unary { op, .. } => format!("Unary {}", op.as_symbol()),
                    other => other.name().to_string(),
                };
                format!("{what} @{}", node.span)
            }
            ControlItem::Instr(instr) => instr.describe(interner),
        }
    }
}

impl From<Instr> for ControlItem {
    fn from(instr: Instr) -> Self {
        ControlItem::Instr(instr)
    }
}

#[derive(Clone, Debug, Default)]
pub struct Control {
    items: Stack<ControlItem>,
    env_dependent: usize,
}

impl Control {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push `item`, turning a block without declarations into a statement
    /// sequence first.
    pub fn push(&mut self, item: ControlItem) {
        let item = flatten(item);
        if item.is_env_dependent() {
            self.env_dependent += 1;
        }
        self.items.push(item);
    }

    /// Push in order, so the last item ends on top.
    pub fn push_all(&mut self, items: impl IntoIterator<Item = ControlItem>) {
        for item in items {
            self.push(item);
        }
    }

    pub fn push_node(&mut self, node: Rc<Node>) {
        self.push(ControlItem::node(node));
    }

    pub fn push_instr(&mut self, instr: Instr) {
        self.push(ControlItem::Instr(instr));
    }

    pub fn pop(&mut self) -> Option<ControlItem> {
        let item = self.items.pop()?;
        if item.is_env_dependent() {
            self.env_dependent = self.env_dependent.saturating_sub(1);
        }
        Some(item)
    }

    pub fn peek(&self) -> Option<&ControlItem> {
        self.items.peek()
    }

    pub fn size(&self) -> usize {
        self.items.size()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// No remaining item depends on the current environment.
    pub fn can_avoid_env_instr(&self) -> bool {
        self.env_dependent == 0
    }

    pub fn env_dependent_count(&self) -> usize {
        self.env_dependent
    }

    /// Items from bottom to top.
    pub fn iter(&self) -> std::slice::Iter<'_, ControlItem> {
        self.items.iter()
    }
}

fn flatten(item: ControlItem) -> ControlItem {
    if let ControlItem::Node { node, skip_env } = &item {
        if let NodeKind::Block { body, declarations } = &node.kind {
            if declarations.is_empty() {
                return ControlItem::Node {
                    node: Node::rc(NodeKind::StatementSequence { body: body.clone() }, node.span),
                    skip_env: *skip_env,
                };
            }
        }
    }
    item
}

#[cfg(test)]
mod tests;
