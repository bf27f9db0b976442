use std::rc::Rc;

use pretty_assertions::assert_eq;
use pyx_ir::{BinaryOp, Declaration, Literal, Node, NodeKind, Span, StringInterner};

use super::*;
use crate::environment::EnvId;
use crate::instr::Instr;

fn lit(value: i64) -> Rc<Node> {
    Node::rc(NodeKind::Literal(Literal::Int(value.into())), Span::new(0, 1))
}

fn block(interner: &StringInterner, declared: &[&str]) -> Rc<Node> {
    Node::rc(
        NodeKind::Block {
            body: vec![lit(1)],
            declarations: declared
                .iter()
                .map(|d| Declaration {
                    name: interner.intern(d),
                    constant: false,
                })
                .collect(),
        },
        Span::new(0, 10),
    )
}

#[test]
fn test_block_without_declarations_is_flattened() {
    let interner = StringInterner::new();
    let mut control = Control::new();
    control.push_node(block(&interner, &[]));
    let Some(ControlItem::Node { node, .. }) = control.pop() else {
        panic!("expected a node");
    };
    assert_eq!(node.kind.name(), "StatementSequence");
    assert_eq!(node.span, Span::new(0, 10));
}

#[test]
fn test_block_with_declarations_is_kept() {
    let interner = StringInterner::new();
    let mut control = Control::new();
    control.push(ControlItem::Node {
        node: block(&interner, &["x"]),
        skip_env: true,
    });
    let Some(ControlItem::Node { node, skip_env }) = control.pop() else {
        panic!("expected a node");
    };
    assert_eq!(node.kind.name(), "Block");
    assert!(skip_env);
}

#[test]
fn test_env_dependent_counter() {
    let interner = StringInterner::new();
    let mut control = Control::new();
    assert!(control.can_avoid_env_instr());

    control.push_node(lit(1));
    control.push_instr(Instr::binary_op(BinaryOp::Add, Span::DUMMY));
    assert!(control.can_avoid_env_instr());

    let ident = Node::rc(NodeKind::Identifier(interner.intern("x")), Span::DUMMY);
    control.push_node(ident);
    control.push_instr(Instr::assignment(interner.intern("y"), false, true, Span::DUMMY));
    assert_eq!(control.env_dependent_count(), 2);

    control.pop();
    control.pop();
    assert!(control.can_avoid_env_instr());
    assert_eq!(control.size(), 2);
}

#[test]
fn test_restore_is_not_env_dependent() {
    let mut control = Control::new();
    control.push_instr(Instr::environment_restore(EnvId::GLOBAL, Span::DUMMY));
    assert!(control.can_avoid_env_instr());
    assert!(control.peek().is_some_and(ControlItem::is_restore));
}

#[test]
fn test_clone_is_independent() {
    let mut control = Control::new();
    control.push_node(lit(1));
    let mut copy = control.clone();
    copy.push_node(lit(2));
    assert_eq!(control.size(), 1);
    assert_eq!(copy.size(), 2);
}

#[test]
fn test_describe() {
    let interner = StringInterner::new();
    let item = ControlItem::node(Node::rc(
        NodeKind::Identifier(interner.intern("n")),
        Span::new(3, 4),
    ));
    assert_eq!(item.describe(&interner), "Identifier n @3..4");
    let restore: ControlItem = Instr::environment_restore(EnvId::GLOBAL, Span::DUMMY).into();
    assert_eq!(restore.describe(&interner), "EnvironmentRestore -1");
}
