use super::*;
use crate::StringInterner;
use pretty_assertions::assert_eq;

fn lit(value: i64) -> Rc<Node> {
    Node::rc(NodeKind::Literal(Literal::Int(value.into())), Span::DUMMY)
}

fn ident(interner: &StringInterner, name: &str) -> Rc<Node> {
    Node::rc(NodeKind::Identifier(interner.intern(name)), Span::DUMMY)
}

fn block(body: Vec<Rc<Node>>, declarations: Vec<Declaration>) -> Rc<Node> {
    Node::rc(NodeKind::Block { body, declarations }, Span::DUMMY)
}

#[test]
fn test_literals_are_env_independent() {
    let sum = Node::rc(
        NodeKind::Binary {
            op: BinaryOp::Add,
            left: lit(1),
            right: lit(2),
        },
        Span::DUMMY,
    );
    assert!(!sum.is_env_dependent());
}

#[test]
fn test_identifier_makes_parent_dependent() {
    let interner = StringInterner::new();
    let sum = Node::rc(
        NodeKind::Binary {
            op: BinaryOp::Add,
            left: lit(1),
            right: ident(&interner, "x"),
        },
        Span::DUMMY,
    );
    assert!(sum.is_env_dependent());
}

#[test]
fn test_block_with_declarations_is_dependent() {
    let interner = StringInterner::new();
    let decl = Declaration {
        name: interner.intern("x"),
        constant: false,
    };
    assert!(block(vec![lit(1)], vec![decl]).is_env_dependent());
    assert!(!block(vec![lit(1)], vec![]).is_env_dependent());
}

#[test]
fn test_env_dependence_is_cached() {
    let node = lit(3);
    assert!(!node.is_env_dependent());
    assert_eq!(node.env_dependent.get(), Some(&false));
}

#[test]
fn test_single_return_detection() {
    let interner = StringInterner::new();
    let ret = Node::rc(NodeKind::Return(Some(lit(1))), Span::DUMMY);
    let function = Function {
        name: Some(interner.intern("one")),
        params: vec![],
        body: block(vec![ret.clone()], vec![]),
        locals: vec![],
    };
    assert!(function.single_return().is_some());

    let two_statements = Function {
        name: None,
        params: vec![],
        body: block(vec![lit(0), ret], vec![]),
        locals: vec![],
    };
    assert!(two_statements.single_return().is_none());
}

#[test]
fn test_rest_and_required_params() {
    let interner = StringInterner::new();
    let a = Param {
        name: interner.intern("a"),
        rest: false,
        span: Span::DUMMY,
    };
    let rest = Param {
        name: interner.intern("rest"),
        rest: true,
        span: Span::DUMMY,
    };
    let function = Function {
        name: None,
        params: vec![a, rest],
        body: block(vec![], vec![]),
        locals: vec![],
    };
    assert_eq!(function.rest_param(), Some(&rest));
    assert_eq!(function.required_params(), &[a]);
}

#[test]
fn test_dump_tree_shows_structure() {
    let interner = StringInterner::new();
    let x = interner.intern("x");
    let program = Node::rc(
        NodeKind::Program {
            body: vec![Node::rc(
                NodeKind::Assign {
                    target: x,
                    value: lit(5),
                    declaration: true,
                },
                Span::new(0, 5),
            )],
            declarations: vec![Declaration {
                name: x,
                constant: false,
            }],
        },
        Span::new(0, 5),
    );
    let text = dump_tree(&program, &interner);
    assert_eq!(
        text,
        "Program [x] @0..5\n  Assign x @0..5\n    Literal 5 @0..0\n"
    );
}
