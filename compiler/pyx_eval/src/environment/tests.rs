use std::rc::Rc;

use pretty_assertions::assert_eq;
use pyx_ir::{Function, Node, NodeKind, Param, SharedInterner, Span};

use super::*;
use crate::closure::{Closure, RunId};
use crate::errors::EvalErrorKind;
use crate::heap::HeapData;

fn runtime() -> Runtime {
    Runtime::new(SharedInterner::new())
}

fn closure(rt: &Runtime, params: &[(&str, bool)]) -> Closure {
    let interner = rt.interner();
    let function = Function {
        name: Some(interner.intern("f")),
        params: params
            .iter()
            .map(|(name, rest)| Param {
                name: interner.intern(name),
                rest: *rest,
                span: Span::DUMMY,
            })
            .collect(),
        body: Node::rc(
            NodeKind::Block {
                body: vec![],
                declarations: vec![],
            },
            Span::DUMMY,
        ),
        locals: vec![],
    };
    Closure::make_from_function_def(
        Rc::new(function),
        rt.current_environment(),
        RunId::fresh(),
        false,
        Span::DUMMY,
    )
}

#[test]
fn test_global_environment_displays_as_minus_one() {
    let rt = runtime();
    assert_eq!(rt.current_environment(), EnvId::GLOBAL);
    assert_eq!(EnvId::GLOBAL.to_string(), "-1");
    assert_eq!(rt.environment(EnvId::GLOBAL).unwrap().tail, None);
}

#[test]
fn test_declare_then_define_then_get() {
    let mut rt = runtime();
    let x = rt.interner().intern("x");
    rt.declare_identifier(EnvId::GLOBAL, x, false).unwrap();

    let err = rt.get_variable(x).unwrap_err();
    assert!(matches!(err.kind, EvalErrorKind::UnassignedVariable { .. }));

    rt.define_variable(EnvId::GLOBAL, x, Value::int(5), false).unwrap();
    assert_eq!(rt.get_variable(x).unwrap(), Value::int(5));
}

#[test]
fn test_redeclaration_is_an_error() {
    let mut rt = runtime();
    let x = rt.interner().intern("x");
    rt.declare_identifier(EnvId::GLOBAL, x, false).unwrap();
    let err = rt.declare_identifier(EnvId::GLOBAL, x, false).unwrap_err();
    assert_eq!(
        err.kind,
        EvalErrorKind::VariableRedeclaration {
            name: "x".to_string()
        }
    );
}

#[test]
fn test_define_without_declare_is_internal() {
    let mut rt = runtime();
    let x = rt.interner().intern("x");
    let err = rt
        .define_variable(EnvId::GLOBAL, x, Value::None, false)
        .unwrap_err();
    assert!(matches!(err.kind, EvalErrorKind::Internal { .. }));
}

#[test]
fn test_undefined_variable() {
    let rt = runtime();
    let err = rt.get_variable(rt.interner().intern("nope")).unwrap_err();
    assert_eq!(err.message, "name 'nope' is not defined");
}

#[test]
fn test_lookup_walks_tail_chain() {
    let mut rt = runtime();
    let x = rt.interner().intern("x");
    rt.declare_identifier(EnvId::GLOBAL, x, false).unwrap();
    rt.define_variable(EnvId::GLOBAL, x, Value::int(1), false).unwrap();

    let inner = rt.create_block_environment("blockEnvironment").unwrap();
    rt.push_environment(inner);
    assert_eq!(rt.get_variable(x).unwrap(), Value::int(1));

    rt.assign_variable(x, Value::int(2)).unwrap();
    rt.pop_environment();
    assert_eq!(rt.get_variable(x).unwrap(), Value::int(2));
}

#[test]
fn test_constant_reassignment() {
    let mut rt = runtime();
    let pi = rt.interner().intern("math_pi");
    rt.declare_identifier(EnvId::GLOBAL, pi, true).unwrap();
    rt.define_variable(EnvId::GLOBAL, pi, Value::Float(3.0), true)
        .unwrap();
    let err = rt.assign_variable(pi, Value::int(3)).unwrap_err();
    assert!(matches!(err.kind, EvalErrorKind::ConstantReassignment { .. }));
}

#[test]
fn test_create_environment_binds_params_and_rest() {
    let mut rt = runtime();
    let f = closure(&rt, &[("a", false), ("rest", true)]);
    let env = rt
        .create_environment(
            &f,
            vec![Value::int(1), Value::int(2), Value::int(3)],
            Span::new(4, 9),
        )
        .unwrap();
    rt.push_environment(env);

    let a = rt.interner().intern("a");
    let rest = rt.interner().intern("rest");
    assert_eq!(rt.get_variable(a).unwrap(), Value::int(1));
    let Value::List(list) = rt.get_variable(rest).unwrap() else {
        panic!("rest parameter should be a list");
    };
    assert_eq!(
        rt.objects().list(list).unwrap(),
        &[Value::int(2), Value::int(3)][..]
    );
    let frame = rt.environment(env).unwrap();
    assert!(frame.heap.contains(list));
    assert_eq!(frame.name, "f");
    assert_eq!(frame.tail, Some(EnvId::GLOBAL));
    assert_eq!(frame.call_site, Some(Span::new(4, 9)));
}

#[test]
fn test_empty_rest_is_empty_list() {
    let mut rt = runtime();
    let f = closure(&rt, &[("rest", true)]);
    let env = rt.create_environment(&f, vec![], Span::DUMMY).unwrap();
    rt.push_environment(env);
    let Value::List(list) = rt.get_variable(rt.interner().intern("rest")).unwrap() else {
        panic!("rest parameter should be a list");
    };
    assert!(rt.objects().list(list).unwrap().is_empty());
}

#[test]
fn test_restore_pops_to_target() {
    let mut rt = runtime();
    let a = rt.create_block_environment("a").unwrap();
    rt.push_environment(a);
    let b = rt.create_block_environment("b").unwrap();
    rt.push_environment(b);

    assert_eq!(rt.restore_environment(EnvId::GLOBAL).unwrap(), vec![b, a]);
    assert_eq!(rt.current_environment(), EnvId::GLOBAL);
    assert_eq!(rt.pop_environment(), None);

    let err = rt.restore_environment(b).unwrap_err();
    assert!(matches!(err.kind, EvalErrorKind::Internal { .. }));
}

#[test]
fn test_move_object_changes_owner() {
    let mut rt = runtime();
    let frame = rt.create_block_environment("frame").unwrap();
    rt.push_environment(frame);
    let id = rt.alloc(HeapData::List(vec![])).unwrap();
    assert_eq!(rt.objects().owner(id), Some(frame));

    assert!(rt.move_object(id, EnvId::GLOBAL));
    assert_eq!(rt.objects().owner(id), Some(EnvId::GLOBAL));
    assert!(rt.environment(EnvId::GLOBAL).unwrap().heap.contains(id));
    assert!(!rt.environment(frame).unwrap().heap.contains(id));
    assert!(!rt.move_object(id, EnvId::GLOBAL));
}

#[test]
fn test_tree_records_parents_and_skips_orphans() {
    let mut rt = runtime();
    let child = rt.create_block_environment("child").unwrap();
    assert_eq!(rt.tree().parent(child), Some(EnvId::GLOBAL));
    assert_eq!(rt.tree().children(EnvId::GLOBAL), &[child]);

    let mut tree = EnvironmentTree::new(EnvId::GLOBAL);
    assert!(!tree.insert(child, Some(EnvId(42))));
    assert!(!tree.insert(child, None));
    assert!(!tree.contains(child));
    assert_eq!(tree.len(), 1);
}

#[test]
fn test_bindings_keep_declaration_order() {
    let mut rt = runtime();
    let names: Vec<_> = ["b", "a", "c"]
        .iter()
        .map(|n| rt.interner().intern(n))
        .collect();
    for name in &names {
        rt.declare_identifier(EnvId::GLOBAL, *name, false).unwrap();
    }
    let order: Vec<_> = rt
        .environment(EnvId::GLOBAL)
        .unwrap()
        .bindings()
        .map(|(name, _)| name)
        .collect();
    assert_eq!(order, names);
}

#[test]
fn test_unwind_to_drops_frames_above_target() {
    let mut rt = runtime();
    let program = rt.create_block_environment("program").unwrap();
    rt.push_environment(program);
    let frame = rt.create_block_environment("frame").unwrap();
    rt.push_environment(frame);

    assert_eq!(rt.unwind_to(program), vec![frame]);
    assert_eq!(rt.active_environments(), &[EnvId::GLOBAL, program]);

    // A target that was already left is pushed back on the global frame.
    rt.pop_environment();
    rt.push_environment(frame);
    assert_eq!(rt.unwind_to(program), vec![frame]);
    assert_eq!(rt.active_environments(), &[EnvId::GLOBAL, program]);
}

#[test]
fn test_collect_frees_left_frames_and_their_objects() {
    let mut rt = runtime();
    let frame = rt.create_block_environment("frame").unwrap();
    rt.push_environment(frame);
    let scratch = rt.alloc(HeapData::List(vec![])).unwrap();
    rt.pop_environment();

    assert_eq!(rt.collect([], []), 2);
    assert!(rt.environment(frame).is_none());
    assert!(rt.objects().get(scratch).is_none());
    assert!(!rt.tree().contains(frame));
    assert!(rt.tree().children(EnvId::GLOBAL).is_empty());
    assert_eq!(rt.environment_count(), 1);
}

#[test]
fn test_collect_keeps_captured_frames() {
    let mut rt = runtime();
    let frame = rt.create_block_environment("frame").unwrap();
    rt.push_environment(frame);
    let x = rt.interner().intern("x");
    rt.declare_identifier(frame, x, false).unwrap();
    rt.define_variable(frame, x, Value::int(1), false).unwrap();
    let inner = closure(&rt, &[]);
    let id = rt.alloc(HeapData::Closure(inner)).unwrap();
    rt.pop_environment();

    // The closure on the Stash keeps its defining frame alive.
    let stash = [Value::Closure(id)];
    assert_eq!(rt.collect([], &stash), 0);
    assert!(rt.environment(frame).is_some());
    assert_eq!(rt.objects().owner(id), Some(frame));

    assert_eq!(rt.collect([], []), 2);
    assert_eq!(rt.environment_count(), 1);
}

#[test]
fn test_collect_rehomes_objects_that_outlive_their_owner() {
    let mut rt = runtime();
    let outer = rt.create_block_environment("outer").unwrap();
    rt.push_environment(outer);
    let frame = rt.create_block_environment("frame").unwrap();
    rt.push_environment(frame);
    let nested = rt.alloc(HeapData::List(vec![Value::int(7)])).unwrap();
    let list = rt.alloc(HeapData::List(vec![Value::List(nested)])).unwrap();
    rt.pop_environment();

    let stash = [Value::List(list)];
    assert_eq!(rt.collect([], &stash), 1);
    assert!(rt.environment(frame).is_none());
    for id in [list, nested] {
        assert_eq!(rt.objects().owner(id), Some(outer));
        assert!(rt.environment(outer).unwrap().heap.contains(id));
    }
}

#[test]
fn test_collect_keeps_extra_roots() {
    let mut rt = runtime();
    let pending = rt.create_block_environment("pending").unwrap();
    assert_eq!(rt.collect([pending], []), 0);
    assert!(rt.environment(pending).is_some());
    assert!(!rt.should_collect());
}
