//! Source node handlers.
//!
//! Children are pushed in reverse so that the leftmost one is evaluated
//! first; an instruction pushed before its operands runs after them.

use std::rc::Rc;

use pyx_ir::{Declaration, Function, Literal, Node, NodeKind, Span};

use super::push_restore_if_needed;
use crate::closure::Closure;
use crate::context::Context;
use crate::control::ControlItem;
use crate::environment::EnvId;
use crate::errors::EvalResult;
use crate::heap::HeapData;
use crate::instr::Instr;
use crate::numeric::Complex;
use crate::value::Value;

pub(super) fn eval_node(ctx: &mut Context, node: &Rc<Node>, skip_env: bool) -> EvalResult<()> {
    let span = node.span;
    match &node.kind {
        NodeKind::Program { body, declarations } => {
            // Enclosed by the previous program, never by a frame it left
            // behind.
            let tail = ctx
                .program_env
                .unwrap_or_else(|| ctx.runtime.current_environment());
            let env = ctx
                .runtime
                .create_simple_environment("programEnvironment", Some(tail))?;
            ctx.runtime.push_environment(env);
            ctx.program_env = Some(env);
            declare_all(ctx, env, declarations)?;
            push_statements(ctx, body);
        }
        NodeKind::Block { body, declarations } => {
            let env = if skip_env {
                ctx.runtime.current_environment()
            } else {
                push_restore_if_needed(ctx, span);
                let env = ctx.runtime.create_block_environment("blockEnvironment")?;
                ctx.runtime.push_environment(env);
                env
            };
            declare_all(ctx, env, declarations)?;
            push_statements(ctx, body);
        }
        NodeKind::StatementSequence { body } => push_statements(ctx, body),
        NodeKind::ExpressionStatement(expr) => ctx.control.push_node(Rc::clone(expr)),
        NodeKind::Assign {
            target,
            value,
            declaration,
        } => {
            ctx.control
                .push_instr(Instr::assignment(*target, false, *declaration, span));
            ctx.control.push_node(Rc::clone(value));
        }
        NodeKind::FunctionDef {
            name,
            function,
            declaration,
        } => {
            let closure = Closure::make_from_function_def(
                Rc::clone(function),
                ctx.runtime.current_environment(),
                ctx.run,
                ctx.predefined,
                span,
            );
            let id = ctx.runtime.alloc(HeapData::Closure(closure))?;
            ctx.control
                .push_instr(Instr::assignment(*name, false, *declaration, span));
            ctx.stash.push(Value::Closure(id));
        }
        NodeKind::Return(expr) => {
            ctx.control.push_instr(Instr::reset(span));
            match expr {
                Some(expr) => ctx.control.push_node(Rc::clone(expr)),
                None => ctx.stash.push(Value::None),
            }
        }
        NodeKind::If {
            test,
            consequent,
            alternate,
        } => {
            ctx.control.push_instr(Instr::branch(
                Rc::clone(consequent),
                alternate.clone(),
                span,
            ));
            ctx.control.push_node(Rc::clone(test));
        }
        NodeKind::Conditional {
            test,
            consequent,
            alternate,
        } => {
            ctx.control.push_instr(Instr::branch(
                Rc::clone(consequent),
                Some(Rc::clone(alternate)),
                span,
            ));
            ctx.control.push_node(Rc::clone(test));
        }
        NodeKind::Pass => ctx.stash.push(Value::None),
        NodeKind::Literal(literal) => ctx.stash.push(literal_value(literal)),
        NodeKind::Identifier(name) => {
            let value = ctx.runtime.get_variable(*name)?;
            ctx.stash.push(value);
        }
        NodeKind::Unary { op, operand } => {
            ctx.control.push_instr(Instr::unary_op(*op, span));
            ctx.control.push_node(Rc::clone(operand));
        }
        NodeKind::Binary { op, left, right } => {
            ctx.control.push_instr(Instr::binary_op(*op, span));
            ctx.control.push_node(Rc::clone(right));
            ctx.control.push_node(Rc::clone(left));
        }
        NodeKind::Lambda(function) => {
            let value = make_lambda(ctx, function, span)?;
            ctx.stash.push(value);
        }
        NodeKind::Call { callee, args } => {
            ctx.control.push_instr(Instr::application(args.len(), span));
            ctx.control
                .push_all(args.iter().rev().map(|arg| ControlItem::node(Rc::clone(arg))));
            ctx.control.push_node(Rc::clone(callee));
        }
        NodeKind::List(items) => {
            ctx.control.push_instr(Instr::array_literal(items.len(), span));
            ctx.control
                .push_all(items.iter().rev().map(|item| ControlItem::node(Rc::clone(item))));
        }
        NodeKind::Subscript { value, index } => {
            ctx.control.push_instr(Instr::array_access(span));
            ctx.control.push_node(Rc::clone(index));
            ctx.control.push_node(Rc::clone(value));
        }
    }
    Ok(())
}

fn declare_all(ctx: &mut Context, env: EnvId, declarations: &[Declaration]) -> EvalResult<()> {
    for declaration in declarations {
        ctx.runtime
            .declare_identifier(env, declaration.name, declaration.constant)?;
    }
    Ok(())
}

/// Push statements so that each runs in order and only the last value
/// stays on the Stash. An empty sequence yields `None`.
fn push_statements(ctx: &mut Context, body: &[Rc<Node>]) {
    match body {
        [] => ctx.stash.push(Value::None),
        [only] => ctx.control.push_node(Rc::clone(only)),
        _ => {
            for (index, statement) in body.iter().enumerate().rev() {
                ctx.control.push_node(Rc::clone(statement));
                if index > 0 {
                    ctx.control.push_instr(Instr::pop(statement.span));
                }
            }
        }
    }
}

fn make_lambda(ctx: &mut Context, function: &Rc<Function>, span: Span) -> EvalResult<Value> {
    let closure = Closure::make_from_lambda(
        Rc::clone(function),
        ctx.runtime.current_environment(),
        ctx.run,
        ctx.predefined,
        span,
    );
    let id = ctx.runtime.alloc(HeapData::Closure(closure))?;
    Ok(Value::Closure(id))
}

fn literal_value(literal: &Literal) -> Value {
    match literal {
        Literal::None => Value::None,
        Literal::Bool(b) => Value::Bool(*b),
        Literal::Int(i) => Value::Int(i.clone()),
        Literal::Float(f) => Value::Float(*f),
        Literal::Imag(im) => Value::Complex(Complex::new(0.0, *im)),
        Literal::Str(s) => Value::Str(Rc::clone(s)),
    }
}
