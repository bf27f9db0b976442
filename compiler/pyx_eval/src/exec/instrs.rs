//! Instruction handlers.

use num_bigint::BigInt;
use num_traits::{Signed, ToPrimitive};

use super::{call, pop_value};
use crate::context::Context;
use crate::control::ControlItem;
use crate::errors::{self, EvalResult};
use crate::heap::{HeapData, ObjectStore};
use crate::instr::{Instr, InstrKind};
use crate::operators::evaluate_binary;
use crate::print_handler::PrintHandlerImpl;
use crate::unary_operators::evaluate_unary;
use crate::value::Value;

pub(super) fn exec_instr(
    ctx: &mut Context,
    instr: &Instr,
    print: &PrintHandlerImpl,
) -> EvalResult<()> {
    match &instr.kind {
        InstrKind::Pop => {
            pop_value(ctx)?;
        }
        InstrKind::Assignment {
            symbol,
            constant,
            declaration,
        } => {
            let value = pop_value(ctx)?;
            if let Value::Closure(id) = value {
                if let Some(closure) = ctx.runtime.objects_mut().closure_mut(id) {
                    closure.declared_name.get_or_insert(*symbol);
                }
            }
            if *declaration {
                let env = ctx.runtime.current_environment();
                ctx.runtime.define_variable(env, *symbol, value, *constant)?;
            } else {
                ctx.runtime.assign_variable(*symbol, value)?;
            }
            ctx.stash.push(Value::None);
        }
        InstrKind::UnaryOp(op) => {
            let operand = pop_value(ctx)?;
            ctx.stash.push(evaluate_unary(operand, *op)?);
        }
        InstrKind::BinaryOp(op) => {
            let right = pop_value(ctx)?;
            let left = pop_value(ctx)?;
            let result = evaluate_binary(left, right, *op, ctx.runtime.objects())?;
            ctx.stash.push(result);
        }
        InstrKind::Application { arg_count } => {
            call::apply(ctx, *arg_count, instr.span, print)?;
        }
        InstrKind::Branch {
            consequent,
            alternate,
        } => {
            let taken = match pop_value(ctx)? {
                Value::Bool(taken) => taken,
                other => return Err(errors::not_a_bool("as a condition", other.type_name())),
            };
            let next = if taken {
                Some(consequent)
            } else {
                alternate.as_ref()
            };
            match next {
                Some(node) => ctx.control.push(ControlItem::Node {
                    node: node.clone(),
                    skip_env: true,
                }),
                None => ctx.stash.push(Value::None),
            }
        }
        InstrKind::EnvironmentRestore { target } => {
            let popped = ctx.runtime.restore_environment(*target)?;
            // A returned object outlives the frames that were just left.
            ctx.keep_result(*target, &popped);
        }
        InstrKind::Marker => {}
        InstrKind::Reset => loop {
            match ctx.control.pop() {
                Some(ControlItem::Instr(Instr {
                    kind: InstrKind::Marker,
                    ..
                }))
                | None => break,
                Some(_) => {}
            }
        },
        InstrKind::ArrayLiteral { len } => {
            let items = ctx
                .stash
                .pop_n(*len)
                .ok_or_else(|| errors::internal("stash too short for list literal"))?;
            let id = ctx.runtime.alloc(HeapData::List(items))?;
            ctx.stash.push(Value::List(id));
        }
        InstrKind::ArrayAccess => {
            let index = pop_value(ctx)?;
            let container = pop_value(ctx)?;
            let element = subscript(&container, &index, ctx.runtime.objects())?;
            ctx.stash.push(element);
        }
    }
    Ok(())
}

/// `container[index]` for lists and strings, with negative indices
/// counting from the end.
fn subscript(container: &Value, index: &Value, objects: &ObjectStore) -> EvalResult<Value> {
    let position = |len: usize, kind: &'static str| -> EvalResult<usize> {
        let Value::Int(i) = index else {
            return Err(errors::bad_subscript(if kind == "list" {
                format!(
                    "list indices must be integers or slices, not {}",
                    index.type_name()
                )
            } else {
                format!("string indices must be integers, not '{}'", index.type_name())
            }));
        };
        let len = BigInt::from(len);
        let resolved = if i.is_negative() { &len + i } else { i.clone() };
        if resolved.is_negative() || resolved >= len {
            return Err(errors::index_out_of_range(kind));
        }
        resolved
            .to_usize()
            .ok_or_else(|| errors::index_out_of_range(kind))
    };
    match container {
        Value::List(id) => {
            let items = objects
                .list(*id)
                .ok_or_else(|| errors::internal("list handle without a list"))?;
            let at = position(items.len(), "list")?;
            items
                .get(at)
                .cloned()
                .ok_or_else(|| errors::index_out_of_range("list"))
        }
        Value::Str(s) => {
            let at = position(s.chars().count(), "string")?;
            s.chars()
                .nth(at)
                .map(|c| Value::str(c.encode_utf8(&mut [0; 4])))
                .ok_or_else(|| errors::index_out_of_range("string"))
        }
        other => Err(errors::bad_subscript(format!(
            "'{}' object is not subscriptable",
            other.type_name()
        ))),
    }
}
