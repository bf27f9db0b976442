//! The `Application` instruction: calling builtins and closures.

use pyx_ir::Span;
use tracing::debug;

use super::{pop_value, push_restore_if_needed};
use crate::builtins::BuiltinCtx;
use crate::closure::Closure;
use crate::context::Context;
use crate::control::ControlItem;
use crate::errors::{self, EvalNote, EvalResult};
use crate::heap::ObjId;
use crate::instr::Instr;
use crate::print_handler::PrintHandlerImpl;
use crate::value::Value;

/// Pop `arg_count` arguments and the callee beneath them, then call.
pub(super) fn apply(
    ctx: &mut Context,
    arg_count: usize,
    span: Span,
    print: &PrintHandlerImpl,
) -> EvalResult<()> {
    let args = ctx
        .stash
        .pop_n(arg_count)
        .ok_or_else(|| errors::internal("stash too short for call arguments"))?;
    match pop_value(ctx)? {
        Value::Builtin(builtin) => {
            debug!(function = builtin.name, args = args.len(), "apply builtin");
            let builtin_ctx = BuiltinCtx {
                objects: ctx.runtime.objects(),
                interner: ctx.runtime.interner(),
                print,
            };
            let result = builtin.call(&args, &builtin_ctx)?;
            ctx.stash.push(result);
            Ok(())
        }
        Value::Closure(id) => apply_closure(ctx, id, args, span),
        other => Err(errors::not_callable(other.type_name())),
    }
}

fn apply_closure(ctx: &mut Context, id: ObjId, args: Vec<Value>, span: Span) -> EvalResult<()> {
    let closure = ctx
        .runtime
        .objects()
        .closure(id)
        .cloned()
        .ok_or_else(|| errors::internal(format!("closure handle {id} without a closure")))?;
    if closure.run != ctx.run {
        return Err(errors::internal(
            "closure belongs to a different evaluation",
        ));
    }
    check_arguments(ctx, &closure, args.len())?;

    let name = closure.display_name(ctx.runtime.interner());
    debug!(function = name, args = args.len(), "apply closure");

    if ctx.control.can_avoid_env_instr() {
        // Nothing left reads the caller's frame: replace it.
        ctx.runtime.pop_environment();
    } else {
        push_restore_if_needed(ctx, span);
    }
    let env = ctx.runtime.create_environment(&closure, args, span)?;
    ctx.runtime.push_environment(env);

    if let Some(expr) = closure.function.single_return() {
        ctx.control.push_node(expr.clone());
    } else {
        ctx.control.push_instr(Instr::marker(span));
        ctx.control.push(ControlItem::Node {
            node: closure.function.body.clone(),
            skip_env: true,
        });
    }
    Ok(())
}

/// Positional arity, then parameters that a local would redeclare.
fn check_arguments(ctx: &Context, closure: &Closure, given: usize) -> EvalResult<()> {
    let interner = ctx.runtime.interner();
    let name = closure.display_name(interner);
    let defined_here = || EvalNote::with_span(format!("`{name}` is defined here"), closure.span);
    let required = closure.function.required_params();

    if given < required.len() {
        let missing = required[given..]
            .iter()
            .map(|param| interner.lookup(param.name).to_string())
            .collect();
        return Err(errors::missing_arguments(name, missing).with_note(defined_here()));
    }
    if given > required.len() && closure.function.rest_param().is_none() {
        return Err(
            errors::too_many_arguments(name, required.len(), given).with_note(defined_here()),
        );
    }

    let shadowed = closure
        .function
        .params
        .iter()
        .find(|param| closure.local_variables.contains(&param.name));
    if let Some(param) = shadowed {
        return Err(errors::variable_redeclaration(interner.lookup(param.name))
            .with_span(param.span));
    }
    Ok(())
}
