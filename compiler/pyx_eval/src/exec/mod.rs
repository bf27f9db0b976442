//! Step handlers, by category:
//!
//! - `nodes`: source nodes, which expand into children and instructions
//!   or push a value
//! - `instrs`: instructions, which act on the Stash and environments
//! - `call`: the `Application` instruction
//!
//! `execute` is the single dispatch point, keyed by the item's variant.

mod call;
mod instrs;
mod nodes;

use pyx_ir::Span;

use crate::context::Context;
use crate::control::ControlItem;
use crate::errors::{self, EvalResult};
use crate::instr::Instr;
use crate::print_handler::PrintHandlerImpl;
use crate::value::Value;

/// Evaluate one control item, already popped from Control.
pub(crate) fn execute(
    ctx: &mut Context,
    item: &ControlItem,
    print: &PrintHandlerImpl,
) -> EvalResult<()> {
    match item {
        ControlItem::Node { node, skip_env } => nodes::eval_node(ctx, node, *skip_env),
        ControlItem::Instr(instr) => instrs::exec_instr(ctx, instr, print),
    }
}

/// Pop the Stash top, which the instruction's own pushes guarantee.
fn pop_value(ctx: &mut Context) -> EvalResult<Value> {
    ctx.stash
        .pop()
        .ok_or_else(|| errors::internal("stash is empty"))
}

/// Push a restore of the current environment unless nothing left on
/// Control could observe the change, or a restore is already next.
fn push_restore_if_needed(ctx: &mut Context, span: Span) {
    if ctx.control.can_avoid_env_instr() {
        return;
    }
    if ctx.control.peek().is_some_and(ControlItem::is_restore) {
        return;
    }
    let current = ctx.runtime.current_environment();
    ctx.control
        .push_instr(Instr::environment_restore(current, span));
}
