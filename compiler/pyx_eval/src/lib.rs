//! Pyx Eval - explicit-control evaluator for the Pyx teaching subset.
//!
//! Programs run on a CSE machine: a Control stack of pending nodes and
//! instructions, a Stash of intermediate values, and a tree of
//! environments. Each step pops one control item and executes it, so a
//! run can stop after any step and resume with nothing lost.
//!
//! # Architecture
//!
//! - `Interpreter`: shared configuration and the step loop
//! - `Context`: the state of one evaluation
//! - `Runtime`: environment arena, active-environment stack, heap objects
//! - `evaluate_binary` / `evaluate_unary`: Python operator semantics over
//!   the numeric tower
//! - `BuiltinRegistry`: the functions and constants bound in the global
//!   environment

mod builtins;
mod closure;
mod context;
mod control;
mod environment;
pub mod errors;
mod exec;
mod heap;
mod instr;
mod interpreter;
mod numeric;
mod operators;
mod print_handler;
mod stack;
mod unary_operators;
mod value;

pub use builtins::{Arity, BuiltinCtx, BuiltinFn, BuiltinFunc, BuiltinRegistry};
pub use closure::{Closure, RunId};
pub use context::{Context, MachineState, Snapshot};
pub use control::{Control, ControlItem, Stash};
pub use environment::{Binding, EnvId, Environment, EnvironmentTree, Runtime, Slot};
pub use errors::{EvalError, EvalErrorKind, EvalNote, EvalResult};
pub use heap::{Heap, HeapData, HeapObject, ObjId, ObjectStore};
pub use instr::{Instr, InstrKind};
pub use interpreter::{
    Interpreter, InterpreterBuilder, Outcome, RunLimits, StepRecord, Stepper, SuspendReason,
};
pub use numeric::{py_compare, Complex};
pub use operators::{evaluate_binary, values_equal};
pub use print_handler::{
    buffer_handler, silent_handler, stdout_handler, PrintHandlerImpl, SharedPrintHandler,
};
pub use stack::Stack;
pub use unary_operators::evaluate_unary;
pub use value::{repr, to_str, Value};
