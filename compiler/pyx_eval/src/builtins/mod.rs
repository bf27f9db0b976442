//! Builtin functions and constants.
//!
//! The machine knows builtins only through `BuiltinRegistry`: a table of
//! named callables and a table of named constants, both bound into the
//! global environment when a context is created. A builtin receives
//! evaluated arguments and returns a `Value` or an `EvalError`.

mod basic;
mod math;

use std::fmt;

use pyx_ir::StringInterner;

use crate::errors::{self, EvalResult};
use crate::heap::ObjectStore;
use crate::print_handler::PrintHandlerImpl;
use crate::value::Value;

/// Accepted argument counts.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Arity {
    Exact(usize),
    AtLeast(usize),
    /// Inclusive bounds.
    Range(usize, usize),
}

impl Arity {
    pub fn min(self) -> usize {
        match self {
            Arity::Exact(n) | Arity::AtLeast(n) | Arity::Range(n, _) => n,
        }
    }

    pub fn max(self) -> Option<usize> {
        match self {
            Arity::Exact(n) | Arity::Range(_, n) => Some(n),
            Arity::AtLeast(_) => None,
        }
    }

    pub fn accepts(self, count: usize) -> bool {
        count >= self.min() && self.max().map_or(true, |max| count <= max)
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Arity::Exact(0) => write!(f, "no arguments"),
            Arity::Exact(1) => write!(f, "exactly one argument"),
            Arity::Exact(n) => write!(f, "exactly {n} arguments"),
            Arity::AtLeast(1) => write!(f, "at least one argument"),
            Arity::AtLeast(n) => write!(f, "at least {n} arguments"),
            Arity::Range(min, max) => write!(f, "from {min} to {max} arguments"),
        }
    }
}

/// What a builtin may look at while running.
pub struct BuiltinCtx<'a> {
    pub objects: &'a ObjectStore,
    pub interner: &'a StringInterner,
    pub print: &'a PrintHandlerImpl,
}

pub type BuiltinFunc = fn(&[Value], &BuiltinCtx<'_>) -> EvalResult<Value>;

#[derive(Copy, Clone)]
pub struct BuiltinFn {
    pub name: &'static str,
    pub arity: Arity,
    pub func: BuiltinFunc,
}

impl BuiltinFn {
    /// Check the argument count, then run.
    pub fn call(&self, args: &[Value], ctx: &BuiltinCtx<'_>) -> EvalResult<Value> {
        if !self.arity.accepts(args.len()) {
            return Err(errors::builtin_arity(self.name, self.arity, args.len()));
        }
        (self.func)(args, ctx)
    }
}

impl PartialEq for BuiltinFn {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl fmt::Debug for BuiltinFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BuiltinFn({})", self.name)
    }
}

/// Argument `index`, which the arity check guarantees.
fn arg(args: &[Value], index: usize) -> EvalResult<&Value> {
    args.get(index)
        .ok_or_else(|| errors::internal(format!("builtin argument {index} missing")))
}

#[derive(Clone, Debug)]
pub struct BuiltinRegistry {
    functions: Vec<BuiltinFn>,
    constants: Vec<(&'static str, Value)>,
}

impl BuiltinRegistry {
    pub fn empty() -> Self {
        BuiltinRegistry {
            functions: Vec::new(),
            constants: Vec::new(),
        }
    }

    /// Every builtin function and constant.
    pub fn standard() -> Self {
        let mut registry = Self::empty();
        basic::register(&mut registry);
        math::register(&mut registry);
        registry
    }

    /// Add a function, replacing one with the same name.
    pub fn register(&mut self, name: &'static str, arity: Arity, func: BuiltinFunc) {
        let builtin = BuiltinFn { name, arity, func };
        match self.functions.iter_mut().find(|f| f.name == name) {
            Some(existing) => *existing = builtin,
            None => self.functions.push(builtin),
        }
    }

    /// Add a constant, replacing one with the same name.
    pub fn register_constant(&mut self, name: &'static str, value: Value) {
        match self.constants.iter_mut().find(|(n, _)| *n == name) {
            Some(existing) => existing.1 = value,
            None => self.constants.push((name, value)),
        }
    }

    pub fn function(&self, name: &str) -> Option<BuiltinFn> {
        self.functions.iter().find(|f| f.name == name).copied()
    }

    pub fn constant(&self, name: &str) -> Option<&Value> {
        self.constants
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, value)| value)
    }

    pub fn functions(&self) -> &[BuiltinFn] {
        &self.functions
    }

    pub fn constants(&self) -> &[(&'static str, Value)] {
        &self.constants
    }
}

impl Default for BuiltinRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
