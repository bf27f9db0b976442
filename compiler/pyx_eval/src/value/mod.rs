//! Runtime values.
//!
//! Every datum on the Stash or in an environment frame is a `Value`. The
//! numeric tags follow Python: `Int` is arbitrary precision, `Float` is an
//! IEEE double, `Complex` is a pair of doubles. Closures and lists live on
//! the heap and are carried by handle.

mod repr;

use std::rc::Rc;

use num_bigint::BigInt;

use crate::builtins::BuiltinFn;
use crate::errors::EvalError;
use crate::heap::ObjId;
use crate::numeric::Complex;

pub use repr::{repr, string_repr, to_str};

#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    None,
    Bool(bool),
    Int(BigInt),
    Float(f64),
    Complex(Complex),
    Str(Rc<str>),
    Closure(ObjId),
    List(ObjId),
    Builtin(BuiltinFn),
    /// Pushed on the Stash when a step fails.
    Error(Rc<EvalError>),
}

impl Value {
    pub fn int(value: i64) -> Self {
        Value::Int(BigInt::from(value))
    }

    pub fn str(value: &str) -> Self {
        Value::Str(Rc::from(value))
    }

    /// Python type name, as used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::None => "NoneType",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Complex(_) => "complex",
            Value::Str(_) => "str",
            Value::Closure(_) => "function",
            Value::List(_) => "list",
            Value::Builtin(_) => "builtin_function_or_method",
            Value::Error(_) => "error",
        }
    }

    /// Heap handle for closures and lists.
    pub fn object_id(&self) -> Option<ObjId> {
        match self {
            Value::Closure(id) | Value::List(id) => Some(*id),
            _ => None,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Value::Error(_))
    }
}
