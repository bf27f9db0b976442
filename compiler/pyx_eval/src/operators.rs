//! Binary operators over the numeric tower, strings, and lists.
//!
//! Numeric operands promote along int -> float -> complex: a complex
//! operand makes both complex, otherwise a float operand makes both float,
//! otherwise both stay arbitrary-precision integers. `bool` is not part of
//! the tower. Strings only concatenate with strings. Any other combination
//! is a type error; nothing is coerced silently.

use std::cmp::Ordering;

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, Signed, Zero};
use pyx_ir::BinaryOp;

use crate::errors::{self, EvalResult};
use crate::heap::ObjectStore;
use crate::numeric::{
    float_divmod, int_to_f64, int_true_divide, py_compare, python_mod, Complex,
};
use crate::value::Value;

/// A numeric operand after classification.
enum Num {
    Int(BigInt),
    Float(f64),
    Complex(Complex),
}

impl Num {
    fn from_value(value: &Value) -> Option<Num> {
        match value {
            Value::Int(i) => Some(Num::Int(i.clone())),
            Value::Float(f) => Some(Num::Float(*f)),
            Value::Complex(c) => Some(Num::Complex(*c)),
            _ => None,
        }
    }

    fn to_float(&self) -> EvalResult<f64> {
        match self {
            Num::Int(i) => int_to_f64(i),
            Num::Float(f) => Ok(*f),
            Num::Complex(_) => Err(errors::internal("complex operand demoted to float")),
        }
    }

    fn to_complex(&self) -> EvalResult<Complex> {
        match self {
            Num::Complex(c) => Ok(*c),
            real => real.to_float().map(Complex::from_real),
        }
    }
}

/// Evaluate `left op right`.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Operands are popped off the stash and consumed here"
)]
pub fn evaluate_binary(
    left: Value,
    right: Value,
    op: BinaryOp,
    objects: &ObjectStore,
) -> EvalResult<Value> {
    match op {
        BinaryOp::Eq => Ok(Value::Bool(values_equal(&left, &right, objects))),
        BinaryOp::NotEq => Ok(Value::Bool(!values_equal(&left, &right, objects))),
        BinaryOp::Lt | BinaryOp::LtEq | BinaryOp::Gt | BinaryOp::GtEq => {
            let ordering = compare_values(&left, &right, op)?;
            Ok(Value::Bool(ordering_satisfies(ordering, op)))
        }
        _ => eval_arithmetic(&left, &right, op),
    }
}

fn eval_arithmetic(left: &Value, right: &Value, op: BinaryOp) -> EvalResult<Value> {
    match (left, right) {
        (Value::Str(a), Value::Str(b)) if op == BinaryOp::Add => {
            Ok(Value::str(&format!("{a}{b}")))
        }
        (Value::Str(_), other) | (other, Value::Str(_)) if op == BinaryOp::Add => {
            Err(errors::concatenation_type(other.type_name()))
        }
        _ => {
            let mismatch = || errors::unsupported_operand(op, left.type_name(), right.type_name());
            let (Some(a), Some(b)) = (Num::from_value(left), Num::from_value(right)) else {
                return Err(mismatch());
            };
            match (a, b) {
                (Num::Int(a), Num::Int(b)) => eval_int_binary(&a, &b, op),
                (a @ Num::Complex(_), b) | (a, b @ Num::Complex(_)) => {
                    eval_complex_binary(a.to_complex()?, b.to_complex()?, op)
                        .and_then(|value| value.ok_or_else(mismatch))
                }
                (a, b) => eval_float_binary(a.to_float()?, b.to_float()?, op),
            }
        }
    }
}

// Type-specific evaluation

fn eval_int_binary(a: &BigInt, b: &BigInt, op: BinaryOp) -> EvalResult<Value> {
    match op {
        BinaryOp::Add => Ok(Value::Int(a + b)),
        BinaryOp::Sub => Ok(Value::Int(a - b)),
        BinaryOp::Mul => Ok(Value::Int(a * b)),
        BinaryOp::Div => int_true_divide(a, b).map(Value::Float),
        BinaryOp::FloorDiv => {
            if b.is_zero() {
                return Err(errors::zero_division("integer division or modulo by zero"));
            }
            Ok(Value::Int(a.div_floor(b)))
        }
        BinaryOp::Mod => {
            if b.is_zero() {
                return Err(errors::zero_division("integer modulo by zero"));
            }
            Ok(Value::Int(a.mod_floor(b)))
        }
        BinaryOp::Pow => int_pow(a, b),
        _ => Err(errors::internal(format!(
            "{} reached integer arithmetic",
            op.as_symbol()
        ))),
    }
}

/// `a ** b` on integers. A negative exponent gives a float, as in Python.
fn int_pow(a: &BigInt, b: &BigInt) -> EvalResult<Value> {
    if b.is_negative() {
        if a.is_zero() {
            return Err(errors::zero_division(
                "0.0 cannot be raised to a negative power",
            ));
        }
        return float_pow(int_to_f64(a)?, int_to_f64(b)?);
    }
    if a.is_zero() || a.is_one() {
        let result = if b.is_zero() { BigInt::one() } else { a.clone() };
        return Ok(Value::Int(result));
    }
    if *a == -BigInt::one() {
        return Ok(Value::Int(if b.is_even() { BigInt::one() } else { a.clone() }));
    }
    let exponent = u32::try_from(b).map_err(|_| errors::overflow("exponent too large"))?;
    Ok(Value::Int(a.pow(exponent)))
}

fn eval_float_binary(a: f64, b: f64, op: BinaryOp) -> EvalResult<Value> {
    match op {
        BinaryOp::Add => Ok(Value::Float(a + b)),
        BinaryOp::Sub => Ok(Value::Float(a - b)),
        BinaryOp::Mul => Ok(Value::Float(a * b)),
        BinaryOp::Div => {
            if b == 0.0 {
                return Err(errors::zero_division("float division by zero"));
            }
            Ok(Value::Float(a / b))
        }
        BinaryOp::FloorDiv => {
            if b == 0.0 {
                return Err(errors::zero_division("float floor division by zero"));
            }
            Ok(Value::Float(float_divmod(a, b).0))
        }
        BinaryOp::Mod => {
            if b == 0.0 {
                return Err(errors::zero_division("float modulo"));
            }
            Ok(Value::Float(python_mod(a, b)))
        }
        BinaryOp::Pow => float_pow(a, b),
        _ => Err(errors::internal(format!(
            "{} reached float arithmetic",
            op.as_symbol()
        ))),
    }
}

/// `a ** b` on floats. A negative base with a fractional exponent has a
/// complex result.
fn float_pow(a: f64, b: f64) -> EvalResult<Value> {
    if a == 0.0 && b < 0.0 {
        return Err(errors::zero_division(
            "0.0 cannot be raised to a negative power",
        ));
    }
    if a < 0.0 && b.is_finite() && b.fract() != 0.0 {
        return Complex::from_real(a)
            .pow(Complex::from_real(b))
            .map(Value::Complex);
    }
    let result = a.powf(b);
    if result.is_infinite() && a.is_finite() && b.is_finite() {
        return Err(errors::overflow("(34, 'Numerical result out of range')"));
    }
    Ok(Value::Float(result))
}

/// Complex arithmetic. `None` for `//` and `%`, which complex numbers do
/// not support.
fn eval_complex_binary(a: Complex, b: Complex, op: BinaryOp) -> EvalResult<Option<Value>> {
    let result = match op {
        BinaryOp::Add => a + b,
        BinaryOp::Sub => a - b,
        BinaryOp::Mul => a * b,
        BinaryOp::Div => a.div(b)?,
        BinaryOp::Pow => a.pow(b)?,
        _ => return Ok(None),
    };
    Ok(Some(Value::Complex(result)))
}

// Comparison

/// `==` for any pair of values. Never fails: mismatched types are unequal.
pub fn values_equal(left: &Value, right: &Value, objects: &ObjectStore) -> bool {
    match (left, right) {
        (Value::None, Value::None) => true,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::Str(a), Value::Str(b)) => a == b,
        (Value::Closure(a), Value::Closure(b)) => a == b,
        (Value::Builtin(a), Value::Builtin(b)) => a == b,
        (Value::List(a), Value::List(b)) => {
            if a == b {
                return true;
            }
            match (objects.list(*a), objects.list(*b)) {
                (Some(xs), Some(ys)) => {
                    xs.len() == ys.len()
                        && xs
                            .iter()
                            .zip(ys)
                            .all(|(x, y)| values_equal(x, y, objects))
                }
                _ => false,
            }
        }
        _ => match (Num::from_value(left), Num::from_value(right)) {
            (Some(a), Some(b)) => numbers_equal(&a, &b),
            _ => false,
        },
    }
}

fn numbers_equal(a: &Num, b: &Num) -> bool {
    match (a, b) {
        (Num::Int(a), Num::Int(b)) => a == b,
        (Num::Float(a), Num::Float(b)) => a == b,
        (Num::Int(i), Num::Float(f)) | (Num::Float(f), Num::Int(i)) => {
            py_compare(i, *f) == Some(Ordering::Equal)
        }
        (Num::Complex(a), Num::Complex(b)) => a == b,
        (Num::Complex(c), real) | (real, Num::Complex(c)) => {
            c.im == 0.0 && numbers_equal(&Num::Float(c.re), real)
        }
    }
}

/// Order two values, `None` when they are unordered (a NaN operand).
fn compare_values(left: &Value, right: &Value, op: BinaryOp) -> EvalResult<Option<Ordering>> {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => Ok(Some(a.cmp(b))),
        (Value::Float(a), Value::Float(b)) => Ok(a.partial_cmp(b)),
        (Value::Int(a), Value::Float(b)) => Ok(py_compare(a, *b)),
        (Value::Float(a), Value::Int(b)) => Ok(py_compare(b, *a).map(Ordering::reverse)),
        (Value::Str(a), Value::Str(b)) => Ok(Some(a.cmp(b))),
        _ => Err(errors::ordering_not_supported(
            op,
            left.type_name(),
            right.type_name(),
        )),
    }
}

fn ordering_satisfies(ordering: Option<Ordering>, op: BinaryOp) -> bool {
    let Some(ordering) = ordering else {
        return false;
    };
    match op {
        BinaryOp::Lt => ordering == Ordering::Less,
        BinaryOp::LtEq => ordering != Ordering::Greater,
        BinaryOp::Gt => ordering == Ordering::Greater,
        BinaryOp::GtEq => ordering != Ordering::Less,
        _ => false,
    }
}
