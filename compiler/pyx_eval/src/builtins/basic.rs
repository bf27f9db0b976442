//! Conversions, predicates, and output.

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{Signed, Zero};
use pyx_ir::BinaryOp;

use super::{arg, Arity, BuiltinCtx, BuiltinRegistry};
use crate::errors::{self, EvalResult};
use crate::numeric::{float_to_int, int_to_f64};
use crate::operators;
use crate::value::{string_repr, to_str, Value};

pub(super) fn register(registry: &mut BuiltinRegistry) {
    registry.register("print", Arity::AtLeast(0), print);
    registry.register("str", Arity::Exact(1), str_);
    registry.register("repr", Arity::Exact(1), repr);
    registry.register("int", Arity::Exact(1), int);
    registry.register("float", Arity::Exact(1), float);
    registry.register("abs", Arity::Exact(1), abs);
    registry.register("len", Arity::Exact(1), len);
    registry.register("max", Arity::AtLeast(1), max);
    registry.register("min", Arity::AtLeast(1), min);
    registry.register("round", Arity::Range(1, 2), round);
    registry.register("error", Arity::AtLeast(0), error);
    registry.register("is_none", Arity::Exact(1), is_none);
    registry.register("is_boolean", Arity::Exact(1), is_boolean);
    registry.register("is_int", Arity::Exact(1), is_int);
    registry.register("is_float", Arity::Exact(1), is_float);
    registry.register("is_complex", Arity::Exact(1), is_complex);
    registry.register("is_string", Arity::Exact(1), is_string);
    registry.register("is_function", Arity::Exact(1), is_function);
    registry.register("real", Arity::Exact(1), real);
    registry.register("imag", Arity::Exact(1), imag);
}

fn joined(args: &[Value], ctx: &BuiltinCtx<'_>) -> String {
    args.iter()
        .map(|a| to_str(a, ctx.objects, ctx.interner))
        .collect::<Vec<_>>()
        .join(" ")
}

fn print(args: &[Value], ctx: &BuiltinCtx<'_>) -> EvalResult<Value> {
    ctx.print.println(&joined(args, ctx));
    Ok(Value::None)
}

fn error(args: &[Value], ctx: &BuiltinCtx<'_>) -> EvalResult<Value> {
    Err(errors::user_error(joined(args, ctx)))
}

fn str_(args: &[Value], ctx: &BuiltinCtx<'_>) -> EvalResult<Value> {
    Ok(Value::str(&to_str(arg(args, 0)?, ctx.objects, ctx.interner)))
}

fn repr(args: &[Value], ctx: &BuiltinCtx<'_>) -> EvalResult<Value> {
    Ok(Value::str(&crate::value::repr(
        arg(args, 0)?,
        ctx.objects,
        ctx.interner,
    )))
}

/// Digits with single underscores between them, as in `1_000`.
fn strip_digit_separators(text: &str) -> Option<String> {
    let digits = text.trim_start_matches(['+', '-']);
    if digits.starts_with('_') || digits.ends_with('_') || digits.contains("__") {
        return None;
    }
    Some(text.replace('_', ""))
}

fn parse_int_literal(text: &str) -> EvalResult<BigInt> {
    let invalid =
        || errors::value_error(format!("invalid literal for int() with base 10: {}", string_repr(text)));
    let cleaned = strip_digit_separators(text.trim()).ok_or_else(invalid)?;
    cleaned.parse::<BigInt>().map_err(|_| invalid())
}

fn int(args: &[Value], _ctx: &BuiltinCtx<'_>) -> EvalResult<Value> {
    match arg(args, 0)? {
        Value::Bool(b) => Ok(Value::int(i64::from(*b))),
        Value::Int(i) => Ok(Value::Int(i.clone())),
        Value::Float(f) => Ok(Value::Int(float_to_int(*f)?)),
        Value::Str(s) => Ok(Value::Int(parse_int_literal(s)?)),
        other => Err(errors::builtin_type_error(format!(
            "int() argument must be a string, a bytes-like object or a real number, not '{}'",
            other.type_name()
        ))),
    }
}

fn parse_float_literal(text: &str) -> EvalResult<f64> {
    let invalid =
        || errors::value_error(format!("could not convert string to float: {}", string_repr(text)));
    let cleaned = strip_digit_separators(text.trim()).ok_or_else(invalid)?;
    cleaned.parse::<f64>().map_err(|_| invalid())
}

fn float(args: &[Value], _ctx: &BuiltinCtx<'_>) -> EvalResult<Value> {
    match arg(args, 0)? {
        Value::Bool(b) => Ok(Value::Float(if *b { 1.0 } else { 0.0 })),
        Value::Int(i) => Ok(Value::Float(int_to_f64(i)?)),
        Value::Float(f) => Ok(Value::Float(*f)),
        Value::Str(s) => Ok(Value::Float(parse_float_literal(s)?)),
        other => Err(errors::builtin_type_error(format!(
            "float() argument must be a string or a real number, not '{}'",
            other.type_name()
        ))),
    }
}

fn abs(args: &[Value], _ctx: &BuiltinCtx<'_>) -> EvalResult<Value> {
    match arg(args, 0)? {
        Value::Bool(b) => Ok(Value::int(i64::from(*b))),
        Value::Int(i) => Ok(Value::Int(i.abs())),
        Value::Float(f) => Ok(Value::Float(f.abs())),
        Value::Complex(c) => Ok(Value::Float(c.abs())),
        other => Err(errors::builtin_type_error(format!(
            "bad operand type for abs(): '{}'",
            other.type_name()
        ))),
    }
}

fn len(args: &[Value], ctx: &BuiltinCtx<'_>) -> EvalResult<Value> {
    let count = match arg(args, 0)? {
        Value::Str(s) => s.chars().count(),
        Value::List(id) => ctx
            .objects
            .list(*id)
            .map(<[Value]>::len)
            .ok_or_else(|| errors::internal("list handle without a list"))?,
        other => {
            return Err(errors::builtin_type_error(format!(
                "object of type '{}' has no len()",
                other.type_name()
            )))
        }
    };
    Ok(Value::Int(BigInt::from(count)))
}

/// Shared body of `max` and `min`: `better` is the comparison that makes a
/// candidate replace the current best.
fn extreme(
    name: &str,
    better: BinaryOp,
    args: &[Value],
    ctx: &BuiltinCtx<'_>,
) -> EvalResult<Value> {
    let items: Vec<Value> = match args {
        [Value::List(id)] => ctx
            .objects
            .list(*id)
            .ok_or_else(|| errors::internal("list handle without a list"))?
            .to_vec(),
        [single] => {
            return Err(errors::builtin_type_error(format!(
                "'{}' object is not iterable",
                single.type_name()
            )))
        }
        many => many.to_vec(),
    };
    let mut items = items.into_iter();
    let Some(mut best) = items.next() else {
        return Err(errors::value_error(format!(
            "{name}() arg is an empty sequence"
        )));
    };
    for item in items {
        let replace = operators::evaluate_binary(item.clone(), best.clone(), better, ctx.objects)?;
        if replace == Value::Bool(true) {
            best = item;
        }
    }
    Ok(best)
}

fn max(args: &[Value], ctx: &BuiltinCtx<'_>) -> EvalResult<Value> {
    extreme("max", BinaryOp::Gt, args, ctx)
}

fn min(args: &[Value], ctx: &BuiltinCtx<'_>) -> EvalResult<Value> {
    extreme("min", BinaryOp::Lt, args, ctx)
}

fn round_int(value: &BigInt, ndigits: &BigInt) -> BigInt {
    if !ndigits.is_negative() {
        return value.clone();
    }
    let Ok(places) = u32::try_from(ndigits.abs()) else {
        return BigInt::zero();
    };
    let unit = BigInt::from(10).pow(places);
    let (quotient, remainder) = value.div_mod_floor(&unit);
    let twice = remainder * 2;
    let rounded = if twice > unit || (twice == unit && quotient.is_odd()) {
        quotient + 1
    } else {
        quotient
    };
    rounded * unit
}

fn round_float(value: f64, ndigits: &BigInt) -> f64 {
    if !value.is_finite() {
        return value;
    }
    match i32::try_from(ndigits) {
        Ok(places) if places >= 0 => {
            let Ok(precision) = usize::try_from(places) else {
                return value;
            };
            if precision > 330 {
                return value;
            }
            format!("{value:.precision$}").parse().unwrap_or(value)
        }
        Ok(places) if places > -330 => {
            let scale = 10f64.powi(-places);
            (value / scale).round_ties_even() * scale
        }
        Ok(_) => 0.0_f64.copysign(value),
        Err(_) if ndigits.is_negative() => 0.0_f64.copysign(value),
        Err(_) => value,
    }
}

fn round(args: &[Value], _ctx: &BuiltinCtx<'_>) -> EvalResult<Value> {
    let ndigits = match args.get(1) {
        None | Some(Value::None) => None,
        Some(Value::Int(n)) => Some(n),
        Some(other) => {
            return Err(errors::builtin_type_error(format!(
                "'{}' object cannot be interpreted as an integer",
                other.type_name()
            )))
        }
    };
    match (arg(args, 0)?, ndigits) {
        (Value::Bool(b), None) => Ok(Value::int(i64::from(*b))),
        (Value::Bool(b), Some(n)) => Ok(Value::Int(round_int(&BigInt::from(u8::from(*b)), n))),
        (Value::Int(i), None) => Ok(Value::Int(i.clone())),
        (Value::Int(i), Some(n)) => Ok(Value::Int(round_int(i, n))),
        (Value::Float(f), None) => Ok(Value::Int(float_to_int(f.round_ties_even())?)),
        (Value::Float(f), Some(n)) => Ok(Value::Float(round_float(*f, n))),
        (other, _) => Err(errors::builtin_type_error(format!(
            "type {} doesn't define __round__ method",
            other.type_name()
        ))),
    }
}

fn is_none(args: &[Value], _ctx: &BuiltinCtx<'_>) -> EvalResult<Value> {
    Ok(Value::Bool(matches!(arg(args, 0)?, Value::None)))
}

fn is_boolean(args: &[Value], _ctx: &BuiltinCtx<'_>) -> EvalResult<Value> {
    Ok(Value::Bool(matches!(arg(args, 0)?, Value::Bool(_))))
}

fn is_int(args: &[Value], _ctx: &BuiltinCtx<'_>) -> EvalResult<Value> {
    Ok(Value::Bool(matches!(arg(args, 0)?, Value::Int(_))))
}

fn is_float(args: &[Value], _ctx: &BuiltinCtx<'_>) -> EvalResult<Value> {
    Ok(Value::Bool(matches!(arg(args, 0)?, Value::Float(_))))
}

fn is_complex(args: &[Value], _ctx: &BuiltinCtx<'_>) -> EvalResult<Value> {
    Ok(Value::Bool(matches!(arg(args, 0)?, Value::Complex(_))))
}

fn is_string(args: &[Value], _ctx: &BuiltinCtx<'_>) -> EvalResult<Value> {
    Ok(Value::Bool(matches!(arg(args, 0)?, Value::Str(_))))
}

fn is_function(args: &[Value], _ctx: &BuiltinCtx<'_>) -> EvalResult<Value> {
    Ok(Value::Bool(matches!(
        arg(args, 0)?,
        Value::Closure(_) | Value::Builtin(_)
    )))
}

fn real(args: &[Value], _ctx: &BuiltinCtx<'_>) -> EvalResult<Value> {
    match arg(args, 0)? {
        Value::Bool(b) => Ok(Value::int(i64::from(*b))),
        Value::Int(i) => Ok(Value::Int(i.clone())),
        Value::Float(f) => Ok(Value::Float(*f)),
        Value::Complex(c) => Ok(Value::Float(c.re)),
        other => Err(errors::builtin_type_error(format!(
            "real() argument must be a number, not '{}'",
            other.type_name()
        ))),
    }
}

fn imag(args: &[Value], _ctx: &BuiltinCtx<'_>) -> EvalResult<Value> {
    match arg(args, 0)? {
        Value::Bool(_) | Value::Int(_) => Ok(Value::int(0)),
        Value::Float(_) => Ok(Value::Float(0.0)),
        Value::Complex(c) => Ok(Value::Float(c.im)),
        other => Err(errors::builtin_type_error(format!(
            "imag() argument must be a number, not '{}'",
            other.type_name()
        ))),
    }
}
