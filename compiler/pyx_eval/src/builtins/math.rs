//! The `math_*` functions and constants.

use std::f64::consts;

use super::{arg, Arity, BuiltinCtx, BuiltinRegistry};
use crate::errors::{self, EvalResult};
use crate::numeric::{float_to_int, int_to_f64};
use crate::value::Value;

pub(super) fn register(registry: &mut BuiltinRegistry) {
    registry.register("math_sqrt", Arity::Exact(1), sqrt);
    registry.register("math_sin", Arity::Exact(1), sin);
    registry.register("math_cos", Arity::Exact(1), cos);
    registry.register("math_tan", Arity::Exact(1), tan);
    registry.register("math_asin", Arity::Exact(1), asin);
    registry.register("math_acos", Arity::Exact(1), acos);
    registry.register("math_atan", Arity::Exact(1), atan);
    registry.register("math_exp", Arity::Exact(1), exp);
    registry.register("math_log", Arity::Range(1, 2), log);
    registry.register("math_floor", Arity::Exact(1), floor);
    registry.register("math_ceil", Arity::Exact(1), ceil);

    registry.register_constant("math_pi", Value::Float(consts::PI));
    registry.register_constant("math_e", Value::Float(consts::E));
    registry.register_constant("math_tau", Value::Float(consts::TAU));
    registry.register_constant("math_inf", Value::Float(f64::INFINITY));
    registry.register_constant("math_nan", Value::Float(f64::NAN));
}

/// Coerce a real number argument to a float.
fn real_arg(value: &Value) -> EvalResult<f64> {
    match value {
        Value::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
        Value::Int(i) => int_to_f64(i),
        Value::Float(f) => Ok(*f),
        other => Err(errors::builtin_type_error(format!(
            "must be real number, not {}",
            other.type_name()
        ))),
    }
}

/// Apply `f`, rejecting finite inputs that leave the domain.
fn unary(args: &[Value], f: fn(f64) -> f64) -> EvalResult<Value> {
    let x = real_arg(arg(args, 0)?)?;
    let result = f(x);
    if result.is_nan() && !x.is_nan() {
        return Err(errors::math_domain_error());
    }
    Ok(Value::Float(result))
}

fn sqrt(args: &[Value], _ctx: &BuiltinCtx<'_>) -> EvalResult<Value> {
    unary(args, f64::sqrt)
}

fn sin(args: &[Value], _ctx: &BuiltinCtx<'_>) -> EvalResult<Value> {
    unary(args, f64::sin)
}

fn cos(args: &[Value], _ctx: &BuiltinCtx<'_>) -> EvalResult<Value> {
    unary(args, f64::cos)
}

fn tan(args: &[Value], _ctx: &BuiltinCtx<'_>) -> EvalResult<Value> {
    unary(args, f64::tan)
}

fn asin(args: &[Value], _ctx: &BuiltinCtx<'_>) -> EvalResult<Value> {
    unary(args, f64::asin)
}

fn acos(args: &[Value], _ctx: &BuiltinCtx<'_>) -> EvalResult<Value> {
    unary(args, f64::acos)
}

fn atan(args: &[Value], _ctx: &BuiltinCtx<'_>) -> EvalResult<Value> {
    unary(args, f64::atan)
}

fn exp(args: &[Value], _ctx: &BuiltinCtx<'_>) -> EvalResult<Value> {
    let x = real_arg(arg(args, 0)?)?;
    let result = x.exp();
    if result.is_infinite() && x.is_finite() {
        return Err(errors::overflow("math range error"));
    }
    Ok(Value::Float(result))
}

fn ln(x: f64) -> EvalResult<f64> {
    if x <= 0.0 {
        return Err(errors::math_domain_error());
    }
    Ok(x.ln())
}

fn log(args: &[Value], _ctx: &BuiltinCtx<'_>) -> EvalResult<Value> {
    let x = ln(real_arg(arg(args, 0)?)?)?;
    let Some(base) = args.get(1) else {
        return Ok(Value::Float(x));
    };
    let base = ln(real_arg(base)?)?;
    if base == 0.0 {
        return Err(errors::zero_division("float division by zero"));
    }
    Ok(Value::Float(x / base))
}

/// `floor` and `ceil` return integers; integers pass through unchanged.
fn rounded(args: &[Value], f: fn(f64) -> f64) -> EvalResult<Value> {
    match arg(args, 0)? {
        Value::Int(i) => Ok(Value::Int(i.clone())),
        other => Ok(Value::Int(float_to_int(f(real_arg(other)?))?)),
    }
}

fn floor(args: &[Value], _ctx: &BuiltinCtx<'_>) -> EvalResult<Value> {
    rounded(args, f64::floor)
}

fn ceil(args: &[Value], _ctx: &BuiltinCtx<'_>) -> EvalResult<Value> {
    rounded(args, f64::ceil)
}
