use pretty_assertions::assert_eq;
use pyx_ir::StringInterner;

use super::*;
use crate::environment::EnvId;
use crate::errors::EvalErrorKind;
use crate::heap::{HeapData, ObjectStore};
use crate::print_handler::buffer_handler;

struct Fixture {
    objects: ObjectStore,
    interner: StringInterner,
    print: crate::print_handler::SharedPrintHandler,
    registry: BuiltinRegistry,
}

impl Fixture {
    fn new() -> Self {
        Fixture {
            objects: ObjectStore::new(),
            interner: StringInterner::new(),
            print: buffer_handler(),
            registry: BuiltinRegistry::standard(),
        }
    }

    fn list(&mut self, items: Vec<Value>) -> Value {
        Value::List(
            self.objects
                .alloc(EnvId::GLOBAL, HeapData::List(items))
                .unwrap(),
        )
    }

    fn call(&self, name: &str, args: &[Value]) -> EvalResult<Value> {
        let ctx = BuiltinCtx {
            objects: &self.objects,
            interner: &self.interner,
            print: &self.print,
        };
        self.registry.function(name).unwrap().call(args, &ctx)
    }
}

#[test]
fn test_arity_display() {
    assert_eq!(Arity::Exact(0).to_string(), "no arguments");
    assert_eq!(Arity::Exact(1).to_string(), "exactly one argument");
    assert_eq!(Arity::AtLeast(1).to_string(), "at least one argument");
    assert_eq!(Arity::Range(1, 2).to_string(), "from 1 to 2 arguments");
    assert!(Arity::AtLeast(0).accepts(7));
    assert!(!Arity::Range(1, 2).accepts(3));
}

#[test]
fn test_arity_is_checked_before_running() {
    let fx = Fixture::new();
    let err = fx.call("abs", &[]).unwrap_err();
    assert_eq!(err.message, "abs() takes exactly one argument (0 given)");
    assert!(matches!(err.kind, EvalErrorKind::BuiltinArity { given: 0, .. }));
}

#[test]
fn test_register_replaces_by_name() {
    fn zero(_: &[Value], _: &BuiltinCtx<'_>) -> EvalResult<Value> {
        Ok(Value::int(0))
    }
    let mut registry = BuiltinRegistry::standard();
    let before = registry.functions().len();
    registry.register("abs", Arity::Exact(1), zero);
    assert_eq!(registry.functions().len(), before);
    registry.register_constant("math_pi", Value::int(3));
    assert_eq!(registry.constant("math_pi"), Some(&Value::int(3)));
    assert!(registry.function("no_such_builtin").is_none());
}

#[test]
fn test_print_joins_with_spaces() {
    let mut fx = Fixture::new();
    let xs = fx.list(vec![Value::str("a"), Value::Float(1.0)]);
    let result = fx
        .call("print", &[Value::str("x"), Value::int(1), xs, Value::None])
        .unwrap();
    assert_eq!(result, Value::None);
    fx.call("print", &[]).unwrap();
    assert_eq!(fx.print.get_output(), "x 1 ['a', 1.0] None\n\n");
}

#[test]
fn test_str_and_repr() {
    let fx = Fixture::new();
    assert_eq!(fx.call("str", &[Value::str("hi")]).unwrap(), Value::str("hi"));
    assert_eq!(
        fx.call("repr", &[Value::str("hi")]).unwrap(),
        Value::str("'hi'")
    );
    assert_eq!(
        fx.call("str", &[Value::Bool(true)]).unwrap(),
        Value::str("True")
    );
}

#[test]
fn test_int_conversion() {
    let fx = Fixture::new();
    assert_eq!(fx.call("int", &[Value::str(" 1_000 ")]).unwrap(), Value::int(1000));
    assert_eq!(fx.call("int", &[Value::str("-42")]).unwrap(), Value::int(-42));
    assert_eq!(fx.call("int", &[Value::Float(-2.9)]).unwrap(), Value::int(-2));
    assert_eq!(fx.call("int", &[Value::Bool(true)]).unwrap(), Value::int(1));

    let err = fx.call("int", &[Value::str("abc")]).unwrap_err();
    assert_eq!(err.message, "invalid literal for int() with base 10: 'abc'");
    assert!(fx.call("int", &[Value::str("1__0")]).is_err());
    let err = fx.call("int", &[Value::None]).unwrap_err();
    assert!(matches!(err.kind, EvalErrorKind::BuiltinTypeError { .. }));
}

#[test]
fn test_float_conversion() {
    let fx = Fixture::new();
    assert_eq!(fx.call("float", &[Value::str("2.5")]).unwrap(), Value::Float(2.5));
    assert_eq!(fx.call("float", &[Value::int(3)]).unwrap(), Value::Float(3.0));
    let err = fx.call("float", &[Value::str("x")]).unwrap_err();
    assert_eq!(err.message, "could not convert string to float: 'x'");
}

#[test]
fn test_abs_keeps_type_and_measures_complex() {
    let fx = Fixture::new();
    assert_eq!(fx.call("abs", &[Value::int(-5)]).unwrap(), Value::int(5));
    assert_eq!(fx.call("abs", &[Value::Float(-1.5)]).unwrap(), Value::Float(1.5));
    assert_eq!(
        fx.call("abs", &[Value::Complex(crate::numeric::Complex::new(3.0, 4.0))])
            .unwrap(),
        Value::Float(5.0)
    );
    let err = fx.call("abs", &[Value::str("x")]).unwrap_err();
    assert_eq!(err.message, "bad operand type for abs(): 'str'");
}

#[test]
fn test_len() {
    let mut fx = Fixture::new();
    let xs = fx.list(vec![Value::int(1), Value::int(2)]);
    assert_eq!(fx.call("len", &[xs]).unwrap(), Value::int(2));
    assert_eq!(fx.call("len", &[Value::str("héllo")]).unwrap(), Value::int(5));
    let err = fx.call("len", &[Value::int(3)]).unwrap_err();
    assert_eq!(err.message, "object of type 'int' has no len()");
}

#[test]
fn test_max_and_min() {
    let mut fx = Fixture::new();
    assert_eq!(
        fx.call("max", &[Value::int(1), Value::Float(2.5), Value::int(2)])
            .unwrap(),
        Value::Float(2.5)
    );
    assert_eq!(
        fx.call("min", &[Value::int(1), Value::Float(0.5)]).unwrap(),
        Value::Float(0.5)
    );
    let xs = fx.list(vec![Value::str("b"), Value::str("c"), Value::str("a")]);
    assert_eq!(fx.call("max", &[xs]).unwrap(), Value::str("c"));

    let empty = fx.list(vec![]);
    let err = fx.call("min", &[empty]).unwrap_err();
    assert_eq!(err.message, "min() arg is an empty sequence");
    let err = fx.call("max", &[Value::int(1), Value::str("a")]).unwrap_err();
    assert!(matches!(err.kind, EvalErrorKind::OrderingNotSupported { .. }));
}

#[test]
fn test_max_keeps_first_of_equal_items() {
    let fx = Fixture::new();
    assert_eq!(
        fx.call("max", &[Value::int(2), Value::Float(2.0)]).unwrap(),
        Value::int(2)
    );
}

#[test]
fn test_round_ties_to_even() {
    let fx = Fixture::new();
    assert_eq!(fx.call("round", &[Value::Float(2.5)]).unwrap(), Value::int(2));
    assert_eq!(fx.call("round", &[Value::Float(3.5)]).unwrap(), Value::int(4));
    assert_eq!(fx.call("round", &[Value::Float(-0.5)]).unwrap(), Value::int(0));
    assert_eq!(
        fx.call("round", &[Value::Float(2.675), Value::int(2)]).unwrap(),
        Value::Float(2.67)
    );
    assert_eq!(
        fx.call("round", &[Value::int(1250), Value::int(-2)]).unwrap(),
        Value::int(1200)
    );
    assert_eq!(
        fx.call("round", &[Value::int(1350), Value::int(-2)]).unwrap(),
        Value::int(1400)
    );
    assert_eq!(
        fx.call("round", &[Value::int(-1351), Value::int(-2)]).unwrap(),
        Value::int(-1400)
    );
    assert_eq!(
        fx.call("round", &[Value::int(7), Value::int(3)]).unwrap(),
        Value::int(7)
    );
}

#[test]
fn test_error_raises_user_error() {
    let fx = Fixture::new();
    let err = fx
        .call("error", &[Value::str("bad"), Value::int(3)])
        .unwrap_err();
    assert_eq!(
        err.kind,
        EvalErrorKind::UserError {
            message: "bad 3".to_string()
        }
    );
}

#[test]
fn test_type_predicates() {
    let fx = Fixture::new();
    let print = Value::Builtin(fx.registry.function("print").unwrap());
    let cases = [
        ("is_none", Value::None, true),
        ("is_none", Value::Bool(false), false),
        ("is_boolean", Value::Bool(false), true),
        ("is_int", Value::Bool(true), false),
        ("is_int", Value::int(1), true),
        ("is_float", Value::Float(1.0), true),
        ("is_float", Value::int(1), false),
        ("is_string", Value::str(""), true),
        ("is_function", print, true),
        ("is_function", Value::str("f"), false),
    ];
    for (name, value, expected) in cases {
        assert_eq!(
            fx.call(name, &[value]).unwrap(),
            Value::Bool(expected),
            "{name}"
        );
    }
}

#[test]
fn test_real_and_imag() {
    let fx = Fixture::new();
    let z = Value::Complex(crate::numeric::Complex::new(1.5, -2.0));
    assert_eq!(fx.call("real", &[z.clone()]).unwrap(), Value::Float(1.5));
    assert_eq!(fx.call("imag", &[z]).unwrap(), Value::Float(-2.0));
    assert_eq!(fx.call("imag", &[Value::int(4)]).unwrap(), Value::int(0));
}

#[test]
fn test_math_functions() {
    let fx = Fixture::new();
    assert_eq!(fx.call("math_sqrt", &[Value::int(16)]).unwrap(), Value::Float(4.0));
    assert_eq!(fx.call("math_floor", &[Value::Float(-1.5)]).unwrap(), Value::int(-2));
    assert_eq!(fx.call("math_ceil", &[Value::Float(1.2)]).unwrap(), Value::int(2));
    assert_eq!(fx.call("math_log", &[Value::int(1)]).unwrap(), Value::Float(0.0));
    assert_eq!(
        fx.call("math_log", &[Value::int(8), Value::int(2)]).unwrap(),
        Value::Float(3.0)
    );
}

#[test]
fn test_math_domain_errors() {
    let fx = Fixture::new();
    for (name, arg) in [
        ("math_asin", Value::int(2)),
        ("math_acos", Value::Float(-1.5)),
        ("math_sqrt", Value::int(-1)),
        ("math_log", Value::int(0)),
    ] {
        let err = fx.call(name, &[arg]).unwrap_err();
        assert_eq!(err.kind, EvalErrorKind::MathDomain, "{name}");
        assert_eq!(err.message, "math domain error");
    }
    let err = fx.call("math_exp", &[Value::int(1000)]).unwrap_err();
    assert_eq!(err.message, "math range error");
    let err = fx
        .call("math_log", &[Value::int(2), Value::int(1)])
        .unwrap_err();
    assert!(matches!(err.kind, EvalErrorKind::ZeroDivision { .. }));
    let err = fx.call("math_sin", &[Value::str("x")]).unwrap_err();
    assert_eq!(err.message, "must be real number, not str");
}

#[test]
fn test_math_constants() {
    let registry = BuiltinRegistry::standard();
    assert_eq!(
        registry.constant("math_pi"),
        Some(&Value::Float(std::f64::consts::PI))
    );
    assert!(matches!(registry.constant("math_nan"), Some(Value::Float(f)) if f.is_nan()));
    assert_eq!(
        registry.constant("math_inf"),
        Some(&Value::Float(f64::INFINITY))
    );
}
