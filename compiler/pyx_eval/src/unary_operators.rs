//! Unary operators.

use pyx_ir::UnaryOp;

use crate::errors::{self, EvalResult};
use crate::value::Value;

/// Evaluate `op value`. `not` only takes a `bool`; `-` and `+` keep the
/// numeric tag of their operand.
pub fn evaluate_unary(value: Value, op: UnaryOp) -> EvalResult<Value> {
    match (value, op) {
        (Value::Bool(b), UnaryOp::Not) => Ok(Value::Bool(!b)),
        (other, UnaryOp::Not) => Err(errors::not_a_bool(
            "as the operand of 'not'",
            other.type_name(),
        )),

        (Value::Int(n), UnaryOp::Neg) => Ok(Value::Int(-n)),
        (Value::Float(f), UnaryOp::Neg) => Ok(Value::Float(-f)),
        (Value::Complex(c), UnaryOp::Neg) => Ok(Value::Complex(-c)),

        (value @ (Value::Int(_) | Value::Float(_) | Value::Complex(_)), UnaryOp::Plus) => Ok(value),

        (other, op) => Err(errors::bad_unary_operand(op, other.type_name())),
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::errors::EvalErrorKind;
    use crate::numeric::Complex;

    #[test]
    fn negation_keeps_the_tag() {
        assert_eq!(
            evaluate_unary(Value::int(3), UnaryOp::Neg).unwrap(),
            Value::int(-3)
        );
        assert_eq!(
            evaluate_unary(Value::Float(0.5), UnaryOp::Neg).unwrap(),
            Value::Float(-0.5)
        );
        assert_eq!(
            evaluate_unary(Value::Complex(Complex::new(1.0, -2.0)), UnaryOp::Neg).unwrap(),
            Value::Complex(Complex::new(-1.0, 2.0))
        );
        assert_eq!(
            evaluate_unary(Value::Float(2.0), UnaryOp::Plus).unwrap(),
            Value::Float(2.0)
        );
    }

    #[test]
    fn not_requires_a_bool() {
        assert_eq!(
            evaluate_unary(Value::Bool(false), UnaryOp::Not).unwrap(),
            Value::Bool(true)
        );
        let err = evaluate_unary(Value::int(0), UnaryOp::Not).unwrap_err();
        assert_eq!(err.message, "expected a bool as the operand of 'not', got 'int'");
    }

    #[test]
    fn bad_operand_names_the_type() {
        let err = evaluate_unary(Value::str("a"), UnaryOp::Neg).unwrap_err();
        assert_eq!(
            err.kind,
            EvalErrorKind::BadUnaryOperand {
                op: "-",
                operand: "str"
            }
        );
        assert_eq!(err.message, "bad operand type for unary -: 'str'");
        assert!(evaluate_unary(Value::Bool(true), UnaryOp::Plus).is_err());
    }
}
