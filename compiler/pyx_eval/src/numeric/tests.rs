use std::cmp::Ordering;

use num_bigint::BigInt;
use num_traits::FromPrimitive;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

use super::*;
use crate::errors::EvalErrorKind;

fn big(s: &str) -> BigInt {
    s.parse().unwrap()
}

#[test]
fn test_py_compare_known_cases() {
    let ten_pow_20 = BigInt::from(10).pow(20u32);
    let two_pow_53 = BigInt::from(2).pow(53u32);
    let cases: Vec<(BigInt, f64, Option<Ordering>)> = vec![
        (ten_pow_20.clone(), 1e20, Some(Ordering::Equal)),
        (-ten_pow_20.clone(), -1e20, Some(Ordering::Equal)),
        (ten_pow_20 + 1, 1e20, Some(Ordering::Greater)),
        (two_pow_53.clone() + 1, 9_007_199_254_740_992.0, Some(Ordering::Greater)),
        (two_pow_53, 9_007_199_254_740_992.0, Some(Ordering::Equal)),
        (big("9223372036854775808"), 9.223_372_036_854_776e18, Some(Ordering::Equal)),
        (big("10000000000000001"), 1e16, Some(Ordering::Greater)),
        (big("99999999999999999999"), 1e20, Some(Ordering::Less)),
        (big("-99999999999999999999"), -1e20, Some(Ordering::Greater)),
        (BigInt::from(3), 2.5, Some(Ordering::Greater)),
        (BigInt::from(-3), 2.5, Some(Ordering::Less)),
        (BigInt::from(0), -0.0, Some(Ordering::Equal)),
        (BigInt::from(10).pow(400u32), f64::INFINITY, Some(Ordering::Less)),
        (-BigInt::from(10).pow(400u32), f64::NEG_INFINITY, Some(Ordering::Greater)),
        (BigInt::from(1), f64::NAN, None),
    ];
    for (int, float, expected) in cases {
        assert_eq!(py_compare(&int, float), expected, "{int} vs {float:e}");
    }
}

#[test]
fn test_py_compare_small_int_with_fraction() {
    assert_eq!(py_compare(&BigInt::from(12345), 12345.5), Some(Ordering::Less));
    assert_eq!(py_compare(&BigInt::from(-12345), -12345.5), Some(Ordering::Greater));
}

/// Exact reference: compare against the float's truncated integer value.
fn reference_compare(int: &BigInt, float: f64) -> Ordering {
    let truncated = BigInt::from_f64(float.trunc()).unwrap();
    match int.cmp(&truncated) {
        Ordering::Equal if float.fract() > 0.0 => Ordering::Less,
        Ordering::Equal if float.fract() < 0.0 => Ordering::Greater,
        other => other,
    }
}

proptest! {
    #[test]
    fn prop_py_compare_is_exact(
        digits in "-?[1-9][0-9]{0,30}",
        mantissa in -1.0e3f64..1.0e3,
        exponent in 0i32..30,
    ) {
        let int = big(&digits);
        let float = mantissa * 10f64.powi(exponent);
        prop_assert_eq!(py_compare(&int, float), Some(reference_compare(&int, float)));
    }

    #[test]
    fn prop_py_compare_agrees_with_integral_floats(value in -1.0e25f64..1.0e25) {
        let float = value.trunc();
        let int = BigInt::from_f64(float).unwrap();
        prop_assert_eq!(py_compare(&int, float), Some(Ordering::Equal));
    }
}

#[test]
fn test_python_mod_takes_sign_of_divisor() {
    assert_eq!(python_mod(-7.0, 3.0), 2.0);
    assert_eq!(python_mod(7.0, -3.0), -2.0);
    assert_eq!(python_mod(7.5, 2.0), 1.5);
    assert!(python_mod(-0.0, 5.0).is_sign_positive());
}

#[test]
fn test_float_divmod_floors() {
    assert_eq!(float_divmod(-7.0, 2.0), (-4.0, 1.0));
    assert_eq!(float_divmod(7.0, 2.0), (3.0, 1.0));
    assert_eq!(float_divmod(1.0, 0.1).0, 9.0);
}

#[test]
fn test_int_to_f64_overflow() {
    assert_eq!(int_to_f64(&BigInt::from(7)).unwrap(), 7.0);
    let huge = BigInt::from(10).pow(400u32);
    assert!(matches!(
        int_to_f64(&huge).unwrap_err().kind,
        EvalErrorKind::Overflow { .. }
    ));
}

#[test]
fn test_float_to_int() {
    assert_eq!(float_to_int(-2.9).unwrap(), BigInt::from(-2));
    assert!(matches!(
        float_to_int(f64::NAN).unwrap_err().kind,
        EvalErrorKind::ValueError { .. }
    ));
    assert!(matches!(
        float_to_int(f64::INFINITY).unwrap_err().kind,
        EvalErrorKind::Overflow { .. }
    ));
}

#[test]
fn test_complex_arithmetic() {
    let a = Complex::new(1.0, 2.0);
    let b = Complex::new(3.0, -1.0);
    assert_eq!(a + b, Complex::new(4.0, 1.0));
    assert_eq!(a - b, Complex::new(-2.0, 3.0));
    assert_eq!(a * b, Complex::new(5.0, 5.0));
    assert_eq!(
        Complex::new(4.0, 2.0).div(Complex::from_real(2.0)).unwrap(),
        Complex::new(2.0, 1.0)
    );
    assert_eq!(
        Complex::new(5.0, 5.0).div(Complex::new(0.0, 5.0)).unwrap(),
        Complex::new(1.0, -1.0)
    );
}

#[test]
fn test_complex_division_by_zero() {
    let err = Complex::ONE.div(Complex::ZERO).unwrap_err();
    assert_eq!(err.message, "complex division by zero");
}

#[test]
fn test_complex_integral_power_is_exact() {
    let z = Complex::new(1.0, 1.0);
    assert_eq!(z.pow(Complex::from_real(2.0)).unwrap(), Complex::new(0.0, 2.0));
    assert_eq!(z.pow(Complex::from_real(0.0)).unwrap(), Complex::ONE);
    assert_eq!(
        Complex::new(0.0, 2.0).pow(Complex::from_real(-1.0)).unwrap(),
        Complex::new(0.0, -0.5)
    );
}

#[test]
fn test_complex_polar_power() {
    // i ** 0.5 == (1 + i) / sqrt(2)
    let root = Complex::new(0.0, 1.0).pow(Complex::from_real(0.5)).unwrap();
    let expected = std::f64::consts::FRAC_1_SQRT_2;
    assert!((root.re - expected).abs() < 1e-12);
    assert!((root.im - expected).abs() < 1e-12);
}

#[test]
fn test_complex_zero_to_negative_power() {
    let err = Complex::ZERO.pow(Complex::new(-1.5, 0.0)).unwrap_err();
    assert!(matches!(err.kind, EvalErrorKind::ZeroDivision { .. }));
    let err = Complex::ZERO.pow(Complex::from_real(-1.0)).unwrap_err();
    assert!(matches!(err.kind, EvalErrorKind::ZeroDivision { .. }));
}

#[test]
fn test_int_true_divide_large_operands() {
    let ten = BigInt::from(10);
    assert_eq!(int_true_divide(&ten.pow(400u32), &ten.pow(399u32)).unwrap(), 10.0);
    let third = int_true_divide(&(ten.pow(400u32) + 1), &(BigInt::from(3) * ten.pow(399u32)));
    assert_eq!(third.unwrap(), 3.333_333_333_333_333_5);
}

#[test]
fn test_int_true_divide_rounds_once() {
    // Converting the numerator first would round down to ...399.0.
    let q = int_true_divide(&big("929339868545501023259"), &BigInt::from(220_153)).unwrap();
    assert_eq!(q, 4_221_336_382_177_399.5);
    assert_eq!(int_true_divide(&BigInt::from(1), &BigInt::from(4)).unwrap(), 0.25);
    assert_eq!(int_true_divide(&BigInt::from(-7), &BigInt::from(2)).unwrap(), -3.5);
}

#[test]
fn test_int_true_divide_underflow_and_signed_zero() {
    let ten = BigInt::from(10);
    assert_eq!(int_true_divide(&BigInt::from(1), &ten.pow(320u32)).unwrap(), 1e-320);
    let tiny = int_true_divide(&BigInt::from(-7), &ten.pow(330u32)).unwrap();
    assert_eq!(tiny, 0.0);
    assert!(tiny.is_sign_negative());
    let zero = int_true_divide(&BigInt::from(0), &BigInt::from(-5)).unwrap();
    assert!(zero == 0.0 && zero.is_sign_negative());
}

#[test]
fn test_int_true_divide_overflow_and_zero_divisor() {
    let two = BigInt::from(2);
    for numerator in [two.pow(1024u32), two.pow(1024u32) - 1, BigInt::from(10).pow(400u32)] {
        let err = int_true_divide(&numerator, &BigInt::from(1)).unwrap_err();
        assert_eq!(err.message, "integer division result too large for a float");
    }
    assert_eq!(
        int_true_divide(&(two.pow(1023u32) * 3), &BigInt::from(2)).unwrap(),
        1.5 * 2f64.powi(1023)
    );
    let err = int_true_divide(&BigInt::from(1), &BigInt::from(0)).unwrap_err();
    assert!(matches!(err.kind, EvalErrorKind::ZeroDivision { .. }));
}

proptest! {
    #[test]
    fn prop_int_true_divide_ignores_common_factors(
        a in -(1i64 << 53)..(1i64 << 53),
        b in 1i64..(1i64 << 53),
        negative in any::<bool>(),
        power in 20u32..400,
    ) {
        let b = if negative { -b } else { b };
        #[allow(clippy::cast_precision_loss, reason = "operands are below 2^53")]
        let expected = a as f64 / b as f64;
        let scale = BigInt::from(10).pow(power);
        let q = int_true_divide(&(BigInt::from(a) * &scale), &(BigInt::from(b) * &scale)).unwrap();
        prop_assert_eq!(q.to_bits(), expected.to_bits());
    }
}
