use std::cmp::Ordering;

use num_bigint::{BigInt, Sign};
use num_traits::ToPrimitive;

/// Largest integer magnitude every `f64` represents exactly (2^53 - 1).
const MAX_SAFE_INTEGER: u64 = (1 << 53) - 1;

/// Compare an integer with a float without rounding the integer.
///
/// Returns `None` when `float` is NaN, since NaN is unordered. Small
/// integers are compared as floats, which is exact below 2^53. Larger ones
/// are compared by the digit count of the float's integer part, then
/// digit by digit, and finally by the float's fractional part.
pub fn py_compare(int: &BigInt, float: f64) -> Option<Ordering> {
    if float.is_nan() {
        return None;
    }
    if float == f64::INFINITY {
        return Some(Ordering::Less);
    }
    if float == f64::NEG_INFINITY {
        return Some(Ordering::Greater);
    }

    let int_sign: i8 = match int.sign() {
        Sign::Minus => -1,
        Sign::NoSign => 0,
        Sign::Plus => 1,
    };
    let float_sign: i8 = if float > 0.0 {
        1
    } else if float < 0.0 {
        -1
    } else {
        0
    };
    if int_sign != float_sign {
        return Some(int_sign.cmp(&float_sign));
    }
    if int_sign == 0 {
        return Some(Ordering::Equal);
    }

    let magnitude = int.magnitude();
    if let Some(small) = magnitude.to_u64().filter(|m| *m <= MAX_SAFE_INTEGER) {
        #[expect(clippy::cast_precision_loss, reason = "exact below 2^53")]
        let as_float = small as f64;
        let ordering = as_float.partial_cmp(&float.abs())?;
        return Some(if int_sign < 0 {
            ordering.reverse()
        } else {
            ordering
        });
    }

    let int_digits = magnitude.to_string();
    let float_abs = float.abs();
    let float_digits = format!("{:.0}", float_abs.trunc());
    let ordering = int_digits
        .len()
        .cmp(&float_digits.len())
        .then_with(|| int_digits.as_str().cmp(float_digits.as_str()))
        .then_with(|| {
            if float_abs.fract() > 0.0 {
                Ordering::Less
            } else {
                Ordering::Equal
            }
        });
    Some(if int_sign < 0 {
        ordering.reverse()
    } else {
        ordering
    })
}
