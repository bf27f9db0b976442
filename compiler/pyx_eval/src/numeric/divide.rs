//! True division of integers, rounded once.
//!
//! Converting both operands to `f64` first would overflow for large
//! operands whose quotient is small, and rounds twice once a quotient
//! needs more than 53 bits. Instead the quotient is computed as an integer
//! with two guard bits plus a sticky bit, rounded half to even at the
//! precision of the result (subnormals included), then scaled.

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{Signed, ToPrimitive, Zero};

use crate::errors::{self, EvalResult};

const MANTISSA_BITS: i64 = 53;
/// Smallest exponent `e` such that `2^(e-1)` is a normal double.
const MIN_EXP: i64 = -1021;
const MAX_EXP: i64 = 1024;

/// `a / b` as the nearest double.
pub fn int_true_divide(a: &BigInt, b: &BigInt) -> EvalResult<f64> {
    if b.is_zero() {
        return Err(errors::zero_division("division by zero"));
    }
    let negative = a.is_negative() != b.is_negative();
    let n = a.abs();
    let d = b.abs();
    if n.is_zero() {
        return Ok(if negative { -0.0 } else { 0.0 });
    }

    // Small operands convert exactly, so one IEEE division rounds once.
    if let (Some(x), Some(y)) = (exact_f64(&n), exact_f64(&d)) {
        let q = x / y;
        return Ok(if negative { -q } else { q });
    }

    // 2^(diff-1) < n/d < 2^(diff+1)
    let diff = bit_len(&n) - bit_len(&d);
    if diff > MAX_EXP + 1 {
        return Err(too_large());
    }
    if diff < MIN_EXP - MANTISSA_BITS - 2 {
        return Ok(if negative { -0.0 } else { 0.0 });
    }

    let shift = diff.max(MIN_EXP) - MANTISSA_BITS - 2;
    let (x, rem) = if shift < 0 {
        (n << usize_of(-shift)?).div_rem(&d)
    } else {
        n.div_rem(&(d << usize_of(shift)?))
    };
    let inexact = !rem.is_zero();
    let x = x
        .to_u64()
        .ok_or_else(|| errors::internal("scaled quotient exceeds 64 bits"))?;

    // Bits below the result's last place.
    let x_bits = i64::from(u64::BITS - x.leading_zeros());
    let extra = x_bits.max(MIN_EXP - shift) - MANTISSA_BITS;
    let extra = u32::try_from(extra).map_err(|_| errors::internal("negative rounding width"))?;
    let half = 1u64 << (extra - 1);
    let low = x & ((1u64 << extra) - 1);
    let mut kept = x >> extra;
    if low > half || (low == half && (inexact || kept & 1 == 1)) {
        kept += 1;
    }

    #[expect(
        clippy::cast_precision_loss,
        reason = "kept is at most 2^53, which converts exactly"
    )]
    let mantissa = kept as f64;
    let q = scale(mantissa, shift + i64::from(extra));
    if q.is_infinite() {
        return Err(too_large());
    }
    Ok(if negative { -q } else { q })
}

fn too_large() -> errors::EvalError {
    errors::overflow("integer division result too large for a float")
}

/// `value` when it is at most 2^53 and so converts without rounding.
fn exact_f64(value: &BigInt) -> Option<f64> {
    if bit_len(value) <= MANTISSA_BITS {
        value.to_f64()
    } else {
        None
    }
}

fn bit_len(value: &BigInt) -> i64 {
    i64::try_from(value.bits()).unwrap_or(i64::MAX)
}

fn usize_of(shift: i64) -> EvalResult<usize> {
    usize::try_from(shift).map_err(|_| errors::internal("shift out of range"))
}

/// `value * 2^exp`, exact unless the result overflows.
///
/// Works in steps of at most 2^±512 so no intermediate factor is out of
/// range. For negative `exp` every intermediate is larger than the result,
/// so none is rounded.
fn scale(mut value: f64, mut exp: i64) -> f64 {
    const STEP: i64 = 512;
    while exp != 0 {
        let step = exp.clamp(-STEP, STEP);
        value *= pow2(step);
        exp -= step;
    }
    value
}

/// `2^exp` for `-1022 <= exp <= 1023`.
fn pow2(exp: i64) -> f64 {
    let biased = u64::try_from(exp + 1023).unwrap_or(0);
    f64::from_bits(biased << 52)
}
