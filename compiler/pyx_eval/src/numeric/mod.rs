//! Numeric helpers shared by the operators and the math builtins.
//!
//! Integers are `BigInt`, floats are `f64`, and complex numbers are a pair
//! of `f64`. The helpers here reproduce Python's results where they differ
//! from the host's: floor division and modulo take the sign of the divisor,
//! and mixed int/float comparison is exact for integers of any size.

mod compare;
mod complex;
mod divide;

use num_bigint::BigInt;
use num_traits::{FromPrimitive, ToPrimitive};

use crate::errors::{self, EvalResult};

pub use compare::py_compare;
pub use complex::Complex;
pub use divide::int_true_divide;

/// Convert an integer to a float, failing when it does not fit.
pub fn int_to_f64(value: &BigInt) -> EvalResult<f64> {
    match value.to_f64() {
        Some(f) if f.is_finite() => Ok(f),
        _ => Err(errors::overflow("int too large to convert to float")),
    }
}

/// Python's `divmod` for floats. The caller rules out a zero divisor.
///
/// The remainder has the sign of `b`; the quotient is floored.
pub fn float_divmod(a: f64, b: f64) -> (f64, f64) {
    let mut rem = a % b;
    let mut div = (a - rem) / b;
    if rem == 0.0 {
        rem = 0.0_f64.copysign(b);
    } else if (b < 0.0) != (rem < 0.0) {
        rem += b;
        div -= 1.0;
    }
    let floor = if div == 0.0 {
        0.0_f64.copysign(a / b)
    } else {
        let mut floor = div.floor();
        if div - floor > 0.5 {
            floor += 1.0;
        }
        floor
    };
    (floor, rem)
}

/// `a % b` with the sign of the divisor.
pub fn python_mod(a: f64, b: f64) -> f64 {
    float_divmod(a, b).1
}

/// Convert a float to an integer by truncation, as `int(x)` does.
pub fn float_to_int(value: f64) -> EvalResult<BigInt> {
    if value.is_nan() {
        return Err(errors::value_error("cannot convert float NaN to integer"));
    }
    if value.is_infinite() {
        return Err(errors::overflow("cannot convert float infinity to integer"));
    }
    BigInt::from_f64(value.trunc())
        .ok_or_else(|| errors::internal("finite float did not convert to an integer"))
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
