use std::ops::{Add, Mul, Neg, Sub};

use crate::errors::{self, EvalResult};

/// A complex number with `f64` parts.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Complex {
    pub re: f64,
    pub im: f64,
}

impl Complex {
    pub const ZERO: Complex = Complex::new(0.0, 0.0);
    pub const ONE: Complex = Complex::new(1.0, 0.0);

    pub const fn new(re: f64, im: f64) -> Self {
        Complex { re, im }
    }

    pub const fn from_real(re: f64) -> Self {
        Complex { re, im: 0.0 }
    }

    pub fn is_zero(self) -> bool {
        self.re == 0.0 && self.im == 0.0
    }

    /// Magnitude, `abs(z)`.
    pub fn abs(self) -> f64 {
        self.re.hypot(self.im)
    }

    /// Quotient using Smith's method, which avoids overflow in `c*c + d*d`.
    pub fn div(self, other: Complex) -> EvalResult<Complex> {
        if other.is_zero() {
            return Err(errors::zero_division("complex division by zero"));
        }
        let (a, b) = (self.re, self.im);
        let (c, d) = (other.re, other.im);
        Ok(if c.abs() >= d.abs() {
            let ratio = d / c;
            let denom = c + d * ratio;
            Complex::new((a + b * ratio) / denom, (b - a * ratio) / denom)
        } else {
            let ratio = c / d;
            let denom = c * ratio + d;
            Complex::new((a * ratio + b) / denom, (b * ratio - a) / denom)
        })
    }

    /// `self ** exp`.
    ///
    /// Small integral exponents use repeated squaring so that results such
    /// as `(1+1j)**2 == 2j` are exact. Everything else goes through polar
    /// form.
    pub fn pow(self, exp: Complex) -> EvalResult<Complex> {
        let result = if exp.im == 0.0 && exp.re == exp.re.trunc() && exp.re.abs() <= 100.0 {
            #[expect(clippy::cast_possible_truncation, reason = "bounded by 100 above")]
            let n = exp.re as i32;
            self.powi(n)?
        } else {
            self.pow_polar(exp)?
        };
        let finite_inputs =
            self.re.is_finite() && self.im.is_finite() && exp.re.is_finite() && exp.im.is_finite();
        if finite_inputs && !(result.re.is_finite() && result.im.is_finite()) {
            return Err(errors::overflow("complex exponentiation"));
        }
        Ok(result)
    }

    fn powi(self, n: i32) -> EvalResult<Complex> {
        let mut result = Complex::ONE;
        let mut base = self;
        let mut rest = n.unsigned_abs();
        while rest > 0 {
            if rest & 1 == 1 {
                result = result * base;
            }
            base = base * base;
            rest >>= 1;
        }
        if n < 0 {
            Complex::ONE
                .div(result)
                .map_err(|_| errors::zero_division("0.0 to a negative or complex power"))
        } else {
            Ok(result)
        }
    }

    fn pow_polar(self, exp: Complex) -> EvalResult<Complex> {
        if exp.is_zero() {
            return Ok(Complex::ONE);
        }
        if self.is_zero() {
            if exp.im != 0.0 || exp.re < 0.0 {
                return Err(errors::zero_division("0.0 to a negative or complex power"));
            }
            return Ok(Complex::ZERO);
        }
        let modulus = self.abs();
        let angle = self.im.atan2(self.re);
        let mut length = modulus.powf(exp.re);
        let mut phase = angle * exp.re;
        if exp.im != 0.0 {
            length /= (angle * exp.im).exp();
            phase += exp.im * modulus.ln();
        }
        Ok(Complex::new(length * phase.cos(), length * phase.sin()))
    }
}

impl Add for Complex {
    type Output = Complex;

    fn add(self, rhs: Complex) -> Complex {
        Complex::new(self.re + rhs.re, self.im + rhs.im)
    }
}

impl Sub for Complex {
    type Output = Complex;

    fn sub(self, rhs: Complex) -> Complex {
        Complex::new(self.re - rhs.re, self.im - rhs.im)
    }
}

impl Mul for Complex {
    type Output = Complex;

    fn mul(self, rhs: Complex) -> Complex {
        Complex::new(
            self.re * rhs.re - self.im * rhs.im,
            self.re * rhs.im + self.im * rhs.re,
        )
    }
}

impl Neg for Complex {
    type Output = Complex;

    fn neg(self) -> Complex {
        Complex::new(-self.re, -self.im)
    }
}
