//! Complex numbers with the division semantics the Möbius engine relies on.
//!
//! Arithmetic is delegated to `num_complex::Complex64`. The one deliberate
//! difference is division by a number with zero squared magnitude, which
//! yields [`Complex::INFINITY`] instead of NaN.

use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use super::core::Tolerance;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Complex {
    pub re: f64,
    pub im: f64,
}

impl Complex {
    pub const ZERO: Self = Self::new(0.0, 0.0);
    pub const ONE: Self = Self::new(1.0, 0.0);
    pub const I: Self = Self::new(0.0, 1.0);
    pub const MINUS_ONE: Self = Self::new(-1.0, 0.0);
    /// Sentinel produced by division by zero.
    pub const INFINITY: Self = Self::new(f64::INFINITY, f64::INFINITY);

    #[must_use]
    pub const fn new(re: f64, im: f64) -> Self {
        Self { re, im }
    }

    /// Unit complex number `cos θ + i·sin θ`.
    #[must_use]
    pub fn cis(theta: f64) -> Self {
        Complex64::cis(theta).into()
    }

    #[must_use]
    pub const fn conjugate(self) -> Self {
        Self::new(self.re, -self.im)
    }

    #[must_use]
    pub const fn scale(self, k: f64) -> Self {
        Self::new(self.re * k, self.im * k)
    }

    #[must_use]
    pub fn length(self) -> f64 {
        Complex64::from(self).norm()
    }

    #[must_use]
    pub fn length_sq(self) -> f64 {
        Complex64::from(self).norm_sqr()
    }

    #[must_use]
    pub fn distance(a: Self, b: Self) -> f64 {
        (a - b).length()
    }

    /// Principal square root.
    #[must_use]
    pub fn sqrt(self) -> Self {
        Complex64::from(self).sqrt().into()
    }

    #[must_use]
    pub fn is_infinity(self) -> bool {
        self.re == f64::INFINITY || self.im == f64::INFINITY
    }

    #[must_use]
    pub fn is_zero(self) -> bool {
        self.re == 0.0 && self.im == 0.0
    }

    #[must_use]
    pub fn has_nan(self) -> bool {
        self.re.is_nan() || self.im.is_nan()
    }

    #[must_use]
    pub fn is_finite(self) -> bool {
        self.re.is_finite() && self.im.is_finite()
    }

    /// Approximate equality: squared distance below [`Tolerance::COMPLEX_EQ`].
    #[must_use]
    pub fn approx_eq(self, other: Self) -> bool {
        let re = self.re - other.re;
        let im = self.im - other.im;
        re * re + im * im < Tolerance::COMPLEX_EQ.eps
    }

    #[must_use]
    pub const fn linear_array(self) -> [f64; 2] {
        [self.re, self.im]
    }
}

impl From<Complex64> for Complex {
    fn from(value: Complex64) -> Self {
        Self::new(value.re, value.im)
    }
}

impl From<Complex> for Complex64 {
    fn from(value: Complex) -> Self {
        Complex64::new(value.re, value.im)
    }
}

impl From<f64> for Complex {
    fn from(value: f64) -> Self {
        Self::new(value, 0.0)
    }
}

impl Add for Complex {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        (Complex64::from(self) + Complex64::from(rhs)).into()
    }
}

impl Sub for Complex {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self::Output {
        (Complex64::from(self) - Complex64::from(rhs)).into()
    }
}

impl Mul for Complex {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self::Output {
        (Complex64::from(self) * Complex64::from(rhs)).into()
    }
}

impl Div for Complex {
    type Output = Self;
    fn div(self, rhs: Self) -> Self::Output {
        if rhs.length_sq() == 0.0 {
            return Self::INFINITY;
        }
        (Complex64::from(self) / Complex64::from(rhs)).into()
    }
}

impl Neg for Complex {
    type Output = Self;
    fn neg(self) -> Self::Output {
        Self::new(-self.re, -self.im)
    }
}

impl fmt::Display for Complex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.im < 0.0 {
            write!(f, "{}-{}i", self.re, -self.im)
        } else {
            write!(f, "{}+{}i", self.re, self.im)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Complex;

    #[test]
    fn field_arithmetic() {
        let a = Complex::new(1.0, 2.0);
        let b = Complex::new(3.0, -1.0);

        assert_eq!(a + b, Complex::new(4.0, 1.0));
        assert_eq!(a - b, Complex::new(-2.0, 3.0));
        assert_eq!(a * b, Complex::new(5.0, 5.0));
        assert!(((a * b) / b).approx_eq(a));
        assert_eq!(Complex::I * Complex::I, Complex::MINUS_ONE);
    }

    #[test]
    fn division_by_zero_is_infinity_sentinel() {
        let q = Complex::ONE / Complex::ZERO;
        assert!(q.is_infinity());
        assert!(!q.has_nan());
        assert_eq!(q, Complex::INFINITY);
    }

    #[test]
    fn approx_eq_uses_squared_distance() {
        let a = Complex::new(1.0, 1.0);
        assert!(a.approx_eq(Complex::new(1.0005, 1.0)));
        assert!(!a.approx_eq(Complex::new(1.01, 1.0)));
    }

    #[test]
    fn principal_sqrt() {
        let r = Complex::new(-4.0, 0.0).sqrt();
        assert!(r.approx_eq(Complex::new(0.0, 2.0)));
        let s = Complex::new(3.0, 4.0).sqrt();
        assert!(s.approx_eq(Complex::new(2.0, 1.0)));
        let t = Complex::new(3.0, -4.0).sqrt();
        assert!(t.approx_eq(Complex::new(2.0, -1.0)));
    }

    #[test]
    fn has_nan_detects_either_component() {
        assert!(Complex::new(f64::NAN, 0.0).has_nan());
        assert!(Complex::new(0.0, f64::NAN).has_nan());
        assert!(!Complex::INFINITY.has_nan());
    }

    #[test]
    fn cis_is_unit_length() {
        let c = Complex::cis(std::f64::consts::FRAC_PI_2);
        assert!(c.approx_eq(Complex::I));
        assert!((c.length() - 1.0).abs() < 1e-12);
    }
}
