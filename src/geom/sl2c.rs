//! 2×2 complex matrices acting on CP¹ by Möbius transformation.

use std::fmt;
use std::ops::Mul;

use super::complex::Complex;
use super::core::Tolerance;
use crate::error::{MobiusError, MobiusResult};

/// The matrix `[[a, b], [c, d]]`.
///
/// Matrices are only meaningful up to a nonzero complex scale; nothing here
/// normalises the determinant to one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sl2c {
    pub a: Complex,
    pub b: Complex,
    pub c: Complex,
    pub d: Complex,
}

impl Sl2c {
    pub const IDENTITY: Self = Self::new(Complex::ONE, Complex::ZERO, Complex::ZERO, Complex::ONE);

    #[must_use]
    pub const fn new(a: Complex, b: Complex, c: Complex, d: Complex) -> Self {
        Self { a, b, c, d }
    }

    /// `diag(a, d)`.
    #[must_use]
    pub const fn diagonal(a: Complex, d: Complex) -> Self {
        Self::new(a, Complex::ZERO, Complex::ZERO, d)
    }

    /// Matrix product `self · m`.
    #[must_use]
    pub fn mult(self, m: Self) -> Self {
        Self::new(
            self.a * m.a + self.b * m.c,
            self.a * m.b + self.b * m.d,
            self.c * m.a + self.d * m.c,
            self.c * m.b + self.d * m.d,
        )
    }

    #[must_use]
    pub fn determinant(self) -> Complex {
        self.a * self.d - self.b * self.c
    }

    #[must_use]
    pub fn trace(self) -> Complex {
        self.a + self.d
    }

    #[must_use]
    pub fn scale(self, k: Complex) -> Self {
        Self::new(self.a * k, self.b * k, self.c * k, self.d * k)
    }

    /// `adj(M) / det(M)`.
    ///
    /// A zero determinant turns into the infinity sentinel and the result is
    /// full of infinities and NaNs. Use [`Sl2c::checked_inverse`] where that
    /// must not leak.
    #[must_use]
    pub fn inverse(self) -> Self {
        Self::new(self.d, -self.b, -self.c, self.a).scale(Complex::ONE / self.determinant())
    }

    /// Inverse that refuses numerically singular matrices.
    pub fn checked_inverse(self) -> MobiusResult<Self> {
        if self.is_singular() {
            return Err(MobiusError::DegenerateConfiguration(
                "matrix determinant is numerically zero",
            ));
        }
        let inv = self.inverse();
        if !inv.is_finite() {
            return Err(MobiusError::DegenerateConfiguration(
                "matrix inverse is not finite",
            ));
        }
        Ok(inv)
    }

    /// True when `|det|` is negligible compared to the size of the entries.
    #[must_use]
    pub fn is_singular(self) -> bool {
        let det = self.determinant().length();
        let magnitude = self.a.length() * self.d.length() + self.b.length() * self.c.length();
        !(det > Tolerance::SINGULAR.relative_to(magnitude))
    }

    #[must_use]
    pub fn has_nan(self) -> bool {
        self.a.has_nan() || self.b.has_nan() || self.c.has_nan() || self.d.has_nan()
    }

    #[must_use]
    pub fn is_finite(self) -> bool {
        self.a.is_finite() && self.b.is_finite() && self.c.is_finite() && self.d.is_finite()
    }

    /// Component-wise approximate equality.
    #[must_use]
    pub fn approx_eq(self, other: Self) -> bool {
        self.a.approx_eq(other.a)
            && self.b.approx_eq(other.b)
            && self.c.approx_eq(other.c)
            && self.d.approx_eq(other.d)
    }

    /// Approximate equality up to a common nonzero scale, i.e. equality of
    /// the Möbius transformations rather than of the matrices.
    #[must_use]
    pub fn projectively_eq(self, other: Self) -> bool {
        let entries = [
            (self.a, other.a),
            (self.b, other.b),
            (self.c, other.c),
            (self.d, other.d),
        ];
        let Some(&(pivot_self, pivot_other)) = entries
            .iter()
            .max_by(|l, r| l.0.length_sq().total_cmp(&r.0.length_sq()))
        else {
            return false;
        };
        if pivot_other.length_sq() == 0.0 {
            return false;
        }
        let k = pivot_self / pivot_other;
        self.approx_eq(other.scale(k))
    }

    /// Renderer layout: `a.re, a.im, b.re, b.im, c.re, c.im, d.re, d.im`.
    #[must_use]
    pub const fn linear_array(self) -> [f64; 8] {
        [
            self.a.re, self.a.im, self.b.re, self.b.im, self.c.re, self.c.im, self.d.re, self.d.im,
        ]
    }
}

impl Default for Sl2c {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for Sl2c {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self::Output {
        self.mult(rhs)
    }
}

impl fmt::Display for Sl2c {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[[{}, {}], [{}, {}]]", self.a, self.b, self.c, self.d)
    }
}
