//! Points of the complex projective line and the three-point solvers.
//!
//! The sphere chart is a stereographic projection from the `+Y` pole, split
//! per hemisphere so that neither branch divides by a vanishing coordinate.

use super::complex::Complex;
use super::core::{Tolerance, Vec3};
use super::sl2c::Sl2c;
use crate::error::{MobiusError, MobiusResult};

/// Homogeneous point `(z : w)`. Not normalised: `(kz : kw)` is the same point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectivePoint {
    pub z: Complex,
    pub w: Complex,
}

impl ProjectivePoint {
    /// `(0 : 1)`, the point 0.
    pub const ZERO_ONE: Self = Self::new(Complex::ZERO, Complex::ONE);
    /// `(1 : 0)`, the point at infinity.
    pub const ONE_ZERO: Self = Self::new(Complex::ONE, Complex::ZERO);
    /// `(1 : 1)`, the point 1.
    pub const ONE_ONE: Self = Self::new(Complex::ONE, Complex::ONE);

    #[must_use]
    pub const fn new(z: Complex, w: Complex) -> Self {
        Self { z, w }
    }

    /// Möbius action `(a·z + b·w : c·z + d·w)`.
    #[must_use]
    pub fn apply_transform(self, m: Sl2c) -> Self {
        Self::new(m.a * self.z + m.b * self.w, m.c * self.z + m.d * self.w)
    }

    /// Image of a unit sphere point.
    #[must_use]
    pub fn from_sphere_point(p: Vec3) -> Self {
        if p.y < 0.0 {
            Self::new(Complex::new(p.x, p.z), Complex::new(1.0 - p.y, 0.0))
        } else {
            Self::new(Complex::new(1.0 + p.y, 0.0), Complex::new(p.x, -p.z))
        }
    }

    /// Inverse of [`ProjectivePoint::from_sphere_point`].
    ///
    /// Works from `z / w` when `w` dominates and from `conj(w / z)` otherwise,
    /// which keeps both branches away from division by a small number.
    #[must_use]
    pub fn to_sphere_point(self) -> Vec3 {
        if self.w.length() > self.z.length() {
            let c = self.z / self.w;
            let denom = 1.0 + c.length_sq();
            Vec3::new(2.0 * c.re / denom, (denom - 2.0) / denom, 2.0 * c.im / denom)
        } else {
            let c = (self.w / self.z).conjugate();
            let denom = 1.0 + c.length_sq();
            Vec3::new(2.0 * c.re / denom, (2.0 - denom) / denom, 2.0 * c.im / denom)
        }
    }

    #[must_use]
    pub fn has_nan(self) -> bool {
        self.z.has_nan() || self.w.has_nan()
    }

    /// Approximate equality as points of CP¹, i.e. up to scale.
    #[must_use]
    pub fn projectively_eq(self, other: Self) -> bool {
        let cross = self.z * other.w - self.w * other.z;
        let scale = (self.z.length_sq() + self.w.length_sq())
            * (other.z.length_sq() + other.w.length_sq());
        cross.length_sq() <= Tolerance::COMPLEX_EQ.eps_squared() * scale
    }
}

/// The transformation sending `∞ → p`, `0 → q` and `1 → r`.
///
/// Fails with [`MobiusError::DegenerateConfiguration`] when two of the three
/// target points coincide.
pub fn inf_zero_one_to_triple(
    p: ProjectivePoint,
    q: ProjectivePoint,
    r: ProjectivePoint,
) -> MobiusResult<Sl2c> {
    let m = Sl2c::new(p.z, q.z, p.w, q.w);
    let m_inv = m
        .checked_inverse()
        .map_err(|_| MobiusError::DegenerateConfiguration("first two frame points coincide"))?;

    let v = r.apply_transform(m_inv);
    if v.has_nan() {
        return Err(MobiusError::DegenerateConfiguration(
            "frame scale factors are undefined",
        ));
    }
    let (vz, vw) = (v.z.length(), v.w.length());
    if vz.min(vw) <= Tolerance::SINGULAR.relative_to(vz.max(vw)) {
        return Err(MobiusError::DegenerateConfiguration(
            "third frame point coincides with one of the first two",
        ));
    }

    Ok(Sl2c::new(v.z * p.z, v.w * q.z, v.z * p.w, v.w * q.w))
}

/// The transformation sending `a1 → a2`, `b1 → b2` and `c1 → c2`.
pub fn two_triples_to_sl2c(
    a1: ProjectivePoint,
    b1: ProjectivePoint,
    c1: ProjectivePoint,
    a2: ProjectivePoint,
    b2: ProjectivePoint,
    c2: ProjectivePoint,
) -> MobiusResult<Sl2c> {
    let source = inf_zero_one_to_triple(a1, b1, c1)?;
    let target = inf_zero_one_to_triple(a2, b2, c2)?;
    Ok(target.mult(source.checked_inverse()?))
}
