//! Möbius transformations derived from geometric constraints on the sphere.
//!
//! Every function here takes unit sphere points and returns an [`Sl2c`], or
//! [`MobiusError::DegenerateConfiguration`] when the points do not pin down
//! a transformation. No function hands back a matrix containing NaN.

use super::complex::Complex;
use super::core::{Tolerance, Vec3};
use super::cp1::{ProjectivePoint, two_triples_to_sl2c};
use super::sl2c::Sl2c;
use super::sphere::coord_on_sphere;
use crate::error::{MobiusError, MobiusResult};

/// Unit vector perpendicular to both `p` and `q`.
///
/// For antipodal inputs the cross product vanishes, so a fixed axis
/// perpendicular to `p` is used instead.
pub fn perpendicular(p: Vec3, q: Vec3) -> MobiusResult<Vec3> {
    let axis = if (p.dot(q) + 1.0).abs() < Tolerance::ANTIPODAL.eps {
        if p.dot(Vec3::X).abs() > Tolerance::PARALLEL.eps {
            return Ok(Vec3::Y);
        }
        p.cross(Vec3::X)
    } else {
        p.cross(q)
    };
    axis.normalized().ok_or(MobiusError::DegenerateConfiguration(
        "axis points do not span a plane",
    ))
}

/// Rotation by `theta` radians about the axis through `p` and `q`.
///
/// `q` is normally the antipode of `p`; coincident points are refused.
pub fn rotate_around_axis_pq(p: Vec3, q: Vec3, theta: f64) -> MobiusResult<Sl2c> {
    MobiusError::check_finite("theta", theta)?;
    if p.dot(q) >= Tolerance::COINCIDENT.eps {
        return Err(MobiusError::DegenerateConfiguration(
            "axis points should not be in the same place",
        ));
    }

    let r = perpendicular(p, q)?;
    let standard = two_triples_to_sl2c(
        ProjectivePoint::from_sphere_point(p),
        ProjectivePoint::from_sphere_point(q),
        ProjectivePoint::from_sphere_point(r),
        ProjectivePoint::ZERO_ONE,
        ProjectivePoint::ONE_ZERO,
        ProjectivePoint::ONE_ONE,
    )?;

    // rotation about the 0 ↔ ∞ axis
    let spin = Sl2c::diagonal(Complex::cis(theta), Complex::ONE);
    finish(standard.checked_inverse()?.mult(spin).mult(standard))
}

/// Rotation by `theta` radians about the axis through `p` and its antipode.
pub fn rotate_around_axis(p: Vec3, theta: f64) -> MobiusResult<Sl2c> {
    rotate_around_axis_pq(p, -p, theta)
}

/// The transformation fixing `p` and `q` and sending `r1` to `r2`.
pub fn translate_along_axis(p: Vec3, q: Vec3, r1: Vec3, r2: Vec3) -> MobiusResult<Sl2c> {
    if p.dot(q) >= Tolerance::COINCIDENT.eps {
        return Err(MobiusError::DegenerateConfiguration(
            "axis points should not be in the same place",
        ));
    }
    let cp_p = ProjectivePoint::from_sphere_point(p);
    let cp_q = ProjectivePoint::from_sphere_point(q);
    finish(two_triples_to_sl2c(
        cp_p,
        cp_q,
        ProjectivePoint::from_sphere_point(r1),
        cp_p,
        cp_q,
        ProjectivePoint::from_sphere_point(r2),
    )?)
}

/// Rotation of the sphere carrying `p` to `q` about their common
/// perpendicular. Identity when the points already coincide.
pub fn rotate_sphere_points_pq(p: Vec3, q: Vec3) -> MobiusResult<Sl2c> {
    if p.dot(q) > 1.0 - Tolerance::ANTIPODAL.eps {
        return Ok(Sl2c::IDENTITY);
    }
    let r = ProjectivePoint::from_sphere_point(perpendicular(p, q)?);
    finish(two_triples_to_sl2c(
        ProjectivePoint::from_sphere_point(p),
        ProjectivePoint::from_sphere_point(-p),
        r,
        ProjectivePoint::from_sphere_point(q),
        ProjectivePoint::from_sphere_point(-q),
        r,
    )?)
}

/// Complex dilation by `zoom_factor` centred on `p`.
///
/// `p` is rotated onto the chart pole, where `diag(k, 1)` scales the local
/// coordinate `1/z` by `1/k`, and rotated back.
pub fn zoom_in(p: Vec3, zoom_factor: Complex) -> MobiusResult<Sl2c> {
    MobiusError::check_finite("zoom_factor.re", zoom_factor.re)?;
    MobiusError::check_finite("zoom_factor.im", zoom_factor.im)?;
    if zoom_factor.length_sq() == 0.0 {
        return Err(MobiusError::DegenerateConfiguration("zoom factor is zero"));
    }

    let rot = rotate_sphere_points_pq(p, coord_on_sphere(0.0, 0.0))?;
    let scale = Sl2c::diagonal(zoom_factor, Complex::ONE);
    finish(rot.checked_inverse()?.mult(scale).mult(rot))
}

fn finish(m: Sl2c) -> MobiusResult<Sl2c> {
    if m.has_nan() || !m.is_finite() {
        return Err(MobiusError::DegenerateConfiguration(
            "transformation matrix is not finite",
        ));
    }
    if m.is_singular() {
        return Err(MobiusError::DegenerateConfiguration(
            "transformation matrix is singular",
        ));
    }
    Ok(m)
}
