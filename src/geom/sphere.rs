//! Longitude/latitude conventions for points on the unit sphere.
//!
//! A pair `(θ, φ)` maps to `(sin φ cos θ, cos φ, sin φ sin θ)`: `φ` is the
//! polar angle measured from `+Y`, `θ` the azimuth in the XZ plane. The
//! renderer's equirectangular lookup uses the inverse of this mapping, so
//! both directions live here.

use std::f64::consts::{PI, TAU};

use super::complex::Complex;
use super::core::Vec3;

pub const PI_2: f64 = PI / 2.0;
pub const PI_3: f64 = PI / 3.0;
pub const PI_4: f64 = PI / 4.0;
pub const PI_6: f64 = PI / 6.0;
pub const PI_8: f64 = PI / 8.0;
pub const TWO_PI: f64 = TAU;

#[must_use]
pub fn degrees_to_radians(degrees: f64) -> f64 {
    degrees * PI / 180.0
}

#[must_use]
pub fn radians_to_degrees(radians: f64) -> f64 {
    radians * 180.0 / PI
}

/// Unit sphere point for longitude `theta` and polar angle `phi`.
#[must_use]
pub fn coord_on_sphere(theta: f64, phi: f64) -> Vec3 {
    let (sin_phi, cos_phi) = phi.sin_cos();
    let (sin_theta, cos_theta) = theta.sin_cos();
    Vec3::new(sin_phi * cos_theta, cos_phi, sin_phi * sin_theta)
}

/// Inverse of [`coord_on_sphere`]: `θ` in `[0, 2π)`, `φ` in `[0, π]`.
///
/// `dir` is expected to be a unit vector; `y` is clamped so rounding never
/// pushes `acos` out of its domain.
#[must_use]
pub fn equirectangular_coord(dir: Vec3) -> (f64, f64) {
    let mut theta = dir.z.atan2(dir.x);
    if theta < 0.0 {
        theta += TWO_PI;
    }
    (theta, dir.y.clamp(-1.0, 1.0).acos())
}

/// Sphere point for a pointer-space coordinate (`re` = longitude, `im` = latitude).
#[must_use]
pub fn sphere_point_from_pointer(pointer: Complex) -> Vec3 {
    coord_on_sphere(pointer.re, pointer.im)
}

/// Maps a device pixel to pointer space:
/// `longitude = 2π·x/width`, `latitude = π·|y/height − 1|`.
#[must_use]
pub fn pointer_from_pixel(x: f64, y: f64, width: f64, height: f64) -> Complex {
    Complex::new(TWO_PI * x / width, PI * (y / height - 1.0).abs())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn poles_and_equator() {
        let north = coord_on_sphere(0.0, 0.0);
        assert!((north.y - 1.0).abs() < 1e-12);

        let equator = coord_on_sphere(0.0, PI_2);
        assert!((equator.x - 1.0).abs() < 1e-12);
        assert!(equator.y.abs() < 1e-12);

        let quarter = coord_on_sphere(PI_2, PI_2);
        assert!((quarter.z - 1.0).abs() < 1e-12);
    }

    #[test]
    fn equirectangular_inverts_coord_on_sphere() {
        for &(theta, phi) in &[(0.3, 1.2), (4.0, 0.4), (PI, PI_2), (5.9, 2.9)] {
            let (t, p) = equirectangular_coord(coord_on_sphere(theta, phi));
            assert!((t - theta).abs() < 1e-9, "theta {theta} -> {t}");
            assert!((p - phi).abs() < 1e-9, "phi {phi} -> {p}");
        }
    }

    #[test]
    fn pixel_mapping() {
        let p = pointer_from_pixel(50.0, 0.0, 100.0, 50.0);
        assert!((p.re - PI).abs() < 1e-12);
        assert!((p.im - PI).abs() < 1e-12);

        let bottom = pointer_from_pixel(0.0, 50.0, 100.0, 50.0);
        assert!(bottom.re.abs() < 1e-12);
        assert!(bottom.im.abs() < 1e-12);
    }

    #[test]
    fn angle_conversions() {
        assert!((degrees_to_radians(180.0) - PI).abs() < 1e-12);
        assert!((radians_to_degrees(PI_2) - 90.0).abs() < 1e-12);
    }
}
