use super::angle_between;
use crate::geom::{
    Complex, PI_2, ProjectivePoint, Sl2c, Tolerance, Vec3, coord_on_sphere, perpendicular, zoom_in,
};

fn apply(m: Sl2c, v: Vec3) -> Vec3 {
    ProjectivePoint::from_sphere_point(v)
        .apply_transform(m)
        .to_sphere_point()
}

/// Ratio between the angular distance to `p` after and before the map, for a
/// point `delta` radians away from `p`.
fn local_scale(m: Sl2c, p: Vec3, delta: f64) -> f64 {
    let t = perpendicular(p, Vec3::new(0.3, 0.5, -0.8).normalized().expect("unit"))
        .expect("tangent");
    let near = (p.scale(delta.cos()) + t.scale(delta.sin()))
        .normalized()
        .expect("unit");
    angle_between(p, apply(m, near)) / angle_between(p, near)
}

#[test]
fn zoom_fixes_its_centre() {
    for p in [
        coord_on_sphere(1.0, 1.2),
        coord_on_sphere(4.0, 2.8),
        coord_on_sphere(0.0, PI_2),
        -Vec3::Y,
    ] {
        let m = zoom_in(p, Complex::new(2.0, 0.0)).expect("zoom");
        assert!(Tolerance::new(1e-9).approx_eq_vec3(apply(m, p), p));
    }
}

#[test]
fn zoom_scales_neighbourhood_by_inverse_factor() {
    let p = coord_on_sphere(1.0, 1.2);
    for k in [2.0, 0.5, 3.0] {
        let m = zoom_in(p, Complex::new(k, 0.0)).expect("zoom");
        let scale = local_scale(m, p, 1e-4);
        assert!((scale - 1.0 / k).abs() < 1e-3, "k = {k}: local scale {scale}");
    }
}

#[test]
fn zoom_at_pole_skips_rotation() {
    let m = zoom_in(Vec3::Y, Complex::new(2.0, 0.0)).expect("zoom");
    assert!(m.approx_eq(Sl2c::diagonal(Complex::new(2.0, 0.0), Complex::ONE)));
}

#[test]
fn unit_zoom_is_identity() {
    let m = zoom_in(coord_on_sphere(2.0, 0.7), Complex::ONE).expect("zoom");
    assert!(m.projectively_eq(Sl2c::IDENTITY));
}
