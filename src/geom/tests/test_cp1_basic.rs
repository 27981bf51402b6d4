use super::sample_unit_vectors;
use crate::geom::{ProjectivePoint, Tolerance, Vec3, coord_on_sphere};

fn assert_round_trip(p: Vec3) {
    let back = ProjectivePoint::from_sphere_point(p).to_sphere_point();
    assert!(
        Tolerance::new(1e-9).approx_eq_vec3(back, p),
        "round trip of {p:?} gave {back:?}"
    );
}

#[test]
fn sphere_round_trip_covers_both_hemispheres() {
    let samples = sample_unit_vectors(100, 42);
    assert!(samples.iter().any(|p| p.y < 0.0));
    assert!(samples.iter().any(|p| p.y > 0.0));
    for p in samples {
        assert_round_trip(p);
    }
}

#[test]
fn sphere_round_trip_near_poles() {
    for phi in [1e-6, 1e-3, 0.1, std::f64::consts::PI - 0.1, std::f64::consts::PI - 1e-6] {
        for theta in [0.0, 1.3, 4.4] {
            assert_round_trip(coord_on_sphere(theta, phi));
        }
    }
    assert_round_trip(Vec3::Y);
    assert_round_trip(-Vec3::Y);
}

#[test]
fn hemisphere_branches_agree_up_to_scale() {
    // both formulas describe the same point; evaluate each on the equator
    let p = coord_on_sphere(0.7, std::f64::consts::FRAC_PI_2);
    let lower = ProjectivePoint::new(
        crate::geom::Complex::new(p.x, p.z),
        crate::geom::Complex::new(1.0 - p.y, 0.0),
    );
    let upper = ProjectivePoint::from_sphere_point(p);
    assert!(lower.projectively_eq(upper));
}
