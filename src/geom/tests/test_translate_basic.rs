use crate::geom::{PI_2, ProjectivePoint, Tolerance, coord_on_sphere, translate_along_axis};

#[test]
fn translate_fixes_axis_and_moves_reference() {
    let p = coord_on_sphere(1.0, 0.3);
    let q = coord_on_sphere(1.0, 2.9);
    let r1 = coord_on_sphere(1.0, PI_2);
    let r2 = coord_on_sphere(1.0, PI_2 + 0.4);

    let m = translate_along_axis(p, q, r1, r2).expect("translate");
    let image = |v| {
        ProjectivePoint::from_sphere_point(v)
            .apply_transform(m)
            .to_sphere_point()
    };
    let tol = Tolerance::new(1e-9);
    assert!(tol.approx_eq_vec3(image(p), p));
    assert!(tol.approx_eq_vec3(image(q), q));
    assert!(tol.approx_eq_vec3(image(r1), r2));
}

#[test]
fn translate_without_motion_is_identity() {
    let p = coord_on_sphere(0.0, 0.2);
    let q = coord_on_sphere(3.0, 2.2);
    let r = coord_on_sphere(1.5, PI_2);
    let m = translate_along_axis(p, q, r, r).expect("translate");
    assert!(m.projectively_eq(crate::geom::Sl2c::IDENTITY));
}

#[test]
fn reference_on_axis_is_degenerate() {
    let p = coord_on_sphere(0.0, 0.2);
    let q = coord_on_sphere(3.0, 2.2);
    let r = coord_on_sphere(1.5, PI_2);
    assert!(translate_along_axis(p, q, p, r).is_err());
}
