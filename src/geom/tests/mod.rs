mod test_cp1_basic;
mod test_translate_basic;
mod test_zoom_basic;

use rand::Rng;

use crate::geom::Vec3;

/// Seeded unit vectors spread over both hemispheres.
pub(super) fn sample_unit_vectors(count: usize, seed: u64) -> Vec<Vec3> {
    let mut rng: rand::prelude::StdRng = rand::SeedableRng::seed_from_u64(seed);
    let mut out = Vec::with_capacity(count);
    while out.len() < count {
        let v = Vec3::new(
            rng.random_range(-1.0..1.0),
            rng.random_range(-1.0..1.0),
            rng.random_range(-1.0..1.0),
        );
        let len = v.length();
        if len > 1e-3 && len <= 1.0 {
            if let Some(unit) = v.normalized() {
                out.push(unit);
            }
        }
    }
    out
}

/// Angle between two unit vectors.
pub(super) fn angle_between(a: Vec3, b: Vec3) -> f64 {
    a.cross(b).length().atan2(a.dot(b))
}
