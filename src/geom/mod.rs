mod complex;
mod core;
mod cp1;
mod primitives;
mod sl2c;
mod sphere;

pub use complex::Complex;
pub use core::{Tolerance, Vec3, cross, dot};
pub use cp1::{ProjectivePoint, inf_zero_one_to_triple, two_triples_to_sl2c};
pub use primitives::{
    perpendicular, rotate_around_axis, rotate_around_axis_pq, rotate_sphere_points_pq,
    translate_along_axis, zoom_in,
};
pub use sl2c::Sl2c;
pub use sphere::{
    PI_2, PI_3, PI_4, PI_6, PI_8, TWO_PI, coord_on_sphere, degrees_to_radians,
    equirectangular_coord, pointer_from_pixel, radians_to_degrees, sphere_point_from_pointer,
};

#[cfg(test)]
mod tests;
