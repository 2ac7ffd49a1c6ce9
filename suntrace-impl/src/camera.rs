use crate::types::{ Ray, V3 };
use crate::util::{ deg_to_rad, random_in_unit_disk };

use rand::RngCore;

/// Pinhole / thin-lens ray generator.
///
/// The viewport is placed at `focus_dist` along the view direction; with a
/// non-zero aperture the ray origin is jittered on the lens disk, which
/// blurs everything off the focus plane.
pub struct Camera {
    lower_left_corner: V3,
    horizontal: V3,
    vertical: V3,
    origin: V3,
    u: V3,
    v: V3,
    lens_radius: f64,
}

impl Camera {
    pub fn new(look_from: V3, look_at: V3, v_up: V3, v_fov: f64, aspect_ratio: f64, aperture: f64, focus_dist: f64) -> Camera {
        let theta = deg_to_rad(v_fov);
        let half_height = (theta / 2.0).tan();
        let half_width = aspect_ratio * half_height;

        // Camera orthonormal basis
        let w = (look_from - look_at).unit(); // Back towards the camera
        let u = V3::cross(v_up, w).unit();    // Camera right
        let v = V3::cross(w, u);              // Camera up

        Camera {
            lower_left_corner: look_from
                - (u * half_width * focus_dist)
                - (v * half_height * focus_dist)
                - (w * focus_dist),
            horizontal: u * (2.0 * half_width * focus_dist),
            vertical: v * (2.0 * half_height * focus_dist),
            origin: look_from,
            u,
            v,
            lens_radius: aperture / 2.0,
        }
    }

    /// Ray through viewport coordinates `(s, t)` in `[0, 1]²`,
    /// measured from the lower-left corner.
    pub fn get_ray(&self, s: f64, t: f64, rng: &mut dyn RngCore) -> Ray {
        let offset = if self.lens_radius > 0.0 {
            let rd = random_in_unit_disk(rng) * self.lens_radius;
            (self.u * rd.x()) + (self.v * rd.y())
        } else {
            V3::ZERO
        };
        let origin = self.origin + offset;
        let direction = self.lower_left_corner
            + (self.horizontal * s)
            + (self.vertical * t)
            - self.origin
            - offset;
        Ray::new(origin, direction)
    }
}
