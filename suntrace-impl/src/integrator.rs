use crate::types::{ Color, Ray, V3 };
use crate::world::World;

use rand::RngCore;

/// Self-intersection guard for secondary and shadow rays.
const T_MIN: f64 = 0.001;

/// Flat attenuation applied to the indirect term when the sun is occluded.
const SUN_SHADOW_ATTENUATION: f64 = 0.3;

/// Recursive path tracer with next-event estimation for the sun and the
/// point lights.
///
/// The sun term is multiplicative: an unoccluded surface has its entire
/// indirect contribution tinted by the sun color, and an occluded one is
/// scaled by a flat shadow factor. Point lights are additive with
/// Lambertian falloff. Next-event estimation only applies to reflected
/// continuations; rays refracted through a dielectric must not be darkened
/// by a shadow test on the entry surface.
pub fn trace(ray: &Ray, depth: u32, world: &World, rng: &mut dyn RngCore) -> Color {
    if depth == 0 {
        return Color::ZERO;
    }

    let hit = match world.hit(ray, T_MIN, f64::INFINITY) {
        Some(hit) => hit,
        None => return world.sample_environment(ray.direction.unit()),
    };

    let material = world.material(hit.mat_id);
    let emitted = material.emitted(hit.uv.x(), hit.uv.y(), hit.p);

    let scatter = match material.scatter(ray, &hit, rng) {
        Some(scatter) => scatter,
        // Emissive surfaces and grazing metal reflections end the path
        None => return emitted,
    };

    let mut indirect = scatter.attenuation * trace(&scatter.ray, depth - 1, world, rng);

    let refracted = V3::dot(scatter.ray.direction, hit.normal) < 0.0;
    if !refracted {
        // Sun visibility from the hit point
        let sun_shadow_ray = Ray::new(hit.p, world.sun.direction);
        indirect = if world.hit(&sun_shadow_ray, T_MIN, f64::INFINITY).is_some() {
            indirect * SUN_SHADOW_ATTENUATION
        } else {
            indirect * world.sun.color
        };

        // Direct sampling of point lights
        for light in world.point_lights.iter() {
            let distance = light.distance_from(hit.p);
            let direction = light.direction_from(hit.p);
            let light_shadow_ray = Ray::new(hit.p, direction);
            if world.hit(&light_shadow_ray, T_MIN, distance - T_MIN).is_none() {
                let cos_theta = f64::max(0.0, V3::dot(hit.normal, direction));
                let falloff = light.intensity / (distance * distance);
                indirect = indirect + (light.color * cos_theta * falloff);
            }
        }
    }

    emitted + indirect
}
