use crate::shapes::HitRecord;
use crate::types::{ Color, Ray, V3 };
use crate::util::{ random_in_unit_sphere, random_unit_vector };

use rand::{ Rng, RngCore };

/// A material's decision to continue a path.
pub struct Scatter {
    pub ray: Ray,
    pub attenuation: Color,
}

/// Closed set of surface materials.
#[derive(Clone, Debug)]
pub enum Material {
    Lambertian(Lambertian),
    Metal(Metal),
    Dielectric(Dielectric),
    Emissive(Emissive),
}

impl Material {
    pub fn scatter(&self, ray: &Ray, hit: &HitRecord, rng: &mut dyn RngCore) -> Option<Scatter> {
        match self {
            Material::Lambertian(m) => m.scatter(hit, rng),
            Material::Metal(m) => m.scatter(ray, hit, rng),
            Material::Dielectric(m) => m.scatter(ray, hit, rng),
            Material::Emissive(_) => None,
        }
    }

    /// Self-emission at a surface point, independent of incoming light.
    pub fn emitted(&self, _u: f64, _v: f64, _p: V3) -> Color {
        match self {
            Material::Emissive(m) => m.color,
            _ => Color::ZERO,
        }
    }
}

//
// Lambertian
//

#[derive(Clone, Debug)]
pub struct Lambertian {
    pub albedo: Color,
}

impl Lambertian {
    pub fn new(albedo: Color) -> Material {
        Material::Lambertian(Lambertian { albedo })
    }

    fn scatter(&self, hit: &HitRecord, rng: &mut dyn RngCore) -> Option<Scatter> {
        let mut direction = hit.normal + random_unit_vector(rng);
        if direction.near_zero() {
            // The sampled vector cancelled the normal almost exactly
            direction = hit.normal;
        }
        Some(Scatter {
            ray: Ray::new(hit.p, direction),
            attenuation: self.albedo,
        })
    }
}

//
// Metal
//

#[derive(Clone, Debug)]
pub struct Metal {
    pub albedo: Color,
    pub fuzz: f64,
}

impl Metal {
    pub fn new(albedo: Color, fuzz: f64) -> Material {
        Material::Metal(Metal { albedo, fuzz: fuzz.clamp(0.0, 1.0) })
    }

    fn scatter(&self, ray: &Ray, hit: &HitRecord, rng: &mut dyn RngCore) -> Option<Scatter> {
        let reflected = reflect(ray.direction.unit(), hit.normal);
        let scattered = reflected + (random_in_unit_sphere(rng) * self.fuzz);
        if V3::dot(scattered, hit.normal) > 0.0 {
            Some(Scatter {
                ray: Ray::new(hit.p, scattered),
                attenuation: self.albedo,
            })
        } else {
            // Fuzz pushed the reflection below the surface
            None
        }
    }
}

//
// Dielectric
//

#[derive(Clone, Debug)]
pub struct Dielectric {
    pub ref_index: f64,
}

impl Dielectric {
    pub fn new(ref_index: f64) -> Material {
        Material::Dielectric(Dielectric { ref_index })
    }

    fn scatter(&self, ray: &Ray, hit: &HitRecord, rng: &mut dyn RngCore) -> Option<Scatter> {
        let refraction_ratio = if hit.front_face { 1.0 / self.ref_index } else { self.ref_index };

        let unit_direction = ray.direction.unit();
        let cos_theta = f64::min(V3::dot(-unit_direction, hit.normal), 1.0);
        let sin_theta = (1.0 - cos_theta * cos_theta).sqrt();

        let cannot_refract = refraction_ratio * sin_theta > 1.0;
        let direction =
            if cannot_refract || schlick_reflectance(cos_theta, refraction_ratio) > rng.gen::<f64>() {
                reflect(unit_direction, hit.normal)
            } else {
                refract(unit_direction, hit.normal, refraction_ratio)
            };

        Some(Scatter {
            ray: Ray::new(hit.p, direction),
            attenuation: Color::ONE,
        })
    }
}

//
// Emissive
//

#[derive(Clone, Debug)]
pub struct Emissive {
    pub color: Color,
}

impl Emissive {
    pub fn new(color: Color) -> Material {
        Material::Emissive(Emissive { color })
    }
}

fn reflect(incident: V3, normal: V3) -> V3 {
    incident - (normal * V3::dot(incident, normal) * 2.0)
}

fn refract(incident: V3, normal: V3, ni_over_nt: f64) -> V3 {
    let cos_theta = f64::min(V3::dot(-incident, normal), 1.0);
    let out_perp = (incident + normal * cos_theta) * ni_over_nt;
    let out_parallel = normal * -(1.0 - out_perp.length_squared()).abs().sqrt();
    out_perp + out_parallel
}

fn schlick_reflectance(cosine: f64, ref_ratio: f64) -> f64 {
    let r0 = (1.0 - ref_ratio) / (1.0 + ref_ratio);
    let r0 = r0 * r0;
    r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
}

#[cfg(test)]
mod material_tests {
    use rand::SeedableRng;
    use rand_xorshift::XorShiftRng;

    use crate::shapes::{ HitRecord, MatId };
    use crate::types::{ Ray, V2, V3 };
    use super::*;

    fn hit_facing_up() -> HitRecord {
        let ray = Ray::new(V3(0.0, 1.0, 0.0), V3(0.0, -1.0, 0.0));
        HitRecord::new(&ray, 1.0, V3::ZERO, V3::POS_Y, V2::ZERO, MatId(0))
    }

    #[test]
    fn lambertian_always_scatters_into_the_upper_hemisphere() {
        let mat = Lambertian::new(V3(0.5, 0.5, 0.5));
        let mut rng = XorShiftRng::seed_from_u64(1);
        let ray = Ray::new(V3(0.0, 1.0, 0.0), V3(0.0, -1.0, 0.0));
        for _ in 0..100 {
            let scatter = mat.scatter(&ray, &hit_facing_up(), &mut rng).expect("lambertian scatters");
            assert!(V3::dot(scatter.ray.direction, V3::POS_Y) > -1.0e-8);
            assert_eq!(scatter.attenuation, V3(0.5, 0.5, 0.5));
        }
    }

    #[test]
    fn smooth_metal_reflects_about_the_normal() {
        let mat = Metal::new(V3(0.9, 0.9, 0.9), 0.0);
        let mut rng = XorShiftRng::seed_from_u64(1);
        let incident = Ray::new(V3(-1.0, 1.0, 0.0), V3(1.0, -1.0, 0.0));
        let hit = HitRecord::new(&incident, 1.0, V3::ZERO, V3::POS_Y, V2::ZERO, MatId(0));
        let scatter = mat.scatter(&incident, &hit, &mut rng).expect("mirror reflection");
        let expected = V3(1.0, 1.0, 0.0).unit();
        assert!((scatter.ray.direction - expected).length() < 1.0e-12);
    }

    #[test]
    fn metal_rejects_grazing_scatter_into_the_surface() {
        // Full fuzz pointed almost parallel to the surface will
        // sometimes fold the reflection under the normal
        let mat = Metal::new(V3::ONE, 1.0);
        let mut rng = XorShiftRng::seed_from_u64(5);
        let incident = Ray::new(V3(-10.0, 0.001, 0.0), V3(10.0, -0.001, 0.0));
        let hit = HitRecord::new(&incident, 1.0, V3::ZERO, V3::POS_Y, V2::ZERO, MatId(0));
        let rejected = (0..200).any(|_| mat.scatter(&incident, &hit, &mut rng).is_none());
        assert!(rejected);
    }

    #[test]
    fn dielectric_attenuation_is_white() {
        let mat = Dielectric::new(1.5);
        let mut rng = XorShiftRng::seed_from_u64(1);
        let ray = Ray::new(V3(0.0, 1.0, 0.0), V3(0.0, -1.0, 0.0));
        let scatter = mat.scatter(&ray, &hit_facing_up(), &mut rng).expect("dielectric scatters");
        assert_eq!(scatter.attenuation, V3::ONE);
    }

    #[test]
    fn total_internal_reflection_reflects() {
        let mat = Dielectric::new(1.5);
        let mut rng = XorShiftRng::seed_from_u64(1);
        // Grazing ray from inside the dense medium
        let incident = Ray::new(V3(-1.0, 0.1, 0.0), V3(1.0, -0.1, 0.0));
        let hit = HitRecord::new(&incident, 1.0, V3::ZERO, -V3::POS_Y, V2::ZERO, MatId(0));
        assert!(!hit.front_face);
        let scatter = mat.scatter(&incident, &hit, &mut rng).expect("dielectric scatters");
        // Reflected: bounces back to the incident side of the surface
        assert!(scatter.ray.direction.y() > 0.0);
    }

    #[test]
    fn emissive_declines_to_scatter() {
        let mat = Emissive::new(V3(5.0, 5.0, 5.0));
        let mut rng = XorShiftRng::seed_from_u64(1);
        let ray = Ray::new(V3(0.0, 1.0, 0.0), V3(0.0, -1.0, 0.0));
        assert!(mat.scatter(&ray, &hit_facing_up(), &mut rng).is_none());
        assert_eq!(mat.emitted(0.0, 0.0, V3::ZERO), V3(5.0, 5.0, 5.0));
    }
}
