use crate::aabb::AABB;
use crate::shapes::{ HitRecord, MatId };
use crate::types::{ Ray, V2, V3 };

fn intersect_sphere(ray: &Ray, center: V3, radius: f64) -> Option<[f64; 2]> {
    let oc = ray.origin - center;
    let a = V3::dot(ray.direction, ray.direction);
    let b = V3::dot(oc, ray.direction);
    let c = V3::dot(oc, oc) - radius * radius;
    let discriminant = b * b - a * c;
    if discriminant > 0.0 {
        // A ray which intersects the sphere necessarily does so twice
        let t0 = (-b - discriminant.sqrt()) / a;
        let t1 = (-b + discriminant.sqrt()) / a;
        return Some([t0, t1]);
    }
    None
}

/// Spherical UV from a point on the unit sphere:
/// u sweeps the azimuth, v the polar angle.
fn sphere_uv(p: V3) -> V2 {
    let theta = (-p.y()).acos();
    let phi = (-p.z()).atan2(p.x()) + std::f64::consts::PI;
    V2(phi / (2.0 * std::f64::consts::PI), theta / std::f64::consts::PI)
}

pub struct Sphere {
    center: V3,
    radius: f64,
    mat_id: MatId,
}

impl Sphere {
    pub fn new(center: V3, radius: f64, mat_id: MatId) -> Self {
        Sphere { center, radius, mat_id }
    }

    pub fn center(&self) -> V3 {
        self.center
    }

    pub fn hit(&self, ray: &Ray, t_min: f64, t_max: f64) -> Option<HitRecord> {
        let ts = intersect_sphere(ray, self.center, self.radius)?;
        // Prefer the near root; fall back to the far root when the
        // near one is outside the search interval
        let t = ts.into_iter().find(|&t| t_min < t && t < t_max)?;
        let p = ray.point_at_parameter(t);
        let outward_normal = (p - self.center) / self.radius;
        let uv = sphere_uv(outward_normal);
        Some(HitRecord::new(ray, t, p, outward_normal, uv, self.mat_id))
    }

    pub fn aabb(&self) -> AABB {
        AABB::from_min_max(self.center - self.radius.abs(), self.center + self.radius.abs())
    }
}

#[cfg(test)]
mod sphere_tests {
    use crate::types::{ Ray, V3 };
    use super::{ MatId, Sphere };

    fn test_sphere() -> Sphere {
        Sphere::new(V3(0.0, 0.0, -1.0), 0.5, MatId(0))
    }

    #[test]
    fn head_on_ray_hits_the_near_surface() {
        let ray = Ray::new(V3::ZERO, V3(0.0, 0.0, -1.0));
        let hit = test_sphere().hit(&ray, 0.001, f64::INFINITY).expect("hit");
        assert!((hit.t - 0.5).abs() < 1.0e-12);
        assert!(hit.front_face);
        assert!((hit.normal - V3(0.0, 0.0, 1.0)).length() < 1.0e-12);
    }

    #[test]
    fn ray_from_inside_reports_back_face() {
        let ray = Ray::new(V3(0.0, 0.0, -1.0), V3(0.0, 0.0, -1.0));
        let hit = test_sphere().hit(&ray, 0.001, f64::INFINITY).expect("hit");
        assert!(!hit.front_face);
        // Normal is flipped to oppose the ray
        assert!(V3::dot(hit.normal, ray.direction) < 0.0);
    }

    #[test]
    fn near_root_outside_interval_falls_back_to_far_root() {
        let ray = Ray::new(V3::ZERO, V3(0.0, 0.0, -1.0));
        let hit = test_sphere().hit(&ray, 0.75, f64::INFINITY).expect("hit");
        assert!((hit.t - 1.5).abs() < 1.0e-12);
    }

    #[test]
    fn offset_ray_misses() {
        let ray = Ray::new(V3(2.0, 0.0, 0.0), V3(0.0, 0.0, -1.0));
        assert!(test_sphere().hit(&ray, 0.001, f64::INFINITY).is_none());
    }

    #[test]
    fn uv_poles_and_equator() {
        use crate::types::V2;
        use super::sphere_uv;
        let V2(_, v_top) = sphere_uv(V3(0.0, 1.0, 0.0));
        let V2(_, v_bottom) = sphere_uv(V3(0.0, -1.0, 0.0));
        let V2(u_px, v_eq) = sphere_uv(V3(1.0, 0.0, 0.0));
        assert!((v_top - 1.0).abs() < 1.0e-12);
        assert!(v_bottom.abs() < 1.0e-12);
        assert!((v_eq - 0.5).abs() < 1.0e-12);
        assert!((u_px - 0.5).abs() < 1.0e-12);
    }
}
