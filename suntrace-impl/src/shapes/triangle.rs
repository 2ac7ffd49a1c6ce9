use crate::aabb::AABB;
use crate::shapes::{ HitRecord, MatId };
use crate::types::{ Ray, V2, V3 };

/// Rejects rays nearly parallel to the triangle plane.
const PARALLEL_EPSILON: f64 = 1.0e-8;

#[derive(Clone, Debug)]
pub struct Triangle {
    pub a: V3,
    pub b: V3,
    pub c: V3,
    pub a_uv: V2,
    pub b_uv: V2,
    pub c_uv: V2,
    mat_id: MatId,
}

impl Triangle {
    pub fn new(a: V3, b: V3, c: V3, mat_id: MatId) -> Self {
        Triangle { a, b, c, a_uv: V2::ZERO, b_uv: V2::ZERO, c_uv: V2::ZERO, mat_id }
    }

    pub fn with_uvs(mut self, a_uv: V2, b_uv: V2, c_uv: V2) -> Self {
        self.a_uv = a_uv;
        self.b_uv = b_uv;
        self.c_uv = c_uv;
        self
    }

    /// Twice the triangle's area; zero for degenerate triangles.
    pub fn area2(&self) -> f64 {
        V3::cross(self.b - self.a, self.c - self.a).length()
    }

    pub fn centroid(&self) -> V3 {
        (self.a + self.b + self.c) / 3.0
    }

    /// Möller–Trumbore intersection with barycentric UV interpolation.
    pub fn hit(&self, ray: &Ray, t_min: f64, t_max: f64) -> Option<HitRecord> {
        let edge_ab = self.b - self.a;
        let edge_ac = self.c - self.a;

        let h = V3::cross(ray.direction, edge_ac);
        let det = V3::dot(edge_ab, h);
        if det.abs() < PARALLEL_EPSILON {
            // Ray is parallel to the triangle plane
            return None;
        }

        let inv_det = 1.0 / det;
        let s = ray.origin - self.a;
        let u = V3::dot(s, h) * inv_det;
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let q = V3::cross(s, edge_ab);
        let v = V3::dot(ray.direction, q) * inv_det;
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = V3::dot(edge_ac, q) * inv_det;
        if t <= t_min || t >= t_max {
            return None;
        }

        let p = ray.point_at_parameter(t);
        let outward_normal = V3::cross(edge_ab, edge_ac).unit();
        let uv = (self.a_uv * (1.0 - u - v)) + (self.b_uv * u) + (self.c_uv * v);
        Some(HitRecord::new(ray, t, p, outward_normal, uv, self.mat_id))
    }

    pub fn aabb(&self) -> AABB {
        AABB::from_vertices(&[self.a, self.b, self.c])
    }
}

#[cfg(test)]
mod triangle_tests {
    use crate::types::{ Ray, V2, V3 };
    use super::{ MatId, Triangle };

    fn unit_triangle() -> Triangle {
        // Lies in the z = 0 plane, normal towards +Z
        Triangle::new(V3(0.0, 0.0, 0.0), V3(1.0, 0.0, 0.0), V3(0.0, 1.0, 0.0), MatId(0))
            .with_uvs(V2(0.0, 0.0), V2(1.0, 0.0), V2(0.0, 1.0))
    }

    #[test]
    fn ray_through_the_interior_hits() {
        let ray = Ray::new(V3(0.25, 0.25, 1.0), V3(0.0, 0.0, -1.0));
        let hit = unit_triangle().hit(&ray, 0.001, f64::INFINITY).expect("hit");
        assert!((hit.t - 1.0).abs() < 1.0e-12);
        assert!(hit.front_face);
        assert!((hit.normal - V3(0.0, 0.0, 1.0)).length() < 1.0e-12);
    }

    #[test]
    fn ray_outside_the_edges_misses() {
        let ray = Ray::new(V3(0.75, 0.75, 1.0), V3(0.0, 0.0, -1.0));
        assert!(unit_triangle().hit(&ray, 0.001, f64::INFINITY).is_none());
    }

    #[test]
    fn parallel_ray_is_rejected() {
        let ray = Ray::new(V3(0.25, 0.25, 1.0), V3(1.0, 0.0, 0.0));
        assert!(unit_triangle().hit(&ray, 0.001, f64::INFINITY).is_none());
    }

    #[test]
    fn back_face_hit_flips_the_normal() {
        let ray = Ray::new(V3(0.25, 0.25, -1.0), V3(0.0, 0.0, 1.0));
        let hit = unit_triangle().hit(&ray, 0.001, f64::INFINITY).expect("hit");
        assert!(!hit.front_face);
        assert!((hit.normal - V3(0.0, 0.0, -1.0)).length() < 1.0e-12);
    }

    #[test]
    fn uvs_interpolate_barycentrically() {
        let ray = Ray::new(V3(1.0, 0.0, 1.0), V3(0.0, 0.0, -1.0));
        let hit = unit_triangle().hit(&ray, 0.001, f64::INFINITY);
        // Vertex b: uv (1, 0)
        let hit = hit.expect("vertex hit");
        assert!((hit.uv.x() - 1.0).abs() < 1.0e-9);
        assert!(hit.uv.y().abs() < 1.0e-9);

        let ray = Ray::new(V3(0.25, 0.25, 1.0), V3(0.0, 0.0, -1.0));
        let hit = unit_triangle().hit(&ray, 0.001, f64::INFINITY).expect("hit");
        assert!((hit.uv.x() - 0.25).abs() < 1.0e-9);
        assert!((hit.uv.y() - 0.25).abs() < 1.0e-9);
    }
}
