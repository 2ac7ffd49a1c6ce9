pub mod mesh;
pub mod sphere;
pub mod triangle;

pub use mesh::MeshObject;
pub use sphere::Sphere;
pub use triangle::Triangle;

use crate::aabb::AABB;
use crate::types::{ Ray, V2, V3 };

/// Handle into the world's material arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MatId(pub(crate) usize);

/// Produced by a successful intersection. Only meaningful when an
/// intersection routine returns `Some`.
#[derive(Clone, Debug)]
pub struct HitRecord {
    pub t: f64,
    pub p: V3,
    /// Unit surface normal, flipped to oppose the incident ray.
    pub normal: V3,
    pub uv: V2,
    /// True when the incident ray arrived from the outside
    /// (against the geometric normal).
    pub front_face: bool,
    pub mat_id: MatId,
}

impl HitRecord {
    /// Orients the geometric normal against the incident ray and
    /// records which side was struck.
    pub fn new(ray: &Ray, t: f64, p: V3, outward_normal: V3, uv: V2, mat_id: MatId) -> HitRecord {
        let front_face = V3::dot(ray.direction, outward_normal) < 0.0;
        let normal = if front_face { outward_normal } else { -outward_normal };
        HitRecord { t, p, normal, uv, front_face, mat_id }
    }
}

/// Closed set of scene primitives.
pub enum Primitive {
    Sphere(Sphere),
    Triangle(Triangle),
    Mesh(MeshObject),
}

impl Primitive {
    pub fn hit(&self, ray: &Ray, t_min: f64, t_max: f64) -> Option<HitRecord> {
        match self {
            Primitive::Sphere(s) => s.hit(ray, t_min, t_max),
            Primitive::Triangle(t) => t.hit(ray, t_min, t_max),
            Primitive::Mesh(m) => m.hit(ray, t_min, t_max),
        }
    }

    pub fn aabb(&self) -> AABB {
        match self {
            Primitive::Sphere(s) => s.aabb(),
            Primitive::Triangle(t) => t.aabb(),
            Primitive::Mesh(m) => m.aabb().clone(),
        }
    }

    pub fn centroid(&self) -> V3 {
        match self {
            Primitive::Sphere(s) => s.center(),
            Primitive::Triangle(t) => t.centroid(),
            Primitive::Mesh(m) => m.aabb().centroid(),
        }
    }
}
