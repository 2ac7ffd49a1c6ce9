use crate::aabb::AABB;
use crate::bvh::{ Bvh, BvhObject };
use crate::shapes::{ HitRecord, Triangle };
use crate::types::{ Ray, V3 };

impl BvhObject for Triangle {
    fn aabb(&self) -> AABB {
        Triangle::aabb(self)
    }

    fn centroid(&self) -> V3 {
        Triangle::centroid(self)
    }
}

/// A group of world-space triangles with its own acceleration structure.
///
/// Transforms are baked into the triangles before construction, so rays
/// never change frames here.
pub struct MeshObject {
    tris: Vec<Triangle>,
    bvh: Option<Bvh>,
    aabb: AABB,
}

impl MeshObject {
    pub fn new(tris: Vec<Triangle>) -> MeshObject {
        let bvh = if tris.is_empty() { None } else { Some(Bvh::build(&tris)) };
        let aabb = match &bvh {
            Some(bvh) => {
                let stats = bvh.stats();
                log::debug!(
                    "Built mesh BVH: {} nodes, {} leaves, max depth {}",
                    stats.node_count, stats.leaf_count, stats.max_depth);
                bvh.aabb().clone()
            }
            None => AABB::default(),
        };
        MeshObject { tris, bvh, aabb }
    }

    pub fn triangle_count(&self) -> usize {
        self.tris.len()
    }

    pub fn aabb(&self) -> &AABB {
        &self.aabb
    }

    pub fn hit(&self, ray: &Ray, t_min: f64, t_max: f64) -> Option<HitRecord> {
        match &self.bvh {
            Some(bvh) => bvh.hit_with(ray, t_min, t_max,
                &|i, t0, t1| self.tris[i].hit(ray, t0, t1)),
            // Degenerate mesh: scan whatever triangles exist
            None => {
                let mut closest = t_max;
                let mut best = None;
                for tri in self.tris.iter() {
                    if let Some(hit) = tri.hit(ray, t_min, closest) {
                        closest = hit.t;
                        best = Some(hit);
                    }
                }
                best
            }
        }
    }
}
