use crate::types::{ Ray, V3 };

#[derive(Clone, Debug, Default)]
pub struct AABB {
    pub min: V3,
    pub max: V3,
}

impl AABB {
    /// Creates a bounding box from the given min/max vertices
    pub fn from_min_max(min: V3, max: V3) -> AABB {
        AABB { min, max }
    }

    /// Finds the axis-aligned bounding box which fully contains the given list of vertices
    pub fn from_vertices(vertices: &[V3]) -> AABB {
        AABB::from_vertices_iter(vertices.iter().cloned())
    }

    /// Creates a bounding box which fully contains the given two boxes
    pub fn surrounding(b0: &AABB, b1: &AABB) -> AABB {
        AABB::from_vertices_iter([b0.min, b0.max, b1.min, b1.max])
    }

    /// Finds the axis-aligned bounding box which fully contains the given sequence of vertices
    pub fn from_vertices_iter(vertices: impl IntoIterator<Item=V3>) -> AABB {
        let mut iter = vertices.into_iter();

        let mut min = iter.next().expect("Cannot create AABB from empty vertex list");
        let mut max = min;

        for vert in iter {
            min.0 = f64::min(min.0, vert.0);
            min.1 = f64::min(min.1, vert.1);
            min.2 = f64::min(min.2, vert.2);

            max.0 = f64::max(max.0, vert.0);
            max.1 = f64::max(max.1, vert.1);
            max.2 = f64::max(max.2, vert.2);
        }

        AABB::from_min_max(min, max)
    }

    pub fn centroid(&self) -> V3 {
        (self.min + self.max) * 0.5
    }

    /// Index of the axis along which the box is widest.
    pub fn longest_axis(&self) -> usize {
        let extent = (self.max - self.min).xyz();
        let mut axis = 0;
        for dimension in 1..=2 {
            if extent[dimension] > extent[axis] {
                axis = dimension;
            }
        }
        axis
    }

    /// Slab test: intersect the ray's `[t_min, t_max]` interval with the
    /// box's per-axis slabs. A ray parallel to an axis produces an infinite
    /// slab interval which keeps or rejects the running interval depending
    /// on whether the origin lies inside that slab.
    pub fn hit_aabb(&self, ray: &Ray, mut t_min: f64, mut t_max: f64) -> bool {
        let ray_origin = ray.origin.xyz();
        let ray_direction = ray.direction.xyz();
        let min = self.min.xyz();
        let max = self.max.xyz();
        for dimension in 0..=2 {
            let inv_d = 1.0 / ray_direction[dimension];
            let mut t0 = (min[dimension] - ray_origin[dimension]) * inv_d;
            let mut t1 = (max[dimension] - ray_origin[dimension]) * inv_d;
            if inv_d < 0.0 {
                std::mem::swap(&mut t0, &mut t1);
            }
            t_min = if t0 > t_min { t0 } else { t_min };
            t_max = if t1 < t_max { t1 } else { t_max };
            if t_max <= t_min {
                // No overlap remaining on this dimension
                return false;
            }
        }

        true
    }
}
