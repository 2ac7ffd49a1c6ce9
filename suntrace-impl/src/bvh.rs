use crate::aabb::AABB;
use crate::shapes::HitRecord;
use crate::types::{ Ray, V3 };

/// Anything a BVH can be constructed over.
pub trait BvhObject {
    fn aabb(&self) -> AABB;
    fn centroid(&self) -> V3;
}

struct BvhNode {
    aabb: AABB,
    data: BvhNodeData,
}

enum BvhNodeData {
    Branch { left: usize, right: usize },
    // Index of the object in the source collection
    Leaf { object_index: usize },
}

/// Shape diagnostics. Purely informational.
#[derive(Clone, Copy, Debug, Default)]
pub struct BvhStats {
    pub node_count: usize,
    pub leaf_count: usize,
    pub max_depth: usize,
}

/// Binary bounding-volume hierarchy over a collection of objects.
///
/// The tree holds object *indices* only: callers resolve an index back to a
/// concrete object through the `object_hit` delegate during traversal, so a
/// single structure serves both the world's primitive arena and per-mesh
/// triangle lists.
pub struct Bvh {
    nodes: Vec<BvhNode>,
    root: usize,
    stats: BvhStats,
}

impl Bvh {
    /// Builds the hierarchy top-down. At every internal node the object set
    /// is sorted by its bounding-box min corner along the axis of greatest
    /// centroid extent, then split into two equal halves. Leaves hold
    /// exactly one object. Construction is deterministic: the sort is
    /// stable, so objects with identical keys keep their original order.
    ///
    /// Panics when the object set is empty.
    pub fn build<T: BvhObject>(objects: &[T]) -> Bvh {
        assert!(!objects.is_empty(), "cannot build a BVH over an empty object set");

        // Per-object sort and split keys, computed once up front
        let boxes = objects.iter().map(|o| o.aabb()).collect::<Vec<_>>();
        let centroids = objects.iter().map(|o| o.centroid()).collect::<Vec<_>>();

        let mut order = (0..objects.len()).collect::<Vec<usize>>();
        let mut nodes = Vec::with_capacity(objects.len() * 2 - 1);
        let mut max_depth = 0;

        let root = subdivide(&mut nodes, &mut order, &boxes, &centroids, 0, &mut max_depth);

        let stats = BvhStats {
            node_count: nodes.len(),
            leaf_count: objects.len(),
            max_depth,
        };

        Bvh { nodes, root, stats }
    }

    pub fn aabb(&self) -> &AABB {
        &self.nodes[self.root].aabb
    }

    pub fn stats(&self) -> BvhStats {
        self.stats
    }

    /// Finds the nearest hit along the ray within `[t_min, t_max]`.
    ///
    /// `object_hit` performs the actual object intersection for a leaf's
    /// object index, restricted to the given parameter interval.
    pub fn hit_with<F>(&self, ray: &Ray, t_min: f64, t_max: f64, object_hit: &F) -> Option<HitRecord>
        where F: Fn(usize, f64, f64) -> Option<HitRecord>
    {
        self.hit_node(self.root, ray, t_min, t_max, object_hit)
    }

    fn hit_node<F>(&self, node_index: usize, ray: &Ray, t_min: f64, t_max: f64, object_hit: &F) -> Option<HitRecord>
        where F: Fn(usize, f64, f64) -> Option<HitRecord>
    {
        let node = &self.nodes[node_index];
        if !node.aabb.hit_aabb(ray, t_min, t_max) {
            return None;
        }
        match node.data {
            BvhNodeData::Leaf { object_index } => object_hit(object_index, t_min, t_max),
            BvhNodeData::Branch { left, right } => {
                // Left first; a left hit tightens the interval for the
                // right subtree, so any right hit is necessarily closer
                let left_hit = self.hit_node(left, ray, t_min, t_max, object_hit);
                let tightened = left_hit.as_ref().map_or(t_max, |hit| hit.t);
                let right_hit = self.hit_node(right, ray, t_min, tightened, object_hit);
                right_hit.or(left_hit)
            }
        }
    }
}

fn subdivide(
    nodes: &mut Vec<BvhNode>,
    order: &mut [usize],
    boxes: &[AABB],
    centroids: &[V3],
    depth: usize,
    max_depth: &mut usize,
) -> usize {
    *max_depth = usize::max(*max_depth, depth);

    let aabb = AABB::from_vertices_iter(
        order.iter().flat_map(|&i| [boxes[i].min, boxes[i].max]));

    if let [object_index] = *order {
        nodes.push(BvhNode { aabb, data: BvhNodeData::Leaf { object_index } });
        return nodes.len() - 1;
    }

    // Split along the axis over which the centroids spread the furthest
    let centroid_bounds = AABB::from_vertices_iter(order.iter().map(|&i| centroids[i]));
    let axis = centroid_bounds.longest_axis();

    order.sort_by(|&a, &b| boxes[a].min.xyz()[axis].total_cmp(&boxes[b].min.xyz()[axis]));

    let mid = order.len() / 2;
    let (left_order, right_order) = order.split_at_mut(mid);

    let left = subdivide(nodes, left_order, boxes, centroids, depth + 1, max_depth);
    let right = subdivide(nodes, right_order, boxes, centroids, depth + 1, max_depth);

    nodes.push(BvhNode { aabb, data: BvhNodeData::Branch { left, right } });
    nodes.len() - 1
}

#[cfg(test)]
mod bvh_tests {
    use rand::{ Rng, SeedableRng };
    use rand_xorshift::XorShiftRng;

    use crate::shapes::{ HitRecord, MatId, Sphere };
    use crate::types::{ Ray, V3 };
    use super::{ Bvh, BvhObject };

    struct SphereSet(Vec<Sphere>);

    impl SphereSet {
        fn random(count: usize, seed: u64) -> SphereSet {
            let mut rng = XorShiftRng::seed_from_u64(seed);
            let spheres = (0..count)
                .map(|_| {
                    let center = V3(rng.gen::<f64>() * 20.0 - 10.0,
                                    rng.gen::<f64>() * 20.0 - 10.0,
                                    rng.gen::<f64>() * 20.0 - 10.0);
                    Sphere::new(center, rng.gen::<f64>() * 0.9 + 0.1, MatId(0))
                })
                .collect();
            SphereSet(spheres)
        }

        fn hit_linear(&self, ray: &Ray, t_min: f64, t_max: f64) -> Option<HitRecord> {
            let mut closest = t_max;
            let mut best = None;
            for sphere in self.0.iter() {
                if let Some(hit) = sphere.hit(ray, t_min, closest) {
                    closest = hit.t;
                    best = Some(hit);
                }
            }
            best
        }
    }

    impl BvhObject for Sphere {
        fn aabb(&self) -> crate::aabb::AABB {
            Sphere::aabb(self)
        }
        fn centroid(&self) -> V3 {
            self.center()
        }
    }

    #[test]
    #[should_panic(expected = "empty object set")]
    fn empty_set_is_an_error() {
        let _ = Bvh::build::<Sphere>(&[]);
    }

    #[test]
    fn singleton_set_builds_a_single_leaf() {
        let set = SphereSet::random(1, 1);
        let bvh = Bvh::build(&set.0);
        let stats = bvh.stats();
        assert_eq!(stats.node_count, 1);
        assert_eq!(stats.leaf_count, 1);
        assert_eq!(stats.max_depth, 0);
    }

    #[test]
    fn every_object_gets_its_own_leaf() {
        for count in [2, 3, 7, 64, 100] {
            let set = SphereSet::random(count, count as u64);
            let stats = Bvh::build(&set.0).stats();
            assert_eq!(stats.leaf_count, count);
            // A binary tree with n leaves has n - 1 internal nodes
            assert_eq!(stats.node_count, count * 2 - 1);
            // Equal-halves splitting keeps the tree balanced
            assert!(stats.max_depth <= (count as f64).log2().ceil() as usize + 1);
        }
    }

    #[test]
    fn node_boxes_enclose_their_children() {
        use super::BvhNodeData;
        let set = SphereSet::random(50, 3);
        let bvh = Bvh::build(&set.0);
        for node in bvh.nodes.iter() {
            if let BvhNodeData::Branch { left, right } = node.data {
                for child in [left, right] {
                    let child_box = &bvh.nodes[child].aabb;
                    assert!(node.aabb.min.0 <= child_box.min.0);
                    assert!(node.aabb.min.1 <= child_box.min.1);
                    assert!(node.aabb.min.2 <= child_box.min.2);
                    assert!(node.aabb.max.0 >= child_box.max.0);
                    assert!(node.aabb.max.1 >= child_box.max.1);
                    assert!(node.aabb.max.2 >= child_box.max.2);
                }
            }
        }
    }

    #[test]
    fn traversal_matches_the_linear_oracle() {
        let set = SphereSet::random(120, 9);
        let bvh = Bvh::build(&set.0);

        let mut rng = XorShiftRng::seed_from_u64(99);
        for _ in 0..2000 {
            let origin = V3(rng.gen::<f64>() * 30.0 - 15.0,
                            rng.gen::<f64>() * 30.0 - 15.0,
                            rng.gen::<f64>() * 30.0 - 15.0);
            let direction = V3(rng.gen::<f64>() * 2.0 - 1.0,
                               rng.gen::<f64>() * 2.0 - 1.0,
                               rng.gen::<f64>() * 2.0 - 1.0);
            let ray = Ray::new(origin, direction);

            let expected = set.hit_linear(&ray, 0.001, f64::INFINITY);
            let actual = bvh.hit_with(&ray, 0.001, f64::INFINITY,
                &|i, t0, t1| set.0[i].hit(&ray, t0, t1));

            match (expected, actual) {
                (None, None) => {}
                (Some(e), Some(a)) => assert!((e.t - a.t).abs() < 1.0e-12, "different nearest hit"),
                (e, a) => panic!("oracle mismatch: linear={:?} bvh={:?}", e.map(|h| h.t), a.map(|h| h.t)),
            }
        }
    }

    #[test]
    fn construction_is_deterministic() {
        let set = SphereSet::random(64, 11);
        let a = Bvh::build(&set.0);
        let b = Bvh::build(&set.0);
        let ray = Ray::new(V3(-20.0, 0.1, 0.2), V3(1.0, 0.0, 0.0));
        let hit_a = a.hit_with(&ray, 0.001, f64::INFINITY, &|i, t0, t1| set.0[i].hit(&ray, t0, t1));
        let hit_b = b.hit_with(&ray, 0.001, f64::INFINITY, &|i, t0, t1| set.0[i].hit(&ray, t0, t1));
        assert_eq!(hit_a.map(|h| h.t), hit_b.map(|h| h.t));
        assert_eq!(a.stats().max_depth, b.stats().max_depth);
    }
}
