use crate::aabb::AABB;
use crate::bvh::{ Bvh, BvhObject };
use crate::camera::Camera;
use crate::environment::{ sky_gradient, EnvironmentMap };
use crate::lights::{ PointLight, Sun };
use crate::materials::Material;
use crate::shapes::{ HitRecord, MatId, Primitive };
use crate::types::{ Color, Ray, V3 };

/// Ray-scene intersection strategy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Acceleration {
    /// Test every primitive in sequence
    Linear,
    /// Bounding volume hierarchy
    Bvh,
}

/// Render-job parameters. Immutable once rendering starts.
#[derive(Clone, Debug)]
pub struct Config {
    pub width: usize,
    pub height: usize,
    pub aspect_ratio: f64,
    pub samples_per_pixel: u32,
    pub max_depth: u32,
    pub acceleration: Acceleration,
}

impl BvhObject for Primitive {
    fn aabb(&self) -> AABB {
        Primitive::aabb(self)
    }

    fn centroid(&self) -> V3 {
        Primitive::centroid(self)
    }
}

/// The root scene container: configuration, camera, lights, the material
/// and primitive arenas, and the optional top-level BVH over the
/// primitives. Fully populated by the scene loader before rendering
/// begins; not mutated during a render job.
pub struct World {
    pub config: Config,
    pub camera: Camera,
    pub sun: Sun,
    pub point_lights: Vec<PointLight>,
    pub environment: Option<EnvironmentMap>,
    materials: Vec<Material>,
    primitives: Vec<Primitive>,
    bvh: Option<Bvh>,
}

impl World {
    pub fn new(config: Config, camera: Camera, sun: Sun) -> World {
        World {
            config,
            camera,
            sun,
            point_lights: vec![],
            environment: None,
            materials: vec![],
            primitives: vec![],
            bvh: None,
        }
    }

    pub fn add_material(&mut self, material: Material) -> MatId {
        let id = self.materials.len();
        self.materials.push(material);
        MatId(id)
    }

    pub fn material(&self, MatId(id): MatId) -> &Material {
        &self.materials[id]
    }

    pub fn add_primitive(&mut self, primitive: Primitive) {
        self.primitives.push(primitive);
    }

    pub fn add_point_light(&mut self, light: PointLight) {
        self.point_lights.push(light);
    }

    pub fn set_environment(&mut self, environment: EnvironmentMap) {
        self.environment = Some(environment);
    }

    pub fn primitive_count(&self) -> usize {
        self.primitives.len()
    }

    pub fn has_bvh(&self) -> bool {
        self.bvh.is_some()
    }

    /// Constructs the top-level BVH over the primitive arena.
    pub fn build_bvh(&mut self) {
        if self.primitives.is_empty() {
            log::warn!("Scene has no primitives; skipping BVH construction");
            return;
        }
        let bvh = Bvh::build(&self.primitives);
        let stats = bvh.stats();
        log::debug!(
            "Built scene BVH: {} nodes, {} leaves, max depth {}",
            stats.node_count, stats.leaf_count, stats.max_depth);
        self.bvh = Some(bvh);
    }

    /// Builds the BVH if the configuration asks for it and it does not
    /// exist yet. The render runner calls this once before fanning out.
    pub fn prepare(&mut self) {
        if self.config.acceleration == Acceleration::Bvh && !self.has_bvh() {
            self.build_bvh();
        }
    }

    /// Nearest intersection along the ray, dispatched through the BVH when
    /// one has been built for this world.
    pub fn hit(&self, ray: &Ray, t_min: f64, t_max: f64) -> Option<HitRecord> {
        match (self.config.acceleration, &self.bvh) {
            (Acceleration::Bvh, Some(bvh)) => bvh.hit_with(ray, t_min, t_max,
                &|i, t0, t1| self.primitives[i].hit(ray, t0, t1)),
            _ => self.hit_linear(ray, t_min, t_max),
        }
    }

    fn hit_linear(&self, ray: &Ray, t_min: f64, t_max: f64) -> Option<HitRecord> {
        let mut closest_so_far = t_max;
        let mut best = None;
        for primitive in self.primitives.iter() {
            if let Some(hit) = primitive.hit(ray, t_min, closest_so_far) {
                closest_so_far = hit.t;
                best = Some(hit);
            }
        }
        best
    }

    /// Radiance for a ray that left the scene: the environment map when one
    /// is loaded, the day-sky gradient otherwise.
    pub fn sample_environment(&self, unit_direction: V3) -> Color {
        match &self.environment {
            Some(map) => map.sample(unit_direction),
            None => sky_gradient(unit_direction),
        }
    }
}
