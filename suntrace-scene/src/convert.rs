use std::collections::HashMap;
use std::path::{ Path, PathBuf };

use suntrace_impl::camera::Camera;
use suntrace_impl::lights::{ PointLight, Sun };
use suntrace_impl::materials::{ Dielectric, Emissive, Lambertian, Metal };
use suntrace_impl::matrix::Matrix;
use suntrace_impl::shapes::{ MatId, MeshObject, Primitive, Sphere, Triangle };
use suntrace_impl::types::V3;
use suntrace_impl::world::{ Config, World };

use crate::SceneError;
use crate::document::{ MaterialKind, PrimitiveElement, SceneDocument };
use crate::envmap::load_environment;

/// Zero-area cutoff for mesh triangles.
const DEGENERATE_AREA2: f64 = 1.0e-12;

/// Converts a parsed scene document into a render-ready world. The BVH is
/// not built here; the render runner constructs it on demand.
pub fn build_world(doc: &SceneDocument, scene_dir: Option<&Path>) -> Result<World, SceneError> {
    let config_el = doc.config.as_ref()
        .ok_or_else(|| SceneError::Document("scene has no <config> element".into()))?;
    let camera_el = doc.camera.as_ref()
        .ok_or_else(|| SceneError::Document("scene has no <camera> element".into()))?;

    if config_el.width == 0 || config_el.aspect <= 0.0 {
        return Err(SceneError::Document("<config> width and aspect must be positive".into()));
    }

    let config = Config {
        width: config_el.width,
        height: usize::max(1, (config_el.width as f64 / config_el.aspect) as usize),
        aspect_ratio: config_el.aspect,
        samples_per_pixel: config_el.samples,
        max_depth: config_el.max_depth,
        acceleration: config_el.acceleration,
    };

    let focus_dist = camera_el.focus_dist
        .unwrap_or_else(|| (camera_el.look_from - camera_el.look_at).length());
    let camera = Camera::new(
        camera_el.look_from,
        camera_el.look_at,
        camera_el.up,
        camera_el.fov,
        config.aspect_ratio,
        camera_el.aperture,
        focus_dist);

    let sun = match &doc.sun {
        Some(sun) => Sun::new(sun.direction, sun.color),
        None => Sun::neutral(),
    };

    let mut world = World::new(config, camera, sun);

    for light in doc.point_lights.iter() {
        world.add_point_light(PointLight::new(
            light.position, light.color, light.intensity, light.radius));
    }

    if let Some(env) = &doc.environment {
        let path = resolve_path(&env.file, scene_dir);
        let map = load_environment(&path)
            .map_err(|e| SceneError::Environment(env.file.clone(), e))?;
        world.set_environment(map
            .with_intensity(env.intensity)
            .with_rotation(env.rotation));
    }

    // Materials first; primitives refer to them by name
    let mut materials = HashMap::new();
    for material in doc.materials.iter() {
        let mat_id = world.add_material(match material.kind {
            MaterialKind::Lambertian { albedo } => Lambertian::new(albedo),
            MaterialKind::Metal { albedo, fuzz } => Metal::new(albedo, fuzz),
            MaterialKind::Dielectric { ref_index } => Dielectric::new(ref_index),
            MaterialKind::Emissive { color } => Emissive::new(color),
        });
        if materials.insert(material.name.clone(), mat_id).is_some() {
            return Err(SceneError::Document(
                format!("duplicate material name '{}'", material.name)));
        }
    }
    let lookup = |name: &str| -> Result<MatId, SceneError> {
        materials.get(name).copied().ok_or_else(|| SceneError::UnknownMaterial(name.to_string()))
    };

    for primitive in doc.primitives.iter() {
        match primitive {
            PrimitiveElement::Sphere { center, radius, material } => {
                world.add_primitive(Primitive::Sphere(
                    Sphere::new(*center, *radius, lookup(material)?)));
            }
            PrimitiveElement::Triangle { a, b, c, uv_a, uv_b, uv_c, material } => {
                let triangle = Triangle::new(*a, *b, *c, lookup(material)?)
                    .with_uvs(*uv_a, *uv_b, *uv_c);
                if triangle.area2() < DEGENERATE_AREA2 {
                    log::warn!("Skipping degenerate <triangle> at {a:?}");
                    continue;
                }
                world.add_primitive(Primitive::Triangle(triangle));
            }
            PrimitiveElement::Mesh { file, position, scale, rotation, material } => {
                let mat_id = lookup(material)?;
                if let Some(mesh) = load_mesh(file, *position, *scale, *rotation, mat_id, scene_dir)? {
                    world.add_primitive(Primitive::Mesh(mesh));
                }
            }
        }
    }

    Ok(world)
}

fn resolve_path(file: &str, scene_dir: Option<&Path>) -> PathBuf {
    let direct = PathBuf::from(file);
    if direct.exists() {
        return direct;
    }
    match scene_dir {
        // Fall back to a path relative to the scene file
        Some(dir) => dir.join(file),
        None => direct,
    }
}

/// Loads an OBJ file and bakes the model transform (scale, X/Y/Z rotation,
/// translation) into world-space triangles. Returns `None` for meshes that
/// end up with no usable triangles; those are skipped with a warning.
fn load_mesh(
    file: &str,
    position: V3,
    scale: V3,
    rotation: V3,
    mat_id: MatId,
    scene_dir: Option<&Path>,
) -> Result<Option<MeshObject>, SceneError> {
    let path = resolve_path(file, scene_dir);
    let model = suntrace_obj::load_obj(&path)
        .map_err(|e| SceneError::Mesh(file.to_string(), e))?;

    if model.vertices.len() < 3 {
        log::warn!("Mesh '{file}' has fewer than 3 vertices, skipping");
        return Ok(None);
    }

    let transform = Matrix::model(position, scale, rotation);

    let mut tris = Vec::with_capacity(model.faces.len());
    let mut skipped = 0usize;
    for face in model.faces.iter() {
        let corners = (model.vertex(face.a), model.vertex(face.b), model.vertex(face.c));
        let (a, b, c) = match corners {
            (Some(a), Some(b), Some(c)) => (a, b, c),
            // Face refers to a vertex the file never declared
            _ => {
                skipped += 1;
                continue;
            }
        };
        let triangle = Triangle::new(a * transform, b * transform, c * transform, mat_id)
            .with_uvs(model.uv(face.a), model.uv(face.b), model.uv(face.c));
        if triangle.area2() < DEGENERATE_AREA2 {
            skipped += 1;
            continue;
        }
        tris.push(triangle);
    }

    if skipped > 0 {
        log::warn!("Mesh '{file}': skipped {skipped} degenerate or out-of-range faces");
    }
    if tris.is_empty() {
        log::warn!("Mesh '{file}' has no usable triangles, skipping");
        return Ok(None);
    }

    log::debug!("Mesh '{file}': {} triangles", tris.len());
    Ok(Some(MeshObject::new(tris)))
}

#[cfg(test)]
mod convert_tests {
    use std::io::Write;

    use suntrace_impl::world::Acceleration;
    use crate::SceneError;
    use crate::document::parse_document;
    use super::build_world;

    fn minimal(extra: &str) -> String {
        format!(r#"
<scene>
  <config width="64" aspect="2.0" samples="4" max-depth="8"/>
  <camera look-from="0 0 5" look-at="0 0 0"/>
  <material name="grey" type="lambertian" albedo="0.5 0.5 0.5"/>
  {extra}
</scene>
"#)
    }

    fn build(extra: &str) -> Result<suntrace_impl::world::World, SceneError> {
        build_world(&parse_document(&minimal(extra)).expect("parse"), None)
    }

    #[test]
    fn builds_config_and_derives_height() {
        let world = build("").expect("build");
        assert_eq!(world.config.width, 64);
        assert_eq!(world.config.height, 32);
        assert_eq!(world.config.samples_per_pixel, 4);
        assert_eq!(world.config.acceleration, Acceleration::Linear);
    }

    #[test]
    fn collects_primitives_and_lights() {
        let world = build(r#"
  <sun direction="0 1 0" color="1 1 1"/>
  <point-light position="0 3 0" color="1 1 1" intensity="5"/>
  <sphere center="0 0 -1" radius="0.5" material="grey"/>
  <triangle a="-1 0 -2" b="1 0 -2" c="0 1 -2" material="grey"/>
"#).expect("build");
        assert_eq!(world.primitive_count(), 2);
        assert_eq!(world.point_lights.len(), 1);
        assert!(world.sun.color.x() > 0.0);
    }

    #[test]
    fn degenerate_triangles_are_skipped_not_fatal() {
        let world = build(r#"
  <triangle a="0 0 0" b="1 1 1" c="2 2 2" material="grey"/>
"#).expect("build");
        assert_eq!(world.primitive_count(), 0);
    }

    #[test]
    fn unknown_material_reference_fails() {
        let result = build(r#"<sphere center="0 0 0" radius="1" material="nope"/>"#);
        assert!(matches!(result, Err(SceneError::UnknownMaterial(name)) if name == "nope"));
    }

    #[test]
    fn duplicate_material_names_fail() {
        let result = build(r#"<material name="grey" type="dielectric"/>"#);
        assert!(matches!(result, Err(SceneError::Document(_))));
    }

    #[test]
    fn missing_config_fails() {
        let doc = parse_document(r#"<scene><camera look-from="0 0 1" look-at="0 0 0"/></scene>"#)
            .expect("parse");
        assert!(matches!(build_world(&doc, None), Err(SceneError::Document(_))));
    }

    #[test]
    fn missing_mesh_file_is_a_load_error() {
        let result = build(r#"<mesh file="does-not-exist.obj" material="grey"/>"#);
        assert!(matches!(result, Err(SceneError::Mesh(_, _))));
    }

    #[test]
    fn meshes_are_loaded_and_transformed() {
        let path = std::env::temp_dir()
            .join(format!("suntrace-convert-test-{}.obj", std::process::id()));
        let mut file = std::fs::File::create(&path).expect("temp obj");
        write!(file, "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n").expect("write obj");

        let world = build(&format!(
            r#"<mesh file="{}" position="0 0 -5" scale="2 2 2" material="grey"/>"#,
            path.display())).expect("build");
        assert_eq!(world.primitive_count(), 1);

        // The baked transform moves the mesh in front of the camera;
        // a ray down -Z from the origin region should strike it
        use suntrace_impl::types::{ Ray, V3 };
        let ray = Ray::new(V3(0.5, 0.5, 0.0), V3(0.0, 0.0, -1.0));
        let hit = world.hit(&ray, 0.001, f64::INFINITY).expect("mesh hit");
        assert!((hit.t - 5.0).abs() < 1.0e-9);

        std::fs::remove_file(&path).ok();
    }
}
