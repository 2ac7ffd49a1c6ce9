use std::collections::HashMap;

use quick_xml::Reader;
use quick_xml::events::{ BytesStart, Event };

use suntrace_impl::types::{ V2, V3 };
use suntrace_impl::world::Acceleration;

use crate::SceneError;

// Raw scene-document model: one struct per element, attribute values
// already parsed but nothing resolved against anything else yet.

#[derive(Debug)]
pub struct ConfigElement {
    pub width: usize,
    pub aspect: f64,
    pub samples: u32,
    pub max_depth: u32,
    pub acceleration: Acceleration,
}

#[derive(Debug)]
pub struct CameraElement {
    pub look_from: V3,
    pub look_at: V3,
    pub up: V3,
    pub fov: f64,
    pub aperture: f64,
    pub focus_dist: Option<f64>,
}

#[derive(Debug)]
pub struct SunElement {
    pub direction: V3,
    pub color: V3,
}

#[derive(Debug)]
pub struct PointLightElement {
    pub position: V3,
    pub color: V3,
    pub intensity: f64,
    pub radius: f64,
}

#[derive(Debug)]
pub struct EnvironmentElement {
    pub file: String,
    pub intensity: f64,
    pub rotation: f64,
}

#[derive(Debug)]
pub enum MaterialKind {
    Lambertian { albedo: V3 },
    Metal { albedo: V3, fuzz: f64 },
    Dielectric { ref_index: f64 },
    Emissive { color: V3 },
}

#[derive(Debug)]
pub struct MaterialElement {
    pub name: String,
    pub kind: MaterialKind,
}

#[derive(Debug)]
pub enum PrimitiveElement {
    Sphere {
        center: V3,
        radius: f64,
        material: String,
    },
    Triangle {
        a: V3,
        b: V3,
        c: V3,
        uv_a: V2,
        uv_b: V2,
        uv_c: V2,
        material: String,
    },
    Mesh {
        file: String,
        position: V3,
        scale: V3,
        rotation: V3,
        material: String,
    },
}

#[derive(Debug, Default)]
pub struct SceneDocument {
    pub config: Option<ConfigElement>,
    pub camera: Option<CameraElement>,
    pub sun: Option<SunElement>,
    pub point_lights: Vec<PointLightElement>,
    pub environment: Option<EnvironmentElement>,
    pub materials: Vec<MaterialElement>,
    pub primitives: Vec<PrimitiveElement>,
}

// Attribute access helpers

struct Attrs {
    element: &'static str,
    values: HashMap<String, String>,
}

impl Attrs {
    fn read(element: &'static str, start: &BytesStart) -> Result<Attrs, SceneError> {
        let mut values = HashMap::new();
        for attr in start.attributes() {
            let attr = attr.map_err(|e| SceneError::Document(
                format!("<{element}>: bad attribute: {e}")))?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr.unescape_value()?.into_owned();
            values.insert(key, value);
        }
        Ok(Attrs { element, values })
    }

    fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    fn require(&self, key: &str) -> Result<&str, SceneError> {
        self.get(key).ok_or_else(|| SceneError::Document(
            format!("<{}> is missing the '{key}' attribute", self.element)))
    }

    fn parse<T: std::str::FromStr>(&self, key: &str, raw: &str) -> Result<T, SceneError> {
        raw.trim().parse().map_err(|_| SceneError::Document(
            format!("<{}>: cannot parse '{key}' value '{raw}'", self.element)))
    }

    fn f64(&self, key: &str) -> Result<f64, SceneError> {
        self.parse(key, self.require(key)?)
    }

    fn f64_or(&self, key: &str, default: f64) -> Result<f64, SceneError> {
        match self.get(key) {
            Some(raw) => self.parse(key, raw),
            None => Ok(default),
        }
    }

    fn usize(&self, key: &str) -> Result<usize, SceneError> {
        self.parse(key, self.require(key)?)
    }

    fn u32_or(&self, key: &str, default: u32) -> Result<u32, SceneError> {
        match self.get(key) {
            Some(raw) => self.parse(key, raw),
            None => Ok(default),
        }
    }

    fn string(&self, key: &str) -> Result<String, SceneError> {
        Ok(self.require(key)?.to_string())
    }

    fn numbers(&self, key: &str, raw: &str, n: usize) -> Result<Vec<f64>, SceneError> {
        let values = raw.split_whitespace()
            .map(|part| self.parse(key, part))
            .collect::<Result<Vec<f64>, _>>()?;
        if values.len() != n {
            return Err(SceneError::Document(format!(
                "<{}>: '{key}' expects {n} numbers, found {}", self.element, values.len())));
        }
        Ok(values)
    }

    fn v3(&self, key: &str) -> Result<V3, SceneError> {
        let v = self.numbers(key, self.require(key)?, 3)?;
        Ok(V3(v[0], v[1], v[2]))
    }

    fn v3_or(&self, key: &str, default: V3) -> Result<V3, SceneError> {
        match self.get(key) {
            Some(raw) => {
                let v = self.numbers(key, raw, 3)?;
                Ok(V3(v[0], v[1], v[2]))
            }
            None => Ok(default),
        }
    }

    fn v2_or(&self, key: &str, default: V2) -> Result<V2, SceneError> {
        match self.get(key) {
            Some(raw) => {
                let v = self.numbers(key, raw, 2)?;
                Ok(V2(v[0], v[1]))
            }
            None => Ok(default),
        }
    }
}

// Element parsers

fn parse_config(attrs: &Attrs) -> Result<ConfigElement, SceneError> {
    let acceleration = match attrs.get("acceleration").unwrap_or("linear") {
        "linear" => Acceleration::Linear,
        "bvh" => Acceleration::Bvh,
        other => return Err(SceneError::Document(
            format!("<config>: unknown acceleration '{other}' (expected 'linear' or 'bvh')"))),
    };
    Ok(ConfigElement {
        width: attrs.usize("width")?,
        aspect: attrs.f64("aspect")?,
        samples: attrs.u32_or("samples", 100)?,
        max_depth: attrs.u32_or("max-depth", 50)?,
        acceleration,
    })
}

fn parse_camera(attrs: &Attrs) -> Result<CameraElement, SceneError> {
    Ok(CameraElement {
        look_from: attrs.v3("look-from")?,
        look_at: attrs.v3("look-at")?,
        up: attrs.v3_or("up", V3::POS_Y)?,
        fov: attrs.f64_or("fov", 60.0)?,
        aperture: attrs.f64_or("aperture", 0.0)?,
        focus_dist: attrs.get("focus-dist").map(|raw| attrs.parse("focus-dist", raw)).transpose()?,
    })
}

fn parse_material(attrs: &Attrs) -> Result<MaterialElement, SceneError> {
    let name = attrs.string("name")?;
    let kind = match attrs.require("type")? {
        "lambertian" => MaterialKind::Lambertian { albedo: attrs.v3("albedo")? },
        "metal" => MaterialKind::Metal {
            albedo: attrs.v3("albedo")?,
            fuzz: attrs.f64_or("fuzz", 0.0)?,
        },
        "dielectric" => MaterialKind::Dielectric { ref_index: attrs.f64_or("ref-index", 1.5)? },
        "emissive" => MaterialKind::Emissive { color: attrs.v3("color")? },
        other => return Err(SceneError::UnknownMaterialType(other.to_string())),
    };
    Ok(MaterialElement { name, kind })
}

/// Parses a scene document of the shape
/// `<scene><config …/><camera …/><material …/><sphere …/>…</scene>`.
pub fn parse_document(xml: &str) -> Result<SceneDocument, SceneError> {
    let mut reader = Reader::from_reader(xml.as_bytes());
    let mut buf = Vec::new();
    let mut doc = SceneDocument::default();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(start) | Event::Empty(start) => {
                match start.name().as_ref() {
                    b"scene" => {}
                    b"config" => {
                        let attrs = Attrs::read("config", &start)?;
                        doc.config = Some(parse_config(&attrs)?);
                    }
                    b"camera" => {
                        let attrs = Attrs::read("camera", &start)?;
                        doc.camera = Some(parse_camera(&attrs)?);
                    }
                    b"sun" => {
                        let attrs = Attrs::read("sun", &start)?;
                        doc.sun = Some(SunElement {
                            direction: attrs.v3("direction")?,
                            color: attrs.v3("color")?,
                        });
                    }
                    b"point-light" => {
                        let attrs = Attrs::read("point-light", &start)?;
                        doc.point_lights.push(PointLightElement {
                            position: attrs.v3("position")?,
                            color: attrs.v3("color")?,
                            intensity: attrs.f64_or("intensity", 1.0)?,
                            radius: attrs.f64_or("radius", 0.0)?,
                        });
                    }
                    b"environment" => {
                        let attrs = Attrs::read("environment", &start)?;
                        doc.environment = Some(EnvironmentElement {
                            file: attrs.string("file")?,
                            intensity: attrs.f64_or("intensity", 1.0)?,
                            rotation: attrs.f64_or("rotation", 0.0)?,
                        });
                    }
                    b"material" => {
                        let attrs = Attrs::read("material", &start)?;
                        doc.materials.push(parse_material(&attrs)?);
                    }
                    b"sphere" => {
                        let attrs = Attrs::read("sphere", &start)?;
                        doc.primitives.push(PrimitiveElement::Sphere {
                            center: attrs.v3("center")?,
                            radius: attrs.f64("radius")?,
                            material: attrs.string("material")?,
                        });
                    }
                    b"triangle" => {
                        let attrs = Attrs::read("triangle", &start)?;
                        doc.primitives.push(PrimitiveElement::Triangle {
                            a: attrs.v3("a")?,
                            b: attrs.v3("b")?,
                            c: attrs.v3("c")?,
                            uv_a: attrs.v2_or("uv-a", V2::ZERO)?,
                            uv_b: attrs.v2_or("uv-b", V2::ZERO)?,
                            uv_c: attrs.v2_or("uv-c", V2::ZERO)?,
                            material: attrs.string("material")?,
                        });
                    }
                    b"mesh" => {
                        let attrs = Attrs::read("mesh", &start)?;
                        doc.primitives.push(PrimitiveElement::Mesh {
                            file: attrs.string("file")?,
                            position: attrs.v3_or("position", V3::ZERO)?,
                            scale: attrs.v3_or("scale", V3::ONE)?,
                            rotation: attrs.v3_or("rotation", V3::ZERO)?,
                            material: attrs.string("material")?,
                        });
                    }
                    other => {
                        log::warn!(
                            "Ignoring unknown scene element <{}>",
                            String::from_utf8_lossy(other));
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(doc)
}
