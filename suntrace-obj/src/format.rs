use std::io::{ BufRead, BufReader, Read };

use suntrace_impl::types::{ V2, V3 };

use crate::ObjError;

// Obj parser
//
// Supports the `v`, `vt` and `f` directives only; polygonal faces are
// fan-triangulated. Indices are the format's 1-based kind.
// Everything else (normals, groups, materials) is ignored: meshes get
// their material from the scene description.

/// A face corner: indices into the model's vertex and uv lists,
/// already converted to 0-based.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ObjVertex {
    pub vertex_index: usize,
    pub uv_index: Option<usize>,
}

/// One triangle of the model.
#[derive(Debug, Copy, Clone)]
pub struct ObjFace {
    pub a: ObjVertex,
    pub b: ObjVertex,
    pub c: ObjVertex,
}

#[derive(Default)]
pub struct ObjModel {
    pub vertices: Vec<V3>,
    pub uv: Vec<V2>,
    pub faces: Vec<ObjFace>,
}

impl ObjModel {
    pub fn vertex(&self, v: ObjVertex) -> Option<V3> {
        self.vertices.get(v.vertex_index).copied()
    }

    pub fn uv(&self, v: ObjVertex) -> V2 {
        v.uv_index
            .and_then(|i| self.uv.get(i))
            .copied()
            .unwrap_or_default()
    }
}

fn parse_elements<T, const N: usize>(line: &str) -> Option<[T; N]>
    where T: std::str::FromStr, T: Default, T: Copy
{
    let mut values = [Default::default(); N];
    let mut parts = line.split_whitespace();
    for value in values.iter_mut() {
        *value = parts.next()?.parse().ok()?;
    }
    Some(values)
}

// Parses face corners of the form `v`, `v/vt`, `v/vt/vn` or `v//vn`
fn parse_face_vertex(part: &str, line_no: usize) -> Result<ObjVertex, ObjError> {
    let bad = || ObjError::General(format!("Unable to parse face vertex on line {line_no}: {part}"));

    let mut indices = part.split('/');
    let vertex_index: usize = indices.next()
        .and_then(|v| v.parse().ok())
        .ok_or_else(bad)?;
    let uv_index: Option<usize> = match indices.next() {
        None | Some("") => None,
        Some(v) => Some(v.parse().map_err(|_| bad())?),
    };
    // Normal index, ignored
    let _ = indices.next();
    if indices.next().is_some() {
        return Err(bad());
    }
    if vertex_index == 0 {
        // OBJ indices are 1-based
        return Err(bad());
    }
    Ok(ObjVertex {
        vertex_index: vertex_index - 1,
        uv_index: uv_index.map(|i| i.saturating_sub(1)),
    })
}

pub fn parse_obj(source: &mut dyn Read) -> Result<ObjModel, ObjError> {
    let mut model = ObjModel::default();

    for (line_no, line) in BufReader::new(source).lines().enumerate() {
        let line = line?;
        let line = line.trim();
        // Skip comments
        if line.starts_with('#') {
            continue;
        }
        match line.split_once(char::is_whitespace) {
            // Vertex
            Some(("v", data)) => {
                let [x, y, z] = parse_elements(data)
                    .ok_or_else(|| ObjError::General(format!("Unable to parse vertex on line {line_no}: {data}")))?;
                model.vertices.push(V3(x, y, z));
            },
            // Texture coordinate
            Some(("vt", data)) => {
                let [u, v] = parse_elements(data)
                    .ok_or_else(|| ObjError::General(format!("Unable to parse texture vertex on line {line_no}: {data}")))?;
                model.uv.push(V2(u, v));
            },
            // Face, fan-triangulated when more than three corners
            Some(("f", data)) => {
                let corners = data.split_whitespace()
                    .map(|part| parse_face_vertex(part, line_no))
                    .collect::<Result<Vec<_>, _>>()?;
                if corners.len() < 3 {
                    return Err(ObjError::General(format!("Face with fewer than 3 vertices on line {line_no}")));
                }
                for i in 1..corners.len() - 1 {
                    model.faces.push(ObjFace {
                        a: corners[0],
                        b: corners[i],
                        c: corners[i + 1],
                    });
                }
            },
            _ => {}
        }
    }

    Ok(model)
}

#[cfg(test)]
mod obj_parser_tests {
    use suntrace_impl::types::{ V2, V3 };
    use super::parse_obj;

    fn parse(text: &str) -> super::ObjModel {
        parse_obj(&mut text.as_bytes()).expect("parse")
    }

    #[test]
    fn parses_vertices_uvs_and_faces() {
        let model = parse("\
# a triangle
v 0 0 0
v 1 0 0
v 0 1 0
vt 0 0
vt 1 0
vt 0 1
f 1/1 2/2 3/3
");
        assert_eq!(model.vertices, vec![V3(0.0, 0.0, 0.0), V3(1.0, 0.0, 0.0), V3(0.0, 1.0, 0.0)]);
        assert_eq!(model.uv.len(), 3);
        assert_eq!(model.faces.len(), 1);
        let face = model.faces[0];
        assert_eq!(model.vertex(face.b), Some(V3(1.0, 0.0, 0.0)));
        assert_eq!(model.uv(face.c), V2(0.0, 1.0));
    }

    #[test]
    fn quads_are_fan_triangulated() {
        let model = parse("\
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
f 1 2 3 4
");
        assert_eq!(model.faces.len(), 2);
        assert_eq!(model.faces[0].a.vertex_index, 0);
        assert_eq!(model.faces[1].b.vertex_index, 2);
        assert_eq!(model.faces[1].c.vertex_index, 3);
    }

    #[test]
    fn face_corners_without_uvs_default_to_zero() {
        let model = parse("\
v 0 0 0
v 1 0 0
v 0 1 0
f 1//1 2//2 3//3
");
        let face = model.faces[0];
        assert_eq!(face.a.uv_index, None);
        assert_eq!(model.uv(face.a), V2(0.0, 0.0));
    }

    #[test]
    fn malformed_vertex_is_an_error() {
        let result = parse_obj(&mut "v 1.0 nope 2.0".as_bytes());
        assert!(result.is_err());
    }

    #[test]
    fn zero_face_index_is_an_error() {
        let result = parse_obj(&mut "v 0 0 0\nf 0 1 1".as_bytes());
        assert!(result.is_err());
    }

    #[test]
    fn unknown_directives_are_ignored() {
        let model = parse("\
mtllib scene.mtl
o thing
vn 0 0 1
s off
v 0 0 0
");
        assert_eq!(model.vertices.len(), 1);
        assert!(model.faces.is_empty());
    }
}
