pub mod convert;
pub mod document;
pub mod envmap;

pub use convert::build_world;
pub use document::{ parse_document, SceneDocument };

use std::path::Path;

#[derive(thiserror::Error, Debug)]
pub enum SceneError {
    #[error("IO error reading scene")]
    Io(#[from] std::io::Error),
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("Scene document: {0}")]
    Document(String),
    #[error("Unknown material '{0}'")]
    UnknownMaterial(String),
    #[error("Unknown material type '{0}'")]
    UnknownMaterialType(String),
    #[error("Failed to load mesh '{0}'")]
    Mesh(String, #[source] suntrace_obj::ObjError),
    #[error("Failed to load environment map '{0}'")]
    Environment(String, #[source] image::ImageError),
}

/// Reads, parses and converts a scene file into a render-ready `World`.
///
/// Mesh and environment file paths are resolved as given first, then
/// relative to the scene file's directory.
pub fn load_scene(path: &Path) -> Result<suntrace_impl::world::World, SceneError> {
    let text = std::fs::read_to_string(path)?;
    let document = parse_document(&text)?;
    build_world(&document, path.parent())
}
