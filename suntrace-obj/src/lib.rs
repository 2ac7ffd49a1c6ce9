mod format;

pub use format::{ parse_obj, ObjFace, ObjModel, ObjVertex };

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

#[derive(thiserror::Error, Debug)]
pub enum ObjError {
    #[error("Error parsing OBJ file: {0}")]
    General(String),
    #[error("IO Error")]
    IoError(#[from] std::io::Error),
}

/// Loads and parses a Wavefront OBJ file from disk.
pub fn load_obj(path: &Path) -> Result<ObjModel, ObjError> {
    let file = File::open(path)?;
    let model = parse_obj(&mut BufReader::new(file))?;
    log::debug!(
        "Parsed {}: {} vertices, {} uvs, {} faces",
        path.display(), model.vertices.len(), model.uv.len(), model.faces.len());
    Ok(model)
}
