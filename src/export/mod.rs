//! Mesh file export

pub mod glb;
pub mod obj;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::types::Result;
use crate::mesh::TriMesh;

pub use glb::write_glb;
pub use obj::write_obj;

/// Output file format
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Wavefront OBJ with a companion MTL
    #[default]
    Obj,
    /// Binary glTF 2.0
    Glb,
}

impl ExportFormat {
    /// Format implied by the file extension, if recognized
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        Self::from_name(&ext)
    }

    /// Parse a format name such as `obj` or `glb`
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "obj" => Some(ExportFormat::Obj),
            "glb" | "gltf" => Some(ExportFormat::Glb),
            _ => None,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Obj => "obj",
            ExportFormat::Glb => "glb",
        }
    }
}

/// Write `mesh` in the given format
pub fn write_mesh_as(mesh: &TriMesh, path: &Path, format: ExportFormat) -> Result<()> {
    match format {
        ExportFormat::Obj => write_obj(mesh, path),
        ExportFormat::Glb => write_glb(mesh, path),
    }
}

/// Write `mesh` in the format implied by the extension, OBJ when unrecognized
pub fn write_mesh(mesh: &TriMesh, path: &Path) -> Result<()> {
    let format = ExportFormat::from_path(path).unwrap_or_else(|| {
        log::warn!("Unrecognized extension on {}; writing OBJ", path.display());
        ExportFormat::Obj
    });
    write_mesh_as(mesh, path, format)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_path() {
        assert_eq!(ExportFormat::from_path(Path::new("cake.obj")), Some(ExportFormat::Obj));
        assert_eq!(ExportFormat::from_path(Path::new("out/ship.GLB")), Some(ExportFormat::Glb));
        assert_eq!(ExportFormat::from_path(Path::new("model.stl")), None);
        assert_eq!(ExportFormat::from_path(Path::new("noext")), None);
    }

    #[test]
    fn test_format_serde() {
        let f: ExportFormat = serde_json::from_str("\"glb\"").unwrap();
        assert_eq!(f, ExportFormat::Glb);
        assert_eq!(serde_json::to_string(&ExportFormat::Obj).unwrap(), "\"obj\"");
    }
}
