//! Wavefront OBJ + MTL writer

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use crate::core::Error;
use crate::core::types::Result;
use crate::mesh::TriMesh;

/// OBJ text and, when the mesh has materials, the MTL text it references
pub struct ObjDocument {
    pub obj: String,
    pub mtl: Option<String>,
}

/// Encode `mesh` as OBJ text referencing `mtl_name` for materials
pub fn encode_obj(mesh: &TriMesh, mtl_name: &str) -> ObjDocument {
    let mut obj = String::new();
    let has_materials = mesh.face_materials.is_some() && !mesh.materials.is_empty();

    let _ = writeln!(obj, "# voxsculpt");
    let _ = writeln!(obj, "# {} vertices, {} faces", mesh.vertex_count(), mesh.face_count());
    if has_materials {
        let _ = writeln!(obj, "mtllib {}", mtl_name);
    }

    for (i, p) in mesh.positions.iter().enumerate() {
        match &mesh.vertex_colors {
            Some(colors) => {
                let [r, g, b, _] = colors[i].to_f32();
                let _ = writeln!(obj, "v {} {} {} {:.4} {:.4} {:.4}", p.x, p.y, p.z, r, g, b);
            }
            None => {
                let _ = writeln!(obj, "v {} {} {}", p.x, p.y, p.z);
            }
        }
    }

    for (material, faces) in mesh.material_groups() {
        if let (true, Some(m)) = (has_materials, material) {
            let _ = writeln!(obj, "usemtl {}", mesh.materials[m].name);
        }
        for face in faces {
            let [a, b, c] = mesh.faces[face];
            let _ = writeln!(obj, "f {} {} {}", a + 1, b + 1, c + 1);
        }
    }

    let mtl = has_materials.then(|| encode_mtl(mesh));
    ObjDocument { obj, mtl }
}

fn encode_mtl(mesh: &TriMesh) -> String {
    let mut mtl = String::new();
    for material in &mesh.materials {
        let [r, g, b, _] = material.appearance.color.to_f32();
        let _ = writeln!(mtl, "newmtl {}", material.name);
        let _ = writeln!(mtl, "Kd {:.4} {:.4} {:.4}", r, g, b);
        let _ = writeln!(mtl, "d {:.4}", material.appearance.opacity);
        let _ = writeln!(mtl, "illum 2");
        let _ = writeln!(mtl);
    }
    mtl
}

/// Write `mesh` to `path`, with a `.mtl` beside it when materials are present
pub fn write_obj(mesh: &TriMesh, path: &Path) -> Result<()> {
    let mtl_path = path.with_extension("mtl");
    let mtl_name = mtl_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "materials.mtl".to_string());

    let doc = encode_obj(mesh, &mtl_name);
    fs::write(path, doc.obj).map_err(|e| Error::export(path, e))?;
    if let Some(mtl) = doc.mtl {
        fs::write(&mtl_path, mtl).map_err(|e| Error::export(&mtl_path, e))?;
    }

    log::info!(
        "Wrote {} ({} vertices, {} faces, {} materials)",
        path.display(),
        mesh.vertex_count(),
        mesh.face_count(),
        mesh.materials.len()
    );
    Ok(())
}
