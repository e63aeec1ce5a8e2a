//! Binary glTF 2.0 writer
//!
//! One mesh with shared vertex attributes and one primitive per material
//! group. Translucent materials are written with `alphaMode: BLEND`.

use std::fs;
use std::path::Path;

use serde_json::{Value, json};

use crate::core::Error;
use crate::core::types::Result;
use crate::mesh::TriMesh;
use crate::voxel::palette::Appearance;

/// "glTF"
const GLB_MAGIC: u32 = 0x4654_6C67;
const GLB_VERSION: u32 = 2;
const CHUNK_JSON: u32 = 0x4E4F_534A;
const CHUNK_BIN: u32 = 0x004E_4942;

const FLOAT: u32 = 5126;
const UNSIGNED_INT: u32 = 5125;
const ARRAY_BUFFER: u32 = 34962;
const ELEMENT_ARRAY_BUFFER: u32 = 34963;

/// Binary buffer under construction plus the views and accessors into it
#[derive(Default)]
struct BufferBuilder {
    data: Vec<u8>,
    views: Vec<Value>,
    accessors: Vec<Value>,
}

impl BufferBuilder {
    /// Append `bytes` as a new buffer view and return the accessor index
    fn push(&mut self, bytes: &[u8], target: u32, accessor: Value) -> usize {
        let offset = self.data.len();
        self.data.extend_from_slice(bytes);
        while self.data.len() % 4 != 0 {
            self.data.push(0);
        }
        self.views.push(json!({
            "buffer": 0,
            "byteOffset": offset,
            "byteLength": bytes.len(),
            "target": target,
        }));

        let mut accessor = accessor;
        accessor["bufferView"] = json!(self.views.len() - 1);
        self.accessors.push(accessor);
        self.accessors.len() - 1
    }
}

fn material_json(name: &str, appearance: &Appearance) -> Value {
    let [r, g, b, _] = appearance.color.to_f32();
    let mut material = json!({
        "name": name,
        "pbrMetallicRoughness": {
            "baseColorFactor": [r, g, b, appearance.opacity],
            "metallicFactor": 0.0,
            "roughnessFactor": 0.8,
        },
        "doubleSided": true,
    });
    if !appearance.is_opaque() {
        material["alphaMode"] = json!("BLEND");
    }
    material
}

/// Encode `mesh` as a complete GLB file
pub fn encode_glb(mesh: &TriMesh) -> Result<Vec<u8>> {
    let mut buffer = BufferBuilder::default();
    let mut materials: Vec<Value> = mesh
        .materials
        .iter()
        .map(|m| material_json(&m.name, &m.appearance))
        .collect();

    let mut meshes = Vec::new();
    let mut nodes = Vec::new();

    if !mesh.is_empty() {
        let bounds = mesh.bounds().unwrap_or_default();
        let position = buffer.push(
            bytemuck::cast_slice(&mesh.positions),
            ARRAY_BUFFER,
            json!({
                "componentType": FLOAT,
                "count": mesh.vertex_count(),
                "type": "VEC3",
                "min": bounds.min.to_array(),
                "max": bounds.max.to_array(),
            }),
        );

        let normals = mesh.vertex_normals();
        let normal = buffer.push(
            bytemuck::cast_slice(&normals),
            ARRAY_BUFFER,
            json!({ "componentType": FLOAT, "count": normals.len(), "type": "VEC3" }),
        );

        let mut attributes = json!({ "POSITION": position, "NORMAL": normal });
        if let Some(colors) = &mesh.vertex_colors {
            let floats: Vec<[f32; 4]> = colors.iter().map(|c| c.to_f32()).collect();
            let color = buffer.push(
                bytemuck::cast_slice(&floats),
                ARRAY_BUFFER,
                json!({ "componentType": FLOAT, "count": floats.len(), "type": "VEC4" }),
            );
            attributes["COLOR_0"] = json!(color);
        }

        let translucent_colors = mesh
            .vertex_colors
            .as_ref()
            .is_some_and(|colors| colors.iter().any(|c| c.a < 255));
        let mut default_material: Option<usize> = None;
        let mut primitives = Vec::new();
        for (group, faces) in mesh.material_groups() {
            let indices: Vec<[u32; 3]> = faces.iter().map(|&f| mesh.faces[f]).collect();
            let accessor = buffer.push(
                bytemuck::cast_slice(&indices),
                ELEMENT_ARRAY_BUFFER,
                json!({ "componentType": UNSIGNED_INT, "count": indices.len() * 3, "type": "SCALAR" }),
            );
            let material = match group {
                Some(m) => m,
                None => *default_material.get_or_insert_with(|| {
                    let mut fallback = material_json("default", &Appearance::default());
                    // COLOR_0 alpha only takes effect under a blending material
                    if translucent_colors {
                        fallback["alphaMode"] = json!("BLEND");
                    }
                    materials.push(fallback);
                    materials.len() - 1
                }),
            };
            primitives.push(json!({
                "attributes": attributes.clone(),
                "indices": accessor,
                "material": material,
                "mode": 4,
            }));
        }

        meshes.push(json!({ "name": "voxsculpt", "primitives": primitives }));
        nodes.push(json!({ "name": "voxsculpt", "mesh": 0 }));
    }

    let mut document = json!({
        "asset": { "version": "2.0", "generator": "voxsculpt" },
        "scene": 0,
        "scenes": [{ "nodes": (0..nodes.len()).collect::<Vec<_>>() }],
        "nodes": nodes,
    });
    if !meshes.is_empty() {
        document["meshes"] = json!(meshes);
        document["materials"] = json!(materials);
        document["accessors"] = json!(buffer.accessors);
        document["bufferViews"] = json!(buffer.views);
        document["buffers"] = json!([{ "byteLength": buffer.data.len() }]);
    }

    let mut json_bytes = serde_json::to_vec(&document)?;
    while json_bytes.len() % 4 != 0 {
        json_bytes.push(b' ');
    }

    let bin_len = if buffer.data.is_empty() { 0 } else { 8 + buffer.data.len() };
    let total = 12 + 8 + json_bytes.len() + bin_len;

    let mut out = Vec::with_capacity(total);
    out.extend_from_slice(&GLB_MAGIC.to_le_bytes());
    out.extend_from_slice(&GLB_VERSION.to_le_bytes());
    out.extend_from_slice(&(total as u32).to_le_bytes());
    out.extend_from_slice(&(json_bytes.len() as u32).to_le_bytes());
    out.extend_from_slice(&CHUNK_JSON.to_le_bytes());
    out.extend_from_slice(&json_bytes);
    if !buffer.data.is_empty() {
        out.extend_from_slice(&(buffer.data.len() as u32).to_le_bytes());
        out.extend_from_slice(&CHUNK_BIN.to_le_bytes());
        out.extend_from_slice(&buffer.data);
    }
    Ok(out)
}

/// Write `mesh` to `path` as GLB
pub fn write_glb(mesh: &TriMesh, path: &Path) -> Result<()> {
    let bytes = encode_glb(mesh)?;
    fs::write(path, &bytes).map_err(|e| Error::export(path, e))?;
    log::info!(
        "Wrote {} ({} vertices, {} faces, {} bytes)",
        path.display(),
        mesh.vertex_count(),
        mesh.face_count(),
        bytes.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::{Material, primitives};
    use crate::voxel::palette::Rgba;
    use glam::Vec3;

    fn u32_at(bytes: &[u8], offset: usize) -> u32 {
        u32::from_le_bytes(bytes[offset..offset + 4].try_into().unwrap())
    }

    /// Split a GLB into its JSON document and binary chunk
    fn parse(bytes: &[u8]) -> (Value, Vec<u8>) {
        assert_eq!(u32_at(bytes, 0), GLB_MAGIC);
        assert_eq!(u32_at(bytes, 4), 2);
        assert_eq!(u32_at(bytes, 8) as usize, bytes.len());
        let json_len = u32_at(bytes, 12) as usize;
        assert_eq!(u32_at(bytes, 16), CHUNK_JSON);
        let doc = serde_json::from_slice(&bytes[20..20 + json_len]).unwrap();
        let rest = &bytes[20 + json_len..];
        let bin = if rest.is_empty() {
            Vec::new()
        } else {
            assert_eq!(u32_at(rest, 4), CHUNK_BIN);
            rest[8..8 + u32_at(rest, 0) as usize].to_vec()
        };
        (doc, bin)
    }

    #[test]
    fn test_cuboid_layout() {
        let bytes = encode_glb(&primitives::cuboid(Vec3::splat(2.0))).unwrap();
        assert_eq!(bytes.len() % 4, 0);
        let (doc, bin) = parse(&bytes);
        assert_eq!(doc["accessors"][0]["count"], 8);
        assert_eq!(doc["accessors"][0]["max"][0], 1.0);
        let primitive = &doc["meshes"][0]["primitives"][0];
        assert_eq!(doc["accessors"][primitive["indices"].as_u64().unwrap() as usize]["count"], 36);
        assert_eq!(doc["materials"][0]["name"], "default");
        // positions + normals + indices
        assert_eq!(bin.len(), 8 * 12 + 8 * 12 + 36 * 4);
    }

    #[test]
    fn test_translucent_material_and_colors() {
        let mut mesh = primitives::triangle([Vec3::ZERO, Vec3::X, Vec3::Y]);
        mesh.paint(Rgba::rgb(255, 0, 0));
        mesh.set_material(Material::for_label(2, Appearance::new(Rgba::rgb(0, 255, 0), 0.4)));
        let (doc, _) = parse(&encode_glb(&mesh).unwrap());
        let material = &doc["materials"][0];
        assert_eq!(material["alphaMode"], "BLEND");
        let alpha = material["pbrMetallicRoughness"]["baseColorFactor"][3].as_f64().unwrap();
        assert!((alpha - 0.4).abs() < 1e-6);
        assert!(doc["meshes"][0]["primitives"][0]["attributes"]["COLOR_0"].is_u64());
    }

    #[test]
    fn test_translucent_vertex_colors_blend_default_material() {
        let mut mesh = primitives::triangle([Vec3::ZERO, Vec3::X, Vec3::Y]);
        mesh.paint(Rgba::rgba(100, 255, 255, 200));
        let (doc, _) = parse(&encode_glb(&mesh).unwrap());
        assert_eq!(doc["materials"][0]["name"], "default");
        assert_eq!(doc["materials"][0]["alphaMode"], "BLEND");

        let mut opaque = primitives::triangle([Vec3::ZERO, Vec3::X, Vec3::Y]);
        opaque.paint(Rgba::rgb(100, 255, 255));
        let (doc, _) = parse(&encode_glb(&opaque).unwrap());
        assert!(doc["materials"][0].get("alphaMode").is_none());
    }

    #[test]
    fn test_empty_mesh() {
        let (doc, bin) = parse(&encode_glb(&TriMesh::default()).unwrap());
        assert!(bin.is_empty());
        assert!(doc.get("meshes").is_none());
        assert_eq!(doc["asset"]["version"], "2.0");
    }

    #[test]
    fn test_write_glb_error_path() {
        let dir = tempfile::tempdir().unwrap();
        let err = write_glb(&TriMesh::default(), &dir.path().join("missing/out.glb")).unwrap_err();
        assert!(matches!(err, Error::Export { .. }));
    }
}
