//! Voxel-to-surface extraction
//!
//! Runs marching cubes over the occupancy field of a label grid: a cell
//! corner is inside when its label is non-zero. The surface separates empty
//! from filled voxels only; boundaries between two different non-zero labels
//! produce no faces. Each face takes the label of the nearest filled corner of
//! its cell, and faces are grouped into one material per label.
//!
//! Output coordinates are in the unpadded grid frame: cell `(x, y, z)` is
//! centered on the point `(x, y, z)` whatever the padding.

use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use glam::{UVec3, Vec3};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::core::Error;
use crate::core::types::Result;
use crate::export;
use crate::voxel::grid::{EMPTY, VoxelGrid};
use crate::voxel::palette::Palette;

use super::tables::{CORNER_OFFSETS, EDGE_CORNERS, EDGE_TABLE, TRI_TABLE};
use super::trimesh::{Material, TriMesh};

/// Extraction parameters
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractOptions {
    /// Empty cells added on every side before meshing so boundary voxels get closed surfaces
    pub padding: u32,
    /// Threshold on the 0/1 occupancy field, in (0, 1)
    pub iso_level: f32,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            padding: 1,
            iso_level: 0.5,
        }
    }
}

impl ExtractOptions {
    pub fn with_padding(padding: u32) -> Self {
        Self {
            padding,
            ..Default::default()
        }
    }
}

/// Result of an extraction
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Extraction {
    /// Surface mesh with one material per label
    pub mesh: TriMesh,
    /// Populated labels that had no palette entry and used the default appearance
    pub missing_labels: Vec<u32>,
}

/// Grid edge identity: flat index of its lower corner plus axis (0=x, 1=y, 2=z)
type EdgeKey = (usize, u8);

/// Triangle emitted by a slab before vertex welding
struct RawTriangle {
    corners: [(EdgeKey, Vec3); 3],
    label: u32,
}

/// Extract a triangle mesh approximating the empty/filled boundary
pub fn extract(grid: &VoxelGrid, palette: &Palette, options: &ExtractOptions) -> Result<Extraction> {
    if grid.is_empty() {
        return Err(Error::InvalidGrid("grid has no cells".to_string()));
    }

    let missing_labels = missing_palette_labels(grid, palette);

    if !(options.iso_level > 0.0 && options.iso_level < 1.0) {
        log::warn!("iso level {} outside (0, 1); surface will be empty", options.iso_level);
    }

    let padded = grid.padded(options.padding);
    let dims = padded.dims();
    let offset = Vec3::splat(options.padding as f32);

    let slabs: Vec<Vec<RawTriangle>> = (0..dims.z.saturating_sub(1))
        .into_par_iter()
        .map(|z| mesh_slab(&padded, z, options.iso_level, offset))
        .collect();

    let mesh = weld(slabs, palette);

    log::info!(
        "Extracted {} vertices, {} faces from {}x{}x{} grid (padding {})",
        mesh.vertex_count(),
        mesh.face_count(),
        grid.depth(),
        grid.height(),
        grid.width(),
        options.padding
    );

    Ok(Extraction { mesh, missing_labels })
}

/// Extract and write the mesh to `path`, format chosen by extension
pub fn extract_to_file(
    grid: &VoxelGrid,
    palette: &Palette,
    options: &ExtractOptions,
    path: &Path,
) -> Result<Extraction> {
    let extraction = extract(grid, palette, options)?;
    export::write_mesh(&extraction.mesh, path)?;
    Ok(extraction)
}

/// Labels present in the grid without a palette entry, each warned about once
fn missing_palette_labels(grid: &VoxelGrid, palette: &Palette) -> Vec<u32> {
    let missing: Vec<u32> = grid
        .label_counts()
        .into_keys()
        .filter(|label| !palette.contains(*label))
        .collect();
    for label in &missing {
        log::warn!("No palette entry for label {}; using default appearance", label);
    }
    missing
}

/// March every cell whose lower corner lies in layer `z`
fn mesh_slab(grid: &VoxelGrid, z: u32, iso_level: f32, offset: Vec3) -> Vec<RawTriangle> {
    let dims = grid.dims();
    let mut triangles = Vec::new();

    for y in 0..dims.y.saturating_sub(1) {
        for x in 0..dims.x.saturating_sub(1) {
            let base = UVec3::new(x, y, z);
            let mut corner_pos = [UVec3::ZERO; 8];
            let mut labels = [EMPTY; 8];
            let mut values = [0.0f32; 8];
            let mut case = 0usize;

            for (i, off) in CORNER_OFFSETS.iter().enumerate() {
                let p = base + UVec3::from_array(*off);
                corner_pos[i] = p;
                labels[i] = grid.labels()[grid.index(p.x, p.y, p.z)];
                values[i] = if labels[i] != EMPTY { 1.0 } else { 0.0 };
                // bit set for outside corners keeps the table's winding facing outward
                if values[i] < iso_level {
                    case |= 1 << i;
                }
            }

            let crossed = EDGE_TABLE[case];
            if crossed == 0 {
                continue;
            }

            let mut edge_verts = [((0usize, 0u8), Vec3::ZERO); 12];
            for (e, &[a, b]) in EDGE_CORNERS.iter().enumerate() {
                if crossed & (1 << e) == 0 {
                    continue;
                }
                let (pa, pb) = (corner_pos[a], corner_pos[b]);
                let lower = pa.min(pb);
                let axis = if pa.x != pb.x { 0 } else if pa.y != pb.y { 1 } else { 2 };
                let key = (grid.index(lower.x, lower.y, lower.z), axis);

                let (va, vb) = (values[a], values[b]);
                let t = if (vb - va).abs() < f32::EPSILON { 0.5 } else { (iso_level - va) / (vb - va) };
                let (fa, fb) = (pa.as_vec3(), pb.as_vec3());
                edge_verts[e] = (key, fa + (fb - fa) * t.clamp(0.0, 1.0) - offset);
            }

            for tri in TRI_TABLE[case].chunks_exact(3).take_while(|t| t[0] != -1) {
                let corners = [
                    edge_verts[tri[0] as usize],
                    edge_verts[tri[1] as usize],
                    edge_verts[tri[2] as usize],
                ];
                let centroid = (corners[0].1 + corners[1].1 + corners[2].1) / 3.0 + offset;
                let label = nearest_filled_label(&corner_pos, &labels, centroid);
                triangles.push(RawTriangle { corners, label });
            }
        }
    }

    triangles
}

/// Label of the filled corner closest to `point`; first corner wins ties
fn nearest_filled_label(corner_pos: &[UVec3; 8], labels: &[u32; 8], point: Vec3) -> u32 {
    let mut best = (f32::INFINITY, EMPTY);
    for (pos, &label) in corner_pos.iter().zip(labels) {
        if label == EMPTY {
            continue;
        }
        let d = pos.as_vec3().distance_squared(point);
        if d < best.0 {
            best = (d, label);
        }
    }
    best.1
}

/// Merge slab triangles in order, sharing one vertex per crossed grid edge
fn weld(slabs: Vec<Vec<RawTriangle>>, palette: &Palette) -> TriMesh {
    let mut positions = Vec::new();
    let mut faces = Vec::new();
    let mut face_labels = Vec::new();
    let mut vertex_ids: HashMap<EdgeKey, u32> = HashMap::new();

    for tri in slabs.into_iter().flatten() {
        let face = tri.corners.map(|(key, pos)| {
            *vertex_ids.entry(key).or_insert_with(|| {
                positions.push(pos);
                positions.len() as u32 - 1
            })
        });
        faces.push(face);
        face_labels.push(tri.label);
    }

    if faces.is_empty() {
        return TriMesh::default();
    }

    let labels: BTreeSet<u32> = face_labels.iter().copied().collect();
    let materials: Vec<Material> = labels
        .iter()
        .map(|&label| Material::for_label(label, *palette.resolve(label)))
        .collect();
    let material_index: HashMap<u32, u32> = labels
        .iter()
        .enumerate()
        .map(|(i, &label)| (label, i as u32))
        .collect();
    let face_materials = face_labels.iter().map(|l| material_index[l]).collect();

    TriMesh {
        positions,
        faces,
        vertex_colors: None,
        face_materials: Some(face_materials),
        materials,
    }
}
