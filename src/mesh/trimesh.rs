//! Indexed triangle mesh with optional vertex colors and face materials

use glam::{Mat4, Vec3};

use crate::math::Aabb;
use crate::voxel::palette::{Appearance, Rgba};

/// Named surface material, optionally tied to the voxel label it came from
#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    pub name: String,
    pub label: Option<u32>,
    pub appearance: Appearance,
}

impl Material {
    pub fn new(name: impl Into<String>, appearance: Appearance) -> Self {
        Self {
            name: name.into(),
            label: None,
            appearance,
        }
    }

    /// Material for a voxel label, named `label_<n>`
    pub fn for_label(label: u32, appearance: Appearance) -> Self {
        Self {
            name: format!("label_{}", label),
            label: Some(label),
            appearance,
        }
    }
}

/// Triangle mesh
///
/// Faces index into `positions`. `vertex_colors`, when present, has one entry
/// per vertex; `face_materials`, when present, has one index into
/// `materials` per face.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TriMesh {
    pub positions: Vec<Vec3>,
    pub faces: Vec<[u32; 3]>,
    pub vertex_colors: Option<Vec<Rgba>>,
    pub face_materials: Option<Vec<u32>>,
    pub materials: Vec<Material>,
}

impl TriMesh {
    /// Create an uncolored mesh
    pub fn new(positions: Vec<Vec3>, faces: Vec<[u32; 3]>) -> Self {
        Self {
            positions,
            faces,
            ..Default::default()
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// True when the mesh has no faces
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Check every index and per-element attribute array for consistency
    pub fn is_valid(&self) -> bool {
        let n = self.positions.len() as u32;
        let faces_ok = self.faces.iter().all(|f| f.iter().all(|&i| i < n));
        let colors_ok = self
            .vertex_colors
            .as_ref()
            .is_none_or(|c| c.len() == self.positions.len());
        let materials_ok = self.face_materials.as_ref().is_none_or(|m| {
            m.len() == self.faces.len() && m.iter().all(|&i| (i as usize) < self.materials.len())
        });
        faces_ok && colors_ok && materials_ok
    }

    /// Bounding box of all vertices
    pub fn bounds(&self) -> Option<Aabb> {
        Aabb::from_points(&self.positions)
    }

    /// Move every vertex by `offset`
    pub fn translate(&mut self, offset: Vec3) -> &mut Self {
        for p in &mut self.positions {
            *p += offset;
        }
        self
    }

    /// Apply an affine transform to every vertex
    pub fn transform(&mut self, matrix: &Mat4) -> &mut Self {
        for p in &mut self.positions {
            *p = matrix.transform_point3(*p);
        }
        self
    }

    /// Paint every vertex with one color
    pub fn paint(&mut self, color: Rgba) -> &mut Self {
        self.vertex_colors = Some(vec![color; self.positions.len()]);
        self
    }

    /// Assign every face to a single material
    pub fn set_material(&mut self, material: Material) -> &mut Self {
        self.materials = vec![material];
        self.face_materials = Some(vec![0; self.faces.len()]);
        self
    }

    /// Unit normal of each face (zero for degenerate faces)
    pub fn face_normals(&self) -> Vec<Vec3> {
        self.faces
            .iter()
            .map(|&[a, b, c]| {
                let (pa, pb, pc) = (
                    self.positions[a as usize],
                    self.positions[b as usize],
                    self.positions[c as usize],
                );
                (pb - pa).cross(pc - pa).normalize_or_zero()
            })
            .collect()
    }

    /// Area-weighted vertex normals
    pub fn vertex_normals(&self) -> Vec<Vec3> {
        let mut normals = vec![Vec3::ZERO; self.positions.len()];
        for &[a, b, c] in &self.faces {
            let (pa, pb, pc) = (
                self.positions[a as usize],
                self.positions[b as usize],
                self.positions[c as usize],
            );
            // unnormalized cross product weights by area
            let n = (pb - pa).cross(pc - pa);
            normals[a as usize] += n;
            normals[b as usize] += n;
            normals[c as usize] += n;
        }
        normals.iter().map(|n| n.normalize_or_zero()).collect()
    }

    /// Face indices grouped by material, in material order
    ///
    /// Meshes without face materials yield a single `None` group.
    pub fn material_groups(&self) -> Vec<(Option<usize>, Vec<usize>)> {
        match &self.face_materials {
            None => vec![(None, (0..self.faces.len()).collect())],
            Some(assignments) => {
                let mut groups: Vec<Vec<usize>> = vec![Vec::new(); self.materials.len()];
                for (face, &m) in assignments.iter().enumerate() {
                    groups[m as usize].push(face);
                }
                groups
                    .into_iter()
                    .enumerate()
                    .filter(|(_, faces)| !faces.is_empty())
                    .map(|(m, faces)| (Some(m), faces))
                    .collect()
            }
        }
    }

    /// Display color of a face: its material, else its mean vertex color, else neutral
    pub fn face_color(&self, face: usize) -> Rgba {
        if let (Some(assignments), false) = (&self.face_materials, self.materials.is_empty()) {
            return self.materials[assignments[face] as usize].appearance.rgba();
        }
        if let Some(colors) = &self.vertex_colors {
            let mut sum = [0u32; 4];
            for &i in &self.faces[face] {
                for (s, c) in sum.iter_mut().zip(colors[i as usize].to_array()) {
                    *s += c as u32;
                }
            }
            return Rgba::from_array(sum.map(|s| (s / 3) as u8));
        }
        Rgba::NEUTRAL
    }

    /// Join meshes without merging any vertices
    ///
    /// Vertex colors and materials survive when any part carries them; parts
    /// without them get the neutral color or a shared default material.
    pub fn concatenate(parts: &[TriMesh]) -> TriMesh {
        let any_colors = parts.iter().any(|p| p.vertex_colors.is_some());
        let any_materials = parts.iter().any(|p| p.face_materials.is_some());

        let mut out = TriMesh {
            positions: Vec::with_capacity(parts.iter().map(|p| p.positions.len()).sum()),
            faces: Vec::with_capacity(parts.iter().map(|p| p.faces.len()).sum()),
            vertex_colors: any_colors.then(Vec::new),
            face_materials: any_materials.then(Vec::new),
            materials: Vec::new(),
        };
        let mut default_material: Option<u32> = None;

        for part in parts {
            let base = out.positions.len() as u32;
            out.positions.extend_from_slice(&part.positions);
            out.faces.extend(part.faces.iter().map(|f| f.map(|i| i + base)));

            if let Some(colors) = out.vertex_colors.as_mut() {
                match &part.vertex_colors {
                    Some(c) => colors.extend_from_slice(c),
                    None => colors.extend(std::iter::repeat_n(Rgba::NEUTRAL, part.positions.len())),
                }
            }

            if let Some(assignments) = out.face_materials.as_mut() {
                match &part.face_materials {
                    Some(m) => {
                        let offset = out.materials.len() as u32;
                        out.materials.extend_from_slice(&part.materials);
                        assignments.extend(m.iter().map(|i| i + offset));
                    }
                    None => {
                        let idx = *default_material.get_or_insert_with(|| {
                            out.materials.push(Material::new("default", Appearance::default()));
                            out.materials.len() as u32 - 1
                        });
                        assignments.extend(std::iter::repeat_n(idx, part.faces.len()));
                    }
                }
            }
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad() -> TriMesh {
        TriMesh::new(
            vec![Vec3::ZERO, Vec3::X, Vec3::new(1.0, 1.0, 0.0), Vec3::Y],
            vec![[0, 1, 2], [0, 2, 3]],
        )
    }

    #[test]
    fn test_bounds_and_translate() {
        let mut mesh = quad();
        mesh.translate(Vec3::new(0.0, 0.0, 2.0));
        let bounds = mesh.bounds().unwrap();
        assert_eq!(bounds.min, Vec3::new(0.0, 0.0, 2.0));
        assert_eq!(bounds.max, Vec3::new(1.0, 1.0, 2.0));
        assert!(TriMesh::default().bounds().is_none());
    }

    #[test]
    fn test_face_normals() {
        let normals = quad().face_normals();
        assert_eq!(normals, vec![Vec3::Z, Vec3::Z]);
        let vn = quad().vertex_normals();
        assert!(vn.iter().all(|n| (*n - Vec3::Z).length() < 1e-6));
    }

    #[test]
    fn test_concatenate_keeps_parts_disjoint() {
        let mut a = quad();
        a.paint(Rgba::rgb(255, 0, 0));
        let b = quad();
        let joined = TriMesh::concatenate(&[a, b]);
        assert_eq!(joined.vertex_count(), 8);
        assert_eq!(joined.face_count(), 4);
        assert_eq!(joined.faces[2], [4, 5, 6]);
        let colors = joined.vertex_colors.as_ref().unwrap();
        assert_eq!(colors[0], Rgba::rgb(255, 0, 0));
        assert_eq!(colors[7], Rgba::NEUTRAL);
        assert!(joined.face_materials.is_none());
        assert!(joined.is_valid());
    }

    #[test]
    fn test_concatenate_materials() {
        let mut a = quad();
        a.set_material(Material::for_label(3, Appearance::solid(Rgba::rgb(0, 0, 255))));
        let b = quad();
        let c = quad();
        let joined = TriMesh::concatenate(&[a, b, c]);
        assert_eq!(joined.materials.len(), 2);
        assert_eq!(joined.materials[1].name, "default");
        assert_eq!(joined.face_materials.as_ref().unwrap(), &vec![0, 0, 1, 1, 1, 1]);
        assert!(joined.is_valid());

        let groups = joined.material_groups();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[1], (Some(1), vec![2, 3, 4, 5]));
        assert_eq!(joined.face_color(0), Rgba::rgb(0, 0, 255));
    }

    #[test]
    fn test_face_color_from_vertices() {
        let mut mesh = quad();
        mesh.paint(Rgba::rgb(30, 60, 90));
        assert_eq!(mesh.face_color(1), Rgba::rgb(30, 60, 90));
        assert_eq!(quad().face_color(0), Rgba::NEUTRAL);
    }

    #[test]
    fn test_invalid_index_detected() {
        let mesh = TriMesh::new(vec![Vec3::ZERO], vec![[0, 0, 1]]);
        assert!(!mesh.is_valid());
    }
}
