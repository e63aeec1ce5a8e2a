//! Triangle meshes: voxel surface extraction and parametric primitives

pub mod marching;
pub mod primitives;
pub mod tables;
pub mod trimesh;

pub use marching::{extract, extract_to_file, ExtractOptions, Extraction};
pub use trimesh::{Material, TriMesh};
