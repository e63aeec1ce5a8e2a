//! voxsculpt - procedural voxel and primitive model generation
//!
//! Models are built either by stamping labels into a [`voxel::VoxelGrid`] and
//! extracting a surface with marching cubes, or by composing parametric mesh
//! primitives. Results are written as OBJ/MTL or GLB and can be previewed as
//! PNG images.

pub mod core;
pub mod math;
pub mod voxel;
pub mod mesh;
pub mod export;
pub mod render;
pub mod models;
pub mod config;
