//! Voxel label grids, palettes and stamping

pub mod grid;
pub mod palette;
pub mod stamp;
pub mod builder;

pub use grid::{VoxelGrid, Dims, EMPTY};
pub use palette::{Appearance, Palette, Rgba};
pub use stamp::{BlendMode, StampShape};
pub use builder::{GridBuilder, Stamp};
