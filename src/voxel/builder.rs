//! Stamping session for building voxel grids

use glam::{IVec2, IVec3, UVec3, Vec2};

use crate::core::types::Result;
use super::grid::VoxelGrid;
use super::stamp::{BlendMode, StampShape};

/// A single recorded stamp
#[derive(Debug, Clone, PartialEq)]
pub struct Stamp {
    pub shape: StampShape,
    pub label: u32,
    pub blend_mode: BlendMode,
}

/// Collects stamps and applies them, in order, to a fresh grid
#[derive(Debug, Clone)]
pub struct GridBuilder {
    dims: UVec3,
    stamps: Vec<Stamp>,
    current_blend: BlendMode,
    mirror_x: bool,
}

impl GridBuilder {
    /// Builder for a grid of the given depth, height and width
    pub fn new(depth: u32, height: u32, width: u32) -> Self {
        Self {
            dims: UVec3::new(width, height, depth),
            stamps: Vec::new(),
            current_blend: BlendMode::Replace,
            mirror_x: false,
        }
    }

    /// Set the blend mode for subsequent stamps
    pub fn set_blend(&mut self, mode: BlendMode) -> &mut Self {
        self.current_blend = mode;
        self
    }

    /// Record an arbitrary shape
    pub fn stamp(&mut self, shape: StampShape, label: u32) -> &mut Self {
        self.stamps.push(Stamp {
            shape,
            label,
            blend_mode: self.current_blend,
        });
        self
    }

    pub fn cell(&mut self, p: IVec3, label: u32) -> &mut Self {
        self.stamp(StampShape::Cell(p), label)
    }

    /// Box covering `min..max`
    pub fn cuboid(&mut self, min: IVec3, max: IVec3, label: u32) -> &mut Self {
        self.stamp(StampShape::cuboid(min, max), label)
    }

    pub fn sphere(&mut self, center: IVec3, radius_sq: i32, label: u32) -> &mut Self {
        self.stamp(StampShape::Sphere { center, radius_sq }, label)
    }

    pub fn disc(&mut self, center: IVec2, radius: i32, z_min: i32, z_max: i32, label: u32) -> &mut Self {
        self.stamp(StampShape::disc(center, radius, z_min, z_max), label)
    }

    pub fn ring(&mut self, center: Vec2, radius: f32, count: u32, z_min: i32, z_max: i32, label: u32) -> &mut Self {
        self.stamp(StampShape::Ring { center, radius, count, z_min, z_max }, label)
    }

    pub fn checkerboard(&mut self, z: i32, parity: u32, label: u32) -> &mut Self {
        self.stamp(StampShape::Checkerboard { z, parity }, label)
    }

    /// Mirror the finished grid across X after all stamps are applied
    pub fn mirror_x(&mut self) -> &mut Self {
        self.mirror_x = true;
        self
    }

    /// Recorded stamps
    pub fn stamps(&self) -> &[Stamp] {
        &self.stamps
    }

    pub fn len(&self) -> usize {
        self.stamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stamps.is_empty()
    }

    /// Apply all stamps to a new grid
    pub fn build(&self) -> Result<VoxelGrid> {
        let mut grid = VoxelGrid::with_dims(self.dims)?;
        for stamp in &self.stamps {
            grid.stamp(&stamp.shape, stamp.label, stamp.blend_mode);
        }
        if self.mirror_x {
            grid.mirror_x();
        }
        log::debug!(
            "Built {}x{}x{} grid from {} stamps: {} filled cells",
            self.dims.z, self.dims.y, self.dims.x, self.stamps.len(), grid.filled_count()
        );
        Ok(grid)
    }
}
