//! Region-stamping shapes for voxel sculpting
//!
//! Each shape enumerates the integer cells it covers and writes a label into
//! a [`VoxelGrid`] under a [`BlendMode`]. Cells outside the grid are clipped.
//! Coordinates are `(x, y, z)` cell indices; ranges are half-open.

use std::f64::consts::TAU;

use glam::{IVec2, IVec3, Vec2};

use super::grid::VoxelGrid;

/// How stamped labels combine with existing voxels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlendMode {
    #[default]
    Replace,  // Overwrite existing voxels
    Add,      // Only fill empty space
    Subtract, // Remove voxels (carving)
}

/// Shapes that can be stamped into a grid
#[derive(Debug, Clone, PartialEq)]
pub enum StampShape {
    /// Single cell
    Cell(IVec3),
    /// Axis-aligned box covering `min..max` on each axis
    Cuboid { min: IVec3, max: IVec3 },
    /// Cells whose squared distance to `center` is at most `radius_sq`
    Sphere { center: IVec3, radius_sq: i32 },
    /// Vertical cylinder slab: cells with `dx² + dy² <= radius_sq` for `z_min..z_max`
    Disc { center: IVec2, radius_sq: i32, z_min: i32, z_max: i32 },
    /// `count` single-cell columns spaced evenly on a circle, spanning `z_min..z_max`
    Ring { center: Vec2, radius: f32, count: u32, z_min: i32, z_max: i32 },
    /// Spiral path of single cells; radius moves linearly from `start_radius`
    /// to `end_radius` while height moves from `z_start` to `z_end`
    Helix {
        center: Vec2,
        start_radius: f32,
        end_radius: f32,
        turns: f32,
        z_start: f32,
        z_end: f32,
        samples: u32,
    },
    /// Layer `z` cells where `(x + y) % 2 == parity`
    Checkerboard { z: i32, parity: u32 },
}

impl StampShape {
    /// Box from `(x, y, z)` start and end ranges
    pub fn cuboid(min: IVec3, max: IVec3) -> Self {
        StampShape::Cuboid { min, max }
    }

    /// Sphere with an integer radius
    pub fn sphere(center: IVec3, radius: i32) -> Self {
        StampShape::Sphere { center, radius_sq: radius * radius }
    }

    /// Disc with an integer radius
    pub fn disc(center: IVec2, radius: i32, z_min: i32, z_max: i32) -> Self {
        StampShape::Disc { center, radius_sq: radius * radius, z_min, z_max }
    }

    /// Visit every covered cell (including out-of-bounds ones), in a fixed order
    pub fn for_each_cell(&self, mut f: impl FnMut(IVec3)) {
        match *self {
            StampShape::Cell(p) => f(p),
            StampShape::Cuboid { min, max } => {
                for z in min.z..max.z {
                    for y in min.y..max.y {
                        for x in min.x..max.x {
                            f(IVec3::new(x, y, z));
                        }
                    }
                }
            }
            StampShape::Sphere { center, radius_sq } => {
                if radius_sq < 0 {
                    return;
                }
                let r = (radius_sq as f32).sqrt().ceil() as i32;
                for z in center.z - r..=center.z + r {
                    for y in center.y - r..=center.y + r {
                        for x in center.x - r..=center.x + r {
                            let p = IVec3::new(x, y, z);
                            if (p - center).length_squared() <= radius_sq {
                                f(p);
                            }
                        }
                    }
                }
            }
            StampShape::Disc { center, radius_sq, z_min, z_max } => {
                if radius_sq < 0 {
                    return;
                }
                let r = (radius_sq as f32).sqrt().ceil() as i32;
                for z in z_min..z_max {
                    for y in center.y - r..=center.y + r {
                        for x in center.x - r..=center.x + r {
                            if (IVec2::new(x, y) - center).length_squared() <= radius_sq {
                                f(IVec3::new(x, y, z));
                            }
                        }
                    }
                }
            }
            StampShape::Ring { center, radius, count, z_min, z_max } => {
                // f64 so cells on integer boundaries truncate the same way on every platform
                let step = TAU / count.max(1) as f64;
                for i in 0..count {
                    let angle = i as f64 * step;
                    let x = (center.x as f64 + radius as f64 * angle.cos()) as i32;
                    let y = (center.y as f64 + radius as f64 * angle.sin()) as i32;
                    for z in z_min..z_max {
                        f(IVec3::new(x, y, z));
                    }
                }
            }
            StampShape::Helix { center, start_radius, end_radius, turns, z_start, z_end, samples } => {
                let span = turns as f64 * TAU;
                let last = samples.saturating_sub(1);
                for i in 0..samples {
                    // endpoints inclusive; the final angle is exactly `span`
                    let theta = if i == last { span } else { i as f64 * (span / last as f64) };
                    let t = match (span != 0.0, last) {
                        (_, 0) => 0.0,
                        (true, _) => theta / span,
                        (false, _) => i as f64 / last as f64,
                    };
                    let radius = start_radius as f64 + (end_radius as f64 - start_radius as f64) * t;
                    let z = (z_start as f64 + (z_end as f64 - z_start as f64) * t) as i32;
                    let y = (center.y as f64 + radius * theta.sin()) as i32;
                    let x = (center.x as f64 + radius * theta.cos()) as i32;
                    f(IVec3::new(x, y, z));
                }
            }
            StampShape::Checkerboard { .. } => {
                // needs grid extents; handled in `apply`
            }
        }
    }

    /// Write `label` into every covered in-bounds cell; returns cells changed
    pub fn apply(&self, grid: &mut VoxelGrid, label: u32, mode: BlendMode) -> usize {
        let mut written = 0;
        if let StampShape::Checkerboard { z, parity } = *self {
            let dims = grid.dims();
            for y in 0..dims.y {
                for x in 0..dims.x {
                    if (x + y) % 2 == parity % 2
                        && grid.blend(IVec3::new(x as i32, y as i32, z), label, mode)
                    {
                        written += 1;
                    }
                }
            }
            return written;
        }

        self.for_each_cell(|p| {
            if grid.blend(p, label, mode) {
                written += 1;
            }
        });
        written
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(depth: u32, height: u32, width: u32) -> VoxelGrid {
        VoxelGrid::new(depth, height, width).unwrap()
    }

    #[test]
    fn test_cuboid_half_open() {
        let mut g = grid(4, 4, 4);
        let n = StampShape::cuboid(IVec3::new(1, 1, 1), IVec3::new(3, 2, 4)).apply(&mut g, 1, BlendMode::Replace);
        assert_eq!(n, 2 * 1 * 3);
        assert_eq!(g.get(2, 1, 3), 1);
        assert_eq!(g.get(3, 1, 1), 0);
    }

    #[test]
    fn test_cuboid_clipped() {
        let mut g = grid(3, 3, 3);
        let n = StampShape::cuboid(IVec3::splat(-5), IVec3::splat(50)).apply(&mut g, 2, BlendMode::Replace);
        assert_eq!(n, 27);
        assert_eq!(g.filled_count(), 27);
    }

    #[test]
    fn test_sphere_cells() {
        let mut g = grid(9, 9, 9);
        StampShape::sphere(IVec3::splat(4), 1).apply(&mut g, 1, BlendMode::Replace);
        // center plus six face neighbours
        assert_eq!(g.filled_count(), 7);

        let mut g = grid(10, 10, 10);
        StampShape::Sphere { center: IVec3::splat(5), radius_sq: 24 }.apply(&mut g, 1, BlendMode::Replace);
        assert_eq!(g.get(5, 5, 0), 0);
        assert_eq!(g.get(5, 5, 1), 1);
    }

    #[test]
    fn test_disc_layers() {
        let mut g = grid(5, 11, 11);
        StampShape::disc(IVec2::new(5, 5), 3, 1, 3).apply(&mut g, 4, BlendMode::Replace);
        assert_eq!(g.get(5, 5, 0), 0);
        assert_eq!(g.get(8, 5, 1), 4);
        assert_eq!(g.get(5, 2, 2), 4);
        assert_eq!(g.get(8, 8, 2), 0);
        assert_eq!(g.get(5, 5, 3), 0);
        let per_layer = g.filled_count() / 2;
        assert_eq!(per_layer, 29);
    }

    #[test]
    fn test_ring_positions_truncate() {
        let mut g = grid(4, 20, 20);
        let ring = StampShape::Ring { center: Vec2::new(10.0, 10.0), radius: 5.0, count: 4, z_min: 1, z_max: 3 };
        ring.apply(&mut g, 6, BlendMode::Replace);
        assert_eq!(g.get(15, 10, 1), 6);
        assert_eq!(g.get(10, 15, 2), 6);
        assert_eq!(g.get(5, 10, 1), 6);
        // cos(3π/2) is slightly negative, so x truncates to 9
        assert_eq!(g.get(9, 5, 1), 6);
        assert_eq!(g.get(10, 5, 1), 0);
        assert_eq!(g.filled_count(), 8);
    }

    #[test]
    fn test_helix_endpoints() {
        let mut g = grid(30, 40, 40);
        let helix = StampShape::Helix {
            center: Vec2::new(20.0, 20.0),
            start_radius: 17.0,
            end_radius: 6.0,
            turns: 2.0,
            z_start: 1.0,
            z_end: 21.0,
            samples: 100,
        };
        helix.apply(&mut g, 7, BlendMode::Replace);
        assert_eq!(g.get(37, 20, 1), 7);
        // sin(4π) is slightly negative, so the last sample lands below the center row
        assert_eq!(g.get(26, 19, 21), 7);
        assert_eq!(g.get(26, 20, 21), 0);
        let (lo, hi) = g.filled_bounds().unwrap();
        assert_eq!(lo.z, 1);
        assert_eq!(hi.z, 21);
    }

    #[test]
    fn test_checkerboard() {
        let mut g = grid(2, 4, 4);
        let n = StampShape::Checkerboard { z: 0, parity: 0 }.apply(&mut g, 8, BlendMode::Replace);
        assert_eq!(n, 8);
        assert_eq!(g.get(0, 0, 0), 8);
        assert_eq!(g.get(1, 0, 0), 0);
        assert_eq!(g.get(1, 1, 0), 8);
        assert_eq!(g.get(0, 0, 1), 0);
    }

    #[test]
    fn test_add_and_subtract() {
        let mut g = grid(3, 3, 3);
        StampShape::Cell(IVec3::ONE).apply(&mut g, 1, BlendMode::Replace);
        let added = StampShape::cuboid(IVec3::ZERO, IVec3::splat(3)).apply(&mut g, 2, BlendMode::Add);
        assert_eq!(added, 26);
        assert_eq!(g.get(1, 1, 1), 1);
        StampShape::cuboid(IVec3::ZERO, IVec3::new(3, 3, 1)).apply(&mut g, 0, BlendMode::Subtract);
        assert_eq!(g.filled_count(), 18);
    }
}
