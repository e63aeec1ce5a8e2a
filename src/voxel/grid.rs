//! Dense voxel label grid
//!
//! Axis convention: storage is `[z][y][x]` (depth, height, width), so the
//! flat index of cell `(x, y, z)` is `(z * height + y) * width + x`. In model
//! space the cell center sits at the point `(x, y, z)`. All public APIs take
//! coordinates in `(x, y, z)` order.

use std::collections::BTreeMap;

use glam::{IVec3, UVec3};

use crate::core::Error;
use crate::core::types::Result;

use super::stamp::{BlendMode, StampShape};

/// Label value meaning "no material"
pub const EMPTY: u32 = 0;

/// Grid extents, `(x, y, z)` = (width, height, depth)
pub type Dims = UVec3;

/// Dense 3-D grid of integer labels
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VoxelGrid {
    dims: Dims,
    labels: Vec<u32>,
}

impl VoxelGrid {
    /// Create an all-empty grid with the given depth, height and width
    pub fn new(depth: u32, height: u32, width: u32) -> Result<Self> {
        Self::with_dims(UVec3::new(width, height, depth))
    }

    /// Create an all-empty grid from `(x, y, z)` extents
    pub fn with_dims(dims: Dims) -> Result<Self> {
        if dims.x == 0 || dims.y == 0 || dims.z == 0 {
            return Err(Error::InvalidGrid(format!(
                "extents must be non-zero, got depth={} height={} width={}",
                dims.z, dims.y, dims.x
            )));
        }
        let len = dims.x as usize * dims.y as usize * dims.z as usize;
        Ok(Self {
            dims,
            labels: vec![EMPTY; len],
        })
    }

    /// Wrap existing `[z][y][x]`-ordered label data
    pub fn from_labels(depth: u32, height: u32, width: u32, labels: Vec<u32>) -> Result<Self> {
        let mut grid = Self::new(depth, height, width)?;
        if labels.len() != grid.labels.len() {
            return Err(Error::InvalidGrid(format!(
                "expected {} labels for a {}x{}x{} grid, got {}",
                grid.labels.len(), depth, height, width, labels.len()
            )));
        }
        grid.labels = labels;
        Ok(grid)
    }

    /// Build from nested `[z][y][x]` vectors; rejects ragged input
    pub fn from_nested(data: &[Vec<Vec<u32>>]) -> Result<Self> {
        let depth = data.len();
        let height = data.first().map_or(0, |plane| plane.len());
        let width = data.first().and_then(|plane| plane.first()).map_or(0, |row| row.len());

        let ragged = data.iter().any(|plane| {
            plane.len() != height || plane.iter().any(|row| row.len() != width)
        });
        if ragged {
            return Err(Error::InvalidGrid("nested data is not a regular 3-D array".to_string()));
        }

        let labels: Vec<u32> = data.iter().flatten().flatten().copied().collect();
        Self::from_labels(depth as u32, height as u32, width as u32, labels)
    }

    /// Extents as `(x, y, z)` = (width, height, depth)
    pub fn dims(&self) -> Dims {
        self.dims
    }

    pub fn width(&self) -> u32 {
        self.dims.x
    }

    pub fn height(&self) -> u32 {
        self.dims.y
    }

    pub fn depth(&self) -> u32 {
        self.dims.z
    }

    /// Total cell count
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Always false for a constructed grid; extents are validated non-zero
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Raw `[z][y][x]` label storage
    pub fn labels(&self) -> &[u32] {
        &self.labels
    }

    /// Check whether a signed coordinate falls inside the grid
    pub fn in_bounds(&self, p: IVec3) -> bool {
        p.x >= 0 && p.y >= 0 && p.z >= 0
            && (p.x as u32) < self.dims.x
            && (p.y as u32) < self.dims.y
            && (p.z as u32) < self.dims.z
    }

    /// Flat storage index for an in-bounds cell
    #[inline]
    pub fn index(&self, x: u32, y: u32, z: u32) -> usize {
        (z as usize * self.dims.y as usize + y as usize) * self.dims.x as usize + x as usize
    }

    /// Label at `(x, y, z)`; out-of-bounds reads return [`EMPTY`]
    pub fn get(&self, x: i32, y: i32, z: i32) -> u32 {
        let p = IVec3::new(x, y, z);
        if self.in_bounds(p) {
            self.labels[self.index(x as u32, y as u32, z as u32)]
        } else {
            EMPTY
        }
    }

    /// Write a label; out-of-bounds writes are ignored. Returns whether the cell was written.
    pub fn set(&mut self, x: i32, y: i32, z: i32, label: u32) -> bool {
        self.blend(IVec3::new(x, y, z), label, BlendMode::Replace)
    }

    /// Combine a label into one cell according to `mode`
    pub fn blend(&mut self, p: IVec3, label: u32, mode: BlendMode) -> bool {
        if !self.in_bounds(p) {
            return false;
        }
        let idx = self.index(p.x as u32, p.y as u32, p.z as u32);
        let cell = &mut self.labels[idx];
        match mode {
            BlendMode::Replace => *cell = label,
            BlendMode::Add if *cell == EMPTY => *cell = label,
            BlendMode::Add => return false,
            BlendMode::Subtract => *cell = EMPTY,
        }
        true
    }

    /// Stamp a shape into the grid, clipping at the bounds
    pub fn stamp(&mut self, shape: &StampShape, label: u32, mode: BlendMode) -> &mut Self {
        let written = shape.apply(self, label, mode);
        log::debug!("Stamped {:?} with label {} ({:?}): {} cells", shape, label, mode, written);
        self
    }

    /// Number of non-empty cells
    pub fn filled_count(&self) -> usize {
        self.labels.iter().filter(|&&l| l != EMPTY).count()
    }

    /// True when every cell is empty
    pub fn is_blank(&self) -> bool {
        self.labels.iter().all(|&l| l == EMPTY)
    }

    /// Cell count per non-empty label, in ascending label order
    pub fn label_counts(&self) -> BTreeMap<u32, usize> {
        let mut counts = BTreeMap::new();
        for &label in self.labels.iter().filter(|&&l| l != EMPTY) {
            *counts.entry(label).or_insert(0) += 1;
        }
        counts
    }

    /// Copy with `pad` empty cells added on every side
    pub fn padded(&self, pad: u32) -> VoxelGrid {
        if pad == 0 {
            return self.clone();
        }
        let dims = self.dims + UVec3::splat(pad * 2);
        let mut labels = vec![EMPTY; dims.x as usize * dims.y as usize * dims.z as usize];
        let row = self.dims.x as usize;
        for z in 0..self.dims.z {
            for y in 0..self.dims.y {
                let src = self.index(0, y, z);
                let dst = ((z + pad) as usize * dims.y as usize + (y + pad) as usize)
                    * dims.x as usize
                    + pad as usize;
                labels[dst..dst + row].copy_from_slice(&self.labels[src..src + row]);
            }
        }
        VoxelGrid { dims, labels }
    }

    /// Make the grid symmetric across X
    ///
    /// Empty cells take the label of their mirror cell. Where both cells of a
    /// pair are filled with different labels, the one nearer `x = 0` wins.
    pub fn mirror_x(&mut self) -> &mut Self {
        let w = self.dims.x;
        for z in 0..self.dims.z {
            for y in 0..self.dims.y {
                for x in 0..w / 2 {
                    let a = self.index(x, y, z);
                    let b = self.index(w - 1 - x, y, z);
                    let (la, lb) = (self.labels[a], self.labels[b]);
                    let winner = if la == EMPTY { lb } else { la };
                    self.labels[a] = winner;
                    self.labels[b] = winner;
                }
            }
        }
        self
    }

    /// Bounds of the filled cells as `(min, max)` inclusive cell coordinates
    pub fn filled_bounds(&self) -> Option<(IVec3, IVec3)> {
        let mut bounds: Option<(IVec3, IVec3)> = None;
        for z in 0..self.dims.z {
            for y in 0..self.dims.y {
                for x in 0..self.dims.x {
                    if self.labels[self.index(x, y, z)] == EMPTY {
                        continue;
                    }
                    let p = IVec3::new(x as i32, y as i32, z as i32);
                    bounds = Some(match bounds {
                        Some((lo, hi)) => (lo.min(p), hi.max(p)),
                        None => (p, p),
                    });
                }
            }
        }
        bounds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_extent_rejected() {
        assert!(matches!(VoxelGrid::new(0, 4, 4), Err(Error::InvalidGrid(_))));
        assert!(matches!(VoxelGrid::new(4, 4, 0), Err(Error::InvalidGrid(_))));
    }

    #[test]
    fn test_axis_order() {
        // depth=2, height=3, width=4
        let mut grid = VoxelGrid::new(2, 3, 4).unwrap();
        assert_eq!(grid.dims(), UVec3::new(4, 3, 2));
        grid.set(3, 2, 1, 9);
        assert_eq!(grid.labels()[(1 * 3 + 2) * 4 + 3], 9);
        assert_eq!(grid.get(3, 2, 1), 9);
    }

    #[test]
    fn test_out_of_bounds() {
        let mut grid = VoxelGrid::new(2, 2, 2).unwrap();
        assert!(!grid.set(-1, 0, 0, 1));
        assert!(!grid.set(0, 2, 0, 1));
        assert_eq!(grid.get(5, 5, 5), EMPTY);
        assert!(grid.is_blank());
    }

    #[test]
    fn test_from_labels_length_mismatch() {
        let err = VoxelGrid::from_labels(2, 2, 2, vec![0; 7]).unwrap_err();
        assert!(matches!(err, Error::InvalidGrid(_)));
    }

    #[test]
    fn test_from_nested() {
        let data = vec![vec![vec![0, 1], vec![2, 0]], vec![vec![0, 0], vec![0, 3]]];
        let grid = VoxelGrid::from_nested(&data).unwrap();
        assert_eq!(grid.get(1, 0, 0), 1);
        assert_eq!(grid.get(0, 1, 0), 2);
        assert_eq!(grid.get(1, 1, 1), 3);

        let ragged = vec![vec![vec![0, 1], vec![2]]];
        assert!(VoxelGrid::from_nested(&ragged).is_err());
        assert!(VoxelGrid::from_nested(&[]).is_err());
    }

    #[test]
    fn test_blend_modes() {
        let mut grid = VoxelGrid::new(1, 1, 1).unwrap();
        let origin = IVec3::ZERO;
        assert!(grid.blend(origin, 2, BlendMode::Add));
        assert!(!grid.blend(origin, 3, BlendMode::Add));
        assert_eq!(grid.get(0, 0, 0), 2);
        grid.blend(origin, 3, BlendMode::Replace);
        assert_eq!(grid.get(0, 0, 0), 3);
        grid.blend(origin, 3, BlendMode::Subtract);
        assert_eq!(grid.get(0, 0, 0), EMPTY);
    }

    #[test]
    fn test_padded() {
        let mut grid = VoxelGrid::new(2, 2, 2).unwrap();
        grid.set(1, 0, 1, 4);
        let padded = grid.padded(2);
        assert_eq!(padded.dims(), UVec3::splat(6));
        assert_eq!(padded.get(3, 2, 3), 4);
        assert_eq!(padded.filled_count(), 1);
        assert_eq!(grid.padded(0), grid);
    }

    #[test]
    fn test_mirror_x_symmetry() {
        let mut grid = VoxelGrid::new(1, 1, 5).unwrap();
        grid.set(0, 0, 0, 1);
        grid.set(3, 0, 0, 2);
        grid.set(4, 0, 0, 7);
        grid.mirror_x();
        let row: Vec<u32> = (0..5).map(|x| grid.get(x, 0, 0)).collect();
        // empties take the mirrored label; conflicts resolve toward x = 0
        assert_eq!(row, vec![1, 2, 0, 2, 1]);
    }

    #[test]
    fn test_label_counts_and_bounds() {
        let mut grid = VoxelGrid::new(4, 4, 4).unwrap();
        grid.set(1, 1, 1, 2);
        grid.set(2, 3, 1, 2);
        grid.set(0, 2, 3, 5);
        let counts = grid.label_counts();
        assert_eq!(counts.get(&2), Some(&2));
        assert_eq!(counts.get(&5), Some(&1));
        assert_eq!(grid.filled_bounds(), Some((IVec3::new(0, 1, 1), IVec3::new(2, 3, 3))));
        assert_eq!(VoxelGrid::new(1, 1, 1).unwrap().filled_bounds(), None);
    }
}
