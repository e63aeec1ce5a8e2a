//! Voxel space stations: layered plates around a spherical power core,
//! braces, bolted-on modules and neon light strips
//!
//! Two layouts exist. `Compact` is a 40³ station with a small core;
//! `Core` is a 50³ station built around a large core with translucent
//! plating.

use glam::IVec3;
use serde::{Deserialize, Serialize};

use crate::core::types::Result;
use crate::render::{RenderMode, ViewOptions};
use crate::voxel::GridBuilder;
use crate::voxel::palette::{Palette, Rgba};

use super::VoxelModel;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StationVariant {
    #[default]
    Compact,
    Core,
}

/// Box from `(x, y, z)` half-open ranges
fn span(x: (i32, i32), y: (i32, i32), z: (i32, i32)) -> (IVec3, IVec3) {
    (IVec3::new(x.0, y.0, z.0), IVec3::new(x.1, y.1, z.1))
}

pub fn build(variant: StationVariant) -> Result<VoxelModel> {
    match variant {
        StationVariant::Compact => compact_station(),
        StationVariant::Core => core_station(),
    }
}

fn compact_station() -> Result<VoxelModel> {
    const PLATE: u32 = 1;
    const CORE: u32 = 2;
    const BRACE: u32 = 3;
    const MODULE: u32 = 4;
    const RIDGE: u32 = 5;

    let mut b = GridBuilder::new(40, 40, 40);

    for z in (10..30).step_by(2) {
        b.cuboid(IVec3::new(10, 10, z), IVec3::new(30, 30, z + 1), PLATE);
    }
    // stepped layers narrowing toward the middle
    for i in 0..5 {
        b.cuboid(IVec3::new(10 + i, 10 + i, 15 + i), IVec3::new(30 - i, 30 - i, 16 + i), PLATE);
    }

    b.sphere(IVec3::splat(20), 24, CORE);

    let braces = [
        span((20, 21), (10, 15), (18, 22)),
        span((20, 21), (25, 30), (18, 22)),
        span((10, 15), (20, 21), (20, 21)),
        span((25, 30), (20, 21), (20, 21)),
    ];
    for (min, max) in braces {
        b.cuboid(min, max, BRACE);
    }

    let modules = [
        span((15, 20), (30, 35), (10, 13)),
        span((10, 13), (5, 10), (28, 32)),
        span((30, 35), (5, 8), (15, 25)),
        span((30, 34), (30, 34), (30, 34)),
    ];
    for (min, max) in modules {
        b.cuboid(min, max, MODULE);
    }

    for y in (10..30).step_by(3) {
        b.cuboid(IVec3::new(15, y, 29), IVec3::new(25, y + 1, 30), RIDGE);
        b.cuboid(IVec3::new(15, y, 10), IVec3::new(25, y + 1, 11), RIDGE);
    }

    b.cuboid(IVec3::new(10, 10, 20), IVec3::new(11, 30, 21), 6);
    b.cuboid(IVec3::new(29, 10, 20), IVec3::new(30, 30, 21), 7);
    b.cuboid(IVec3::new(20, 10, 10), IVec3::new(21, 30, 11), 8);

    let palette = Palette::from_colors([
        (PLATE, "#555555", 1.0),
        (CORE, "white", 0.9),
        (BRACE, "#8888ff", 0.8),
        (MODULE, "#333333", 1.0),
        (RIDGE, "#777777", 0.7),
        (6, "cyan", 1.0),
        (7, "magenta", 1.0),
        (8, "yellow", 1.0),
    ])?;

    Ok(VoxelModel {
        name: "station-compact",
        grid: b.build()?,
        palette,
        view: ViewOptions {
            background: Rgba::BLACK,
            mode: RenderMode::Both,
            wireframe_color: Rgba::WHITE,
            ..Default::default()
        },
    })
}

fn core_station() -> Result<VoxelModel> {
    const PLATE: u32 = 1;
    const CORE: u32 = 2;
    const BRACE: u32 = 3;
    const MODULE: u32 = 4;
    const LATTICE: u32 = 5;
    const RIDGE: u32 = 6;

    let mut b = GridBuilder::new(50, 50, 50);

    b.sphere(IVec3::splat(25), 89, CORE);

    for z in (10..40).step_by(3) {
        b.cuboid(IVec3::new(12, 12, z), IVec3::new(38, 38, z + 1), PLATE);
    }

    let braces = [
        span((25, 26), (10, 15), (20, 30)),
        span((25, 26), (35, 40), (20, 30)),
        span((20, 30), (10, 15), (25, 26)),
        span((20, 30), (35, 40), (25, 26)),
        span((10, 15), (20, 30), (25, 26)),
        span((35, 40), (20, 30), (25, 26)),
    ];
    for (min, max) in braces {
        b.cuboid(min, max, BRACE);
    }

    let modules = [
        span((20, 30), (38, 48), (10, 15)),
        span((15, 20), (5, 15), (35, 45)),
        span((35, 45), (5, 8), (15, 35)),
    ];
    for (min, max) in modules {
        b.cuboid(min, max, MODULE);
    }

    // external cage: 3x3 bars along X
    for i in 0..3 {
        for j in 0..3 {
            let (y, z) = (40 + j * 2, 40 + i * 2);
            b.cuboid(IVec3::new(10, y, z), IVec3::new(13, y + 1, z + 1), LATTICE);
        }
    }

    for y in (15..35).step_by(2) {
        b.cuboid(IVec3::new(20, y, 39), IVec3::new(30, y + 1, 40), RIDGE);
        b.cuboid(IVec3::new(20, y, 10), IVec3::new(30, y + 1, 11), RIDGE);
    }

    b.cuboid(IVec3::new(12, 15, 25), IVec3::new(13, 35, 26), 7);
    b.cuboid(IVec3::new(37, 15, 25), IVec3::new(38, 35, 26), 8);
    b.cuboid(IVec3::new(15, 12, 15), IVec3::new(35, 13, 16), 9);

    b.cuboid(IVec3::splat(12), IVec3::splat(15), 10);
    b.cuboid(IVec3::splat(45), IVec3::splat(48), 11);
    b.cuboid(IVec3::new(38, 18, 18), IVec3::new(41, 20, 20), 12);
    b.cuboid(IVec3::new(30, 40, 30), IVec3::new(33, 43, 33), 13);

    let palette = Palette::from_colors([
        (PLATE, "#444444", 0.5),
        (CORE, "lime", 1.0),
        (BRACE, "#8888ff", 1.0),
        (MODULE, "#222222", 1.0),
        (LATTICE, "#666666", 1.0),
        (RIDGE, "#999999", 1.0),
        (7, "cyan", 1.0),
        (8, "magenta", 1.0),
        (9, "yellow", 1.0),
        (10, "orange", 1.0),
        (11, "red", 1.0),
        (12, "blue", 1.0),
        (13, "purple", 1.0),
    ])?;

    Ok(VoxelModel {
        name: "station-core",
        grid: b.build()?,
        palette,
        view: ViewOptions {
            background: Rgba::BLACK,
            mode: RenderMode::Both,
            wireframe_color: Rgba::rgb(0, 255, 0),
            ..Default::default()
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compact_layout() {
        let model = build(StationVariant::Compact).unwrap();
        let grid = &model.grid;
        assert_eq!((grid.depth(), grid.height(), grid.width()), (40, 40, 40));
        assert_eq!(grid.get(20, 20, 20), 2);
        assert_eq!(grid.get(24, 20, 20), 2);
        assert_eq!(grid.get(25, 20, 20), 3); // back conduit
        assert_eq!(grid.get(10, 15, 20), 6);
        assert_eq!(grid.get(29, 15, 20), 7);
        assert_eq!(grid.get(31, 31, 31), 4);
        assert_eq!(grid.label_counts().len(), 8);
    }

    #[test]
    fn test_compact_opacities() {
        let model = build(StationVariant::Compact).unwrap();
        assert_eq!(model.palette.resolve(2).opacity, 0.9);
        assert_eq!(model.palette.resolve(5).opacity, 0.7);
        assert!(model.palette.resolve(6).is_opaque());
    }

    #[test]
    fn test_core_layout() {
        let model = build(StationVariant::Core).unwrap();
        let grid = &model.grid;
        assert_eq!(grid.width(), 50);
        assert_eq!(grid.get(25, 25, 24), 2);
        // plates overwrite the core on their layers
        assert_eq!(grid.get(25, 25, 25), 1);
        assert_eq!(grid.get(13, 13, 13), 10);
        assert_eq!(grid.get(46, 46, 46), 11);
        assert_eq!(grid.get(11, 44, 44), 5);
        assert_eq!(grid.label_counts().len(), 13);
        assert!(grid.label_counts().keys().all(|&l| model.palette.contains(l)));
    }

    #[test]
    fn test_variant_views() {
        assert_eq!(build(StationVariant::Compact).unwrap().view.wireframe_color, Rgba::WHITE);
        assert_eq!(build(StationVariant::Core).unwrap().view.mode, RenderMode::Both);
    }
}
