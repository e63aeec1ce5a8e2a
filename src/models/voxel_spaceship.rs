//! Bilaterally symmetric voxel spaceship
//!
//! One half is stamped on a 10-wide grid and mirrored across X.

use glam::IVec3;

use crate::core::types::Result;
use crate::render::{RenderMode, ViewOptions};
use crate::voxel::GridBuilder;
use crate::voxel::palette::{Palette, Rgba};

use super::VoxelModel;

const FUSELAGE: u32 = 1;
const COCKPIT: u32 = 2;
const WING: u32 = 3;
const ENGINE: u32 = 4;
const TAIL: u32 = 5;

pub fn palette() -> Result<Palette> {
    Palette::from_colors([
        (FUSELAGE, "gray", 1.0),
        (COCKPIT, "blue", 1.0),
        (WING, "silver", 1.0),
        (ENGINE, "orange", 1.0),
        (TAIL, "red", 1.0),
    ])
}

pub fn build() -> Result<VoxelModel> {
    let mut builder = GridBuilder::new(30, 20, 10);
    builder
        .cuboid(IVec3::new(4, 8, 5), IVec3::new(6, 12, 25), FUSELAGE)
        .cuboid(IVec3::new(4, 9, 23), IVec3::new(6, 11, 27), COCKPIT);

    // swept wings widen by one cell per layer
    for i in 0..5 {
        let z = 10 + i;
        for x in [3, 6] {
            builder.cuboid(IVec3::new(x, 6 - i, z), IVec3::new(x + 1, 14 + i, z + 1), WING);
        }
    }

    builder
        .cuboid(IVec3::new(2, 7, 4), IVec3::new(4, 9, 6), ENGINE)
        .cuboid(IVec3::new(2, 11, 4), IVec3::new(4, 13, 6), ENGINE)
        .cuboid(IVec3::new(6, 9, 5), IVec3::new(7, 11, 15), TAIL)
        .mirror_x();

    Ok(VoxelModel {
        name: "voxel-spaceship",
        grid: builder.build()?,
        palette: palette()?,
        view: ViewOptions {
            background: Rgba::BLACK,
            mode: RenderMode::Solid,
            ..Default::default()
        },
    })
}
