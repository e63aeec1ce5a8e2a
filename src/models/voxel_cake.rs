//! Voxel birthday cake: checkerboard plate, tiered discs, candle ring and
//! an icing spiral wound around the tiers

use glam::IVec2;

use crate::core::types::Result;
use crate::render::{RenderMode, ViewOptions};
use crate::voxel::palette::{Palette, Rgba};
use crate::voxel::{GridBuilder, StampShape};

use super::VoxelModel;

const DEPTH: u32 = 30;
const HEIGHT: u32 = 40;
const WIDTH: u32 = 40;

const TIER_RADII: [i32; 5] = [18, 15, 12, 9, 6];
const TIER_HEIGHT: i32 = 4;

const PLATE: u32 = 8;
const CANDLE: u32 = 6;
const ICING: u32 = 7;

const CANDLE_COUNT: u32 = 24;
const CANDLE_RING_RADIUS: f32 = 5.0;
const CANDLE_HEIGHT: i32 = 2;

pub fn palette() -> Result<Palette> {
    Palette::from_colors([
        (1, "chocolate", 1.0),
        (2, "pink", 1.0),
        (3, "lemonchiffon", 1.0),
        (4, "lightblue", 1.0),
        (5, "plum", 1.0),
        (CANDLE, "orange", 1.0),
        (ICING, "white", 1.0),
        (PLATE, "black", 1.0),
    ])
}

pub fn build() -> Result<VoxelModel> {
    let center = IVec2::new(WIDTH as i32 / 2, HEIGHT as i32 / 2);
    let mut builder = GridBuilder::new(DEPTH, HEIGHT, WIDTH);

    builder.checkerboard(0, 0, PLATE);

    let mut z = 1;
    for (i, &radius) in TIER_RADII.iter().enumerate() {
        builder.disc(center, radius, z, z + TIER_HEIGHT, i as u32 + 1);
        z += TIER_HEIGHT;
    }
    let top = z;

    builder.ring(center.as_vec2(), CANDLE_RING_RADIUS, CANDLE_COUNT, top, top + CANDLE_HEIGHT, CANDLE);

    builder.stamp(
        StampShape::Helix {
            center: center.as_vec2(),
            start_radius: TIER_RADII[0] as f32 - 1.0,
            end_radius: TIER_RADII[TIER_RADII.len() - 1] as f32,
            turns: 2.0,
            z_start: 1.0,
            z_end: top as f32,
            samples: 100,
        },
        ICING,
    );

    Ok(VoxelModel {
        name: "voxel-cake",
        grid: builder.build()?,
        palette: palette()?,
        view: ViewOptions {
            background: Rgba::WHITE,
            mode: RenderMode::Solid,
            ..Default::default()
        },
    })
}
