//! Birthday cake assembled from mesh primitives

use std::f32::consts::TAU;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::mesh::{TriMesh, primitives};
use crate::render::ViewOptions;
use crate::voxel::palette::Rgba;

use super::PrimitiveModel;

const LAYER_HEIGHT: f32 = 0.3;
const BASE_RADIUS: f32 = 1.5;
const RADIUS_STEP: f32 = 0.2;
const CANDLE_HEIGHT: f32 = 0.4;
const CANDLE_RADIUS: f32 = 0.05;
const FLAME_RADIUS: f32 = 0.07;
const CHERRY_RADIUS: f32 = 0.15;
const CHERRY_LIFT: f32 = 0.6;

const CHOCOLATE: Rgba = Rgba::rgb(139, 69, 19);
const VANILLA: Rgba = Rgba::rgb(245, 222, 179);
const FLAME: Rgba = Rgba::rgb(255, 165, 0);
const CHERRY: Rgba = Rgba::rgb(220, 20, 60);
const CANDLE_COLORS: [Rgba; 5] = [
    Rgba::rgb(255, 0, 0),
    Rgba::rgb(0, 255, 0),
    Rgba::rgb(0, 0, 255),
    Rgba::rgb(255, 255, 0),
    Rgba::rgb(255, 105, 180),
];

/// Cake shape and coloring
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CakeParams {
    /// Stacked tiers, each 0.2 narrower than the one below
    pub layers: u32,
    /// Candles spaced evenly on the top tier
    pub candles: u32,
    /// Paint tiers, candles, flames and cherry
    pub colored: bool,
}

impl Default for CakeParams {
    fn default() -> Self {
        Self {
            layers: 5,
            candles: 20,
            colored: false,
        }
    }
}

/// Paint `mesh` when coloring is on
fn tint(mut mesh: TriMesh, colored: bool, color: Rgba) -> TriMesh {
    if colored {
        mesh.paint(color);
    }
    mesh
}

pub fn build_mesh(params: &CakeParams) -> TriMesh {
    let colored = params.colored;
    // colored cakes get smoother tiers and candles
    let (tier_sections, candle_sections) = if colored { (32, 12) } else { (24, 6) };
    let mut parts = Vec::new();

    for i in 0..params.layers {
        let radius = BASE_RADIUS - i as f32 * RADIUS_STEP;
        let mut tier = primitives::cylinder(radius, LAYER_HEIGHT, tier_sections);
        tier.translate(Vec3::new(0.0, 0.0, i as f32 * LAYER_HEIGHT));
        let color = if i % 2 == 0 { CHOCOLATE } else { VANILLA };
        parts.push(tint(tier, colored, color));
    }

    let top = params.layers as f32 * LAYER_HEIGHT;
    let top_radius = BASE_RADIUS - params.layers.saturating_sub(1) as f32 * RADIUS_STEP;
    let ring = top_radius * 0.8;

    for j in 0..params.candles {
        let angle = TAU * j as f32 / params.candles as f32;
        let (x, y) = (ring * angle.cos(), ring * angle.sin());

        let mut candle = primitives::cylinder(CANDLE_RADIUS, CANDLE_HEIGHT, candle_sections);
        candle.translate(Vec3::new(x, y, top));
        parts.push(tint(candle, colored, CANDLE_COLORS[j as usize % CANDLE_COLORS.len()]));

        let mut flame = primitives::icosphere(1, FLAME_RADIUS);
        flame.translate(Vec3::new(x, y, top + CANDLE_HEIGHT));
        parts.push(tint(flame, colored, FLAME));
    }

    let mut cherry = primitives::icosphere(2, CHERRY_RADIUS);
    cherry.translate(Vec3::new(0.0, 0.0, top + CHERRY_LIFT));
    parts.push(tint(cherry, colored, CHERRY));

    log::debug!("Cake assembled from {} parts", parts.len());
    TriMesh::concatenate(&parts)
}

pub fn build(params: &CakeParams) -> PrimitiveModel {
    PrimitiveModel {
        name: "primitive-cake",
        mesh: build_mesh(params),
        view: ViewOptions::default(),
    }
}
