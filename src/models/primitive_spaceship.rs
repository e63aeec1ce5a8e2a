//! Seeded spaceship assembled from random mesh primitives

use glam::Vec3;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::mesh::{TriMesh, primitives};
use crate::render::ViewOptions;
use crate::voxel::palette::Rgba;

use super::PrimitiveModel;

const HULL: Rgba = Rgba::rgb(50, 100, 200);
const CANOPY: Rgba = Rgba::rgba(100, 255, 255, 200);
const WING: Rgba = Rgba::rgb(200, 50, 50);
const ENGINE: Rgba = Rgba::rgb(255, 165, 0);

pub fn build_mesh(seed: u64, colored: bool) -> TriMesh {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let paint = |mut mesh: TriMesh, color: Rgba| {
        if colored {
            mesh.paint(color);
        }
        mesh
    };

    let body = primitives::random_cylinder(&mut rng, (0.2, 0.3), (1.5, 2.5));
    let nose = body.bounds().map_or(0.0, |b| b.max.z);
    let mut parts = vec![paint(body, HULL)];

    let mut cockpit = primitives::icosphere(2, 0.25);
    cockpit.translate(Vec3::new(0.0, 0.0, nose));
    parts.push(paint(cockpit, CANOPY));

    for side in [-1.0, 1.0] {
        let mut wing = primitives::random_wing(&mut rng);
        wing.translate(Vec3::new(side * 0.5, 0.0, nose / 2.0));
        parts.push(paint(wing, WING));
    }

    for side in [-1.0, 1.0] {
        let mut engine = primitives::random_cylinder(&mut rng, (0.1, 0.15), (0.5, 0.7));
        engine.translate(Vec3::new(side * 0.4, 0.0, -0.3));
        parts.push(paint(engine, ENGINE));
    }

    log::debug!("Spaceship (seed {}) assembled from {} parts", seed, parts.len());
    TriMesh::concatenate(&parts)
}

pub fn build(seed: u64, colored: bool) -> PrimitiveModel {
    PrimitiveModel {
        name: "primitive-spaceship",
        mesh: build_mesh(seed, colored),
        view: ViewOptions {
            background: if colored { Rgba::BLACK } else { Rgba::WHITE },
            ..Default::default()
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_mesh() {
        assert_eq!(build_mesh(42, true), build_mesh(42, true));
        assert_ne!(build_mesh(42, false).positions, build_mesh(43, false).positions);
    }

    #[test]
    fn test_part_counts() {
        let mesh = build_mesh(7, false);
        // hull and engines: 6-section cylinders (14 vertices, 24 faces each)
        // cockpit: icosphere(2) (162 vertices, 320 faces); wings: one triangle each
        assert_eq!(mesh.vertex_count(), 3 * 14 + 162 + 2 * 3);
        assert_eq!(mesh.face_count(), 3 * 24 + 320 + 2);
        assert!(mesh.is_valid());
    }

    #[test]
    fn test_translucent_canopy() {
        let mesh = build_mesh(1, true);
        let colors = mesh.vertex_colors.as_ref().unwrap();
        assert_eq!(colors[0], HULL);
        assert_eq!(colors[14].a, 200);
    }

    #[test]
    fn test_hull_length_in_range() {
        for seed in 0..8 {
            let mesh = build_mesh(seed, false);
            let hull = &mesh.positions[..14];
            let top = hull.iter().map(|p| p.z).fold(f32::MIN, f32::max);
            assert!((0.75 - 1e-5..=1.25 + 1e-5).contains(&top));
        }
    }
}
