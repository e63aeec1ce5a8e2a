//! Parametric mesh primitives
//!
//! All primitives are centered at the origin with outward-facing (CCW) winding.
//! Cylinders run along Z.

use std::collections::HashMap;
use std::f32::consts::TAU;

use glam::Vec3;
use rand::Rng;

use super::trimesh::TriMesh;

/// Closed cylinder along Z with caps at `±height / 2`
pub fn cylinder(radius: f32, height: f32, sections: u32) -> TriMesh {
    let n = sections.max(3);
    let half = height * 0.5;

    let mut positions = Vec::with_capacity(2 * n as usize + 2);
    for z in [-half, half] {
        for i in 0..n {
            let theta = TAU * i as f32 / n as f32;
            positions.push(Vec3::new(radius * theta.cos(), radius * theta.sin(), z));
        }
    }
    let bottom_center = positions.len() as u32;
    positions.push(Vec3::new(0.0, 0.0, -half));
    let top_center = positions.len() as u32;
    positions.push(Vec3::new(0.0, 0.0, half));

    let mut faces = Vec::with_capacity(4 * n as usize);
    for i in 0..n {
        let j = (i + 1) % n;
        let (bi, bj, ti, tj) = (i, j, n + i, n + j);
        faces.push([bi, bj, tj]);
        faces.push([bi, tj, ti]);
        faces.push([top_center, ti, tj]);
        faces.push([bottom_center, bj, bi]);
    }

    TriMesh::new(positions, faces)
}

/// Icosahedron subdivided `subdivisions` times and projected onto a sphere
pub fn icosphere(subdivisions: u32, radius: f32) -> TriMesh {
    let t = (1.0 + 5.0_f32.sqrt()) / 2.0;
    let mut positions: Vec<Vec3> = [
        [-1.0, t, 0.0], [1.0, t, 0.0], [-1.0, -t, 0.0], [1.0, -t, 0.0],
        [0.0, -1.0, t], [0.0, 1.0, t], [0.0, -1.0, -t], [0.0, 1.0, -t],
        [t, 0.0, -1.0], [t, 0.0, 1.0], [-t, 0.0, -1.0], [-t, 0.0, 1.0],
    ]
    .iter()
    .map(|&p| Vec3::from_array(p).normalize())
    .collect();

    let mut faces: Vec<[u32; 3]> = vec![
        [0, 11, 5], [0, 5, 1], [0, 1, 7], [0, 7, 10], [0, 10, 11],
        [1, 5, 9], [5, 11, 4], [11, 10, 2], [10, 7, 6], [7, 1, 8],
        [3, 9, 4], [3, 4, 2], [3, 2, 6], [3, 6, 8], [3, 8, 9],
        [4, 9, 5], [2, 4, 11], [6, 2, 10], [8, 6, 7], [9, 8, 1],
    ];

    for _ in 0..subdivisions {
        let mut midpoints: HashMap<(u32, u32), u32> = HashMap::new();
        let mut midpoint = |a: u32, b: u32, positions: &mut Vec<Vec3>| -> u32 {
            let key = (a.min(b), a.max(b));
            *midpoints.entry(key).or_insert_with(|| {
                let mid = ((positions[a as usize] + positions[b as usize]) * 0.5).normalize();
                positions.push(mid);
                positions.len() as u32 - 1
            })
        };

        let mut next = Vec::with_capacity(faces.len() * 4);
        for &[a, b, c] in &faces {
            let ab = midpoint(a, b, &mut positions);
            let bc = midpoint(b, c, &mut positions);
            let ca = midpoint(c, a, &mut positions);
            next.push([a, ab, ca]);
            next.push([b, bc, ab]);
            next.push([c, ca, bc]);
            next.push([ab, bc, ca]);
        }
        faces = next;
    }

    for p in &mut positions {
        *p *= radius;
    }
    TriMesh::new(positions, faces)
}

/// Axis-aligned box with the given full extents
pub fn cuboid(extents: Vec3) -> TriMesh {
    let half = extents * 0.5;
    // corner i: bit 0 = +x, bit 1 = +y, bit 2 = +z
    let positions = (0..8)
        .map(|i| {
            Vec3::new(
                if i & 1 != 0 { half.x } else { -half.x },
                if i & 2 != 0 { half.y } else { -half.y },
                if i & 4 != 0 { half.z } else { -half.z },
            )
        })
        .collect();
    let faces = vec![
        [0, 2, 1], [1, 2, 3], // -z
        [4, 5, 6], [5, 7, 6], // +z
        [0, 1, 5], [0, 5, 4], // -y
        [2, 6, 7], [2, 7, 3], // +y
        [0, 4, 6], [0, 6, 2], // -x
        [1, 3, 7], [1, 7, 5], // +x
    ];
    TriMesh::new(positions, faces)
}

/// Single free-standing triangle
pub fn triangle(vertices: [Vec3; 3]) -> TriMesh {
    TriMesh::new(vertices.to_vec(), vec![[0, 1, 2]])
}

/// Uniform sample from an inclusive range given in either order
fn uniform<R: Rng + ?Sized>(rng: &mut R, (a, b): (f32, f32)) -> f32 {
    rng.gen_range(a.min(b)..=a.max(b))
}

/// Six-sided cylinder with random radius and height
pub fn random_cylinder<R: Rng + ?Sized>(rng: &mut R, radius_range: (f32, f32), height_range: (f32, f32)) -> TriMesh {
    let radius = uniform(rng, radius_range);
    let height = uniform(rng, height_range);
    cylinder(radius, height, 6)
}

/// Box with each extent drawn independently from `scale_range`
pub fn random_cuboid<R: Rng + ?Sized>(rng: &mut R, scale_range: (f32, f32)) -> TriMesh {
    let extents = Vec3::new(
        uniform(rng, scale_range),
        uniform(rng, scale_range),
        uniform(rng, scale_range),
    );
    cuboid(extents)
}

/// Flat right-triangle wing in the XY plane
pub fn random_wing<R: Rng + ?Sized>(rng: &mut R) -> TriMesh {
    let span = uniform(rng, (0.5, 1.0));
    let chord = uniform(rng, (0.2, 0.5));
    triangle([Vec3::ZERO, Vec3::new(span, 0.0, 0.0), Vec3::new(0.0, chord, 0.0)])
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    /// Every face normal points away from the origin
    fn assert_outward(mesh: &TriMesh) {
        for (face, normal) in mesh.faces.iter().zip(mesh.face_normals()) {
            let centroid = face.iter().map(|&i| mesh.positions[i as usize]).sum::<Vec3>() / 3.0;
            assert!(normal.dot(centroid) > 0.0, "face {:?} points inward", face);
        }
    }

    #[test]
    fn test_cylinder_shape() {
        let mesh = cylinder(1.5, 0.3, 24);
        assert_eq!(mesh.vertex_count(), 50);
        assert_eq!(mesh.face_count(), 96);
        let bounds = mesh.bounds().unwrap();
        assert!((bounds.max.z - 0.15).abs() < 1e-6);
        assert!((bounds.min.z + 0.15).abs() < 1e-6);
        assert!((bounds.max.x - 1.5).abs() < 1e-6);
        assert!(mesh.is_valid());
        assert_outward(&mesh);
    }

    #[test]
    fn test_cylinder_minimum_sections() {
        assert_eq!(cylinder(1.0, 1.0, 1).face_count(), 12);
    }

    #[test]
    fn test_icosphere_counts() {
        for s in 0..3 {
            let mesh = icosphere(s, 0.15);
            let k = 4usize.pow(s);
            assert_eq!(mesh.vertex_count(), 10 * k + 2);
            assert_eq!(mesh.face_count(), 20 * k);
            assert!(mesh.positions.iter().all(|p| (p.length() - 0.15).abs() < 1e-5));
            assert_outward(&mesh);
        }
    }

    #[test]
    fn test_cuboid() {
        let mesh = cuboid(Vec3::new(2.0, 4.0, 6.0));
        assert_eq!(mesh.vertex_count(), 8);
        assert_eq!(mesh.face_count(), 12);
        let bounds = mesh.bounds().unwrap();
        assert_eq!(bounds.min, Vec3::new(-1.0, -2.0, -3.0));
        assert_eq!(bounds.max, Vec3::new(1.0, 2.0, 3.0));
        assert_outward(&mesh);
    }

    #[test]
    fn test_random_primitives_in_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let body = random_cylinder(&mut rng, (0.2, 0.3), (1.5, 2.5));
        let b = body.bounds().unwrap();
        assert!(b.size().z >= 1.5 - 1e-5 && b.size().z <= 2.5 + 1e-5);
        assert!(b.max.x >= 0.2 - 1e-5 && b.max.x <= 0.3 + 1e-5);

        let crate_box = random_cuboid(&mut rng, (0.2, 1.0));
        let size = crate_box.bounds().unwrap().size();
        assert!(size.min_element() >= 0.2 - 1e-5 && size.max_element() <= 1.0 + 1e-5);

        let wing = random_wing(&mut rng);
        assert_eq!(wing.face_count(), 1);
        assert!(wing.positions[1].x >= 0.5 && wing.positions[1].x <= 1.0);
        assert!(wing.positions[2].y >= 0.2 && wing.positions[2].y <= 0.5);
    }

    #[test]
    fn test_random_is_reproducible() {
        let a = random_cylinder(&mut ChaCha8Rng::seed_from_u64(7), (0.1, 0.15), (0.5, 0.7));
        let b = random_cylinder(&mut ChaCha8Rng::seed_from_u64(7), (0.1, 0.15), (0.5, 0.7));
        assert_eq!(a, b);
    }

    #[test]
    fn test_degenerate_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mesh = random_cylinder(&mut rng, (0.25, 0.25), (1.0, 1.0));
        assert!((mesh.bounds().unwrap().size().z - 1.0).abs() < 1e-6);
    }
}
